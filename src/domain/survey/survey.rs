//! Survey value object as decoded from the backend.
//!
//! Surveys are immutable for the lifetime of a flow session. Questions keep
//! the order the backend sent them in; every accessor that cares about display
//! order sorts by `position` itself.

use serde::{Deserialize, Serialize};

use super::question::SurveyQuestion;
use super::study::Study;
use crate::domain::foundation::{QuestionId, RouteId, StopId, SurveyId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub show_on_map: bool,
    #[serde(default)]
    pub show_on_stops: bool,
    #[serde(default)]
    pub start_date: Option<Timestamp>,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
    #[serde(default, rename = "visible_stop_list")]
    pub visible_stops_list: Option<Vec<StopId>>,
    #[serde(default, rename = "visible_route_list")]
    pub visible_routes_list: Option<Vec<RouteId>>,
    #[serde(default)]
    pub allows_multiple_responses: bool,
    #[serde(default)]
    pub allows_visible: bool,
    pub study: Study,
    #[serde(default)]
    pub questions: Vec<SurveyQuestion>,
}

impl Survey {
    /// Questions sorted by `position` (stable for equal positions).
    pub fn ordered_questions(&self) -> Vec<&SurveyQuestion> {
        let mut questions: Vec<&SurveyQuestion> = self.questions.iter().collect();
        questions.sort_by_key(|q| q.position);
        questions
    }

    /// The first answerable question, presented on its own before the rest.
    pub fn hero_question(&self) -> Option<&SurveyQuestion> {
        self.ordered_questions().into_iter().find(|q| !q.is_label())
    }

    /// Every question after the hero, in display order, labels excluded.
    pub fn remaining_questions(&self, hero_id: QuestionId) -> Vec<SurveyQuestion> {
        self.ordered_questions()
            .into_iter()
            .filter(|q| q.id != hero_id && !q.is_label())
            .cloned()
            .collect()
    }

    /// Returns true when `now` falls inside the survey's date window.
    ///
    /// Missing bounds are open-ended.
    pub fn is_active_at(&self, now: &Timestamp) -> bool {
        let started = self.start_date.map_or(true, |start| !now.is_before(&start));
        let not_ended = self.end_date.map_or(true, |end| !now.is_after(&end));
        started && not_ended
    }

    /// Returns true when the survey restricts itself to specific stops or routes.
    pub fn has_location_restrictions(&self) -> bool {
        self.visible_stops_list.as_ref().is_some_and(|l| !l.is_empty())
            || self.visible_routes_list.as_ref().is_some_and(|l| !l.is_empty())
    }
}
