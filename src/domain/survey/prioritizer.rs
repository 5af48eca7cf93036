//! Selection of the one survey to present.
//!
//! Candidates arrive already filtered for region and date window. The
//! prioritizer walks them in list order and returns the first one that the
//! rider has not dismissed and that is visible in the current presentation
//! context. List order is the tie-break: the backend's ordering wins.

use super::Survey;
use crate::domain::foundation::SurveyId;
use crate::domain::transit::Stop;

/// Read access to what the rider already did with each survey.
pub trait SurveyResponseHistory {
    fn is_survey_completed(&self, survey_id: SurveyId) -> bool;
    fn is_survey_skipped(&self, survey_id: SurveyId) -> bool;
}

pub struct SurveyPrioritizer<'a> {
    history: &'a dyn SurveyResponseHistory,
}

impl<'a> SurveyPrioritizer<'a> {
    pub fn new(history: &'a dyn SurveyResponseHistory) -> Self {
        Self { history }
    }

    /// Index of the survey to present, or `None` when nothing is eligible.
    ///
    /// `visible_on_stop` selects between the stop screen (requires
    /// `show_on_stops` and, for restricted surveys, a matching stop or route)
    /// and the map (requires `show_on_map`).
    pub fn next_survey_index(
        &self,
        surveys: &[Survey],
        visible_on_stop: bool,
        stop: Option<&Stop>,
    ) -> Option<usize> {
        surveys
            .iter()
            .position(|survey| self.is_eligible(survey, visible_on_stop, stop))
    }

    fn is_eligible(&self, survey: &Survey, visible_on_stop: bool, stop: Option<&Stop>) -> bool {
        if self.history.is_survey_skipped(survey.id) {
            return false;
        }
        if self.history.is_survey_completed(survey.id) && !survey.allows_multiple_responses {
            return false;
        }

        if visible_on_stop {
            survey.show_on_stops && Self::matches_stop(survey, stop)
        } else {
            survey.show_on_map
        }
    }

    fn matches_stop(survey: &Survey, stop: Option<&Stop>) -> bool {
        if !survey.has_location_restrictions() {
            return true;
        }
        let Some(stop) = stop else {
            return false;
        };

        let stop_listed = survey
            .visible_stops_list
            .as_ref()
            .is_some_and(|stops| stops.contains(&stop.id));
        let route_listed = survey
            .visible_routes_list
            .as_ref()
            .is_some_and(|routes| routes.iter().any(|r| stop.is_served_by(r)));

        stop_listed || route_listed
    }
}
