//! Observable state of a survey flow, as rendered by the presentation layer.

use reqwest::Url;
use std::collections::{BTreeMap, BTreeSet};

use super::{FlowStatus, Toast};
use crate::domain::foundation::QuestionId;
use crate::domain::survey::{Answer, Survey, SurveyQuestion};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowViewState {
    pub status: FlowStatus,
    /// A fetch or submission is in flight.
    pub is_loading: bool,
    pub survey: Option<Survey>,
    pub hero_question: Option<SurveyQuestion>,
    pub hero_answer: Option<Answer>,
    pub show_hero_question: bool,
    /// Remaining (non-hero, non-label) questions.
    pub questions: Vec<SurveyQuestion>,
    pub answers: BTreeMap<QuestionId, Answer>,
    pub show_full_survey_questions: bool,
    pub incomplete_question_ids: BTreeSet<QuestionId>,
    pub answered_question_count: usize,
    pub answerable_question_count: usize,
    pub toast: Option<Toast>,
    pub show_toast_message: bool,
    pub open_external_survey: bool,
    pub external_survey_url: Option<Url>,
    pub show_survey_dismiss_sheet: bool,
}

impl FlowViewState {
    pub fn show_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
        self.show_toast_message = true;
    }

    pub fn dismiss_toast(&mut self) {
        self.show_toast_message = false;
    }

    /// Recomputes progress counters over the remaining questions.
    pub fn recount(&mut self) {
        let answerable: Vec<&SurveyQuestion> =
            self.questions.iter().filter(|q| !q.is_label()).collect();
        self.answerable_question_count = answerable.len();
        self.answered_question_count = answerable
            .iter()
            .filter(|q| self.answers.get(&q.id).is_some_and(|a| !a.is_blank()))
            .count();
    }

    /// Ids of answerable remaining questions without a usable answer.
    pub fn unanswered_question_ids(&self) -> BTreeSet<QuestionId> {
        self.questions
            .iter()
            .filter(|q| !q.is_label())
            .filter(|q| self.answers.get(&q.id).map_or(true, Answer::is_blank))
            .map(|q| q.id)
            .collect()
    }

    /// Removes every on-screen survey artifact; toasts and the external link survive.
    pub fn clear_survey(&mut self) {
        self.is_loading = false;
        self.survey = None;
        self.hero_question = None;
        self.hero_answer = None;
        self.show_hero_question = false;
        self.questions.clear();
        self.answers.clear();
        self.show_full_survey_questions = false;
        self.incomplete_question_ids.clear();
        self.show_survey_dismiss_sheet = false;
        self.recount();
    }
}
