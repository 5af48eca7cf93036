//! Actions the presentation layer dispatches into the survey flow.

use crate::domain::survey::{Answer, QuestionAnswerSubmission};
use crate::domain::transit::Stop;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowAction {
    /// The survey surface became visible.
    OnAppear,
    /// The rider moved to another stop, or back to the map (`None`).
    UpdateCurrentStop(Option<Stop>),
    /// The rider changed the hero question's answer.
    UpdateHeroAnswer(Answer),
    /// The rider confirmed the hero question.
    OnTapNextHeroQuestion,
    /// The rider answered one of the remaining questions.
    UpdateAnswer(QuestionAnswerSubmission),
    /// The rider submitted the remaining-questions form.
    OnSubmitQuestions,
    /// The rider never wants to see this survey again.
    OnSkipSurvey,
    /// The rider wants to be asked later.
    OnRemindLater,
    OnCloseQuestionsForm,
    /// Asks for confirmation; does not close anything by itself.
    OnCloseSurveyHeroQuestion,
    OnCloseSurveyDismissSheet,
    OnDismissToast,
    /// The presentation layer opened the external survey link.
    OnExternalSurveyOpened,
}
