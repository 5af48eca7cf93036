//! SurveyFlowController - drives one survey presentation end to end.
//!
//! The controller is the single reducing entry point for rider actions:
//! `dispatch` applies an action to the flow state, performs the network call
//! it implies, and publishes the resulting [`FlowViewState`] on a watch
//! channel the presentation layer subscribes to.
//!
//! # Staleness
//!
//! Every network call and the pacing delay capture the current flow epoch.
//! Actions that end the flow (skip, remind later, close, finishing) and
//! actions that start a new fetch cycle bump the epoch. A result that comes
//! back under an older epoch is dropped, and a pacing delay waiting under an
//! older epoch is cancelled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::SurveyStateManager;
use crate::config::FlowConfig;
use crate::domain::classification::{classify, SurveyServiceError};
use crate::domain::external_survey::ExternalSurveyUrlBuilder;
use crate::domain::flow::{
    FlowAction, FlowError, FlowStatus, FlowViewState, Toast, SUBMISSION_SUCCESS_MESSAGE,
};
use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::survey::{
    QuestionAnswerSubmission, QuestionType, Survey, SurveyPrioritizer,
};
use crate::domain::transit::Stop;
use crate::ports::{
    ApplicationContext, CellularDataMonitor, RecentStopStore, SurveyResponseScope, SurveyService,
};

/// External collaborators of the flow.
#[derive(Clone)]
pub struct SurveyFlowPorts {
    pub service: Arc<dyn SurveyService>,
    pub context: Arc<dyn ApplicationContext>,
    pub recent_stops: Arc<dyn RecentStopStore>,
    pub cellular: Arc<dyn CellularDataMonitor>,
}

/// Mutable flow state guarded by the controller's mutex.
#[derive(Debug, Default)]
struct FlowState {
    view: FlowViewState,
    /// Stop the rider is looking at; `None` on the map.
    current_stop: Option<Stop>,
    /// Stop the presented survey was fetched for.
    survey_stop: Option<Stop>,
    /// Hero answer accepted; waiting for the pacing delay.
    hero_submitted: bool,
}

struct Inner {
    ports: SurveyFlowPorts,
    state_manager: SurveyStateManager,
    pacing_delay: Duration,
    flow: Mutex<FlowState>,
    epoch: watch::Sender<u64>,
    view: watch::Sender<FlowViewState>,
}

/// Cheaply cloneable handle to one survey flow.
#[derive(Clone)]
pub struct SurveyFlowController {
    inner: Arc<Inner>,
}

/// Work prepared under the lock and performed after releasing it.
enum HeroStep {
    Submit {
        epoch: u64,
        survey: Survey,
        scope: SurveyResponseScope,
        submission: QuestionAnswerSubmission,
    },
    Done,
}

impl SurveyFlowController {
    pub fn new(
        ports: SurveyFlowPorts,
        state_manager: SurveyStateManager,
        config: &FlowConfig,
    ) -> Self {
        let (epoch, _) = watch::channel(0);
        let (view, _) = watch::channel(FlowViewState::default());

        Self {
            inner: Arc::new(Inner {
                ports,
                state_manager,
                pacing_delay: config.pacing_delay(),
                flow: Mutex::new(FlowState::default()),
                epoch,
                view,
            }),
        }
    }

    /// Receiver that sees every published view state.
    pub fn subscribe(&self) -> watch::Receiver<FlowViewState> {
        self.inner.view.subscribe()
    }

    /// Snapshot of the current view state.
    pub fn view(&self) -> FlowViewState {
        self.inner.view.borrow().clone()
    }

    pub fn status(&self) -> FlowStatus {
        self.inner.view.borrow().status
    }

    /// Applies one rider action.
    ///
    /// Returns once the action, including any network call and pacing delay
    /// it triggers, has completed or been superseded.
    pub async fn dispatch(&self, action: FlowAction) {
        debug!(?action, "dispatching survey flow action");
        match action {
            FlowAction::OnAppear => self.on_appear().await,
            FlowAction::UpdateCurrentStop(stop) => self.update_current_stop(stop).await,
            FlowAction::UpdateHeroAnswer(answer) => self.update(|flow| {
                if flow.view.status == FlowStatus::HeroQuestion {
                    flow.view.hero_answer = Some(answer);
                }
            }),
            FlowAction::OnTapNextHeroQuestion => self.next_hero_question().await,
            FlowAction::UpdateAnswer(submission) => self.update_answer(submission),
            FlowAction::OnSubmitQuestions => self.submit_questions().await,
            FlowAction::OnSkipSurvey => self.skip_survey(),
            FlowAction::OnRemindLater => self.remind_later(),
            FlowAction::OnCloseQuestionsForm => self.update(|flow| {
                if flow.view.status.is_active() {
                    self.finish(flow);
                }
            }),
            FlowAction::OnCloseSurveyHeroQuestion => self.update(|flow| {
                if flow.view.status == FlowStatus::HeroQuestion {
                    flow.view.show_survey_dismiss_sheet = true;
                }
            }),
            FlowAction::OnCloseSurveyDismissSheet => {
                self.update(|flow| flow.view.show_survey_dismiss_sheet = false)
            }
            FlowAction::OnDismissToast => self.update(|flow| flow.view.dismiss_toast()),
            FlowAction::OnExternalSurveyOpened => {
                self.update(|flow| flow.view.open_external_survey = false)
            }
        }
    }

    // === Fetch cycle ===

    async fn on_appear(&self) {
        let Some((epoch, stop)) = self.begin_fetch() else {
            return;
        };
        self.fetch(epoch, stop).await;
    }

    async fn update_current_stop(&self, stop: Option<Stop>) {
        if let Some(stop) = &stop {
            self.inner.ports.recent_stops.record_stop(stop.id.clone());
        }

        {
            let mut flow = self.lock();
            if flow.view.status.is_active() {
                debug!(status = %flow.view.status, "survey active, ignoring stop change");
                return;
            }
            flow.current_stop = stop;
        }

        let Some((epoch, stop)) = self.begin_fetch() else {
            return;
        };
        self.fetch(epoch, stop).await;
    }

    /// Moves to `Loading` when a survey may be shown; returns the new epoch.
    fn begin_fetch(&self) -> Option<(u64, Option<Stop>)> {
        let mut flow = self.lock();
        if flow.view.status.is_active() {
            debug!(status = %flow.view.status, "survey flow already active");
            return None;
        }
        if !self.inner.state_manager.should_show_survey() {
            info!("survey postponed by reminder, not fetching");
            return None;
        }
        if !self.transition(&mut flow.view, FlowStatus::Loading) {
            return None;
        }

        flow.view.clear_survey();
        flow.view.is_loading = true;
        flow.view.open_external_survey = false;
        flow.view.external_survey_url = None;
        flow.survey_stop = flow.current_stop.clone();
        flow.hero_submitted = false;
        let epoch = self.bump_epoch();
        self.publish(&flow);

        Some((epoch, flow.survey_stop.clone()))
    }

    async fn fetch(&self, epoch: u64, stop: Option<Stop>) {
        let result = self.inner.ports.service.fetch_surveys().await;

        let mut flow = self.lock();
        if self.is_stale(epoch) {
            debug!(epoch, "dropping stale survey fetch result");
            return;
        }
        flow.view.is_loading = false;

        let surveys = match result {
            Ok(surveys) => surveys,
            Err(err) => {
                self.show_service_error(&mut flow, err, "survey fetch failed");
                self.transition(&mut flow.view, FlowStatus::Idle);
                self.publish(&flow);
                return;
            }
        };

        let now = Timestamp::now();
        let active: Vec<Survey> = surveys.into_iter().filter(|s| s.is_active_at(&now)).collect();
        let prioritizer = SurveyPrioritizer::new(&self.inner.state_manager);
        let chosen = prioritizer
            .next_survey_index(&active, stop.is_some(), stop.as_ref())
            .and_then(|index| active.into_iter().nth(index));

        let Some(survey) = chosen else {
            info!("no eligible survey");
            self.transition(&mut flow.view, FlowStatus::Idle);
            self.publish(&flow);
            return;
        };

        let Some(hero) = survey.hero_question().cloned() else {
            info!(survey_id = %survey.id, "survey has only labels, nothing to ask");
            self.transition(&mut flow.view, FlowStatus::Idle);
            self.publish(&flow);
            return;
        };

        if self.transition(&mut flow.view, FlowStatus::HeroQuestion) {
            info!(survey_id = %survey.id, question_id = %hero.id, "presenting hero question");
            flow.view.hero_question = Some(hero);
            flow.view.hero_answer = None;
            flow.view.show_hero_question = true;
            flow.view.survey = Some(survey);
        }
        self.publish(&flow);
    }

    // === Hero question ===

    async fn next_hero_question(&self) {
        let step = {
            let mut flow = self.lock();
            let step = self.prepare_hero_step(&mut flow);
            self.publish(&flow);
            step
        };

        let HeroStep::Submit {
            epoch,
            survey,
            scope,
            submission,
        } = step
        else {
            return;
        };

        let result = self
            .inner
            .ports
            .service
            .submit_survey_response(&scope, &submission)
            .await;

        {
            let mut flow = self.lock();
            if self.is_stale(epoch) {
                debug!(epoch, "dropping stale hero submission result");
                return;
            }
            flow.view.is_loading = false;

            if let Err(err) = result {
                self.show_service_error(&mut flow, err, "hero answer submission failed");
                self.publish(&flow);
                return;
            }

            info!(survey_id = %survey.id, "hero answer submitted");
            flow.hero_submitted = true;
            self.inner.state_manager.set_survey_completed(survey.id);
            self.publish(&flow);
        }

        if !self.pace(epoch).await {
            debug!(epoch, "pacing delay cancelled");
            return;
        }

        let mut flow = self.lock();
        if self.is_stale(epoch) {
            return;
        }

        flow.hero_submitted = false;
        let remaining = survey.remaining_questions(submission.question_id);
        if remaining.is_empty() {
            info!(survey_id = %survey.id, "survey complete after hero question");
            flow.view.show_toast(Toast::success(SUBMISSION_SUCCESS_MESSAGE));
            self.finish(&mut flow);
        } else if self.transition(&mut flow.view, FlowStatus::RemainingQuestions) {
            info!(survey_id = %survey.id, count = remaining.len(), "presenting remaining questions");
            flow.view.show_hero_question = false;
            flow.view.questions = remaining;
            flow.view.answers.clear();
            flow.view.incomplete_question_ids.clear();
            flow.view.show_full_survey_questions = true;
            flow.view.recount();
        }
        self.publish(&flow);
    }

    fn prepare_hero_step(&self, flow: &mut FlowState) -> HeroStep {
        if flow.view.status != FlowStatus::HeroQuestion || flow.view.is_loading || flow.hero_submitted
        {
            debug!(status = %flow.view.status, "no hero question to answer");
            return HeroStep::Done;
        }
        let (Some(survey), Some(hero)) = (flow.view.survey.clone(), flow.view.hero_question.clone())
        else {
            return HeroStep::Done;
        };

        if hero.question_type() == QuestionType::ExternalSurvey {
            self.open_external_survey(flow, &survey);
            return HeroStep::Done;
        }

        let answer = match flow.view.hero_answer.clone() {
            Some(answer) if !answer.is_blank() => answer,
            _ => {
                flow.view
                    .show_toast(Toast::error(FlowError::HeroAnswerMissing.to_string()));
                return HeroStep::Done;
            }
        };
        if !hero.content.accepts(&answer) {
            flow.view
                .show_toast(Toast::error(FlowError::HeroAnswerInvalid.to_string()));
            return HeroStep::Done;
        }

        flow.view.is_loading = true;
        HeroStep::Submit {
            epoch: self.current_epoch(),
            scope: SurveyResponseScope::new(survey.id, flow.survey_stop.as_ref()),
            submission: QuestionAnswerSubmission::new(hero.id, answer),
            survey,
        }
    }

    fn open_external_survey(&self, flow: &mut FlowState, survey: &Survey) {
        let user_id = self.inner.state_manager.user_id();
        let builder = ExternalSurveyUrlBuilder::new(
            &user_id,
            self.inner.ports.context.as_ref(),
            self.inner.ports.recent_stops.as_ref(),
        );

        match builder.build_url(survey, flow.survey_stop.as_ref()) {
            Some(url) => {
                info!(survey_id = %survey.id, "opening external survey");
                self.inner.state_manager.set_survey_completed(survey.id);
                flow.view.external_survey_url = Some(url);
                flow.view.open_external_survey = true;
                self.finish(flow);
            }
            None => {
                warn!(survey_id = %survey.id, "external survey has no usable link");
                flow.view
                    .show_toast(Toast::error(FlowError::ExternalSurveyUnavailable.to_string()));
            }
        }
    }

    /// Waits out the pacing delay; false when the flow moved on meanwhile.
    async fn pace(&self, epoch: u64) -> bool {
        let mut epoch_rx = self.inner.epoch.subscribe();
        if *epoch_rx.borrow_and_update() != epoch {
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep(self.inner.pacing_delay) => !self.is_stale(epoch),
            _ = epoch_rx.changed() => false,
        }
    }

    // === Remaining questions ===

    fn update_answer(&self, submission: QuestionAnswerSubmission) {
        self.update(|flow| {
            if flow.view.status != FlowStatus::RemainingQuestions {
                return;
            }
            let question_id = submission.question_id;
            if !flow.view.questions.iter().any(|q| q.id == question_id) {
                debug!(%question_id, "answer for unknown question ignored");
                return;
            }

            if !submission.answer.is_blank() {
                flow.view.incomplete_question_ids.remove(&question_id);
            }
            flow.view.answers.insert(question_id, submission.answer);
            flow.view.recount();
        });
    }

    async fn submit_questions(&self) {
        let prepared = {
            let mut flow = self.lock();
            if flow.view.status != FlowStatus::RemainingQuestions || flow.view.is_loading {
                return;
            }
            let Some(survey_id) = flow.view.survey.as_ref().map(|s| s.id) else {
                return;
            };

            let missing = flow.view.unanswered_question_ids();
            if !missing.is_empty() {
                let err = FlowError::IncompleteAnswers {
                    missing: missing.iter().copied().collect(),
                };
                debug!(missing = ?missing, "remaining questions incomplete");
                flow.view.incomplete_question_ids = missing;
                flow.view.show_toast(Toast::error(err.to_string()));
                self.publish(&flow);
                return;
            }

            let answers: Vec<QuestionAnswerSubmission> = flow
                .view
                .questions
                .iter()
                .filter(|q| !q.is_label())
                .filter_map(|q| {
                    flow.view
                        .answers
                        .get(&q.id)
                        .map(|a| QuestionAnswerSubmission::new(q.id, a.clone()))
                })
                .collect();

            flow.view.is_loading = true;
            self.publish(&flow);
            (
                self.current_epoch(),
                SurveyResponseScope::new(survey_id, flow.survey_stop.as_ref()),
                answers,
            )
        };
        let (epoch, scope, answers) = prepared;

        let result = self
            .inner
            .ports
            .service
            .update_survey_responses(&scope, &answers)
            .await;

        let mut flow = self.lock();
        if self.is_stale(epoch) {
            debug!(epoch, "dropping stale survey update result");
            return;
        }
        flow.view.is_loading = false;

        match result {
            Ok(()) => {
                info!(survey_id = %scope.survey_id, count = answers.len(), "survey answers submitted");
                flow.view.show_toast(Toast::success(SUBMISSION_SUCCESS_MESSAGE));
                self.finish(&mut flow);
            }
            Err(err) => self.show_service_error(&mut flow, err, "survey answer update failed"),
        }
        self.publish(&flow);
    }

    // === Dismissal ===

    fn skip_survey(&self) {
        self.update(|flow| {
            if let Some(survey) = &flow.view.survey {
                info!(survey_id = %survey.id, "survey skipped");
                self.inner.state_manager.set_survey_skipped(survey.id);
            }
            if flow.view.status.is_active() {
                self.finish(flow);
            }
            flow.view.show_survey_dismiss_sheet = false;
        });
    }

    fn remind_later(&self) {
        self.update(|flow| {
            info!("survey postponed");
            self.inner.state_manager.set_next_reminder_date();
            if flow.view.status.is_active() {
                self.finish(flow);
            }
            flow.view.show_survey_dismiss_sheet = false;
        });
    }

    // === Helpers ===

    /// Ends the flow: `Terminal`, survey cleared, pending work cancelled.
    fn finish(&self, flow: &mut FlowState) {
        if self.transition(&mut flow.view, FlowStatus::Terminal) {
            flow.view.clear_survey();
            flow.survey_stop = None;
            flow.hero_submitted = false;
            self.bump_epoch();
        }
    }

    fn transition(&self, view: &mut FlowViewState, target: FlowStatus) -> bool {
        match view.status.transition_to(target) {
            Ok(next) => {
                debug!(from = %view.status, to = %next, "survey flow transition");
                view.status = next;
                true
            }
            Err(err) => {
                warn!(error = %err, "illegal survey flow transition ignored");
                false
            }
        }
    }

    fn show_service_error(&self, flow: &mut FlowState, err: SurveyServiceError, what: &str) {
        let region_name = self.inner.ports.context.current_region_name();
        let restricted = self.inner.ports.cellular.is_cellular_data_restricted();
        let classified = classify(err, region_name.as_deref(), restricted);

        warn!(error = %classified, "{}", what);
        flow.view.show_toast(Toast::error(classified.user_message()));
    }

    fn update(&self, f: impl FnOnce(&mut FlowState)) {
        let mut flow = self.lock();
        f(&mut flow);
        self.publish(&flow);
    }

    fn publish(&self, flow: &FlowState) {
        self.inner.view.send_replace(flow.view.clone());
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.inner.flow.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_epoch(&self) -> u64 {
        *self.inner.epoch.borrow()
    }

    fn bump_epoch(&self) -> u64 {
        self.inner.epoch.send_modify(|epoch| *epoch += 1);
        self.current_epoch()
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.current_epoch() != epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryRecentStopStore, InMemorySurveyService, InMemorySurveyStateStore,
        StaticApplicationContext, StaticCellularDataMonitor,
    };
    use crate::config::SurveyStateConfig;
    use crate::domain::classification::{
        ClassifiedError, ConnectivityCode, ConnectivityError,
    };
    use crate::domain::flow::ToastSeverity;
    use crate::domain::foundation::{QuestionId, RegionId, StopId, SurveyId, UserId};
    use crate::domain::survey::fixtures::{
        external_question, label_question, radio_question, survey_with, text_question,
    };
    use crate::domain::survey::{Answer, SurveyResponseHistory};
    use crate::domain::transit::Coordinate;
    use crate::ports::SurveyStateStore;
    use std::time::Instant;

    struct Harness {
        controller: SurveyFlowController,
        service: InMemorySurveyService,
        store: Arc<InMemorySurveyStateStore>,
        manager: SurveyStateManager,
        cellular: Arc<StaticCellularDataMonitor>,
        recent_stops: Arc<InMemoryRecentStopStore>,
    }

    fn harness_with(surveys: Vec<Survey>, service_delay: Duration, pacing: Duration) -> Harness {
        let service = InMemorySurveyService::new()
            .with_surveys(surveys)
            .with_delay(service_delay);
        let store = Arc::new(InMemorySurveyStateStore::with_user_id(
            UserId::new("rider-1").unwrap(),
        ));
        let manager = SurveyStateManager::new(store.clone(), &SurveyStateConfig::default());
        let cellular = Arc::new(StaticCellularDataMonitor::new(false));
        let recent_stops = Arc::new(InMemoryRecentStopStore::new());
        let context = Arc::new(
            StaticApplicationContext::new().with_region(RegionId::new(1), "Puget Sound"),
        );

        let ports = SurveyFlowPorts {
            service: Arc::new(service.clone()),
            context,
            recent_stops: recent_stops.clone(),
            cellular: cellular.clone(),
        };
        let config = FlowConfig::default().with_pacing_delay(pacing);

        Harness {
            controller: SurveyFlowController::new(ports, manager.clone(), &config),
            service,
            store,
            manager,
            cellular,
            recent_stops,
        }
    }

    fn harness(surveys: Vec<Survey>) -> Harness {
        harness_with(surveys, Duration::ZERO, Duration::from_millis(10))
    }

    fn hero_and_rest() -> Survey {
        survey_with(
            1,
            vec![
                label_question(1, 0),
                radio_question(10, 1, &["Yes", "No"]),
                text_question(11, 2),
                text_question(12, 3),
            ],
        )
    }

    fn stop() -> Stop {
        Stop::new(StopId::new("1_100"), "Pine St", Coordinate::new(47.6, -122.3))
    }

    async fn answer_hero(h: &Harness) {
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller
            .dispatch(FlowAction::UpdateHeroAnswer(Answer::Choice("Yes".into())))
            .await;
        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;
    }

    fn toast_message(h: &Harness) -> Option<String> {
        h.controller.view().toast.map(|t| t.message)
    }

    #[tokio::test]
    async fn appear_presents_first_answerable_question() {
        let h = harness(vec![hero_and_rest()]);
        h.controller.dispatch(FlowAction::OnAppear).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::HeroQuestion);
        assert!(view.show_hero_question);
        assert!(!view.is_loading);
        assert_eq!(view.hero_question.map(|q| q.id), Some(QuestionId::new(10)));
        assert_eq!(h.service.fetch_count(), 1);
    }

    #[tokio::test]
    async fn pending_reminder_skips_fetch() {
        let h = harness(vec![hero_and_rest()]);
        h.manager.set_next_reminder_date();

        h.controller.dispatch(FlowAction::OnAppear).await;

        assert_eq!(h.controller.status(), FlowStatus::Idle);
        assert_eq!(h.service.fetch_count(), 0);
    }

    #[tokio::test]
    async fn all_label_survey_sets_no_hero() {
        let h = harness(vec![survey_with(2, vec![label_question(1, 0), label_question(2, 1)])]);
        h.controller.dispatch(FlowAction::OnAppear).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Idle);
        assert!(view.hero_question.is_none());
        assert!(!view.show_hero_question);
    }

    #[tokio::test]
    async fn expired_survey_is_not_presented() {
        let mut survey = hero_and_rest();
        survey.end_date = Some(Timestamp::now().minus_days(1));
        let h = harness(vec![survey]);

        h.controller.dispatch(FlowAction::OnAppear).await;
        assert_eq!(h.controller.status(), FlowStatus::Idle);
    }

    #[tokio::test]
    async fn fetch_failure_shows_classified_toast() {
        let h = harness(vec![hero_and_rest()]);
        h.service
            .fail_next_fetch(ClassifiedError::RequestFailure { status_code: 500 }.into());

        h.controller.dispatch(FlowAction::OnAppear).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Idle);
        assert!(!view.is_loading);
        let toast = view.toast.unwrap();
        assert_eq!(toast.severity, ToastSeverity::Error);
        assert_eq!(
            toast.message,
            ClassifiedError::ServerError {
                region_name: "Puget Sound".into()
            }
            .to_string()
        );
    }

    #[tokio::test]
    async fn restricted_cellular_data_is_reported() {
        let h = harness(vec![hero_and_rest()]);
        h.cellular.set_restricted(true);
        h.service.fail_next_fetch(
            ConnectivityError::new(ConnectivityCode::NotConnectedToInternet, "offline").into(),
        );

        h.controller.dispatch(FlowAction::OnAppear).await;

        assert_eq!(
            toast_message(&h),
            Some(ClassifiedError::CellularDataRestricted.to_string())
        );
    }

    #[tokio::test]
    async fn hero_without_answer_is_rejected_locally() {
        let h = harness(vec![hero_and_rest()]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;

        assert_eq!(h.controller.status(), FlowStatus::HeroQuestion);
        assert_eq!(h.service.submit_count(), 0);
        assert_eq!(
            toast_message(&h),
            Some(FlowError::HeroAnswerMissing.to_string())
        );
    }

    #[tokio::test]
    async fn hero_answer_outside_options_is_rejected_locally() {
        let h = harness(vec![hero_and_rest()]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller
            .dispatch(FlowAction::UpdateHeroAnswer(Answer::Choice("Maybe".into())))
            .await;
        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;

        assert_eq!(h.service.submit_count(), 0);
        assert_eq!(
            toast_message(&h),
            Some(FlowError::HeroAnswerInvalid.to_string())
        );
    }

    #[tokio::test]
    async fn hero_success_leads_to_remaining_questions() {
        let h = harness(vec![hero_and_rest()]);
        answer_hero(&h).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::RemainingQuestions);
        assert!(view.show_full_survey_questions);
        assert!(!view.show_hero_question);
        let ids: Vec<_> = view.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![QuestionId::new(11), QuestionId::new(12)]);
        assert_eq!(view.answerable_question_count, 2);
        assert_eq!(view.answered_question_count, 0);
        assert!(h.manager.is_survey_completed(SurveyId::new(1)));
    }

    #[tokio::test]
    async fn hero_only_survey_finishes_after_submission() {
        let h = harness(vec![survey_with(
            3,
            vec![radio_question(30, 0, &["Yes", "No"]), label_question(31, 1)],
        )]);
        answer_hero(&h).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Terminal);
        assert!(view.questions.is_empty());
        assert!(!view.show_full_survey_questions);
        assert!(h.store.is_survey_completed(SurveyId::new(3)).unwrap());
        assert_eq!(view.toast.map(|t| t.severity), Some(ToastSeverity::Success));
    }

    #[tokio::test]
    async fn hero_submission_failure_keeps_hero_for_retry() {
        let h = harness(vec![hero_and_rest()]);
        h.service
            .fail_next_submit(ClassifiedError::RequestFailure { status_code: 503 }.into());
        answer_hero(&h).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::HeroQuestion);
        assert!(view.hero_question.is_some());
        assert!(view.toast.unwrap().is_error());
        assert!(!h.manager.is_survey_completed(SurveyId::new(1)));

        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;
        assert_eq!(h.controller.status(), FlowStatus::RemainingQuestions);
        assert_eq!(h.service.submit_count(), 2);
    }

    #[tokio::test]
    async fn partial_submit_marks_missing_questions() {
        let h = harness(vec![hero_and_rest()]);
        answer_hero(&h).await;
        h.controller
            .dispatch(FlowAction::UpdateAnswer(QuestionAnswerSubmission::new(
                QuestionId::new(11),
                Answer::Text("Too crowded".into()),
            )))
            .await;
        h.controller.dispatch(FlowAction::OnSubmitQuestions).await;

        let view = h.controller.view();
        assert_eq!(h.service.update_count(), 0);
        assert_eq!(view.status, FlowStatus::RemainingQuestions);
        assert_eq!(
            view.incomplete_question_ids.into_iter().collect::<Vec<_>>(),
            vec![QuestionId::new(12)]
        );
        assert_eq!(
            view.toast.map(|t| t.message),
            Some(
                FlowError::IncompleteAnswers {
                    missing: vec![QuestionId::new(12)]
                }
                .to_string()
            )
        );
    }

    #[tokio::test]
    async fn answering_clears_incomplete_marker() {
        let h = harness(vec![hero_and_rest()]);
        answer_hero(&h).await;
        h.controller.dispatch(FlowAction::OnSubmitQuestions).await;
        assert_eq!(h.controller.view().incomplete_question_ids.len(), 2);

        h.controller
            .dispatch(FlowAction::UpdateAnswer(QuestionAnswerSubmission::new(
                QuestionId::new(12),
                Answer::Text("Cleaner seats".into()),
            )))
            .await;

        let view = h.controller.view();
        assert!(!view.incomplete_question_ids.contains(&QuestionId::new(12)));
        assert_eq!(view.answered_question_count, 1);
    }

    #[tokio::test]
    async fn complete_submit_finishes_survey() {
        let h = harness(vec![hero_and_rest()]);
        answer_hero(&h).await;
        for (id, text) in [(11, "Late"), (12, "More buses")] {
            h.controller
                .dispatch(FlowAction::UpdateAnswer(QuestionAnswerSubmission::new(
                    QuestionId::new(id),
                    Answer::Text(text.into()),
                )))
                .await;
        }
        h.controller.dispatch(FlowAction::OnSubmitQuestions).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Terminal);
        assert!(view.questions.is_empty());
        assert_eq!(
            view.toast,
            Some(Toast::success(SUBMISSION_SUCCESS_MESSAGE))
        );
        assert_eq!(h.service.update_count(), 1);
    }

    #[tokio::test]
    async fn update_failure_keeps_answers() {
        let h = harness(vec![hero_and_rest()]);
        answer_hero(&h).await;
        for id in [11, 12] {
            h.controller
                .dispatch(FlowAction::UpdateAnswer(QuestionAnswerSubmission::new(
                    QuestionId::new(id),
                    Answer::Text("ok".into()),
                )))
                .await;
        }
        h.service.fail_next_update(ClassifiedError::NoResponseBody.into());
        h.controller.dispatch(FlowAction::OnSubmitQuestions).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::RemainingQuestions);
        assert_eq!(view.answers.len(), 2);
        assert!(view.toast.unwrap().is_error());
    }

    #[tokio::test]
    async fn external_hero_opens_link() {
        let h = harness(vec![survey_with(
            4,
            vec![external_question(
                40,
                0,
                Some("https://example.com/survey"),
                &["user_id", "region_id"],
            )],
        )]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Terminal);
        assert!(view.open_external_survey);
        let url = view.external_survey_url.unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("user_id".into(), "rider-1".into())));
        assert!(pairs.contains(&("region_id".into(), "1".into())));
        assert!(h.manager.is_survey_completed(SurveyId::new(4)));
        assert_eq!(h.service.submit_count(), 0);

        h.controller.dispatch(FlowAction::OnExternalSurveyOpened).await;
        assert!(!h.controller.view().open_external_survey);
    }

    #[tokio::test]
    async fn external_hero_without_link_shows_error() {
        let h = harness(vec![survey_with(5, vec![external_question(50, 0, None, &[])])]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::HeroQuestion);
        assert!(!view.open_external_survey);
        assert_eq!(
            view.toast.map(|t| t.message),
            Some(FlowError::ExternalSurveyUnavailable.to_string())
        );
        assert!(!h.manager.is_survey_completed(SurveyId::new(5)));
    }

    #[tokio::test]
    async fn skip_during_pacing_delay_cancels_transition() {
        let h = harness_with(
            vec![hero_and_rest()],
            Duration::ZERO,
            Duration::from_secs(3),
        );
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller
            .dispatch(FlowAction::UpdateHeroAnswer(Answer::Choice("Yes".into())))
            .await;

        let controller = h.controller.clone();
        let pending =
            tokio::spawn(async move { controller.dispatch(FlowAction::OnTapNextHeroQuestion).await });
        while h.service.submit_count() == 0 || h.controller.view().is_loading {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let skipped_at = Instant::now();
        h.controller.dispatch(FlowAction::OnSkipSurvey).await;
        pending.await.unwrap();

        assert!(skipped_at.elapsed() < Duration::from_secs(2));
        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Terminal);
        assert!(!view.show_full_survey_questions);
        assert!(view.questions.is_empty());
        assert!(h.store.is_survey_skipped(SurveyId::new(1)).unwrap());
    }

    #[tokio::test]
    async fn stale_fetch_result_is_dropped() {
        let h = harness_with(
            vec![hero_and_rest()],
            Duration::from_millis(200),
            Duration::from_millis(10),
        );

        let controller = h.controller.clone();
        let pending = tokio::spawn(async move { controller.dispatch(FlowAction::OnAppear).await });
        while h.controller.status() != FlowStatus::Loading {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        h.controller.dispatch(FlowAction::OnRemindLater).await;
        pending.await.unwrap();

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Terminal);
        assert!(view.hero_question.is_none());
        assert!(!view.is_loading);
        assert!(!h.manager.should_show_survey());
    }

    #[tokio::test]
    async fn update_result_after_close_is_dropped() {
        let h = harness_with(
            vec![hero_and_rest()],
            Duration::from_millis(200),
            Duration::from_millis(10),
        );
        answer_hero(&h).await;
        assert_eq!(h.controller.status(), FlowStatus::RemainingQuestions);
        for id in [11, 12] {
            h.controller
                .dispatch(FlowAction::UpdateAnswer(QuestionAnswerSubmission::new(
                    QuestionId::new(id),
                    Answer::Text("Fine".into()),
                )))
                .await;
        }

        let controller = h.controller.clone();
        let pending =
            tokio::spawn(async move { controller.dispatch(FlowAction::OnSubmitQuestions).await });
        while !h.controller.view().is_loading {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        h.controller.dispatch(FlowAction::OnCloseQuestionsForm).await;
        pending.await.unwrap();

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Terminal);
        assert!(view.toast.is_none());
        assert!(!view.is_loading);
        assert_eq!(h.service.update_count(), 1);
    }

    #[tokio::test]
    async fn stop_change_is_ignored_while_survey_active() {
        let h = harness(vec![hero_and_rest()]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller
            .dispatch(FlowAction::UpdateCurrentStop(Some(stop())))
            .await;

        assert_eq!(h.controller.status(), FlowStatus::HeroQuestion);
        assert_eq!(h.service.fetch_count(), 1);
        assert_eq!(h.recent_stops.recent_stop_ids(), vec![StopId::new("1_100")]);
    }

    #[tokio::test]
    async fn stop_change_starts_fetch_scoped_to_stop() {
        let h = harness(vec![hero_and_rest()]);
        h.controller
            .dispatch(FlowAction::UpdateCurrentStop(Some(stop())))
            .await;
        assert_eq!(h.controller.status(), FlowStatus::HeroQuestion);

        h.controller
            .dispatch(FlowAction::UpdateHeroAnswer(Answer::Choice("No".into())))
            .await;
        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;

        let submitted_scope = h.service.calls().into_iter().find_map(|call| match call {
            crate::adapters::RecordedCall::Submit { scope, .. } => Some(scope),
            _ => None,
        });
        assert_eq!(
            submitted_scope.and_then(|s| s.stop_id),
            Some(StopId::new("1_100"))
        );
    }

    #[tokio::test]
    async fn completed_survey_is_not_offered_again() {
        let h = harness(vec![survey_with(6, vec![radio_question(60, 0, &["Yes"])])]);
        answer_hero(&h).await;
        assert_eq!(h.controller.status(), FlowStatus::Terminal);

        h.controller.dispatch(FlowAction::UpdateCurrentStop(None)).await;

        assert_eq!(h.service.fetch_count(), 2);
        assert_eq!(h.controller.status(), FlowStatus::Idle);
    }

    #[tokio::test]
    async fn closing_hero_asks_for_confirmation() {
        let h = harness(vec![hero_and_rest()]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller
            .dispatch(FlowAction::OnCloseSurveyHeroQuestion)
            .await;
        assert!(h.controller.view().show_survey_dismiss_sheet);
        assert_eq!(h.controller.status(), FlowStatus::HeroQuestion);

        h.controller
            .dispatch(FlowAction::OnCloseSurveyDismissSheet)
            .await;
        assert!(!h.controller.view().show_survey_dismiss_sheet);
    }

    #[tokio::test]
    async fn remind_later_postpones_and_ends_flow() {
        let h = harness(vec![hero_and_rest()]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller.dispatch(FlowAction::OnRemindLater).await;

        assert_eq!(h.controller.status(), FlowStatus::Terminal);
        assert!(!h.manager.should_show_survey());
        assert!(!h.store.is_survey_skipped(SurveyId::new(1)).unwrap());
    }

    #[tokio::test]
    async fn closing_questions_form_ends_flow() {
        let h = harness(vec![hero_and_rest()]);
        answer_hero(&h).await;
        h.controller.dispatch(FlowAction::OnCloseQuestionsForm).await;

        let view = h.controller.view();
        assert_eq!(view.status, FlowStatus::Terminal);
        assert!(!view.show_full_survey_questions);
    }

    #[tokio::test]
    async fn dismissing_toast_hides_it() {
        let h = harness(vec![hero_and_rest()]);
        h.controller.dispatch(FlowAction::OnAppear).await;
        h.controller.dispatch(FlowAction::OnTapNextHeroQuestion).await;
        assert!(h.controller.view().show_toast_message);

        h.controller.dispatch(FlowAction::OnDismissToast).await;
        assert!(!h.controller.view().show_toast_message);
    }

    #[tokio::test]
    async fn subscribers_see_published_state() {
        let h = harness(vec![hero_and_rest()]);
        let mut rx = h.controller.subscribe();

        h.controller.dispatch(FlowAction::OnAppear).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status, FlowStatus::HeroQuestion);
    }
}
