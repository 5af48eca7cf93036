//! FlowStatus - lifecycle of one survey presentation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where the survey flow currently is.
///
/// `Terminal` means the flow's on-screen artifacts are gone: the survey was
/// submitted, skipped, postponed, opened externally or closed. A new stop can
/// start a fresh cycle from `Idle` or `Terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    #[default]
    Idle,
    Loading,
    HeroQuestion,
    RemainingQuestions,
    Terminal,
}

impl FlowStatus {
    /// Returns true while a survey is on screen or being fetched.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            FlowStatus::Loading | FlowStatus::HeroQuestion | FlowStatus::RemainingQuestions
        )
    }
}

impl StateMachine for FlowStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use FlowStatus::*;
        match self {
            Idle => vec![Loading],
            Loading => vec![HeroQuestion, Idle, Terminal],
            HeroQuestion => vec![RemainingQuestions, Terminal],
            RemainingQuestions => vec![Terminal],
            Terminal => vec![Loading],
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowStatus::Idle => "Idle",
            FlowStatus::Loading => "Loading",
            FlowStatus::HeroQuestion => "HeroQuestion",
            FlowStatus::RemainingQuestions => "RemainingQuestions",
            FlowStatus::Terminal => "Terminal",
        };
        write!(f, "{}", s)
    }
}
