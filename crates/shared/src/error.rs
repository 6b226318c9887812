use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::StepId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidTransition,
    SessionComplete,
    WrongStepKind,
    UnknownOption,
    UnknownStep,
    InvalidConfig,
    TimerUnavailable,
}

/// Caller-side logic faults. None of these are shown to the end user; every
/// rejected call leaves the funnel state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunnelError {
    #[error("no transition from {from} to {to}")]
    InvalidTransition { from: StepId, to: StepId },
    #[error("the funnel already reached its terminal step")]
    SessionComplete,
    #[error("step {step} is not a multi-select step")]
    NotMultiSelect { step: StepId },
    #[error("step {step} is not a single-choice step")]
    NotSingleChoice { step: StepId },
    #[error("step {step} advances by choosing one of its options")]
    ChoiceRequired { step: StepId },
    #[error("step {step} advances on its own timer")]
    AutoAdvancing { step: StepId },
    #[error("step {step} has no option labelled {label:?}")]
    UnknownOption { step: StepId, label: String },
    #[error("option label must not be empty")]
    EmptyLabel,
    #[error("unknown step identifier {0:?}")]
    UnknownStep(String),
    #[error("invalid timing configuration: {0}")]
    InvalidTimings(String),
    #[error("no timer runtime available to drive the loading sequence")]
    TimerUnavailable,
}

impl FunnelError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FunnelError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            FunnelError::SessionComplete => ErrorCode::SessionComplete,
            FunnelError::NotMultiSelect { .. }
            | FunnelError::NotSingleChoice { .. }
            | FunnelError::ChoiceRequired { .. }
            | FunnelError::AutoAdvancing { .. } => ErrorCode::WrongStepKind,
            FunnelError::UnknownOption { .. } | FunnelError::EmptyLabel => {
                ErrorCode::UnknownOption
            }
            FunnelError::UnknownStep(_) => ErrorCode::UnknownStep,
            FunnelError::InvalidTimings(_) => ErrorCode::InvalidConfig,
            FunnelError::TimerUnavailable => ErrorCode::TimerUnavailable,
        }
    }
}
