use serde::Serialize;

use crate::domain::{StepId, StepKind, Testimonial};

/// Notifications pushed from the controller to whoever renders the funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum FunnelEvent {
    /// The viewport must jump back to the top before the next frame is presented.
    ScrollReset,
    StepChanged {
        from: StepId,
        to: StepId,
    },
    SelectionChanged {
        step: StepId,
        selected: Vec<String>,
    },
    LoadingProgressed {
        percent: u8,
    },
    MessageRotated {
        index: usize,
    },
    TestimonialRotated {
        index: usize,
    },
    SessionCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub label: &'static str,
    pub selected: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadingView {
    pub percent: u8,
    pub message_index: usize,
    pub message: &'static str,
    pub testimonial_index: usize,
    pub testimonial: Testimonial,
}

/// Everything a renderer needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: StepId,
    pub kind: StepKind,
    pub ordinal: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<LoadingView>,
}
