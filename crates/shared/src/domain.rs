use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FunnelError;

/// Every screen of the funnel, in storyline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Intro,
    Bio,
    Q1,
    Q2,
    Q3,
    Q4,
    TestimonialsPre,
    Agitation,
    Transformation,
    Benefits,
    Q5,
    Q6,
    Effects,
    FinalAsk,
    Loading,
    SalesPage,
}

impl StepId {
    pub const ALL: [StepId; 16] = [
        StepId::Intro,
        StepId::Bio,
        StepId::Q1,
        StepId::Q2,
        StepId::Q3,
        StepId::Q4,
        StepId::TestimonialsPre,
        StepId::Agitation,
        StepId::Transformation,
        StepId::Benefits,
        StepId::Q5,
        StepId::Q6,
        StepId::Effects,
        StepId::FinalAsk,
        StepId::Loading,
        StepId::SalesPage,
    ];

    pub const FIRST: StepId = StepId::Intro;
    pub const TERMINAL: StepId = StepId::SalesPage;

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Intro => "intro",
            StepId::Bio => "bio",
            StepId::Q1 => "q1",
            StepId::Q2 => "q2",
            StepId::Q3 => "q3",
            StepId::Q4 => "q4",
            StepId::TestimonialsPre => "testimonials_pre",
            StepId::Agitation => "agitation",
            StepId::Transformation => "transformation",
            StepId::Benefits => "benefits",
            StepId::Q5 => "q5",
            StepId::Q6 => "q6",
            StepId::Effects => "effects",
            StepId::FinalAsk => "final_ask",
            StepId::Loading => "loading",
            StepId::SalesPage => "sales_page",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = FunnelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        StepId::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FunnelError::UnknownStep(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Informational,
    SingleChoice,
    MultiSelect,
    TimedTransition,
    TerminalDisplay,
}

impl StepKind {
    /// Steps that present options; entering one starts with an empty selection.
    pub fn is_choice(self) -> bool {
        matches!(self, StepKind::SingleChoice | StepKind::MultiSelect)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub name: &'static str,
    pub quote: &'static str,
}
