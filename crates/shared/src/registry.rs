//! Static step catalog: order, category, progress-bar position, option labels and the single
//! outgoing edge of every step.

use serde::Serialize;

use crate::domain::{StepId, StepKind, Testimonial};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepSpec {
    pub id: StepId,
    pub kind: StepKind,
    /// Progress-bar fill shown on question screens.
    pub progress_percent: Option<u8>,
    pub options: &'static [&'static str],
    /// Options that are rendered but never transition (forced-choice screens).
    #[serde(skip_serializing_if = "no_labels")]
    pub inert_options: &'static [&'static str],
    pub next: Option<StepId>,
}

impl StepSpec {
    pub fn is_inert(&self, label: &str) -> bool {
        self.inert_options.contains(&label)
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.options.contains(&label)
    }
}

const NO_OPTIONS: &[&str] = &[];

fn no_labels(labels: &&[&str]) -> bool {
    labels.is_empty()
}

const Q1_OPTIONS: &[&str] = &[
    "I'm in a relationship",
    "I'm seeing someone, but it isn't official yet",
    "I'm single and free",
    "My situation is complicated...",
];

const Q2_OPTIONS: &[&str] = &[
    "Total beginner, I need to learn from scratch",
    "I get by, but feel insecure in some situations",
    "I do well, but lack variety",
    "I'm great at it, but want new techniques",
];

const Q3_OPTIONS: &[&str] = &[
    "Not being able to truly surprise",
    "Feeling shy about trying new techniques",
    "Getting tired quickly and losing rhythm",
    "Not knowing how to vary",
];

const Q4_OPTIONS: &[&str] = &[
    "Seeing my partner lose control",
    "Leaving my partner completely satisfied",
    "Feeling my partner will never forget me",
    "Feeling my partner is entirely in my hands",
    "Hearing that I'm the best they've ever had",
];

const Q5_OPTIONS: &[&str] = &[
    "I feel insecure about satisfying my partner",
    "I feel my partner thinks about someone else",
    "My partner seems distant, as if it were an obligation",
    "I never feel truly unforgettable",
    "My partner doesn't seek me out anymore...",
];

const Q6_OPTIONS: &[&str] = &[
    "A long time ago...",
    "It's so hard I feel I'm not good enough",
    "Recently, but I think I could have done better",
    "I've never truly felt it",
];

const FINAL_ASK_OPTIONS: &[&str] = &["Yes, I really want it", "I'm not sure..."];
const FINAL_ASK_INERT: &[&str] = &["I'm not sure..."];

const fn info(id: StepId, next: StepId) -> StepSpec {
    StepSpec {
        id,
        kind: StepKind::Informational,
        progress_percent: None,
        options: NO_OPTIONS,
        inert_options: NO_OPTIONS,
        next: Some(next),
    }
}

const fn question(
    id: StepId,
    kind: StepKind,
    progress: u8,
    options: &'static [&'static str],
    next: StepId,
) -> StepSpec {
    StepSpec {
        id,
        kind,
        progress_percent: Some(progress),
        options,
        inert_options: NO_OPTIONS,
        next: Some(next),
    }
}

static CATALOG: [StepSpec; 16] = [
    info(StepId::Intro, StepId::Bio),
    info(StepId::Bio, StepId::Q1),
    question(StepId::Q1, StepKind::SingleChoice, 15, Q1_OPTIONS, StepId::Q2),
    question(StepId::Q2, StepKind::SingleChoice, 30, Q2_OPTIONS, StepId::Q3),
    question(StepId::Q3, StepKind::SingleChoice, 45, Q3_OPTIONS, StepId::Q4),
    question(StepId::Q4, StepKind::MultiSelect, 60, Q4_OPTIONS, StepId::TestimonialsPre),
    info(StepId::TestimonialsPre, StepId::Agitation),
    info(StepId::Agitation, StepId::Transformation),
    info(StepId::Transformation, StepId::Benefits),
    info(StepId::Benefits, StepId::Q5),
    question(StepId::Q5, StepKind::MultiSelect, 75, Q5_OPTIONS, StepId::Q6),
    question(StepId::Q6, StepKind::SingleChoice, 85, Q6_OPTIONS, StepId::Effects),
    info(StepId::Effects, StepId::FinalAsk),
    StepSpec {
        id: StepId::FinalAsk,
        kind: StepKind::SingleChoice,
        progress_percent: None,
        options: FINAL_ASK_OPTIONS,
        inert_options: FINAL_ASK_INERT,
        next: Some(StepId::Loading),
    },
    StepSpec {
        id: StepId::Loading,
        kind: StepKind::TimedTransition,
        progress_percent: None,
        options: NO_OPTIONS,
        inert_options: NO_OPTIONS,
        next: Some(StepId::SalesPage),
    },
    StepSpec {
        id: StepId::SalesPage,
        kind: StepKind::TerminalDisplay,
        progress_percent: None,
        options: NO_OPTIONS,
        inert_options: NO_OPTIONS,
        next: None,
    },
];

pub const LOADING_MESSAGES: &[&str] = &[
    "Analyzing your profile...",
    "Finding the best techniques for your case...",
    "Personalizing your manual...",
    "Selecting exclusive bonuses...",
    "You are going to feel unique...",
    "Preparing your members area...",
];

pub const LOADING_TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        name: "Jessica M.",
        quote: "It changed my life completely!",
    },
    Testimonial {
        name: "Amanda R.",
        quote: "My partner can't stop thinking about me now.",
    },
    Testimonial {
        name: "Carla T.",
        quote: "Best investment I ever made.",
    },
    Testimonial {
        name: "Beatriz L.",
        quote: "I feel so much more confident.",
    },
];

pub fn steps_in_order() -> impl Iterator<Item = StepId> {
    CATALOG.iter().map(|spec| spec.id)
}

pub fn catalog() -> &'static [StepSpec] {
    &CATALOG
}

pub fn spec(step: StepId) -> &'static StepSpec {
    &CATALOG[ordinal(step)]
}

/// Zero-based position of `step` in the storyline.
pub fn ordinal(step: StepId) -> usize {
    step as usize
}

pub fn kind(step: StepId) -> StepKind {
    spec(step).kind
}

pub fn options_for(step: StepId) -> &'static [&'static str] {
    spec(step).options
}

pub fn next_step(step: StepId) -> Option<StepId> {
    spec(step).next
}

pub fn progress_percent(step: StepId) -> Option<u8> {
    spec(step).progress_percent
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
