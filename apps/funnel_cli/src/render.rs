//! Plain-text screens for the terminal front end.

use std::io::{self, Write};

use shared::{StepId, StepKind, StepView};

pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const BAR_WIDTH: usize = 40;

fn heading(step: StepId) -> &'static str {
    match step {
        StepId::Intro => "Surprise your partner with positions never seen before",
        StepId::Bio => "Meet your instructor",
        StepId::Q1 => "Where are you in your love life right now?",
        StepId::Q2 => "How would you rate yourself?",
        StepId::Q3 => "What is your biggest difficulty?",
        StepId::Q4 => "What do you want to happen after applying the techniques?",
        StepId::TestimonialsPre => "What students say",
        StepId::Agitation => "If you don't, someone else will",
        StepId::Transformation => "Your transformation",
        StepId::Benefits => "What you will learn",
        StepId::Q5 => "Which of these do you relate to?",
        StepId::Q6 => "When did you last feel truly desired?",
        StepId::Effects => "Side effects",
        StepId::FinalAsk => "Do you want access to the manual?",
        StepId::Loading => "Loading...",
        StepId::SalesPage => "Exclusive offer unlocked",
    }
}

fn hint(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Informational => "Press Enter to continue.",
        StepKind::SingleChoice => "Type the number of your answer.",
        StepKind::MultiSelect => "Type numbers to toggle, Enter to continue.",
        StepKind::TimedTransition | StepKind::TerminalDisplay => "",
    }
}

pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {percent:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

pub fn render_view(view: &StepView, out: &mut impl Write) -> io::Result<()> {
    if let Some(percent) = view.progress_percent {
        writeln!(out, "{}", progress_bar(percent))?;
    }
    writeln!(out, "{}", heading(view.step))?;
    writeln!(out)?;

    for (index, option) in view.options.iter().enumerate() {
        let marker = match (view.kind, option.selected, option.enabled) {
            (_, _, false) => "(x)",
            (StepKind::MultiSelect, true, _) => "[*]",
            (StepKind::MultiSelect, false, _) => "[ ]",
            _ => "   ",
        };
        writeln!(out, "{:>2}. {marker} {}", index + 1, option.label)?;
    }

    if let Some(loading) = &view.loading {
        writeln!(out, "{}", progress_bar(loading.percent))?;
        writeln!(out, "{}", loading.message)?;
        writeln!(
            out,
            "\"{}\" - {}",
            loading.testimonial.quote, loading.testimonial.name
        )?;
    }

    let hint = hint(view.kind);
    if !hint.is_empty() {
        writeln!(out)?;
        writeln!(out, "{hint}")?;
    }
    out.flush()
}

/// Draws `view` after a controller update. The loading screen repaints in place when
/// clearing is enabled instead of stacking one copy per tick.
pub fn redraw(view: &StepView, clear_screen: bool, out: &mut impl Write) -> io::Result<()> {
    if clear_screen && view.loading.is_some() {
        write!(out, "{CLEAR_SCREEN}")?;
    }
    render_view(view, out)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
