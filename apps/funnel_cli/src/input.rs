//! Maps a line typed by the user onto a controller action for the current step.

use anyhow::{anyhow, Result};
use funnel_core::{FunnelController, StepKind};
use shared::registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Pick(usize),
}

pub fn parse_action(input: &str) -> Result<Action> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("c") {
        return Ok(Action::Continue);
    }
    let number = input
        .parse::<usize>()
        .map_err(|_| anyhow!("expected an option number, got '{input}'"))?;
    if number == 0 {
        return Err(anyhow!("options are numbered from 1"));
    }
    Ok(Action::Pick(number - 1))
}

pub fn handle_input(controller: &mut FunnelController, input: &str) -> Result<()> {
    let step = controller.current_step();
    let action = parse_action(input)?;
    let options = registry::options_for(step);

    match (controller.current_kind(), action) {
        (StepKind::Informational | StepKind::MultiSelect, Action::Continue) => {
            controller.continue_to_next()?;
        }
        (StepKind::SingleChoice, Action::Pick(index)) => {
            let label = options
                .get(index)
                .ok_or_else(|| anyhow!("step {step} has {} options", options.len()))?;
            controller.choose(label)?;
        }
        (StepKind::MultiSelect, Action::Pick(index)) => {
            let label = options
                .get(index)
                .ok_or_else(|| anyhow!("step {step} has {} options", options.len()))?;
            controller.toggle_option(label)?;
        }
        (StepKind::SingleChoice, Action::Continue) => {
            return Err(anyhow!("pick one of the {} options", options.len()));
        }
        (StepKind::Informational, Action::Pick(_)) => {
            return Err(anyhow!("this screen has no options"));
        }
        (StepKind::TimedTransition | StepKind::TerminalDisplay, _) => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
