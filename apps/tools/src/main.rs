use std::fmt::Write as _;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::{
    registry::{self, StepSpec},
    StepId, StepKind,
};

#[derive(Parser, Debug)]
#[command(name = "funnel-tools", about = "Inspect the funnel step catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every step in order, one per line
    List,
    /// One step's configuration as JSON
    Describe { step: StepId },
    /// The transition table in Graphviz dot
    Graph,
}

fn list_line(spec: &StepSpec) -> String {
    let next = spec.next.map(StepId::as_str).unwrap_or("-");
    format!(
        "{:>2} {:<16} {:<16} -> {next}",
        registry::ordinal(spec.id),
        spec.id.as_str(),
        format!("{:?}", spec.kind),
    )
}

fn dot_graph() -> String {
    let mut out = String::from("digraph funnel {\n    rankdir=LR;\n");
    for spec in registry::catalog() {
        let shape = match spec.kind {
            StepKind::Informational => "box",
            StepKind::SingleChoice => "diamond",
            StepKind::MultiSelect => "hexagon",
            StepKind::TimedTransition => "ellipse",
            StepKind::TerminalDisplay => "doublecircle",
        };
        let _ = writeln!(out, "    {} [shape={shape}];", spec.id);
        if let Some(next) = spec.next {
            let _ = writeln!(out, "    {} -> {next};", spec.id);
        }
    }
    out.push_str("}\n");
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for spec in registry::catalog() {
                println!("{}", list_line(spec));
            }
        }
        Command::Describe { step } => {
            println!("{}", serde_json::to_string_pretty(registry::spec(step))?);
        }
        Command::Graph => print!("{}", dot_graph()),
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
