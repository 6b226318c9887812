use super::*;

#[test]
fn graph_has_one_edge_per_non_terminal_step() {
    let graph = dot_graph();
    assert_eq!(graph.matches(" -> ").count(), 15);
    assert!(graph.contains("final_ask -> loading;"));
    assert!(graph.contains("sales_page [shape=doublecircle];"));
}

#[test]
fn list_shows_successor() {
    let line = list_line(registry::spec(StepId::Q4));
    assert!(line.starts_with(" 5 q4"));
    assert!(line.ends_with("-> testimonials_pre"));
    assert!(list_line(registry::spec(StepId::SalesPage)).ends_with("-> -"));
}

#[test]
fn describe_serializes_the_step() {
    let json = serde_json::to_value(registry::spec(StepId::FinalAsk)).expect("json");
    assert_eq!(json["kind"], "single_choice");
    assert_eq!(json["next"], "loading");
    assert_eq!(json["inert_options"].as_array().map(Vec::len), Some(1));
    let q1 = serde_json::to_value(registry::spec(StepId::Q1)).expect("json");
    assert!(q1.get("inert_options").is_none());
}

#[test]
fn cli_parses_step_names() {
    let cli = Cli::try_parse_from(["funnel-tools", "describe", "testimonials_pre"])
        .expect("parse");
    assert!(matches!(
        cli.command,
        Command::Describe {
            step: StepId::TestimonialsPre
        }
    ));
}
