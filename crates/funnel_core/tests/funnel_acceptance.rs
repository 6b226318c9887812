use std::time::Duration;

use funnel_core::{FunnelController, FunnelEvent, LoadingTimings, StepId, StepKind, TickOutcome};
use shared::registry::{self, LOADING_MESSAGES, LOADING_TESTIMONIALS};
use tokio::time::Instant;

fn answer_or_continue(controller: &mut FunnelController) {
    let step = controller.current_step();
    match controller.current_kind() {
        StepKind::SingleChoice => {
            let first = registry::options_for(step)[0];
            controller.choose(first).expect("answer");
        }
        StepKind::Informational | StepKind::MultiSelect => {
            controller.continue_to_next().expect("continue");
        }
        other => panic!("unexpected {other:?} step {step}"),
    }
}

#[tokio::test(start_paused = true)]
async fn full_funnel_reaches_the_sales_page_after_the_loading_sequence() {
    let timings = LoadingTimings::default();
    let mut controller = FunnelController::new(timings).expect("controller");
    let mut events = controller.subscribe_events();

    while controller.current_step() != StepId::Q4 {
        answer_or_continue(&mut controller);
    }

    let desired = registry::options_for(StepId::Q4);
    controller.toggle_option(desired[0]).expect("toggle");
    controller.toggle_option(desired[3]).expect("toggle");
    assert_eq!(
        controller.selection_snapshot(),
        vec![desired[0].to_string(), desired[3].to_string()]
    );
    controller.continue_to_next().expect("leave q4");

    while controller.current_step() != StepId::Q5 {
        answer_or_continue(&mut controller);
    }
    assert!(controller.selection_snapshot().is_empty());

    while controller.current_step() != StepId::FinalAsk {
        answer_or_continue(&mut controller);
    }
    let answers = registry::options_for(StepId::FinalAsk);
    assert_eq!(controller.choose(answers[1]).expect("decline"), None);
    assert_eq!(
        controller.choose(answers[0]).expect("accept"),
        Some(StepId::Loading)
    );
    assert_eq!(controller.loading_progress(), 0);

    let entered = Instant::now();
    let mut messages = 0usize;
    let mut testimonials = 0usize;
    let mut progress_ticks = 0usize;
    while let Some(outcome) = controller.process_next_tick().await {
        match outcome {
            TickOutcome::Progressed(_) | TickOutcome::ProgressCompleted => progress_ticks += 1,
            TickOutcome::MessageRotated(index) => {
                messages += 1;
                assert_eq!(index, messages % LOADING_MESSAGES.len());
            }
            TickOutcome::TestimonialRotated(index) => {
                testimonials += 1;
                assert_eq!(index, testimonials % LOADING_TESTIMONIALS.len());
            }
            TickOutcome::HandOff | TickOutcome::Unchanged => {}
        }
    }
    let elapsed = Instant::now() - entered;

    assert_eq!(controller.current_step(), StepId::SalesPage);
    assert_eq!(controller.loading_progress(), 100);
    assert_eq!(progress_ticks, 100);
    assert!(messages >= 4, "{messages}");
    assert!(testimonials >= 3, "{testimonials}");
    assert!(elapsed >= timings.total_duration(), "{elapsed:?}");
    assert!(
        elapsed < timings.total_duration() + Duration::from_millis(5),
        "{elapsed:?}"
    );

    // Nothing moves once the terminal step is shown.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(controller.drain_ready_ticks(), 0);
    assert_eq!(controller.loading_progress(), 100);
    assert_eq!(controller.current_message_index(), messages % LOADING_MESSAGES.len());
    assert!(controller.advance(StepId::SalesPage).is_err());

    let mut scroll_resets = 0;
    let mut completed = false;
    let mut last_change = None;
    while let Ok(event) = events.try_recv() {
        match event {
            FunnelEvent::ScrollReset => scroll_resets += 1,
            FunnelEvent::StepChanged { to, .. } => last_change = Some(to),
            FunnelEvent::SessionCompleted => completed = true,
            _ => {}
        }
    }
    assert_eq!(scroll_resets, 15);
    assert_eq!(last_change, Some(StepId::SalesPage));
    assert!(completed);
}
