use super::*;
use std::time::Duration;
use tokio::{
    sync::mpsc,
    time::{sleep, Instant},
};

fn fast_timings() -> LoadingTimings {
    LoadingTimings {
        progress_period: Duration::from_millis(10),
        hand_off_delay: Duration::from_millis(50),
        message_period: Duration::from_millis(25),
        testimonial_period: Duration::from_millis(40),
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ScheduledTick>) -> Vec<ScheduledTick> {
    let mut ticks = Vec::new();
    while let Ok(tick) = rx.try_recv() {
        ticks.push(tick);
    }
    ticks
}

fn count(ticks: &[ScheduledTick], kind: LoadingTick) -> usize {
    ticks.iter().filter(|t| t.tick == kind).count()
}

#[test]
fn progress_stops_at_one_hundred() {
    let mut state = LoadingState::new(6, 4);
    for expected in 1..PROGRESS_COMPLETE {
        assert_eq!(
            state.apply(LoadingTick::Progress),
            TickOutcome::Progressed(expected)
        );
    }
    assert_eq!(
        state.apply(LoadingTick::Progress),
        TickOutcome::ProgressCompleted
    );
    assert_eq!(state.progress(), 100);

    for _ in 0..25 {
        assert_eq!(state.apply(LoadingTick::Progress), TickOutcome::Unchanged);
    }
    assert_eq!(state.progress(), 100);
}

#[test]
fn rotators_wrap_modulo_their_list_length() {
    let mut state = LoadingState::new(6, 4);
    for k in 1..=29usize {
        state.apply(LoadingTick::Message);
        assert_eq!(state.message_index(), k % 6);
    }
    for k in 1..=17usize {
        state.apply(LoadingTick::Testimonial);
        assert_eq!(state.testimonial_index(), k % 4);
    }
    // Rotators never touch progress.
    assert_eq!(state.progress(), 0);
}

#[test]
fn hand_off_is_ignored_before_completion_and_fires_once() {
    let mut state = LoadingState::new(6, 4);
    assert_eq!(state.apply(LoadingTick::HandOff), TickOutcome::Unchanged);

    for _ in 0..PROGRESS_COMPLETE {
        state.apply(LoadingTick::Progress);
    }
    assert_eq!(state.apply(LoadingTick::HandOff), TickOutcome::HandOff);
    assert_eq!(state.apply(LoadingTick::HandOff), TickOutcome::Unchanged);
}

#[test]
fn empty_rotator_lists_do_not_panic() {
    let mut state = LoadingState::new(0, 0);
    assert_eq!(state.apply(LoadingTick::Message), TickOutcome::Unchanged);
    assert_eq!(state.apply(LoadingTick::Testimonial), TickOutcome::Unchanged);
}

#[test]
fn default_timings_match_the_loading_screen() {
    let timings = LoadingTimings::default();
    assert_eq!(timings.progress_period, Duration::from_millis(60));
    assert_eq!(timings.hand_off_delay, Duration::from_millis(500));
    assert_eq!(timings.message_period, Duration::from_millis(1500));
    assert_eq!(timings.testimonial_period, Duration::from_millis(2000));
    assert_eq!(timings.total_duration(), Duration::from_millis(6500));
    assert!(timings.validate().is_ok());
}

#[test]
fn zero_period_is_rejected() {
    let timings = LoadingTimings {
        message_period: Duration::ZERO,
        ..LoadingTimings::default()
    };
    assert!(matches!(
        timings.validate(),
        Err(FunnelError::InvalidTimings(reason)) if reason.contains("message_period")
    ));
}

#[test]
fn scaling_divides_periods_and_ignores_nonsense() {
    let timings = LoadingTimings::default();
    let doubled = timings.scaled(2.0);
    assert_eq!(doubled.progress_period, Duration::from_millis(30));
    assert_eq!(doubled.hand_off_delay, Duration::from_millis(250));
    assert_eq!(timings.scaled(0.0), timings);
    assert_eq!(timings.scaled(f64::NAN), timings);
    assert_eq!(
        timings.scaled(1_000_000.0).progress_period,
        Duration::from_millis(1)
    );
}

#[test]
fn starting_without_a_runtime_fails() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let err = LoadingSequencer::start(1, LoadingTimings::default(), tx).expect_err("no runtime");
    assert_eq!(err, FunnelError::TimerUnavailable);
}

#[tokio::test(start_paused = true)]
async fn timers_fire_on_independent_periods() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sequencer = LoadingSequencer::start(7, fast_timings(), tx).expect("sequencer");

    sleep(Duration::from_millis(85)).await;
    let ticks = drain(&mut rx);

    assert!(ticks.iter().all(|t| t.generation == 7));
    assert_eq!(count(&ticks, LoadingTick::Progress), 8);
    assert_eq!(count(&ticks, LoadingTick::Message), 3);
    assert_eq!(count(&ticks, LoadingTick::Testimonial), 2);
    assert_eq!(count(&ticks, LoadingTick::HandOff), 0);

    drop(sequencer);
    sleep(Duration::from_secs(1)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn hand_off_follows_its_own_delay_and_stops_progress() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sequencer = LoadingSequencer::start(3, fast_timings(), tx).expect("sequencer");

    sleep(Duration::from_millis(35)).await;
    assert_eq!(count(&drain(&mut rx), LoadingTick::Progress), 3);

    let begun = Instant::now();
    sequencer.begin_hand_off(begun);
    loop {
        let scheduled = rx.recv().await.expect("tick");
        assert_ne!(scheduled.tick, LoadingTick::Progress);
        if scheduled.tick == LoadingTick::HandOff {
            let elapsed = Instant::now() - begun;
            assert!(elapsed >= Duration::from_millis(50), "{elapsed:?}");
            assert!(elapsed < Duration::from_millis(51), "{elapsed:?}");
            break;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn dropping_before_hand_off_cancels_every_timer() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sequencer = LoadingSequencer::start(9, fast_timings(), tx).expect("sequencer");
    sleep(Duration::from_millis(15)).await;
    sequencer.begin_hand_off(Instant::now());
    drop(sequencer);
    drain(&mut rx);

    sleep(Duration::from_secs(5)).await;
    assert!(drain(&mut rx).is_empty());
}
