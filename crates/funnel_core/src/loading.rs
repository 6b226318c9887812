//! Timed loading screen: a progress counter and two cosmetic rotators, each on its own
//! period, followed by a delayed hand-off once progress reaches 100.

use std::time::Duration;

use shared::FunnelError;
use tokio::{
    runtime::Handle,
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{interval_at, sleep_until, Instant},
};
use tracing::{debug, info};

pub const PROGRESS_COMPLETE: u8 = 100;

const DEFAULT_PROGRESS_PERIOD: Duration = Duration::from_millis(60);
const DEFAULT_HAND_OFF_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_MESSAGE_PERIOD: Duration = Duration::from_millis(1500);
const DEFAULT_TESTIMONIAL_PERIOD: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingTimings {
    pub progress_period: Duration,
    pub hand_off_delay: Duration,
    pub message_period: Duration,
    pub testimonial_period: Duration,
}

impl Default for LoadingTimings {
    fn default() -> Self {
        Self {
            progress_period: DEFAULT_PROGRESS_PERIOD,
            hand_off_delay: DEFAULT_HAND_OFF_DELAY,
            message_period: DEFAULT_MESSAGE_PERIOD,
            testimonial_period: DEFAULT_TESTIMONIAL_PERIOD,
        }
    }
}

impl LoadingTimings {
    pub fn validate(&self) -> Result<(), FunnelError> {
        let periods = [
            ("progress_period", self.progress_period),
            ("hand_off_delay", self.hand_off_delay),
            ("message_period", self.message_period),
            ("testimonial_period", self.testimonial_period),
        ];
        for (name, value) in periods {
            if value.is_zero() {
                return Err(FunnelError::InvalidTimings(format!("{name} must be non-zero")));
            }
        }
        Ok(())
    }

    /// Divides every period by `speed`; results never drop below one millisecond.
    pub fn scaled(&self, speed: f64) -> Self {
        if !speed.is_finite() || speed <= 0.0 {
            return *self;
        }
        let scale = |value: Duration| {
            Duration::from_secs_f64(value.as_secs_f64() / speed).max(Duration::from_millis(1))
        };
        Self {
            progress_period: scale(self.progress_period),
            hand_off_delay: scale(self.hand_off_delay),
            message_period: scale(self.message_period),
            testimonial_period: scale(self.testimonial_period),
        }
    }

    /// Virtual time from entering the loading step to the hand-off.
    pub fn total_duration(&self) -> Duration {
        self.progress_period * u32::from(PROGRESS_COMPLETE) + self.hand_off_delay
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingTick {
    Progress,
    Message,
    Testimonial,
    HandOff,
}

/// A tick tagged with the sequencer that produced it and the instant its timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScheduledTick {
    pub generation: u64,
    pub tick: LoadingTick,
    pub fired_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Unchanged,
    Progressed(u8),
    ProgressCompleted,
    MessageRotated(usize),
    TestimonialRotated(usize),
    HandOff,
}

/// Counters driven by loading ticks. Pure state; the timers live in [`LoadingSequencer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingState {
    progress: u8,
    message_index: usize,
    message_count: usize,
    testimonial_index: usize,
    testimonial_count: usize,
    handed_off: bool,
}

impl LoadingState {
    pub fn new(message_count: usize, testimonial_count: usize) -> Self {
        Self {
            progress: 0,
            message_index: 0,
            message_count,
            testimonial_index: 0,
            testimonial_count,
            handed_off: false,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn message_index(&self) -> usize {
        self.message_index
    }

    pub fn testimonial_index(&self) -> usize {
        self.testimonial_index
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= PROGRESS_COMPLETE
    }

    pub fn apply(&mut self, tick: LoadingTick) -> TickOutcome {
        match tick {
            LoadingTick::Progress => {
                if self.is_complete() {
                    return TickOutcome::Unchanged;
                }
                self.progress += 1;
                if self.is_complete() {
                    TickOutcome::ProgressCompleted
                } else {
                    TickOutcome::Progressed(self.progress)
                }
            }
            LoadingTick::Message => {
                if self.message_count == 0 {
                    return TickOutcome::Unchanged;
                }
                self.message_index = (self.message_index + 1) % self.message_count;
                TickOutcome::MessageRotated(self.message_index)
            }
            LoadingTick::Testimonial => {
                if self.testimonial_count == 0 {
                    return TickOutcome::Unchanged;
                }
                self.testimonial_index = (self.testimonial_index + 1) % self.testimonial_count;
                TickOutcome::TestimonialRotated(self.testimonial_index)
            }
            // The hand-off is only honoured after the counter has been seen at 100.
            LoadingTick::HandOff => {
                if !self.is_complete() || self.handed_off {
                    return TickOutcome::Unchanged;
                }
                self.handed_off = true;
                TickOutcome::HandOff
            }
        }
    }
}

/// Owns every timer task of one visit to the loading step. Dropping it aborts them all.
#[derive(Debug)]
pub(crate) struct LoadingSequencer {
    generation: u64,
    runtime: Handle,
    timings: LoadingTimings,
    tx: UnboundedSender<ScheduledTick>,
    progress: Option<JoinHandle<()>>,
    message: JoinHandle<()>,
    testimonial: JoinHandle<()>,
    hand_off: Option<JoinHandle<()>>,
}

impl LoadingSequencer {
    pub(crate) fn start(
        generation: u64,
        timings: LoadingTimings,
        tx: UnboundedSender<ScheduledTick>,
    ) -> Result<Self, FunnelError> {
        let runtime = Handle::try_current().map_err(|_| FunnelError::TimerUnavailable)?;

        let progress = spawn_periodic(
            &runtime,
            timings.progress_period,
            generation,
            LoadingTick::Progress,
            tx.clone(),
        );
        let message = spawn_periodic(
            &runtime,
            timings.message_period,
            generation,
            LoadingTick::Message,
            tx.clone(),
        );
        let testimonial = spawn_periodic(
            &runtime,
            timings.testimonial_period,
            generation,
            LoadingTick::Testimonial,
            tx.clone(),
        );
        info!(generation, "loading sequencer started");

        Ok(Self {
            generation,
            runtime,
            timings,
            tx,
            progress: Some(progress),
            message,
            testimonial,
            hand_off: None,
        })
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Stops the progress ticker and schedules the one-shot hand-off one delay after
    /// `completed_at`, the instant the final progress tick fired.
    pub(crate) fn begin_hand_off(&mut self, completed_at: Instant) {
        if self.hand_off.is_some() {
            return;
        }
        if let Some(progress) = self.progress.take() {
            progress.abort();
        }
        let delay = self.timings.hand_off_delay;
        let deadline = completed_at + delay;
        let generation = self.generation;
        let tx = self.tx.clone();
        self.hand_off = Some(self.runtime.spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(ScheduledTick {
                generation,
                tick: LoadingTick::HandOff,
                fired_at: deadline,
            });
        }));
        debug!(generation, delay_ms = delay.as_millis() as u64, "hand-off scheduled");
    }
}

impl Drop for LoadingSequencer {
    fn drop(&mut self) {
        if let Some(progress) = self.progress.take() {
            progress.abort();
        }
        self.message.abort();
        self.testimonial.abort();
        if let Some(hand_off) = self.hand_off.take() {
            hand_off.abort();
        }
        info!(generation = self.generation, "loading sequencer stopped");
    }
}

fn spawn_periodic(
    runtime: &Handle,
    period: Duration,
    generation: u64,
    tick: LoadingTick,
    tx: UnboundedSender<ScheduledTick>,
) -> JoinHandle<()> {
    // First firing one full period after entry, like a repeating timer.
    let first = Instant::now() + period;
    runtime.spawn(async move {
        let mut interval = interval_at(first, period);
        loop {
            let fired_at = interval.tick().await;
            let scheduled = ScheduledTick {
                generation,
                tick,
                fired_at,
            };
            if tx.send(scheduled).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
#[path = "tests/loading_tests.rs"]
mod tests;
