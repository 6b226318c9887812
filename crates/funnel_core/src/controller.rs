//! The funnel state machine. Owns the session state, enforces the transition table and
//! runs the loading sequencer while the loading step is current.

use shared::{
    registry::{self, LOADING_MESSAGES, LOADING_TESTIMONIALS},
    FunnelError, FunnelEvent, LoadingView, OptionView, StepId, StepKind, StepView,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::{
    loading::{LoadingSequencer, LoadingState, LoadingTimings, ScheduledTick, TickOutcome},
    selection::SelectionStore,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub struct FunnelController {
    session_id: Uuid,
    current_step: StepId,
    selection: SelectionStore,
    loading: LoadingState,
    sequencer: Option<LoadingSequencer>,
    timings: LoadingTimings,
    generation: u64,
    tick_tx: mpsc::UnboundedSender<ScheduledTick>,
    tick_rx: mpsc::UnboundedReceiver<ScheduledTick>,
    events: broadcast::Sender<FunnelEvent>,
}

impl FunnelController {
    pub fn new(timings: LoadingTimings) -> Result<Self, FunnelError> {
        timings.validate()?;
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session_id = Uuid::new_v4();
        info!(%session_id, step = %StepId::FIRST, "funnel session started");

        Ok(Self {
            session_id,
            current_step: StepId::FIRST,
            selection: SelectionStore::new(),
            loading: fresh_loading_state(),
            sequencer: None,
            timings,
            generation: 0,
            tick_tx,
            tick_rx,
            events,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn current_step(&self) -> StepId {
        self.current_step
    }

    pub fn current_kind(&self) -> StepKind {
        registry::kind(self.current_step)
    }

    pub fn is_complete(&self) -> bool {
        self.current_step.is_terminal()
    }

    /// Selected labels of the current step, in option-list order.
    pub fn selection_snapshot(&self) -> Vec<String> {
        self.selection
            .ordered_by(registry::options_for(self.current_step))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn loading_progress(&self) -> u8 {
        self.loading.progress()
    }

    pub fn current_message_index(&self) -> usize {
        self.loading.message_index()
    }

    pub fn current_testimonial_index(&self) -> usize {
        self.loading.testimonial_index()
    }

    pub fn is_loading_active(&self) -> bool {
        self.sequencer.is_some()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FunnelEvent> {
        self.events.subscribe()
    }

    /// Moves to `to`, which must be the configured successor of the current step.
    pub fn advance(&mut self, to: StepId) -> Result<(), FunnelError> {
        let from = self.current_step;
        if from.is_terminal() {
            warn!(session_id = %self.session_id, %to, "advance requested after completion");
            return Err(FunnelError::SessionComplete);
        }
        if registry::next_step(from) != Some(to) {
            warn!(session_id = %self.session_id, %from, %to, "rejected transition");
            return Err(FunnelError::InvalidTransition { from, to });
        }
        self.enter(to)
    }

    /// The "continue" action of informational and multi-select steps.
    pub fn continue_to_next(&mut self) -> Result<StepId, FunnelError> {
        let step = self.current_step;
        match registry::kind(step) {
            StepKind::Informational | StepKind::MultiSelect => {
                let next = registry::next_step(step).ok_or(FunnelError::SessionComplete)?;
                self.advance(next)?;
                Ok(next)
            }
            StepKind::SingleChoice => Err(FunnelError::ChoiceRequired { step }),
            StepKind::TimedTransition => Err(FunnelError::AutoAdvancing { step }),
            StepKind::TerminalDisplay => Err(FunnelError::SessionComplete),
        }
    }

    /// Answers a single-choice step. The answer never decides the destination; inert
    /// answers are accepted and do nothing.
    pub fn choose(&mut self, label: &str) -> Result<Option<StepId>, FunnelError> {
        let step = self.current_step;
        let spec = registry::spec(step);
        if spec.kind != StepKind::SingleChoice {
            return Err(FunnelError::NotSingleChoice { step });
        }
        validate_label(step, label)?;
        if spec.is_inert(label) {
            debug!(session_id = %self.session_id, %step, label, "inert option chosen");
            return Ok(None);
        }
        let next = spec.next.ok_or(FunnelError::SessionComplete)?;
        self.advance(next)?;
        Ok(Some(next))
    }

    /// Flips `label` on the current multi-select step; returns whether it is now selected.
    pub fn toggle_option(&mut self, label: &str) -> Result<bool, FunnelError> {
        let step = self.current_step;
        if registry::kind(step) != StepKind::MultiSelect {
            return Err(FunnelError::NotMultiSelect { step });
        }
        validate_label(step, label)?;

        let selected = self.selection.toggle(label);
        debug!(session_id = %self.session_id, %step, label, selected, "option toggled");
        self.emit(FunnelEvent::SelectionChanged {
            step,
            selected: self.selection_snapshot(),
        });
        Ok(selected)
    }

    /// Waits for the next loading tick and applies it. Returns `None` straight away when
    /// no loading sequence is running.
    pub async fn process_next_tick(&mut self) -> Option<TickOutcome> {
        while self.sequencer.is_some() {
            let scheduled = self.tick_rx.recv().await?;
            if let Some(outcome) = self.apply_scheduled(scheduled) {
                return Some(outcome);
            }
        }
        None
    }

    /// Applies every tick that is already queued without waiting. Returns how many were
    /// accepted.
    pub fn drain_ready_ticks(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(scheduled) = self.tick_rx.try_recv() {
            if self.apply_scheduled(scheduled).is_some() {
                applied += 1;
            }
        }
        applied
    }

    pub fn view(&self) -> StepView {
        let step = self.current_step;
        let spec = registry::spec(step);
        let options = spec
            .options
            .iter()
            .map(|&label| OptionView {
                label,
                selected: self.selection.contains(label),
                enabled: !spec.is_inert(label),
            })
            .collect();
        let loading = (step == StepId::Loading).then(|| self.loading_view());

        StepView {
            step,
            kind: spec.kind,
            ordinal: registry::ordinal(step),
            progress_percent: registry::progress_percent(step),
            options,
            loading,
        }
    }

    fn loading_view(&self) -> LoadingView {
        let message_index = self.loading.message_index();
        let testimonial_index = self.loading.testimonial_index();
        LoadingView {
            percent: self.loading.progress(),
            message_index,
            message: LOADING_MESSAGES[message_index],
            testimonial_index,
            testimonial: LOADING_TESTIMONIALS[testimonial_index],
        }
    }

    fn enter(&mut self, to: StepId) -> Result<(), FunnelError> {
        let from = self.current_step;

        // Start timers before touching state so a failure leaves the step unchanged.
        let sequencer = if to == StepId::Loading {
            let generation = self.generation + 1;
            let sequencer =
                LoadingSequencer::start(generation, self.timings, self.tick_tx.clone())?;
            self.generation = generation;
            Some(sequencer)
        } else {
            None
        };

        // Replacing the previous sequencer drops it, which cancels all of its timers.
        self.sequencer = sequencer;

        if to == StepId::Loading {
            self.loading = fresh_loading_state();
        }
        if registry::kind(to).is_choice() && to != from {
            self.selection.clear();
        }
        self.current_step = to;

        info!(session_id = %self.session_id, %from, %to, "step changed");
        self.emit(FunnelEvent::ScrollReset);
        self.emit(FunnelEvent::StepChanged { from, to });
        if to.is_terminal() {
            info!(session_id = %self.session_id, "funnel completed");
            self.emit(FunnelEvent::SessionCompleted);
        }
        Ok(())
    }

    fn apply_scheduled(&mut self, scheduled: ScheduledTick) -> Option<TickOutcome> {
        let active = self.sequencer.as_ref().map(LoadingSequencer::generation);
        if active != Some(scheduled.generation) {
            trace!(
                session_id = %self.session_id,
                generation = scheduled.generation,
                "discarding stale loading tick"
            );
            return None;
        }

        let outcome = self.loading.apply(scheduled.tick);
        match outcome {
            TickOutcome::Unchanged => {}
            TickOutcome::Progressed(percent) => {
                trace!(session_id = %self.session_id, percent, "loading progressed");
                self.emit(FunnelEvent::LoadingProgressed { percent });
            }
            TickOutcome::ProgressCompleted => {
                debug!(session_id = %self.session_id, "loading reached 100%");
                self.emit(FunnelEvent::LoadingProgressed {
                    percent: self.loading.progress(),
                });
                if let Some(sequencer) = self.sequencer.as_mut() {
                    sequencer.begin_hand_off(scheduled.fired_at);
                }
            }
            TickOutcome::MessageRotated(index) => {
                self.emit(FunnelEvent::MessageRotated { index });
            }
            TickOutcome::TestimonialRotated(index) => {
                self.emit(FunnelEvent::TestimonialRotated { index });
            }
            TickOutcome::HandOff => {
                if let Err(err) = self.advance(StepId::SalesPage) {
                    warn!(session_id = %self.session_id, error = %err, "loading hand-off failed");
                }
            }
        }
        Some(outcome)
    }

    fn emit(&self, event: FunnelEvent) {
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for FunnelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunnelController")
            .field("session_id", &self.session_id)
            .field("current_step", &self.current_step)
            .field("selection", &self.selection)
            .field("loading", &self.loading)
            .field("loading_active", &self.sequencer.is_some())
            .finish()
    }
}

fn fresh_loading_state() -> LoadingState {
    LoadingState::new(LOADING_MESSAGES.len(), LOADING_TESTIMONIALS.len())
}

fn validate_label(step: StepId, label: &str) -> Result<(), FunnelError> {
    if label.is_empty() {
        return Err(FunnelError::EmptyLabel);
    }
    if !registry::spec(step).has_option(label) {
        return Err(FunnelError::UnknownOption {
            step,
            label: label.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
