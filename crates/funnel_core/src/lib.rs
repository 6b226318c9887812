//! Funnel state machine, multi-select accumulator and timed loading sequence.

pub mod controller;
pub mod loading;
pub mod selection;

pub use controller::FunnelController;
pub use loading::{LoadingState, LoadingTick, LoadingTimings, TickOutcome, PROGRESS_COMPLETE};
pub use selection::SelectionStore;
pub use shared::{FunnelError, FunnelEvent, StepId, StepKind, StepView};
