pub mod domain;
pub mod error;
pub mod protocol;
pub mod registry;

pub use domain::{StepId, StepKind, Testimonial};
pub use error::{ErrorCode, FunnelError};
pub use protocol::{FunnelEvent, LoadingView, OptionView, StepView};
