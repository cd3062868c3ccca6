//! Assessment events module.
//!
//! Provides the notice types and the sink trait the assessment service emits
//! through. Host applications implement the sink to surface notices.

mod assessment_event;
mod sink;

pub use assessment_event::*;
pub use sink::*;
