//! RMT Core - Domain entities, services, and traits for the risk mapping tool.
//!
//! This crate assesses the risk that a transboundary animal disease is
//! introduced into a receiver country from a set of source countries. It holds
//! the assessment workflow that collects the inputs, the scoring engine that
//! turns them into composite risk scores, and the reducers that prepare the
//! scores for reporting. Country lookups and record storage are abstracted
//! behind traits implemented by the host application.

pub mod assessment;
pub mod constants;
pub mod countries;
pub mod diseases;
pub mod errors;
pub mod events;
pub mod pathways;
pub mod risk;

// Re-export the types most callers need
pub use assessment::{AssessmentService, AssessmentWorkflow, WorkflowStage};
pub use countries::{Country, CountryId};
pub use diseases::Disease;
pub use pathways::{Pathway, PathwayMatrix};
pub use risk::{RiskEngine, RiskModelConfig, RiskScoreResult};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
