//! Assessment workflow error types.

use thiserror::Error;

use super::assessment_model::{MissingField, WorkflowStage};
use crate::countries::CountryId;

/// Errors raised by the assessment workflow.
///
/// All of them are recoverable: the rejected operation leaves previously
/// entered data untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessmentError {
    /// A stage transition or calculation met `None` values.
    #[error(
        "Please fill in all required fields of the {stage} stage ({} missing)",
        .missing.len()
    )]
    IncompleteInput {
        stage: WorkflowStage,
        missing: Vec<MissingField>,
    },

    #[error("A receiver country must be chosen first")]
    NoReceiverCountry,

    #[error("At least one source country must be added")]
    NoSourceCountries,

    #[error("Country {0} is the receiver country and cannot be a source country")]
    ReceiverAsSource(CountryId),

    #[error("Country {0} is not known to the country directory")]
    CountryNotFound(CountryId),

    #[error("Country {0} is not a source country of this assessment")]
    NotASourceCountry(CountryId),

    #[error("Cannot {action} from the {from} stage")]
    InvalidTransition {
        from: WorkflowStage,
        action: &'static str,
    },

    #[error("The assessment has been calculated; go back to the Connections stage to edit it")]
    AssessmentLocked,
}

impl AssessmentError {
    /// Creates an InvalidTransition error.
    pub fn invalid_transition(from: WorkflowStage, action: &'static str) -> Self {
        Self::InvalidTransition { from, action }
    }
}
