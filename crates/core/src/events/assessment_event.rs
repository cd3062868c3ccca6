//! Assessment event types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::{Dataset, WorkflowStage};
use crate::countries::CountryId;

/// Notices emitted by the assessment service.
///
/// Fetch failures and fallbacks are reported here instead of as errors, so
/// the host can show a non-blocking notice while the user keeps working.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssessmentEvent {
    SourceCountryAdded { country_id: CountryId },

    SourceCountryRemoved { country_id: CountryId },

    /// Stored scores were copied into the still-empty fields of a country.
    SnapshotApplied {
        country_id: CountryId,
        dataset: Dataset,
    },

    /// The data store could not deliver a snapshot; the fields stay empty.
    FetchFailed {
        country_id: CountryId,
        dataset: Dataset,
        message: String,
    },

    /// A snapshot arrived after its country left the source set.
    StaleSnapshotDiscarded { country_id: CountryId },

    /// The directory lookup for a group failed and the static member list was used.
    GroupFallbackUsed { group_id: String, reason: String },

    StageChanged {
        from: WorkflowStage,
        to: WorkflowStage,
    },

    AssessmentCalculated {
        assessment_id: Uuid,
        result_count: usize,
    },

    AssessmentRestarted,
}

impl AssessmentEvent {
    /// Creates a FetchFailed event.
    pub fn fetch_failed(
        country_id: CountryId,
        dataset: Dataset,
        message: impl Into<String>,
    ) -> Self {
        Self::FetchFailed {
            country_id,
            dataset,
            message: message.into(),
        }
    }

    /// Creates a GroupFallbackUsed event.
    pub fn group_fallback_used(group_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GroupFallbackUsed {
            group_id: group_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a StageChanged event.
    pub fn stage_changed(from: WorkflowStage, to: WorkflowStage) -> Self {
        Self::StageChanged { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_event_serialization() {
        let event = AssessmentEvent::fetch_failed(7, Dataset::MitigationMeasures, "timeout");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "fetch_failed");
        assert_eq!(json["country_id"], 7);
        assert_eq!(json["dataset"], "mitigationMeasures");

        let back: AssessmentEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_unit_variant_serialization() {
        let json = serde_json::to_string(&AssessmentEvent::AssessmentRestarted).unwrap();
        assert_eq!(json, r#"{"type":"assessment_restarted"}"#);
    }
}
