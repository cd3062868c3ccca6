//! Assessment domain models.
//!
//! Per-country input records collected by the workflow, the snapshots
//! returned by the data store, and the stage enumeration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{MAX_CONNECTION_SCORE, MAX_DISEASE_STATUS_SCORE, MAX_MITIGATION_SCORE};
use crate::countries::CountryId;
use crate::diseases::{Disease, DiseaseScores};

// =============================================================================
// Dataset
// =============================================================================

/// The three user-editable record collections of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dataset {
    DiseaseStatus,
    MitigationMeasures,
    Connections,
}

impl Dataset {
    /// Highest score accepted for this dataset.
    pub fn max_score(&self) -> u8 {
        match self {
            Dataset::DiseaseStatus => MAX_DISEASE_STATUS_SCORE,
            Dataset::MitigationMeasures => MAX_MITIGATION_SCORE,
            Dataset::Connections => MAX_CONNECTION_SCORE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::DiseaseStatus => "disease status",
            Dataset::MitigationMeasures => "mitigation measures",
            Dataset::Connections => "connections",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Disease score records
// =============================================================================

/// All disease scores of one source country for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseScoreRow {
    pub country_id: CountryId,
    pub scores: DiseaseScores,
}

impl DiseaseScoreRow {
    pub fn empty(country_id: CountryId) -> Self {
        Self {
            country_id,
            scores: DiseaseScores::empty(),
        }
    }
}

/// Epidemiological status of one disease in one source country.
///
/// 0 = disease-free, 3 = high-level circulation, `None` = not yet entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseStatusRecord {
    pub country_id: CountryId,
    pub disease: Disease,
    pub score: Option<u8>,
}

/// Effectiveness of the controls against one disease in one source country.
///
/// 0 = uncontrolled risk, 4 = all risks mitigated, `None` = not yet entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MitigationMeasureRecord {
    pub country_id: CountryId,
    pub disease: Disease,
    pub score: Option<u8>,
}

/// Latest stored scores of one dataset for a country.
///
/// Diseases absent from `scores` are treated as not entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseScoreSnapshot {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub scores: BTreeMap<Disease, Option<u8>>,
}

// =============================================================================
// Connections
// =============================================================================

/// One factor of the bilateral link between receiver and source country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionField {
    LiveAnimalContact,
    LegalImport,
    Proximity,
    IllegalImport,
    Connection,
    LivestockDensity,
}

impl ConnectionField {
    pub const ALL: [ConnectionField; 6] = [
        ConnectionField::LiveAnimalContact,
        ConnectionField::LegalImport,
        ConnectionField::Proximity,
        ConnectionField::IllegalImport,
        ConnectionField::Connection,
        ConnectionField::LivestockDensity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionField::LiveAnimalContact => "liveAnimalContact",
            ConnectionField::LegalImport => "legalImport",
            ConnectionField::Proximity => "proximity",
            ConnectionField::IllegalImport => "illegalImport",
            ConnectionField::Connection => "connection",
            ConnectionField::LivestockDensity => "livestockDensity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionField::LiveAnimalContact => "Live animal contact",
            ConnectionField::LegalImport => "Legal import",
            ConnectionField::Proximity => "Proximity",
            ConnectionField::IllegalImport => "Illegal import",
            ConnectionField::Connection => "Connection",
            ConnectionField::LivestockDensity => "Livestock density",
        }
    }
}

impl fmt::Display for ConnectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Strength of the epidemiological link between the receiver and one source country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub country_id: CountryId,
    pub live_animal_contact: Option<u8>,
    pub legal_import: Option<u8>,
    pub proximity: Option<u8>,
    pub illegal_import: Option<u8>,
    pub connection: Option<u8>,
    pub livestock_density: Option<u8>,
}

impl ConnectionRecord {
    pub fn empty(country_id: CountryId) -> Self {
        Self {
            country_id,
            live_animal_contact: None,
            legal_import: None,
            proximity: None,
            illegal_import: None,
            connection: None,
            livestock_density: None,
        }
    }

    pub fn get(&self, field: ConnectionField) -> Option<u8> {
        match field {
            ConnectionField::LiveAnimalContact => self.live_animal_contact,
            ConnectionField::LegalImport => self.legal_import,
            ConnectionField::Proximity => self.proximity,
            ConnectionField::IllegalImport => self.illegal_import,
            ConnectionField::Connection => self.connection,
            ConnectionField::LivestockDensity => self.livestock_density,
        }
    }

    pub fn set(&mut self, field: ConnectionField, value: Option<u8>) {
        let slot = match field {
            ConnectionField::LiveAnimalContact => &mut self.live_animal_contact,
            ConnectionField::LegalImport => &mut self.legal_import,
            ConnectionField::Proximity => &mut self.proximity,
            ConnectionField::IllegalImport => &mut self.illegal_import,
            ConnectionField::Connection => &mut self.connection,
            ConnectionField::LivestockDensity => &mut self.livestock_density,
        };
        *slot = value;
    }

    /// The six factors in `ConnectionField::ALL` order.
    pub fn values(&self) -> [Option<u8>; 6] {
        ConnectionField::ALL.map(|f| self.get(f))
    }

    pub fn missing_fields(&self) -> impl Iterator<Item = ConnectionField> + '_ {
        ConnectionField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.values().iter().all(Option::is_some)
    }
}

// =============================================================================
// Workflow stage
// =============================================================================

/// Stages of the data-collection workflow, in strict order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowStage {
    DiseaseStatus,
    MitigationMeasures,
    Pathways,
    Connections,
    Completed,
}

impl WorkflowStage {
    pub fn title(&self) -> &'static str {
        match self {
            WorkflowStage::DiseaseStatus => "Disease Status",
            WorkflowStage::MitigationMeasures => "Mitigation Measures",
            WorkflowStage::Pathways => "Pathways",
            WorkflowStage::Connections => "Connections",
            WorkflowStage::Completed => "Results",
        }
    }

    /// The stage `advance` leads to. `Connections` only moves on through `submit`.
    pub fn next(&self) -> Option<WorkflowStage> {
        match self {
            WorkflowStage::DiseaseStatus => Some(WorkflowStage::MitigationMeasures),
            WorkflowStage::MitigationMeasures => Some(WorkflowStage::Pathways),
            WorkflowStage::Pathways => Some(WorkflowStage::Connections),
            WorkflowStage::Connections | WorkflowStage::Completed => None,
        }
    }

    pub fn previous(&self) -> Option<WorkflowStage> {
        match self {
            WorkflowStage::DiseaseStatus => None,
            WorkflowStage::MitigationMeasures => Some(WorkflowStage::DiseaseStatus),
            WorkflowStage::Pathways => Some(WorkflowStage::MitigationMeasures),
            WorkflowStage::Connections => Some(WorkflowStage::Pathways),
            WorkflowStage::Completed => Some(WorkflowStage::Connections),
        }
    }

    /// The dataset edited at this stage, if any.
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            WorkflowStage::DiseaseStatus => Some(Dataset::DiseaseStatus),
            WorkflowStage::MitigationMeasures => Some(Dataset::MitigationMeasures),
            WorkflowStage::Connections => Some(Dataset::Connections),
            WorkflowStage::Pathways | WorkflowStage::Completed => None,
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

// =============================================================================
// Validation and fetch bookkeeping
// =============================================================================

/// A required value that is still `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingField {
    pub dataset: Dataset,
    pub country_id: CountryId,
    pub country_name: String,
    pub field: String,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.country_name, self.dataset, self.field)
    }
}

/// Identifies one membership of a country in the source set.
///
/// A snapshot fetched for a ticket is applied only while the ticket is still
/// current; removing and re-adding a country issues a new ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub country_id: CountryId,
    pub generation: u64,
}

/// Most recent record date seen per fetched dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDates {
    pub disease_status: Option<NaiveDate>,
    pub mitigation_measures: Option<NaiveDate>,
}
