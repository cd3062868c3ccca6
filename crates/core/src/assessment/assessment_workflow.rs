//! Data-collection state machine of one assessment.
//!
//! The workflow owns the receiver, the ordered source country set and the
//! three per-country record collections. Every mutation keeps the record
//! collections keyed by exactly the source country ids.

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::assessment_errors::AssessmentError;
use super::assessment_model::{
    ConnectionField, ConnectionRecord, Dataset, DatasetDates, DiseaseScoreRow,
    DiseaseScoreSnapshot, DiseaseStatusRecord, FetchTicket, MissingField,
    MitigationMeasureRecord, WorkflowStage,
};
use crate::countries::{Country, CountryId};
use crate::diseases::{Disease, DiseaseScores};
use crate::errors::{Error, Result, ValidationError};
use crate::risk::{RiskAssessmentInput, RiskEngine, RiskScoreResult};

/// Workflow position. Results exist only once the assessment is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "camelCase")]
pub enum WorkflowState {
    DiseaseStatus,
    MitigationMeasures,
    Pathways,
    Connections,
    Completed { results: Vec<RiskScoreResult> },
}

impl WorkflowState {
    pub fn stage(&self) -> WorkflowStage {
        match self {
            WorkflowState::DiseaseStatus => WorkflowStage::DiseaseStatus,
            WorkflowState::MitigationMeasures => WorkflowStage::MitigationMeasures,
            WorkflowState::Pathways => WorkflowStage::Pathways,
            WorkflowState::Connections => WorkflowStage::Connections,
            WorkflowState::Completed { .. } => WorkflowStage::Completed,
        }
    }

    fn entering(stage: WorkflowStage) -> Self {
        match stage {
            WorkflowStage::DiseaseStatus => WorkflowState::DiseaseStatus,
            WorkflowStage::MitigationMeasures => WorkflowState::MitigationMeasures,
            WorkflowStage::Pathways => WorkflowState::Pathways,
            WorkflowStage::Connections => WorkflowState::Connections,
            WorkflowStage::Completed => WorkflowState::Completed {
                results: Vec::new(),
            },
        }
    }
}

/// Output of a successful submit: the frozen input and the scores computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedAssessment {
    pub input: RiskAssessmentInput,
    pub results: Vec<RiskScoreResult>,
}

/// The assessment being assembled.
#[derive(Debug, Clone)]
pub struct AssessmentWorkflow {
    state: WorkflowState,
    receiver: Option<Country>,
    sources: Vec<Country>,
    disease_status: BTreeMap<CountryId, DiseaseScores>,
    mitigation_measures: BTreeMap<CountryId, DiseaseScores>,
    connections: BTreeMap<CountryId, ConnectionRecord>,
    generations: HashMap<CountryId, u64>,
    next_generation: u64,
    dates: DatasetDates,
}

impl Default for AssessmentWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentWorkflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::DiseaseStatus,
            receiver: None,
            sources: Vec::new(),
            disease_status: BTreeMap::new(),
            mitigation_measures: BTreeMap::new(),
            connections: BTreeMap::new(),
            generations: HashMap::new(),
            next_generation: 0,
            dates: DatasetDates::default(),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn current_stage(&self) -> WorkflowStage {
        self.state.stage()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn receiver(&self) -> Option<&Country> {
        self.receiver.as_ref()
    }

    /// Source countries in the order they were added.
    pub fn source_countries(&self) -> &[Country] {
        &self.sources
    }

    pub fn is_source(&self, country_id: CountryId) -> bool {
        self.sources.iter().any(|c| c.id == country_id)
    }

    pub fn disease_status_rows(&self) -> Vec<DiseaseScoreRow> {
        self.score_rows(&self.disease_status)
    }

    pub fn mitigation_measure_rows(&self) -> Vec<DiseaseScoreRow> {
        self.score_rows(&self.mitigation_measures)
    }

    pub fn connection_rows(&self) -> Vec<ConnectionRecord> {
        self.sources
            .iter()
            .filter_map(|c| self.connections.get(&c.id).copied())
            .collect()
    }

    /// One record per (source country, disease).
    pub fn disease_status_records(&self) -> Vec<DiseaseStatusRecord> {
        self.disease_status_rows()
            .into_iter()
            .flat_map(|row| {
                Disease::ALL.into_iter().map(move |disease| DiseaseStatusRecord {
                    country_id: row.country_id,
                    disease,
                    score: row.scores.get(disease),
                })
            })
            .collect()
    }

    pub fn mitigation_measure_records(&self) -> Vec<MitigationMeasureRecord> {
        self.mitigation_measure_rows()
            .into_iter()
            .flat_map(|row| {
                Disease::ALL
                    .into_iter()
                    .map(move |disease| MitigationMeasureRecord {
                        country_id: row.country_id,
                        disease,
                        score: row.scores.get(disease),
                    })
            })
            .collect()
    }

    pub fn dataset_dates(&self) -> DatasetDates {
        self.dates
    }

    /// Results of the last submit, while the assessment is completed.
    pub fn results(&self) -> Option<&[RiskScoreResult]> {
        match &self.state {
            WorkflowState::Completed { results } => Some(results),
            _ => None,
        }
    }

    fn score_rows(
        &self,
        collection: &BTreeMap<CountryId, DiseaseScores>,
    ) -> Vec<DiseaseScoreRow> {
        self.sources
            .iter()
            .filter_map(|c| {
                collection.get(&c.id).map(|scores| DiseaseScoreRow {
                    country_id: c.id,
                    scores: *scores,
                })
            })
            .collect()
    }

    // =========================================================================
    // Country selection
    // =========================================================================

    fn ensure_editable(&self) -> Result<()> {
        if matches!(self.state, WorkflowState::Completed { .. }) {
            return Err(AssessmentError::AssessmentLocked.into());
        }
        Ok(())
    }

    fn ensure_selection_stage(&self, action: &'static str) -> Result<()> {
        self.ensure_editable()?;
        if self.current_stage() != WorkflowStage::DiseaseStatus {
            return Err(AssessmentError::invalid_transition(self.current_stage(), action).into());
        }
        Ok(())
    }

    /// Chooses the receiver country.
    ///
    /// A different receiver discards every source country and its records.
    /// Returns `false` when the country already is the receiver.
    pub fn set_receiver(&mut self, country: Country) -> Result<bool> {
        self.ensure_selection_stage("change the receiver country")?;
        if self.receiver.as_ref().map(|r| r.id) == Some(country.id) {
            return Ok(false);
        }

        if !self.sources.is_empty() {
            info!(
                "Receiver changed to {}; clearing {} source countries",
                country.display_name,
                self.sources.len()
            );
        }
        self.clear_sources();
        self.receiver = Some(country);
        Ok(true)
    }

    /// Adds a source country with empty records.
    ///
    /// Returns the ticket under which its stored snapshots may be applied, or
    /// `None` when the country is already selected.
    pub fn add_source(&mut self, country: Country) -> Result<Option<FetchTicket>> {
        self.ensure_selection_stage("add a source country")?;
        let receiver = self
            .receiver
            .as_ref()
            .ok_or(AssessmentError::NoReceiverCountry)?;
        if receiver.id == country.id {
            return Err(AssessmentError::ReceiverAsSource(country.id).into());
        }
        if self.is_source(country.id) {
            debug!("{} is already a source country", country.display_name);
            return Ok(None);
        }

        let country_id = country.id;
        self.disease_status.insert(country_id, DiseaseScores::empty());
        self.mitigation_measures
            .insert(country_id, DiseaseScores::empty());
        self.connections
            .insert(country_id, ConnectionRecord::empty(country_id));
        self.sources.push(country);

        self.next_generation += 1;
        self.generations.insert(country_id, self.next_generation);

        Ok(Some(FetchTicket {
            country_id,
            generation: self.next_generation,
        }))
    }

    /// Removes a source country from all three record collections at once.
    pub fn remove_source(&mut self, country_id: CountryId) -> Result<bool> {
        self.ensure_editable()?;
        let Some(position) = self.sources.iter().position(|c| c.id == country_id) else {
            return Ok(false);
        };

        self.sources.remove(position);
        self.disease_status.remove(&country_id);
        self.mitigation_measures.remove(&country_id);
        self.connections.remove(&country_id);
        self.generations.remove(&country_id);
        Ok(true)
    }

    fn clear_sources(&mut self) {
        self.sources.clear();
        self.disease_status.clear();
        self.mitigation_measures.clear();
        self.connections.clear();
        self.generations.clear();
        self.dates = DatasetDates::default();
    }

    // =========================================================================
    // Fetched snapshots
    // =========================================================================

    /// Whether the membership a ticket was issued for still exists.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generations.get(&ticket.country_id) == Some(&ticket.generation)
    }

    /// Copies stored disease status scores into the still-empty fields.
    ///
    /// Returns `false` and changes nothing when the ticket is stale.
    pub fn apply_disease_status(
        &mut self,
        ticket: FetchTicket,
        snapshot: &DiseaseScoreSnapshot,
    ) -> bool {
        self.apply_snapshot(Dataset::DiseaseStatus, ticket, snapshot)
    }

    pub fn apply_mitigation_measures(
        &mut self,
        ticket: FetchTicket,
        snapshot: &DiseaseScoreSnapshot,
    ) -> bool {
        self.apply_snapshot(Dataset::MitigationMeasures, ticket, snapshot)
    }

    fn apply_snapshot(
        &mut self,
        dataset: Dataset,
        ticket: FetchTicket,
        snapshot: &DiseaseScoreSnapshot,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale {} snapshot for country {}",
                dataset, ticket.country_id
            );
            return false;
        }

        let max = dataset.max_score();
        let (collection, latest_date) = match dataset {
            Dataset::DiseaseStatus => (&mut self.disease_status, &mut self.dates.disease_status),
            Dataset::MitigationMeasures => (
                &mut self.mitigation_measures,
                &mut self.dates.mitigation_measures,
            ),
            Dataset::Connections => return false,
        };
        let Some(scores) = collection.get_mut(&ticket.country_id) else {
            return false;
        };

        for (disease, stored) in &snapshot.scores {
            let Some(value) = stored else { continue };
            if *value > max {
                warn!(
                    "Ignoring stored {} score {} for {} of country {} (max {})",
                    dataset, value, disease, ticket.country_id, max
                );
                continue;
            }
            if scores.get(*disease).is_none() {
                scores.set(*disease, Some(*value));
            }
        }

        if let Some(date) = snapshot.date {
            if latest_date.map_or(true, |current| date > current) {
                *latest_date = Some(date);
            }
        }
        true
    }

    // =========================================================================
    // User edits
    // =========================================================================

    fn ensure_source(&self, country_id: CountryId) -> Result<()> {
        if !self.is_source(country_id) {
            return Err(AssessmentError::NotASourceCountry(country_id).into());
        }
        Ok(())
    }

    fn check_range(field: String, score: Option<u8>, max: u8) -> Result<()> {
        match score {
            Some(value) if value > max => {
                Err(ValidationError::out_of_range(field, value, max).into())
            }
            _ => Ok(()),
        }
    }

    pub fn set_disease_status(
        &mut self,
        country_id: CountryId,
        disease: Disease,
        score: Option<u8>,
    ) -> Result<()> {
        self.ensure_editable()?;
        self.ensure_source(country_id)?;
        Self::check_range(
            format!("{} disease status", disease),
            score,
            Dataset::DiseaseStatus.max_score(),
        )?;
        if let Some(scores) = self.disease_status.get_mut(&country_id) {
            scores.set(disease, score);
        }
        Ok(())
    }

    pub fn set_mitigation_measure(
        &mut self,
        country_id: CountryId,
        disease: Disease,
        score: Option<u8>,
    ) -> Result<()> {
        self.ensure_editable()?;
        self.ensure_source(country_id)?;
        Self::check_range(
            format!("{} mitigation measure", disease),
            score,
            Dataset::MitigationMeasures.max_score(),
        )?;
        if let Some(scores) = self.mitigation_measures.get_mut(&country_id) {
            scores.set(disease, score);
        }
        Ok(())
    }

    pub fn set_connection(
        &mut self,
        country_id: CountryId,
        field: ConnectionField,
        score: Option<u8>,
    ) -> Result<()> {
        self.ensure_editable()?;
        self.ensure_source(country_id)?;
        Self::check_range(
            field.label().to_string(),
            score,
            Dataset::Connections.max_score(),
        )?;
        if let Some(record) = self.connections.get_mut(&country_id) {
            record.set(field, score);
        }
        Ok(())
    }

    /// Sets every empty connection field to 0. Entered values are kept.
    pub fn fill_empty_connections_with_zero(&mut self) -> Result<usize> {
        self.ensure_editable()?;
        let mut filled = 0;
        for record in self.connections.values_mut() {
            for field in ConnectionField::ALL {
                if record.get(field).is_none() {
                    record.set(field, Some(0));
                    filled += 1;
                }
            }
        }
        Ok(filled)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Fields of a stage that still have no value, in source country order.
    pub fn missing_fields(&self, stage: WorkflowStage) -> Vec<MissingField> {
        let Some(dataset) = stage.dataset() else {
            return Vec::new();
        };

        let mut missing = Vec::new();
        for country in &self.sources {
            let fields: Vec<String> = match dataset {
                Dataset::DiseaseStatus => self
                    .disease_status
                    .get(&country.id)
                    .map(|s| s.missing().map(|d| d.as_str().to_string()).collect())
                    .unwrap_or_default(),
                Dataset::MitigationMeasures => self
                    .mitigation_measures
                    .get(&country.id)
                    .map(|s| s.missing().map(|d| d.as_str().to_string()).collect())
                    .unwrap_or_default(),
                Dataset::Connections => self
                    .connections
                    .get(&country.id)
                    .map(|r| r.missing_fields().map(|f| f.as_str().to_string()).collect())
                    .unwrap_or_default(),
            };
            missing.extend(fields.into_iter().map(|field| MissingField {
                dataset,
                country_id: country.id,
                country_name: country.display_name.clone(),
                field,
            }));
        }
        missing
    }

    /// Checks the completeness predicate of a stage.
    pub fn validate_stage(&self, stage: WorkflowStage) -> Result<()> {
        if stage == WorkflowStage::DiseaseStatus {
            if self.receiver.is_none() {
                return Err(AssessmentError::NoReceiverCountry.into());
            }
            if self.sources.is_empty() {
                return Err(AssessmentError::NoSourceCountries.into());
            }
        }

        let missing = self.missing_fields(stage);
        if !missing.is_empty() {
            return Err(AssessmentError::IncompleteInput { stage, missing }.into());
        }
        Ok(())
    }

    fn validate_for_submit(&self) -> Result<()> {
        self.validate_stage(WorkflowStage::DiseaseStatus)?;
        self.validate_stage(WorkflowStage::MitigationMeasures)?;
        self.validate_stage(WorkflowStage::Connections)
    }

    pub fn can_advance(&self) -> bool {
        let stage = self.current_stage();
        stage.next().is_some() && self.validate_stage(stage).is_ok()
    }

    pub fn can_submit(&self) -> bool {
        self.current_stage() == WorkflowStage::Connections && self.validate_for_submit().is_ok()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Moves to the next stage once the current one is complete.
    pub fn advance(&mut self) -> Result<WorkflowStage> {
        let from = self.current_stage();
        let Some(to) = from.next() else {
            return Err(AssessmentError::invalid_transition(from, "advance").into());
        };
        self.validate_stage(from)?;

        self.state = WorkflowState::entering(to);
        info!("Assessment moved from {} to {}", from, to);
        Ok(to)
    }

    /// Moves back one stage. Entered data is kept; results are dropped.
    pub fn retreat(&mut self) -> Result<WorkflowStage> {
        let from = self.current_stage();
        let Some(to) = from.previous() else {
            return Err(AssessmentError::invalid_transition(from, "go back").into());
        };

        self.state = WorkflowState::entering(to);
        info!("Assessment moved back from {} to {}", from, to);
        Ok(to)
    }

    /// Discards the receiver, every source country and all records.
    ///
    /// Tickets issued before the restart stay invalid.
    pub fn restart(&mut self) {
        self.clear_sources();
        self.receiver = None;
        self.state = WorkflowState::DiseaseStatus;
        info!("Assessment restarted");
    }

    /// Validates the collections against the source country set.
    pub fn check_invariants(&self) -> Result<()> {
        let ids: BTreeSet<CountryId> = self.sources.iter().map(|c| c.id).collect();
        let violation = if ids.len() != self.sources.len() {
            Some("source countries contain duplicates".to_string())
        } else if self.disease_status.keys().copied().collect::<BTreeSet<_>>() != ids {
            Some("disease status records do not match the source countries".to_string())
        } else if self.mitigation_measures.keys().copied().collect::<BTreeSet<_>>() != ids {
            Some("mitigation measure records do not match the source countries".to_string())
        } else if self.connections.keys().copied().collect::<BTreeSet<_>>() != ids {
            Some("connection records do not match the source countries".to_string())
        } else {
            self.receiver
                .as_ref()
                .filter(|r| ids.contains(&r.id))
                .map(|r| format!("receiver {} is listed as a source country", r.display_name))
        };

        match violation {
            Some(message) => {
                error!("Assessment invariant violated: {}", message);
                Err(Error::InvariantViolation(message))
            }
            None => Ok(()),
        }
    }

    /// Immutable copy of everything the engine needs.
    pub fn snapshot(&self) -> Result<RiskAssessmentInput> {
        let receiver = self
            .receiver
            .clone()
            .ok_or(AssessmentError::NoReceiverCountry)?;
        self.check_invariants()?;

        Ok(RiskAssessmentInput {
            receiver,
            source_countries: self.sources.clone(),
            disease_status: self.disease_status_rows(),
            mitigation_measures: self.mitigation_measure_rows(),
            connections: self.connection_rows(),
        })
    }

    /// Computes the risk scores and completes the assessment.
    ///
    /// Only allowed from the Connections stage with every input present.
    pub fn submit(&mut self, engine: &RiskEngine) -> Result<SubmittedAssessment> {
        let from = self.current_stage();
        if from != WorkflowStage::Connections {
            return Err(AssessmentError::invalid_transition(from, "calculate").into());
        }
        self.validate_for_submit()?;

        let input = self.snapshot()?;
        let results = engine.compute_risk_scores(&input)?;

        self.state = WorkflowState::Completed {
            results: results.clone(),
        };
        info!(
            "Assessment completed with {} risk scores for {} source countries",
            results.len(),
            input.source_countries.len()
        );
        Ok(SubmittedAssessment { input, results })
    }
}
