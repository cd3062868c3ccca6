//! Assessment service implementation.
//!
//! The AssessmentService owns the workflow of the active assessment, resolves
//! countries through the directory, prefills records from the data store and
//! hands completed inputs to the risk engine.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::assessment_errors::AssessmentError;
use super::assessment_model::{
    ConnectionField, ConnectionRecord, Dataset, DiseaseScoreRow, DiseaseScoreSnapshot,
    FetchTicket, WorkflowStage,
};
use super::assessment_traits::{AssessmentDataStoreTrait, AssessmentServiceTrait};
use super::assessment_workflow::AssessmentWorkflow;
use crate::countries::{fallback_group_members, Country, CountryDirectoryTrait, CountryId};
use crate::diseases::Disease;
use crate::errors::Result;
use crate::events::{AssessmentEvent, AssessmentEventSink};
use crate::pathways::PathwayChartRow;
use crate::risk::{AssessmentReport, RiskEngine};

/// Service driving one assessment at a time.
pub struct AssessmentService {
    directory: Arc<dyn CountryDirectoryTrait>,
    data_store: Arc<dyn AssessmentDataStoreTrait>,
    event_sink: Arc<dyn AssessmentEventSink>,
    engine: Arc<RiskEngine>,

    /// Workflow shared with the snapshot fetch tasks
    workflow: Arc<RwLock<AssessmentWorkflow>>,

    /// Outstanding snapshot fetches per source country
    pending: Mutex<HashMap<CountryId, JoinHandle<()>>>,
}

impl AssessmentService {
    /// Creates a service using the reference risk engine.
    pub fn new(
        directory: Arc<dyn CountryDirectoryTrait>,
        data_store: Arc<dyn AssessmentDataStoreTrait>,
        event_sink: Arc<dyn AssessmentEventSink>,
    ) -> Self {
        Self::with_engine(directory, data_store, event_sink, RiskEngine::reference())
    }

    /// Creates a service with a custom matrix or model configuration.
    pub fn with_engine(
        directory: Arc<dyn CountryDirectoryTrait>,
        data_store: Arc<dyn AssessmentDataStoreTrait>,
        event_sink: Arc<dyn AssessmentEventSink>,
        engine: RiskEngine,
    ) -> Self {
        Self {
            directory,
            data_store,
            event_sink,
            engine: Arc::new(engine),
            workflow: Arc::new(RwLock::new(AssessmentWorkflow::new())),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    /// Read access to the workflow, e.g. to render the current stage.
    pub async fn workflow(&self) -> RwLockReadGuard<'_, AssessmentWorkflow> {
        self.workflow.read().await
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>> {
        self.directory.list_countries().await
    }

    /// Rows of the read-only pathway reference stage.
    pub fn pathway_rows(&self) -> Vec<PathwayChartRow> {
        self.engine.matrix().rows()
    }

    pub async fn can_advance(&self) -> bool {
        self.workflow.read().await.can_advance()
    }

    pub async fn can_submit(&self) -> bool {
        self.workflow.read().await.can_submit()
    }

    pub async fn fill_empty_connections_with_zero(&self) -> Result<usize> {
        self.workflow.write().await.fill_empty_connections_with_zero()
    }

    /// Waits until every outstanding snapshot fetch has finished or been aborted.
    pub async fn wait_for_pending_fetches(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut pending = self.pending.lock().await;
            pending.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Snapshot fetch task failed: {}", e);
                }
            }
        }
    }

    async fn find_country(&self, country_id: CountryId) -> Result<Country> {
        let countries = self.directory.list_countries().await?;
        countries
            .into_iter()
            .find(|c| c.id == country_id)
            .ok_or_else(|| AssessmentError::CountryNotFound(country_id).into())
    }

    async fn abort_fetch(&self, country_id: CountryId) {
        if let Some(handle) = self.pending.lock().await.remove(&country_id) {
            handle.abort();
        }
    }

    async fn abort_all_fetches(&self) {
        let mut pending = self.pending.lock().await;
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }

    /// Fetches both stored datasets of a new source country in the background.
    async fn spawn_fetch(&self, ticket: FetchTicket) {
        let data_store = Arc::clone(&self.data_store);
        let workflow = Arc::clone(&self.workflow);
        let event_sink = Arc::clone(&self.event_sink);

        let handle = tokio::spawn(async move {
            let (status, mitigation) = futures::join!(
                data_store.latest_disease_status(ticket.country_id),
                data_store.latest_mitigation_measures(ticket.country_id)
            );

            let mut workflow = workflow.write().await;
            if !workflow.is_current(ticket) {
                debug!(
                    "Country {} left the assessment before its snapshots arrived",
                    ticket.country_id
                );
                event_sink.emit(AssessmentEvent::StaleSnapshotDiscarded {
                    country_id: ticket.country_id,
                });
                return;
            }

            let mut events = Vec::new();
            for (dataset, fetched) in [
                (Dataset::DiseaseStatus, status),
                (Dataset::MitigationMeasures, mitigation),
            ] {
                events.push(apply_fetched(&mut workflow, ticket, dataset, fetched));
            }
            drop(workflow);
            event_sink.emit_batch(events);
        });

        let mut pending = self.pending.lock().await;
        pending.retain(|_, h| !h.is_finished());
        if let Some(previous) = pending.insert(ticket.country_id, handle) {
            previous.abort();
        }
    }

    /// Adds resolved countries, skipping the receiver and existing sources.
    ///
    /// Returns the number of countries added.
    async fn add_sources(&self, countries: Vec<Country>, prefill: bool) -> Result<usize> {
        let tickets = {
            let mut workflow = self.workflow.write().await;
            let receiver_id = workflow
                .receiver()
                .map(|r| r.id)
                .ok_or(AssessmentError::NoReceiverCountry)?;

            let mut tickets = Vec::new();
            for country in countries {
                if country.id == receiver_id {
                    debug!("Skipping receiver {} in source selection", country.display_name);
                    continue;
                }
                if let Some(ticket) = workflow.add_source(country)? {
                    tickets.push(ticket);
                }
            }
            tickets
        };

        self.event_sink.emit_batch(
            tickets
                .iter()
                .map(|t| AssessmentEvent::SourceCountryAdded {
                    country_id: t.country_id,
                })
                .collect(),
        );
        if prefill {
            for ticket in &tickets {
                self.spawn_fetch(*ticket).await;
            }
        }
        Ok(tickets.len())
    }

    async fn group_members(&self, group_id: &str) -> Result<(Vec<Country>, bool)> {
        let (reason, lookup) = match self.directory.list_group_members(group_id).await {
            Ok(members) if !members.is_empty() => return Ok((members, false)),
            Ok(members) => ("empty member list".to_string(), Ok(members)),
            Err(e) => (e.to_string(), Err(e)),
        };

        let Some(names) = fallback_group_members(group_id) else {
            warn!("Failed to resolve country group '{}': {}", group_id, reason);
            return lookup.map(|members| (members, false));
        };
        warn!(
            "Failed to resolve country group '{}', using the static member list: {}",
            group_id, reason
        );

        let countries = self.directory.list_countries().await?;
        let members: Vec<Country> = countries
            .into_iter()
            .filter(|c| names.contains(&c.display_name.as_str()))
            .collect();
        self.event_sink
            .emit(AssessmentEvent::group_fallback_used(group_id, reason));
        Ok((members, true))
    }

    fn emit_stage_change(&self, from: WorkflowStage, to: WorkflowStage) {
        if from != to {
            self.event_sink
                .emit(AssessmentEvent::stage_changed(from, to));
        }
    }
}

/// Applies one fetched dataset to the workflow and describes the outcome.
fn apply_fetched(
    workflow: &mut AssessmentWorkflow,
    ticket: FetchTicket,
    dataset: Dataset,
    fetched: Result<DiseaseScoreSnapshot>,
) -> AssessmentEvent {
    match fetched {
        Ok(snapshot) => {
            let applied = match dataset {
                Dataset::DiseaseStatus => workflow.apply_disease_status(ticket, &snapshot),
                Dataset::MitigationMeasures => {
                    workflow.apply_mitigation_measures(ticket, &snapshot)
                }
                Dataset::Connections => {
                    warn!(
                        "Connections are never prefilled; ignoring snapshot for country {}",
                        ticket.country_id
                    );
                    false
                }
            };
            if applied {
                AssessmentEvent::SnapshotApplied {
                    country_id: ticket.country_id,
                    dataset,
                }
            } else {
                AssessmentEvent::StaleSnapshotDiscarded {
                    country_id: ticket.country_id,
                }
            }
        }
        Err(e) => {
            warn!(
                "Could not load stored {} for country {}: {}",
                dataset, ticket.country_id, e
            );
            AssessmentEvent::fetch_failed(ticket.country_id, dataset, e.to_string())
        }
    }
}

fn zero_filled_scores(rows: Vec<DiseaseScoreRow>) -> Vec<DiseaseScoreRow> {
    rows.into_iter()
        .map(|mut row| {
            for disease in Disease::ALL {
                row.scores.set(disease, Some(row.scores.get(disease).unwrap_or(0)));
            }
            row
        })
        .collect()
}

fn zero_filled_connections(rows: Vec<ConnectionRecord>) -> Vec<ConnectionRecord> {
    rows.into_iter()
        .map(|mut record| {
            for field in ConnectionField::ALL {
                record.set(field, Some(record.get(field).unwrap_or(0)));
            }
            record
        })
        .collect()
}

#[async_trait]
impl AssessmentServiceTrait for AssessmentService {
    /// Chooses the receiver. Changing it drops every source country.
    async fn select_receiver(&self, country_id: CountryId) -> Result<Country> {
        let country = self.find_country(country_id).await?;
        let changed = self.workflow.write().await.set_receiver(country.clone())?;
        if changed {
            self.abort_all_fetches().await;
            info!("Receiver country set to {}", country.display_name);
        }
        Ok(country)
    }

    /// Adds one source country and starts prefilling its records.
    ///
    /// Returns `false` when the country already is a source country.
    async fn add_source_country(&self, country_id: CountryId) -> Result<bool> {
        let country = self.find_country(country_id).await?;
        {
            let workflow = self.workflow.read().await;
            if workflow.receiver().map(|r| r.id) == Some(country_id) {
                return Err(AssessmentError::ReceiverAsSource(country_id).into());
            }
        }
        Ok(self.add_sources(vec![country], true).await? == 1)
    }

    /// Adds every member of a named country group.
    ///
    /// When the directory cannot resolve the group, the static member list is
    /// used and the records of those members start out empty.
    async fn add_country_group(&self, group_id: &str) -> Result<usize> {
        let (members, fallback) = self.group_members(group_id).await?;
        let added = self.add_sources(members, !fallback).await?;
        info!("Added {} countries from group '{}'", added, group_id);
        Ok(added)
    }

    async fn remove_source_country(&self, country_id: CountryId) -> Result<bool> {
        let removed = self.workflow.write().await.remove_source(country_id)?;
        if removed {
            self.abort_fetch(country_id).await;
            self.event_sink
                .emit(AssessmentEvent::SourceCountryRemoved { country_id });
        }
        Ok(removed)
    }

    async fn set_disease_status(
        &self,
        country_id: CountryId,
        disease: Disease,
        score: Option<u8>,
    ) -> Result<()> {
        self.workflow
            .write()
            .await
            .set_disease_status(country_id, disease, score)
    }

    async fn set_mitigation_measure(
        &self,
        country_id: CountryId,
        disease: Disease,
        score: Option<u8>,
    ) -> Result<()> {
        self.workflow
            .write()
            .await
            .set_mitigation_measure(country_id, disease, score)
    }

    async fn set_connection(
        &self,
        country_id: CountryId,
        field: ConnectionField,
        score: Option<u8>,
    ) -> Result<()> {
        self.workflow
            .write()
            .await
            .set_connection(country_id, field, score)
    }

    async fn current_stage(&self) -> WorkflowStage {
        self.workflow.read().await.current_stage()
    }

    async fn advance(&self) -> Result<WorkflowStage> {
        let mut workflow = self.workflow.write().await;
        let from = workflow.current_stage();
        let to = workflow.advance()?;
        drop(workflow);
        self.emit_stage_change(from, to);
        Ok(to)
    }

    async fn retreat(&self) -> Result<WorkflowStage> {
        let mut workflow = self.workflow.write().await;
        let from = workflow.current_stage();
        let to = workflow.retreat()?;
        drop(workflow);
        self.emit_stage_change(from, to);
        Ok(to)
    }

    async fn restart(&self) {
        self.abort_all_fetches().await;
        self.workflow.write().await.restart();
        self.event_sink.emit(AssessmentEvent::AssessmentRestarted);
    }

    /// Computes the risk scores and completes the assessment.
    async fn calculate(&self) -> Result<AssessmentReport> {
        // A completed assessment must always have a report.
        self.engine.weight_table()?;

        let submitted = self.workflow.write().await.submit(&self.engine)?;
        let assessment_id = Uuid::new_v4();
        let result_count = submitted.results.len();
        let report = self
            .engine
            .build_report(assessment_id, &submitted.input, submitted.results)?;

        self.emit_stage_change(WorkflowStage::Connections, WorkflowStage::Completed);
        self.event_sink.emit(AssessmentEvent::AssessmentCalculated {
            assessment_id,
            result_count,
        });
        Ok(report)
    }

    /// Persists the rows edited at the current stage with today's date.
    ///
    /// Returns the number of rows written; the pathway stage writes nothing.
    async fn save_current_stage(&self) -> Result<usize> {
        let (stage, status, mitigation, connections) = {
            let workflow = self.workflow.read().await;
            let stage = workflow.current_stage();
            workflow.validate_stage(stage)?;
            (
                stage,
                workflow.disease_status_rows(),
                workflow.mitigation_measure_rows(),
                workflow.connection_rows(),
            )
        };

        let date = Utc::now().date_naive();
        let saved = match stage {
            WorkflowStage::DiseaseStatus => {
                self.data_store
                    .save_disease_status(zero_filled_scores(status), date)
                    .await?
            }
            WorkflowStage::MitigationMeasures => {
                self.data_store
                    .save_mitigation_measures(zero_filled_scores(mitigation), date)
                    .await?
            }
            WorkflowStage::Connections => {
                self.data_store
                    .save_connections(zero_filled_connections(connections), date)
                    .await?
            }
            WorkflowStage::Pathways | WorkflowStage::Completed => 0,
        };
        debug!("Saved {} rows for the {} stage", saved, stage);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn snapshot(score: u8) -> DiseaseScoreSnapshot {
        DiseaseScoreSnapshot {
            date: None,
            scores: Disease::ALL.into_iter().map(|d| (d, Some(score))).collect(),
        }
    }

    fn workflow_with_source() -> (AssessmentWorkflow, FetchTicket) {
        let mut workflow = AssessmentWorkflow::new();
        workflow
            .set_receiver(Country::new(1, "AUT", "Austria"))
            .unwrap();
        let ticket = workflow
            .add_source(Country::new(2, "SRB", "Serbia"))
            .unwrap()
            .unwrap();
        (workflow, ticket)
    }

    #[test]
    fn test_apply_fetched_routes_each_dataset() {
        let (mut workflow, ticket) = workflow_with_source();

        let status = apply_fetched(&mut workflow, ticket, Dataset::DiseaseStatus, Ok(snapshot(3)));
        let mitigation = apply_fetched(
            &mut workflow,
            ticket,
            Dataset::MitigationMeasures,
            Ok(snapshot(1)),
        );

        assert_eq!(
            status,
            AssessmentEvent::SnapshotApplied {
                country_id: 2,
                dataset: Dataset::DiseaseStatus,
            }
        );
        assert!(matches!(mitigation, AssessmentEvent::SnapshotApplied { .. }));
        assert!(workflow
            .disease_status_records()
            .iter()
            .all(|r| r.score == Some(3)));
        assert!(workflow
            .mitigation_measure_records()
            .iter()
            .all(|r| r.score == Some(1)));
    }

    #[test]
    fn test_apply_fetched_reports_discarded_snapshot() {
        let (mut workflow, ticket) = workflow_with_source();
        workflow.remove_source(2).unwrap();
        workflow
            .add_source(Country::new(2, "SRB", "Serbia"))
            .unwrap();

        let event = apply_fetched(&mut workflow, ticket, Dataset::DiseaseStatus, Ok(snapshot(3)));

        assert_eq!(event, AssessmentEvent::StaleSnapshotDiscarded { country_id: 2 });
        assert!(workflow
            .disease_status_records()
            .iter()
            .all(|r| r.score.is_none()));
    }

    #[test]
    fn test_apply_fetched_never_prefills_connections() {
        let (mut workflow, ticket) = workflow_with_source();

        let event = apply_fetched(&mut workflow, ticket, Dataset::Connections, Ok(snapshot(3)));

        assert_eq!(event, AssessmentEvent::StaleSnapshotDiscarded { country_id: 2 });
        assert!(workflow
            .disease_status_records()
            .iter()
            .all(|r| r.score.is_none()));
    }

    #[test]
    fn test_apply_fetched_reports_failure() {
        let (mut workflow, ticket) = workflow_with_source();

        let event = apply_fetched(
            &mut workflow,
            ticket,
            Dataset::MitigationMeasures,
            Err(Error::Repository("timeout".to_string())),
        );

        assert!(matches!(
            event,
            AssessmentEvent::FetchFailed {
                country_id: 2,
                dataset: Dataset::MitigationMeasures,
                ..
            }
        ));
    }
}
