//! Unit tests for the assessment workflow.

use super::*;
use crate::countries::Country;
use crate::diseases::Disease;
use crate::errors::{Error, ValidationError};
use crate::risk::RiskEngine;
use chrono::NaiveDate;
use std::collections::BTreeMap;

// ============================================================================
// Helpers
// ============================================================================

fn country(id: i64, name: &str) -> Country {
    Country::new(id, &name[..3].to_uppercase(), name)
}

fn workflow_with_sources(ids: &[i64]) -> AssessmentWorkflow {
    let mut workflow = AssessmentWorkflow::new();
    workflow.set_receiver(country(1, "Austria")).unwrap();
    for id in ids {
        workflow
            .add_source(country(*id, &format!("Country{}", id)))
            .unwrap();
    }
    workflow
}

fn fill_disease_status(workflow: &mut AssessmentWorkflow, score: u8) {
    let ids: Vec<_> = workflow.source_countries().iter().map(|c| c.id).collect();
    for id in ids {
        for disease in Disease::ALL {
            workflow.set_disease_status(id, disease, Some(score)).unwrap();
        }
    }
}

fn fill_mitigation(workflow: &mut AssessmentWorkflow, score: u8) {
    let ids: Vec<_> = workflow.source_countries().iter().map(|c| c.id).collect();
    for id in ids {
        for disease in Disease::ALL {
            workflow
                .set_mitigation_measure(id, disease, Some(score))
                .unwrap();
        }
    }
}

fn fill_connections(workflow: &mut AssessmentWorkflow, score: u8) {
    let ids: Vec<_> = workflow.source_countries().iter().map(|c| c.id).collect();
    for id in ids {
        for field in ConnectionField::ALL {
            workflow.set_connection(id, field, Some(score)).unwrap();
        }
    }
}

/// Walks a workflow with complete data up to the Connections stage.
fn at_connections(ids: &[i64]) -> AssessmentWorkflow {
    let mut workflow = workflow_with_sources(ids);
    fill_disease_status(&mut workflow, 0);
    workflow.advance().unwrap();
    fill_mitigation(&mut workflow, 0);
    workflow.advance().unwrap();
    workflow.advance().unwrap();
    fill_connections(&mut workflow, 3);
    workflow
}

fn snapshot(scores: &[(Disease, Option<u8>)], date: Option<NaiveDate>) -> DiseaseScoreSnapshot {
    DiseaseScoreSnapshot {
        date,
        scores: scores.iter().copied().collect::<BTreeMap<_, _>>(),
    }
}

fn assessment_error(err: Error) -> AssessmentError {
    match err {
        Error::Assessment(inner) => inner,
        other => panic!("expected an assessment error, got {:?}", other),
    }
}

// ============================================================================
// Country selection
// ============================================================================

#[test]
fn test_new_workflow_cannot_advance() {
    let mut workflow = AssessmentWorkflow::new();
    assert_eq!(workflow.current_stage(), WorkflowStage::DiseaseStatus);
    assert!(!workflow.can_advance());
    assert_eq!(
        assessment_error(workflow.advance().unwrap_err()),
        AssessmentError::NoReceiverCountry
    );

    workflow.set_receiver(country(1, "Austria")).unwrap();
    assert_eq!(
        assessment_error(workflow.advance().unwrap_err()),
        AssessmentError::NoSourceCountries
    );
}

#[test]
fn test_add_source_requires_receiver() {
    let mut workflow = AssessmentWorkflow::new();
    let err = workflow.add_source(country(2, "Bulgaria")).unwrap_err();
    assert_eq!(assessment_error(err), AssessmentError::NoReceiverCountry);
}

#[test]
fn test_receiver_cannot_be_source() {
    let mut workflow = workflow_with_sources(&[]);
    let err = workflow.add_source(country(1, "Austria")).unwrap_err();
    assert_eq!(assessment_error(err), AssessmentError::ReceiverAsSource(1));
    assert!(workflow.source_countries().is_empty());
}

#[test]
fn test_adding_creates_one_empty_record_per_collection() {
    let mut workflow = workflow_with_sources(&[]);
    let ticket = workflow.add_source(country(2, "Bulgaria")).unwrap();
    assert!(ticket.is_some());

    assert_eq!(workflow.disease_status_rows().len(), 1);
    assert_eq!(workflow.mitigation_measure_rows().len(), 1);
    assert_eq!(workflow.connection_rows().len(), 1);
    assert_eq!(workflow.disease_status_records().len(), 5);
    assert!(workflow
        .mitigation_measure_records()
        .iter()
        .all(|r| r.score.is_none()));
    assert!(workflow.check_invariants().is_ok());
}

#[test]
fn test_duplicate_add_is_noop() {
    let mut workflow = workflow_with_sources(&[2]);
    workflow.set_disease_status(2, Disease::Fmd, Some(2)).unwrap();

    let ticket = workflow.add_source(country(2, "Country2")).unwrap();
    assert!(ticket.is_none());
    assert_eq!(workflow.source_countries().len(), 1);
    assert_eq!(workflow.disease_status_rows()[0].scores.get(Disease::Fmd), Some(2));
}

#[test]
fn test_changing_receiver_clears_sources() {
    let mut workflow = workflow_with_sources(&[2, 3]);
    assert!(!workflow.set_receiver(country(1, "Austria")).unwrap());
    assert_eq!(workflow.source_countries().len(), 2);

    assert!(workflow.set_receiver(country(2, "Bulgaria")).unwrap());
    assert!(workflow.source_countries().is_empty());
    assert!(workflow.connection_rows().is_empty());
    assert_eq!(workflow.receiver().map(|r| r.id), Some(2));
}

#[test]
fn test_sources_only_added_at_first_stage() {
    let mut workflow = workflow_with_sources(&[2]);
    fill_disease_status(&mut workflow, 1);
    workflow.advance().unwrap();

    let err = workflow.add_source(country(3, "Croatia")).unwrap_err();
    assert!(matches!(
        assessment_error(err),
        AssessmentError::InvalidTransition {
            from: WorkflowStage::MitigationMeasures,
            ..
        }
    ));
}

#[test]
fn test_remove_source_deletes_all_records() {
    let mut workflow = workflow_with_sources(&[2, 3]);
    fill_disease_status(&mut workflow, 1);

    assert!(workflow.remove_source(2).unwrap());
    assert!(!workflow.remove_source(2).unwrap());

    assert!(!workflow.is_source(2));
    assert!(workflow.disease_status_rows().iter().all(|r| r.country_id == 3));
    assert!(workflow.mitigation_measure_rows().iter().all(|r| r.country_id == 3));
    assert!(workflow.connection_rows().iter().all(|r| r.country_id == 3));
    assert!(workflow.check_invariants().is_ok());
}

// ============================================================================
// Fetched snapshots
// ============================================================================

#[test]
fn test_snapshot_fills_only_empty_fields() {
    let mut workflow = workflow_with_sources(&[]);
    let ticket = workflow.add_source(country(2, "Bulgaria")).unwrap().unwrap();
    workflow.set_disease_status(2, Disease::Fmd, Some(1)).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 5, 1);
    let applied = workflow.apply_disease_status(
        ticket,
        &snapshot(
            &[
                (Disease::Fmd, Some(3)),
                (Disease::Ppr, Some(2)),
                (Disease::Lsd, None),
                (Disease::Rvf, Some(9)),
            ],
            date,
        ),
    );
    assert!(applied);

    let scores = workflow.disease_status_rows()[0].scores;
    assert_eq!(scores.get(Disease::Fmd), Some(1));
    assert_eq!(scores.get(Disease::Ppr), Some(2));
    assert_eq!(scores.get(Disease::Lsd), None);
    assert_eq!(scores.get(Disease::Rvf), None);
    assert_eq!(workflow.dataset_dates().disease_status, date);
    assert_eq!(workflow.dataset_dates().mitigation_measures, None);
}

#[test]
fn test_stale_ticket_is_discarded_after_readd() {
    let mut workflow = workflow_with_sources(&[]);
    let first = workflow.add_source(country(2, "Bulgaria")).unwrap().unwrap();
    workflow.remove_source(2).unwrap();
    assert!(!workflow.is_current(first));

    let second = workflow.add_source(country(2, "Bulgaria")).unwrap().unwrap();
    assert_ne!(first, second);

    let late = snapshot(&[(Disease::Fmd, Some(3))], None);
    assert!(!workflow.apply_mitigation_measures(first, &late));
    assert_eq!(workflow.mitigation_measure_rows()[0].scores.get(Disease::Fmd), None);

    assert!(workflow.apply_mitigation_measures(second, &late));
    assert_eq!(
        workflow.mitigation_measure_rows()[0].scores.get(Disease::Fmd),
        Some(3)
    );
}

#[test]
fn test_restart_invalidates_outstanding_tickets() {
    let mut workflow = workflow_with_sources(&[]);
    let ticket = workflow.add_source(country(2, "Bulgaria")).unwrap().unwrap();
    workflow.restart();

    workflow.set_receiver(country(1, "Austria")).unwrap();
    let fresh = workflow.add_source(country(2, "Bulgaria")).unwrap().unwrap();
    assert!(!workflow.is_current(ticket));
    assert!(workflow.is_current(fresh));
}

// ============================================================================
// Edits and validation
// ============================================================================

#[test]
fn test_out_of_range_scores_are_rejected() {
    let mut workflow = workflow_with_sources(&[2]);

    let err = workflow
        .set_mitigation_measure(2, Disease::Lsd, Some(5))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::ScoreOutOfRange { value: 5, max: 4, .. })
    ));
    assert!(workflow.set_mitigation_measure(2, Disease::Lsd, Some(4)).is_ok());
    assert!(workflow.set_disease_status(2, Disease::Lsd, Some(4)).is_err());
    assert!(workflow
        .set_connection(2, ConnectionField::Proximity, Some(4))
        .is_err());
}

#[test]
fn test_edits_require_a_source_country() {
    let mut workflow = workflow_with_sources(&[2]);
    let err = workflow
        .set_disease_status(7, Disease::Fmd, Some(1))
        .unwrap_err();
    assert_eq!(assessment_error(err), AssessmentError::NotASourceCountry(7));
}

#[test]
fn test_next_rejected_until_every_score_is_entered() {
    let mut workflow = workflow_with_sources(&[2, 3]);
    fill_disease_status(&mut workflow, 2);
    workflow.set_disease_status(3, Disease::Spgp, None).unwrap();

    assert!(!workflow.can_advance());
    match assessment_error(workflow.advance().unwrap_err()) {
        AssessmentError::IncompleteInput { stage, missing } => {
            assert_eq!(stage, WorkflowStage::DiseaseStatus);
            assert_eq!(missing.len(), 1);
            assert_eq!(missing[0].country_id, 3);
            assert_eq!(missing[0].field, "SPGP");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(workflow.current_stage(), WorkflowStage::DiseaseStatus);

    workflow.set_disease_status(3, Disease::Spgp, Some(0)).unwrap();
    assert!(workflow.can_advance());
    assert_eq!(workflow.advance().unwrap(), WorkflowStage::MitigationMeasures);
}

#[test]
fn test_pathways_stage_needs_no_input() {
    let mut workflow = workflow_with_sources(&[2]);
    fill_disease_status(&mut workflow, 0);
    workflow.advance().unwrap();
    fill_mitigation(&mut workflow, 1);
    workflow.advance().unwrap();

    assert_eq!(workflow.current_stage(), WorkflowStage::Pathways);
    assert!(workflow.validate_stage(WorkflowStage::Pathways).is_ok());
    assert_eq!(workflow.advance().unwrap(), WorkflowStage::Connections);
}

#[test]
fn test_connections_need_all_six_fields() {
    let mut workflow = at_connections(&[2]);
    workflow
        .set_connection(2, ConnectionField::LivestockDensity, None)
        .unwrap();
    assert!(!workflow.can_submit());
    assert_eq!(workflow.missing_fields(WorkflowStage::Connections).len(), 1);

    assert_eq!(workflow.fill_empty_connections_with_zero().unwrap(), 1);
    assert_eq!(workflow.connection_rows()[0].livestock_density, Some(0));
    assert_eq!(workflow.connection_rows()[0].proximity, Some(3));
    assert!(workflow.can_submit());
}

#[test]
fn test_previous_keeps_entered_data() {
    let mut workflow = workflow_with_sources(&[2]);
    fill_disease_status(&mut workflow, 2);
    workflow.advance().unwrap();
    workflow.set_mitigation_measure(2, Disease::Fmd, Some(3)).unwrap();

    assert_eq!(workflow.retreat().unwrap(), WorkflowStage::DiseaseStatus);
    assert_eq!(workflow.disease_status_rows()[0].scores.get(Disease::Rvf), Some(2));
    assert_eq!(
        workflow.mitigation_measure_rows()[0].scores.get(Disease::Fmd),
        Some(3)
    );

    let err = workflow.retreat().unwrap_err();
    assert!(matches!(
        assessment_error(err),
        AssessmentError::InvalidTransition { .. }
    ));
}

#[test]
fn test_advance_stops_at_connections() {
    let mut workflow = at_connections(&[2]);
    let err = workflow.advance().unwrap_err();
    assert_eq!(
        assessment_error(err),
        AssessmentError::invalid_transition(WorkflowStage::Connections, "advance")
    );
}

// ============================================================================
// Submit and restart
// ============================================================================

#[test]
fn test_submit_only_from_connections() {
    let mut workflow = workflow_with_sources(&[2]);
    fill_disease_status(&mut workflow, 0);
    let err = workflow.submit(&RiskEngine::reference()).unwrap_err();
    assert_eq!(
        assessment_error(err),
        AssessmentError::invalid_transition(WorkflowStage::DiseaseStatus, "calculate")
    );
}

#[test]
fn test_submit_computes_fmd_scenario() {
    let mut workflow = at_connections(&[2]);
    workflow.set_disease_status(2, Disease::Fmd, Some(3)).unwrap();

    let submitted = workflow.submit(&RiskEngine::reference()).unwrap();
    assert_eq!(workflow.current_stage(), WorkflowStage::Completed);
    assert_eq!(submitted.results.len(), 5);
    assert_eq!(submitted.input.receiver.id, 1);

    let fmd = submitted
        .results
        .iter()
        .find(|r| r.disease == Disease::Fmd)
        .unwrap();
    assert_eq!(fmd.risk_score, 2);
    assert_eq!(workflow.results().map(|r| r.len()), Some(5));
}

#[test]
fn test_submit_rejects_gaps_in_earlier_stages() {
    let mut workflow = at_connections(&[2]);
    workflow.set_mitigation_measure(2, Disease::Ppr, None).unwrap();

    match assessment_error(workflow.submit(&RiskEngine::reference()).unwrap_err()) {
        AssessmentError::IncompleteInput { stage, .. } => {
            assert_eq!(stage, WorkflowStage::MitigationMeasures)
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(workflow.current_stage(), WorkflowStage::Connections);
}

#[test]
fn test_completed_assessment_is_locked() {
    let mut workflow = at_connections(&[2, 3]);
    workflow.submit(&RiskEngine::reference()).unwrap();

    let err = workflow
        .set_connection(2, ConnectionField::Proximity, Some(0))
        .unwrap_err();
    assert_eq!(assessment_error(err), AssessmentError::AssessmentLocked);
    assert!(workflow.remove_source(2).is_err());

    assert_eq!(workflow.retreat().unwrap(), WorkflowStage::Connections);
    assert!(workflow.results().is_none());
    assert!(workflow.remove_source(2).unwrap());
}

#[test]
fn test_removed_country_is_absent_from_results() {
    let mut workflow = at_connections(&[2, 3]);
    workflow.remove_source(2).unwrap();

    let submitted = workflow.submit(&RiskEngine::reference()).unwrap();
    assert_eq!(submitted.results.len(), 5);
    assert!(submitted.results.iter().all(|r| r.source_country_id == 3));
    assert!(submitted
        .input
        .connections
        .iter()
        .all(|r| r.country_id == 3));
}

#[test]
fn test_restart_discards_everything() {
    let mut workflow = at_connections(&[2, 3]);
    workflow.submit(&RiskEngine::reference()).unwrap();
    workflow.restart();

    assert_eq!(workflow.current_stage(), WorkflowStage::DiseaseStatus);
    assert!(workflow.receiver().is_none());
    assert!(workflow.source_countries().is_empty());
    assert!(workflow.disease_status_rows().is_empty());
    assert!(workflow.results().is_none());
    assert_eq!(workflow.dataset_dates(), DatasetDates::default());
}

#[test]
fn test_snapshot_requires_receiver() {
    let workflow = AssessmentWorkflow::new();
    assert!(workflow.snapshot().is_err());
}
