//! Risk engine facade.
//!
//! Bundles the pathway matrix with the model configuration so callers get a
//! single, immutable, shareable handle on the scoring functions.

use chrono::Utc;
use log::info;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::assessment::ConnectionRecord;
use crate::countries::CountryId;
use crate::diseases::Disease;
use crate::errors::Result;
use crate::pathways::{PathwayBreakdown, PathwayMatrix, PathwayScores, PathwayWeights};
use crate::risk::connection_pathways::connection_scores_per_pathway;
use crate::risk::pathway_decomposer;
use crate::risk::results_aggregator;
use crate::risk::risk_calculator;
use crate::risk::risk_config::{PathwayWeighting, RiskModelConfig};
use crate::risk::risk_model::{
    AssessmentReport, CountrySummary, RiskAssessmentInput, RiskScoreResult,
};

/// Pure scoring engine. Safe to share across threads and call concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskEngine {
    matrix: PathwayMatrix,
    config: RiskModelConfig,
}

impl RiskEngine {
    /// Creates an engine after validating the configuration.
    pub fn new(matrix: PathwayMatrix, config: RiskModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { matrix, config })
    }

    /// Engine with the reference matrix and default parameters.
    pub fn reference() -> Self {
        Self {
            matrix: PathwayMatrix::reference(),
            config: RiskModelConfig::default(),
        }
    }

    pub fn matrix(&self) -> &PathwayMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &RiskModelConfig {
        &self.config
    }

    pub fn compute_risk_scores(&self, input: &RiskAssessmentInput) -> Result<Vec<RiskScoreResult>> {
        risk_calculator::compute_risk_scores(input, &self.matrix, &self.config)
    }

    /// Decomposition weights for a disease under the configured weighting.
    pub fn pathway_weights(&self, disease: Disease) -> Result<PathwayWeights> {
        match &self.config.pathway_weighting {
            PathwayWeighting::Fixed { weights } => Ok(*weights),
            PathwayWeighting::MatrixShare => self.matrix.share_weights(disease),
        }
    }

    pub fn weight_table(&self) -> Result<BTreeMap<Disease, PathwayWeights>> {
        Disease::ALL
            .iter()
            .map(|d| self.pathway_weights(*d).map(|w| (*d, w)))
            .collect()
    }

    pub fn decompose_pathways(&self, result: &RiskScoreResult) -> Result<PathwayBreakdown> {
        let weights = self.pathway_weights(result.disease)?;
        Ok(pathway_decomposer::decompose_pathways(
            result,
            &weights,
            self.config.rounding,
        ))
    }

    pub fn aggregate_results(&self, results: &[RiskScoreResult]) -> Result<Vec<CountrySummary>> {
        results_aggregator::aggregate_results(results, &self.weight_table()?, self.config.rounding)
    }

    /// Per-pathway connection scores of every source country in the input.
    pub fn connection_profiles(
        &self,
        input: &RiskAssessmentInput,
    ) -> BTreeMap<CountryId, PathwayScores> {
        input
            .source_countries
            .iter()
            .filter(|c| c.id != input.receiver.id)
            .map(|country| {
                let record = input
                    .connections
                    .iter()
                    .find(|r| r.country_id == country.id)
                    .copied()
                    .unwrap_or_else(|| ConnectionRecord::empty(country.id));
                (country.id, connection_scores_per_pathway(&record))
            })
            .collect()
    }

    /// Packages already computed results with their summaries.
    pub fn build_report(
        &self,
        assessment_id: Uuid,
        input: &RiskAssessmentInput,
        results: Vec<RiskScoreResult>,
    ) -> Result<AssessmentReport> {
        let summaries = self.aggregate_results(&results)?;
        let connection_profiles = self.connection_profiles(input);

        info!(
            "Assessment {} for {}: {} results over {} source countries",
            assessment_id,
            input.receiver.display_name,
            results.len(),
            summaries.len()
        );

        Ok(AssessmentReport {
            assessment_id,
            receiver: input.receiver.clone(),
            calculated_at: Utc::now(),
            results,
            summaries,
            connection_profiles,
        })
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::reference()
    }
}
