//! Risk module - composite scoring, pathway decomposition and aggregation.

mod connection_pathways;
mod pathway_decomposer;
mod results_aggregator;
mod risk_calculator;
mod risk_config;
mod risk_engine;
mod risk_model;

pub use connection_pathways::connection_scores_per_pathway;
pub use pathway_decomposer::decompose_pathways;
pub use results_aggregator::aggregate_results;
pub use risk_calculator::{compute_risk_scores, connection_strength, rank_by_risk};
pub use risk_config::{PathwayWeighting, RiskModelConfig, RoundingMode};
pub use risk_engine::RiskEngine;
pub use risk_model::{
    AssessmentReport, CountrySummary, RiskAssessmentInput, RiskScoreResult, RiskTier,
};
