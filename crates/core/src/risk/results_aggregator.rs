//! Reduces per-disease risk scores into per-country summaries.

use std::collections::BTreeMap;

use crate::constants::SUMMARY_DECIMAL_PLACES;
use crate::countries::CountryId;
use crate::diseases::Disease;
use crate::errors::{ConfigurationError, Result};
use crate::pathways::{Pathway, PathwayScores, PathwayWeights};
use crate::risk::pathway_decomposer::decompose_pathways;
use crate::risk::risk_config::RoundingMode;
use crate::risk::risk_model::{CountrySummary, RiskScoreResult, RiskTier};

/// Builds one summary per source country, in order of first appearance.
///
/// `weights` supplies the decomposition weights of every disease present in
/// `results`; `rounding` applies to the decomposition. Summary means are
/// always rounded half-up to one decimal.
pub fn aggregate_results(
    results: &[RiskScoreResult],
    weights: &BTreeMap<Disease, PathwayWeights>,
    rounding: RoundingMode,
) -> Result<Vec<CountrySummary>> {
    let mut order: Vec<CountryId> = Vec::new();
    let mut grouped: BTreeMap<CountryId, Vec<&RiskScoreResult>> = BTreeMap::new();
    for result in results {
        grouped
            .entry(result.source_country_id)
            .or_insert_with(|| {
                order.push(result.source_country_id);
                Vec::new()
            })
            .push(result);
    }

    let mut summaries = Vec::with_capacity(order.len());
    for country_id in order {
        let country_results = &grouped[&country_id];
        summaries.push(summarize_country(country_results, weights, rounding)?);
    }
    Ok(summaries)
}

fn summarize_country(
    results: &[&RiskScoreResult],
    weights: &BTreeMap<Disease, PathwayWeights>,
    rounding: RoundingMode,
) -> Result<CountrySummary> {
    let first = results[0];
    let count = results.len() as f64;

    let mut disease_scores = BTreeMap::new();
    let mut disease_pathways = BTreeMap::new();
    let mut pathway_totals = PathwayScores::default();
    let mut score_total = 0.0;

    for result in results {
        let disease_weights = weights.get(&result.disease).ok_or_else(|| {
            ConfigurationError::InvalidWeights(format!(
                "no pathway weights configured for {}",
                result.disease
            ))
        })?;
        let breakdown = decompose_pathways(result, disease_weights, rounding);
        for pathway in Pathway::ALL {
            let total = pathway_totals.get(pathway) + f64::from(breakdown.get(pathway));
            pathway_totals.set(pathway, total);
        }
        score_total += f64::from(result.risk_score);
        disease_scores.insert(result.disease, result.risk_score);
        disease_pathways.insert(result.disease, breakdown);
    }

    let mut pathway_scores = PathwayScores::default();
    for pathway in Pathway::ALL {
        pathway_scores.set(pathway, summary_round(pathway_totals.get(pathway) / count));
    }

    let overall_score = summary_round(score_total / count);

    Ok(CountrySummary {
        country_id: first.source_country_id,
        country_name: first.source_country.clone(),
        disease_scores,
        overall_score,
        tier: RiskTier::classify(overall_score),
        pathway_scores,
        disease_pathways,
    })
}

fn summary_round(value: f64) -> f64 {
    RoundingMode::HalfUp.round_to(value, SUMMARY_DECIMAL_PLACES)
}
