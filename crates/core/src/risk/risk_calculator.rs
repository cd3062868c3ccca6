use crate::assessment::ConnectionRecord;
use crate::constants::{MAX_CONNECTION_SCORE, MAX_DISEASE_STATUS_SCORE};
use crate::countries::CountryId;
use crate::diseases::{Disease, DiseaseScores};
use crate::errors::Result;
use crate::pathways::PathwayMatrix;
use crate::risk::risk_config::RiskModelConfig;
use crate::risk::risk_model::{RiskAssessmentInput, RiskScoreResult};

use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Computes one composite risk score per (source country, disease) pair.
///
/// For each pair:
/// `round(diseaseRisk * mitigationFactor * (pathwayScore / 3) * (connectionStrength / 3))`,
/// clamped to the configured score range. `None` inputs count as 0; the
/// workflow's validation gate is responsible for completeness.
///
/// Pure and deterministic: identical inputs give identical output. Fails with
/// a configuration error when the matrix lacks an entry for any assessed
/// disease, before any result is produced.
///
/// # Arguments
///
/// * `input` - Snapshot of the receiver, the selected source countries and their records.
/// * `matrix` - Pathway effectiveness reference data.
/// * `config` - Model parameters.
///
pub fn compute_risk_scores(
    input: &RiskAssessmentInput,
    matrix: &PathwayMatrix,
    config: &RiskModelConfig,
) -> Result<Vec<RiskScoreResult>> {
    let pathway_scores = Disease::ALL
        .iter()
        .map(|d| matrix.pathway_score(*d).map(|score| (*d, score)))
        .collect::<Result<BTreeMap<Disease, f64>>>()?;

    let disease_status: HashMap<CountryId, DiseaseScores> = input
        .disease_status
        .iter()
        .map(|row| (row.country_id, row.scores))
        .collect();
    let mitigation_measures: HashMap<CountryId, DiseaseScores> = input
        .mitigation_measures
        .iter()
        .map(|row| (row.country_id, row.scores))
        .collect();
    let connections: HashMap<CountryId, &ConnectionRecord> = input
        .connections
        .iter()
        .map(|record| (record.country_id, record))
        .collect();

    let mut results = Vec::with_capacity(input.source_countries.len() * Disease::ALL.len());

    for country in &input.source_countries {
        if country.id == input.receiver.id {
            warn!(
                "Skipping receiver country {} listed as a source country",
                country.display_name
            );
            continue;
        }

        let status = disease_status.get(&country.id).copied().unwrap_or_default();
        let mitigation = mitigation_measures
            .get(&country.id)
            .copied()
            .unwrap_or_default();
        let connection_strength = connection_strength(connections.get(&country.id).copied());

        for disease in Disease::ALL {
            let disease_risk = status.get(disease).unwrap_or(0).min(MAX_DISEASE_STATUS_SCORE);
            let mitigation_factor = config.mitigation_factor(mitigation.get(disease).unwrap_or(0));
            let pathway_score = pathway_scores[&disease];

            let raw = f64::from(disease_risk)
                * mitigation_factor
                * (pathway_score / config.pathway_scale)
                * (connection_strength / config.connection_scale);

            results.push(RiskScoreResult {
                source_country_id: country.id,
                source_country: country.display_name.clone(),
                disease,
                risk_score: config.to_risk_score(raw),
                disease_risk,
                pathway_score,
                connection_strength,
            });
        }
    }

    debug!(
        "Computed {} risk scores for receiver {} across {} source countries",
        results.len(),
        input.receiver.display_name,
        input.source_countries.len()
    );

    Ok(results)
}

/// Mean of the six connection factors, `None` counted as 0.
pub fn connection_strength(record: Option<&ConnectionRecord>) -> f64 {
    let Some(record) = record else {
        return 0.0;
    };
    let values = record.values();
    let total: u32 = values
        .iter()
        .map(|v| u32::from(v.unwrap_or(0).min(MAX_CONNECTION_SCORE)))
        .sum();
    f64::from(total) / values.len() as f64
}

/// Orders results by descending risk score. Ties keep their input order.
pub fn rank_by_risk(results: &mut [RiskScoreResult]) {
    results.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
}
