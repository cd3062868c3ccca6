use crate::pathways::{Pathway, PathwayBreakdown, PathwayWeights};
use crate::risk::risk_config::RoundingMode;
use crate::risk::risk_model::RiskScoreResult;

/// Splits a composite risk score into per-pathway contributions.
///
/// Each contribution is `round(riskScore * weight)`, rounded independently, so
/// the six values sum to the risk score within ±1. A zero score always yields
/// an all-zero breakdown.
pub fn decompose_pathways(
    result: &RiskScoreResult,
    weights: &PathwayWeights,
    rounding: RoundingMode,
) -> PathwayBreakdown {
    let mut breakdown = PathwayBreakdown::zero();
    if result.risk_score == 0 {
        return breakdown;
    }

    let risk_score = f64::from(result.risk_score);
    for pathway in Pathway::ALL {
        let share = rounding.round(risk_score * weights.get(pathway).max(0.0));
        breakdown.set(pathway, share as u8);
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diseases::Disease;

    fn result(risk_score: u8) -> RiskScoreResult {
        RiskScoreResult {
            source_country_id: 2,
            source_country: "CountryY".to_string(),
            disease: Disease::Fmd,
            risk_score,
            disease_risk: 3,
            pathway_score: 10.0 / 6.0,
            connection_strength: 3.0,
        }
    }

    #[test]
    fn test_zero_score_gives_zero_breakdown() {
        let breakdown = decompose_pathways(
            &result(0),
            &PathwayWeights::reference(),
            RoundingMode::HalfUp,
        );
        assert!(breakdown.is_zero());
    }

    #[test]
    fn test_reference_split_of_two() {
        // 2 * [0.2, 0.15, 0.1, 0.2, 0.25, 0.1] = [0.4, 0.3, 0.2, 0.4, 0.5, 0.2]
        let breakdown = decompose_pathways(
            &result(2),
            &PathwayWeights::reference(),
            RoundingMode::HalfUp,
        );
        assert_eq!(breakdown.live_animal, 1);
        assert_eq!(breakdown.airborne, 0);
        assert_eq!(breakdown.total(), 1);
    }

    #[test]
    fn test_reference_split_of_three() {
        // 3 * weights = [0.6, 0.45, 0.3, 0.6, 0.75, 0.3]
        let breakdown = decompose_pathways(
            &result(3),
            &PathwayWeights::reference(),
            RoundingMode::HalfUp,
        );
        assert_eq!(breakdown.airborne, 1);
        assert_eq!(breakdown.vectorborne, 0);
        assert_eq!(breakdown.animal_product, 1);
        assert_eq!(breakdown.live_animal, 1);
        assert_eq!(breakdown.total(), 3);
    }

    #[test]
    fn test_half_even_rounds_ties_down() {
        let breakdown = decompose_pathways(
            &result(2),
            &PathwayWeights::reference(),
            RoundingMode::HalfEven,
        );
        assert_eq!(breakdown.live_animal, 0);
        assert!(breakdown.is_zero());
    }

    #[test]
    fn test_single_pathway_weight_takes_full_score() {
        let weights = PathwayWeights::from_raw([0.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
        let breakdown = decompose_pathways(&result(3), &weights, RoundingMode::HalfUp);
        assert_eq!(breakdown.live_animal, 3);
        assert_eq!(breakdown.total(), 3);
    }
}
