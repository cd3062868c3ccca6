//! Calibration parameters of the risk model.
//!
//! The defaults reproduce the reference composition. Every constant lives
//! here so a calibration pass can adjust values without touching the
//! algorithm.

use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_CONNECTION_SCORE, MAX_MITIGATION_SCORE, MAX_PATHWAY_EFFECTIVENESS, MAX_RISK_SCORE,
};
use crate::errors::{ConfigurationError, Result};
use crate::pathways::PathwayWeights;

/// How fractional values are rounded to integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundingMode {
    /// Ties round up (1.5 -> 2, 2.5 -> 3).
    #[default]
    HalfUp,
    /// Ties round to the even neighbour (1.5 -> 2, 2.5 -> 2).
    HalfEven,
}

impl RoundingMode {
    /// Rounds a non-negative value to an integer.
    pub fn round(&self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfUp => value.round(),
            RoundingMode::HalfEven => value.round_ties_even(),
        }
    }

    /// Rounds a non-negative value to `places` decimal places.
    pub fn round_to(&self, value: f64, places: i32) -> f64 {
        let factor = 10f64.powi(places);
        self.round(value * factor) / factor
    }
}

/// Source of the weight vector used to split a risk score across pathways.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PathwayWeighting {
    /// The same weights for every disease.
    Fixed { weights: PathwayWeights },
    /// Each pathway's share of the disease's total effectiveness in the matrix.
    MatrixShare,
}

impl Default for PathwayWeighting {
    fn default() -> Self {
        PathwayWeighting::Fixed {
            weights: PathwayWeights::reference(),
        }
    }
}

/// Parameters of the composite risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskModelConfig {
    /// Mitigation score at which all risk is mitigated (default: 4)
    pub mitigation_scale: f64,

    /// Divisor normalizing the mean pathway effectiveness (default: 3)
    pub pathway_scale: f64,

    /// Divisor normalizing the mean connection strength (default: 3)
    pub connection_scale: f64,

    /// Lowest composite risk score (default: 0)
    pub min_risk_score: u8,

    /// Highest composite risk score (default: 3)
    pub max_risk_score: u8,

    /// Rounding applied to risk scores and pathway contributions
    pub rounding: RoundingMode,

    /// Weights used by the pathway decomposition
    pub pathway_weighting: PathwayWeighting,
}

impl Default for RiskModelConfig {
    fn default() -> Self {
        Self {
            mitigation_scale: f64::from(MAX_MITIGATION_SCORE),
            pathway_scale: f64::from(MAX_PATHWAY_EFFECTIVENESS),
            connection_scale: f64::from(MAX_CONNECTION_SCORE),
            min_risk_score: 0,
            max_risk_score: MAX_RISK_SCORE,
            rounding: RoundingMode::HalfUp,
            pathway_weighting: PathwayWeighting::default(),
        }
    }
}

impl RiskModelConfig {
    /// Parses and validates a JSON configuration. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RiskModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("mitigationScale", self.mitigation_scale),
            ("pathwayScale", self.pathway_scale),
            ("connectionScale", self.connection_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::InvalidParameter(format!(
                    "{} must be a positive number, got {}",
                    name, value
                ))
                .into());
            }
        }
        if self.min_risk_score > self.max_risk_score {
            return Err(ConfigurationError::InvalidParameter(format!(
                "minRiskScore {} exceeds maxRiskScore {}",
                self.min_risk_score, self.max_risk_score
            ))
            .into());
        }
        if let PathwayWeighting::Fixed { weights } = &self.pathway_weighting {
            weights.validate()?;
        }
        Ok(())
    }

    /// Residual risk left by a mitigation score, in `[0, 1]`.
    pub fn mitigation_factor(&self, mitigation_score: u8) -> f64 {
        ((self.mitigation_scale - f64::from(mitigation_score)) / self.mitigation_scale)
            .clamp(0.0, 1.0)
    }

    /// Clamps a raw composite value into the score range and rounds it.
    pub fn to_risk_score(&self, raw: f64) -> u8 {
        if !raw.is_finite() {
            return self.min_risk_score;
        }
        let clamped = raw.clamp(
            f64::from(self.min_risk_score),
            f64::from(self.max_risk_score),
        );
        self.rounding.round(clamped) as u8
    }
}
