//! Risk scoring domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::assessment::{ConnectionRecord, DiseaseScoreRow};
use crate::countries::{Country, CountryId};
use crate::diseases::Disease;
use crate::pathways::{PathwayBreakdown, PathwayScores};

/// Immutable snapshot of everything the engine needs for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessmentInput {
    pub receiver: Country,
    pub source_countries: Vec<Country>,
    pub disease_status: Vec<DiseaseScoreRow>,
    pub mitigation_measures: Vec<DiseaseScoreRow>,
    pub connections: Vec<ConnectionRecord>,
}

/// Composite introduction risk for one (source country, disease) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScoreResult {
    pub source_country_id: CountryId,
    pub source_country: String,
    pub disease: Disease,
    /// Composite score in `0..=3`
    pub risk_score: u8,
    /// Disease status score used as the severity basis
    pub disease_risk: u8,
    /// Mean pathway effectiveness for the disease, in `[0, 3]`
    pub pathway_score: f64,
    /// Mean connection factor for the source country, in `[0, 3]`
    pub connection_strength: f64,
}

// =============================================================================
// Risk Tier
// =============================================================================

/// Ordered risk tiers used by the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTier {
    Low,
    LowMedium,
    MediumHigh,
    High,
}

impl RiskTier {
    /// Classifies a score: `0` low, `(0,1]` low-medium, `(1,2]` medium-high, above 2 high.
    pub fn classify(score: f64) -> Self {
        if score <= 0.0 {
            RiskTier::Low
        } else if score <= 1.0 {
            RiskTier::LowMedium
        } else if score <= 2.0 {
            RiskTier::MediumHigh
        } else {
            RiskTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::LowMedium => "low-medium",
            RiskTier::MediumHigh => "medium-high",
            RiskTier::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low risk",
            RiskTier::LowMedium => "Low-medium risk",
            RiskTier::MediumHigh => "Medium-high risk",
            RiskTier::High => "High risk",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Per-country reduction of the risk scores, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub country_id: CountryId,
    pub country_name: String,
    /// Risk score per disease
    pub disease_scores: BTreeMap<Disease, u8>,
    /// Mean risk score across diseases, one decimal
    pub overall_score: f64,
    pub tier: RiskTier,
    /// Mean pathway contribution across diseases, one decimal
    pub pathway_scores: PathwayScores,
    /// Pathway contributions per disease
    pub disease_pathways: BTreeMap<Disease, PathwayBreakdown>,
}

/// Everything produced by one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub assessment_id: Uuid,
    pub receiver: Country,
    pub calculated_at: DateTime<Utc>,
    pub results: Vec<RiskScoreResult>,
    pub summaries: Vec<CountrySummary>,
    /// Per-pathway connection scores of each source country
    pub connection_profiles: BTreeMap<CountryId, PathwayScores>,
}

impl AssessmentReport {
    /// Summary of a single source country.
    pub fn summary_for(&self, country_id: CountryId) -> Option<&CountrySummary> {
        self.summaries.iter().find(|s| s.country_id == country_id)
    }

    /// Results of a single disease, in source country order.
    pub fn results_for_disease(&self, disease: Disease) -> impl Iterator<Item = &RiskScoreResult> {
        self.results.iter().filter(move |r| r.disease == disease)
    }
}
