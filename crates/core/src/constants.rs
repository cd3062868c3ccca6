/// Highest disease status score (high-level circulation in the source country)
pub const MAX_DISEASE_STATUS_SCORE: u8 = 3;

/// Highest mitigation measure score (all risks mitigated)
pub const MAX_MITIGATION_SCORE: u8 = 4;

/// Highest value of any bilateral connection factor
pub const MAX_CONNECTION_SCORE: u8 = 3;

/// Highest pathway transmission effectiveness score
pub const MAX_PATHWAY_EFFECTIVENESS: u8 = 3;

/// Upper bound of the composite risk score
pub const MAX_RISK_SCORE: u8 = 3;

/// Decimal places used for per-country summary values
pub const SUMMARY_DECIMAL_PLACES: i32 = 1;

/// Allowed deviation from 1.0 when validating a pathway weight vector
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;
