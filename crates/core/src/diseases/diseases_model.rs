//! Disease domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// A transboundary animal disease covered by the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Disease {
    /// Foot-and-mouth disease
    Fmd,
    /// Peste des petits ruminants
    Ppr,
    /// Lumpy skin disease
    Lsd,
    /// Rift Valley fever
    Rvf,
    /// Sheep pox and goat pox
    Spgp,
}

impl Disease {
    /// All assessed diseases, in reporting order.
    pub const ALL: [Disease; 5] = [
        Disease::Fmd,
        Disease::Ppr,
        Disease::Lsd,
        Disease::Rvf,
        Disease::Spgp,
    ];

    /// Returns the short code of this disease.
    pub fn as_str(&self) -> &'static str {
        match self {
            Disease::Fmd => "FMD",
            Disease::Ppr => "PPR",
            Disease::Lsd => "LSD",
            Disease::Rvf => "RVF",
            Disease::Spgp => "SPGP",
        }
    }

    /// Returns the full disease name.
    pub fn name(&self) -> &'static str {
        match self {
            Disease::Fmd => "Foot-and-mouth disease",
            Disease::Ppr => "Peste des petits ruminants",
            Disease::Lsd => "Lumpy skin disease",
            Disease::Rvf => "Rift Valley fever",
            Disease::Spgp => "Sheep pox and goat pox",
        }
    }

    fn index(&self) -> usize {
        match self {
            Disease::Fmd => 0,
            Disease::Ppr => 1,
            Disease::Lsd => 2,
            Disease::Rvf => 3,
            Disease::Spgp => 4,
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Disease {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Disease::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidInput(format!("Unknown disease '{}'", s)))
    }
}

/// One optional score per disease.
///
/// `None` means "not yet entered" and is distinct from `Some(0)`. Serialized
/// as a map keyed by disease code, e.g. `{"FMD": 2, "PPR": null, ...}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Disease, Option<u8>>",
    into = "BTreeMap<Disease, Option<u8>>"
)]
pub struct DiseaseScores([Option<u8>; 5]);

impl DiseaseScores {
    /// Creates a row where every disease is still unset.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, disease: Disease) -> Option<u8> {
        self.0[disease.index()]
    }

    pub fn set(&mut self, disease: Disease, score: Option<u8>) {
        self.0[disease.index()] = score;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disease, Option<u8>)> + '_ {
        Disease::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Diseases that still have no score.
    pub fn missing(&self) -> impl Iterator<Item = Disease> + '_ {
        self.iter().filter(|(_, s)| s.is_none()).map(|(d, _)| d)
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
}

impl From<BTreeMap<Disease, Option<u8>>> for DiseaseScores {
    fn from(map: BTreeMap<Disease, Option<u8>>) -> Self {
        let mut scores = DiseaseScores::empty();
        for (disease, score) in map {
            scores.set(disease, score);
        }
        scores
    }
}

impl From<DiseaseScores> for BTreeMap<Disease, Option<u8>> {
    fn from(scores: DiseaseScores) -> Self {
        scores.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_codes_round_trip_through_from_str() {
        for disease in Disease::ALL {
            assert_eq!(disease.as_str().parse::<Disease>().unwrap(), disease);
        }
        assert_eq!("spgp".parse::<Disease>().unwrap(), Disease::Spgp);
        assert!("ASF".parse::<Disease>().is_err());
    }

    #[test]
    fn test_null_is_distinct_from_zero() {
        let mut scores = DiseaseScores::empty();
        assert_eq!(scores.get(Disease::Fmd), None);

        scores.set(Disease::Fmd, Some(0));
        assert_eq!(scores.get(Disease::Fmd), Some(0));
        assert_eq!(scores.missing().count(), 4);
        assert!(!scores.is_complete());

        for disease in Disease::ALL {
            scores.set(disease, Some(1));
        }
        assert!(scores.is_complete());
    }

    #[test]
    fn test_scores_serialize_as_disease_map() {
        let mut scores = DiseaseScores::empty();
        scores.set(Disease::Lsd, Some(3));

        let json = serde_json::to_value(scores).unwrap();
        assert_eq!(json["LSD"], 3);
        assert!(json["FMD"].is_null());

        let parsed: DiseaseScores = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, scores);
    }
}
