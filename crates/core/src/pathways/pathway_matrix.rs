//! Static pathway transmission effectiveness matrix.

use log::error;
use std::collections::BTreeMap;

use super::pathways_model::{Pathway, PathwayChartRow, PathwayEffectivenessEntry, PathwayWeights};
use crate::constants::MAX_PATHWAY_EFFECTIVENESS;
use crate::diseases::Disease;
use crate::errors::{ConfigurationError, Result};

/// Reference effectiveness per pathway, columns in `Disease::ALL` order
/// (FMD, PPR, LSD, RVF, SPGP).
const REFERENCE_EFFECTIVENESS: [(Pathway, [u8; 5]); 6] = [
    (Pathway::Airborne, [2, 0, 0, 0, 0]),
    (Pathway::Vectorborne, [0, 0, 3, 3, 1]),
    (Pathway::WildAnimals, [1, 2, 0, 1, 0]),
    (Pathway::AnimalProduct, [2, 0, 1, 2, 1]),
    (Pathway::LiveAnimal, [3, 3, 3, 3, 3]),
    (Pathway::Fomite, [2, 2, 1, 0, 2]),
];

/// Effectiveness of each pathway for each disease.
///
/// Immutable once built. Lookups for a missing (pathway, disease) pair fail
/// with a configuration error instead of defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayMatrix {
    entries: BTreeMap<(Pathway, Disease), u8>,
}

impl PathwayMatrix {
    /// The reference matrix shipped with the tool.
    pub fn reference() -> Self {
        let entries = REFERENCE_EFFECTIVENESS
            .iter()
            .flat_map(|(pathway, scores)| {
                Disease::ALL
                    .iter()
                    .zip(scores.iter())
                    .map(move |(disease, score)| ((*pathway, *disease), *score))
            })
            .collect();
        Self { entries }
    }

    /// Builds a matrix from explicit entries.
    ///
    /// Rejects out-of-range scores and duplicate pairs. Missing pairs are
    /// allowed here and reported when a computation needs them.
    pub fn from_entries(entries: impl IntoIterator<Item = PathwayEffectivenessEntry>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.score > MAX_PATHWAY_EFFECTIVENESS {
                return Err(ConfigurationError::EffectivenessOutOfRange {
                    pathway: entry.pathway,
                    disease: entry.disease,
                    score: entry.score,
                    max: MAX_PATHWAY_EFFECTIVENESS,
                }
                .into());
            }
            if map.insert((entry.pathway, entry.disease), entry.score).is_some() {
                return Err(ConfigurationError::DuplicatePathwayEntry {
                    pathway: entry.pathway,
                    disease: entry.disease,
                }
                .into());
            }
        }
        Ok(Self { entries: map })
    }

    /// Parses a JSON list of `PathwayEffectivenessEntry`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<PathwayEffectivenessEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    pub fn score(&self, pathway: Pathway, disease: Disease) -> Result<u8> {
        self.entries.get(&(pathway, disease)).copied().ok_or_else(|| {
            error!(
                "Pathway matrix is missing the entry for {} / {}",
                pathway, disease
            );
            ConfigurationError::MissingPathwayEntry { pathway, disease }.into()
        })
    }

    /// The six effectiveness values for a disease, in `Pathway::ALL` order.
    pub fn disease_column(&self, disease: Disease) -> Result<[u8; 6]> {
        let mut column = [0u8; 6];
        for (slot, pathway) in column.iter_mut().zip(Pathway::ALL) {
            *slot = self.score(pathway, disease)?;
        }
        Ok(column)
    }

    /// Mean effectiveness over the six pathways for a disease, in `[0, 3]`.
    pub fn pathway_score(&self, disease: Disease) -> Result<f64> {
        let column = self.disease_column(disease)?;
        let total: u32 = column.iter().map(|s| u32::from(*s)).sum();
        Ok(f64::from(total) / column.len() as f64)
    }

    /// Share of total effectiveness carried by each pathway for a disease.
    pub fn share_weights(&self, disease: Disease) -> Result<PathwayWeights> {
        let column = self.disease_column(disease)?;
        PathwayWeights::from_raw(column.map(f64::from)).map_err(|_| {
            ConfigurationError::InvalidWeights(format!(
                "every pathway has zero effectiveness for {}",
                disease
            ))
            .into()
        })
    }

    pub fn entries(&self) -> Vec<PathwayEffectivenessEntry> {
        self.entries
            .iter()
            .map(|((pathway, disease), score)| PathwayEffectivenessEntry {
                pathway: *pathway,
                disease: *disease,
                score: *score,
            })
            .collect()
    }

    /// One row per pathway with the diseases it has entries for.
    pub fn rows(&self) -> Vec<PathwayChartRow> {
        Pathway::ALL
            .iter()
            .map(|pathway| PathwayChartRow {
                pathway: *pathway,
                label: pathway.label().to_string(),
                scores: Disease::ALL
                    .iter()
                    .filter_map(|d| self.entries.get(&(*pathway, *d)).map(|s| (*d, *s)))
                    .collect(),
            })
            .collect()
    }
}

impl Default for PathwayMatrix {
    fn default() -> Self {
        Self::reference()
    }
}
