//! Pathway domain models.
//!
//! This module contains the six introduction pathways and the per-pathway
//! value containers shared by the engine, the decomposer and the aggregator:
//! - `PathwayWeights` - normalized weight vector used to split a risk score
//! - `PathwayBreakdown` - integer per-pathway contributions of one risk score
//! - `PathwayScores` - fractional per-pathway values (means, connection profile)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::WEIGHT_SUM_TOLERANCE;
use crate::diseases::Disease;
use crate::errors::{ConfigurationError, Result};

// =============================================================================
// Pathway
// =============================================================================

/// A biological or logistical route of disease introduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pathway {
    Airborne,
    Vectorborne,
    WildAnimals,
    AnimalProduct,
    LiveAnimal,
    Fomite,
}

impl Pathway {
    /// All pathways, in reporting order.
    pub const ALL: [Pathway; 6] = [
        Pathway::Airborne,
        Pathway::Vectorborne,
        Pathway::WildAnimals,
        Pathway::AnimalProduct,
        Pathway::LiveAnimal,
        Pathway::Fomite,
    ];

    /// Returns the serialized key of this pathway.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pathway::Airborne => "airborne",
            Pathway::Vectorborne => "vectorborne",
            Pathway::WildAnimals => "wildAnimals",
            Pathway::AnimalProduct => "animalProduct",
            Pathway::LiveAnimal => "liveAnimal",
            Pathway::Fomite => "fomite",
        }
    }

    /// Returns a human-friendly label for this pathway.
    pub fn label(&self) -> &'static str {
        match self {
            Pathway::Airborne => "Airborne",
            Pathway::Vectorborne => "Vector-borne",
            Pathway::WildAnimals => "Wild Animals",
            Pathway::AnimalProduct => "Animal Product",
            Pathway::LiveAnimal => "Live Animal",
            Pathway::Fomite => "Fomite",
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Effectiveness of one pathway for one disease (0 = not a route, 3 = highly effective).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayEffectivenessEntry {
    pub pathway: Pathway,
    pub disease: Disease,
    pub score: u8,
}

// =============================================================================
// Pathway Weights
// =============================================================================

/// Normalized weight per pathway. Weights are non-negative and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayWeights {
    pub airborne: f64,
    pub vectorborne: f64,
    pub wild_animals: f64,
    pub animal_product: f64,
    pub live_animal: f64,
    pub fomite: f64,
}

impl PathwayWeights {
    /// Reference split observed in the consuming reports.
    pub fn reference() -> Self {
        Self {
            airborne: 0.20,
            vectorborne: 0.15,
            wild_animals: 0.10,
            animal_product: 0.20,
            live_animal: 0.25,
            fomite: 0.10,
        }
    }

    /// Builds a weight vector from raw values, normalizing by their total.
    pub fn from_raw(values: [f64; 6]) -> Result<Self> {
        let total: f64 = values.iter().sum();
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) || total <= 0.0 {
            return Err(ConfigurationError::InvalidWeights(format!(
                "cannot normalize {:?}",
                values
            ))
            .into());
        }
        let [airborne, vectorborne, wild_animals, animal_product, live_animal, fomite] =
            values.map(|v| v / total);
        Ok(Self {
            airborne,
            vectorborne,
            wild_animals,
            animal_product,
            live_animal,
            fomite,
        })
    }

    pub fn get(&self, pathway: Pathway) -> f64 {
        match pathway {
            Pathway::Airborne => self.airborne,
            Pathway::Vectorborne => self.vectorborne,
            Pathway::WildAnimals => self.wild_animals,
            Pathway::AnimalProduct => self.animal_product,
            Pathway::LiveAnimal => self.live_animal,
            Pathway::Fomite => self.fomite,
        }
    }

    pub fn sum(&self) -> f64 {
        Pathway::ALL.iter().map(|p| self.get(*p)).sum()
    }

    /// Checks that every weight is non-negative and that they sum to 1.
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = Pathway::ALL
            .iter()
            .find(|p| !self.get(**p).is_finite() || self.get(**p) < 0.0)
        {
            return Err(ConfigurationError::InvalidWeights(format!(
                "weight for '{}' must be a non-negative number, got {}",
                p,
                self.get(*p)
            ))
            .into());
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::InvalidWeights(format!(
                "weights must sum to 1.0, got {}",
                sum
            ))
            .into());
        }
        Ok(())
    }
}

impl Default for PathwayWeights {
    fn default() -> Self {
        Self::reference()
    }
}

// =============================================================================
// Pathway Breakdown
// =============================================================================

/// Integer contribution of each pathway to one composite risk score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayBreakdown {
    pub airborne: u8,
    pub vectorborne: u8,
    pub wild_animals: u8,
    pub animal_product: u8,
    pub live_animal: u8,
    pub fomite: u8,
}

impl PathwayBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, pathway: Pathway) -> u8 {
        match pathway {
            Pathway::Airborne => self.airborne,
            Pathway::Vectorborne => self.vectorborne,
            Pathway::WildAnimals => self.wild_animals,
            Pathway::AnimalProduct => self.animal_product,
            Pathway::LiveAnimal => self.live_animal,
            Pathway::Fomite => self.fomite,
        }
    }

    pub fn set(&mut self, pathway: Pathway, value: u8) {
        match pathway {
            Pathway::Airborne => self.airborne = value,
            Pathway::Vectorborne => self.vectorborne = value,
            Pathway::WildAnimals => self.wild_animals = value,
            Pathway::AnimalProduct => self.animal_product = value,
            Pathway::LiveAnimal => self.live_animal = value,
            Pathway::Fomite => self.fomite = value,
        }
    }

    /// Sum of all six contributions.
    pub fn total(&self) -> u32 {
        Pathway::ALL.iter().map(|p| u32::from(self.get(*p))).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

// =============================================================================
// Pathway Scores
// =============================================================================

/// Fractional value per pathway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayScores {
    pub airborne: f64,
    pub vectorborne: f64,
    pub wild_animals: f64,
    pub animal_product: f64,
    pub live_animal: f64,
    pub fomite: f64,
}

impl PathwayScores {
    pub fn get(&self, pathway: Pathway) -> f64 {
        match pathway {
            Pathway::Airborne => self.airborne,
            Pathway::Vectorborne => self.vectorborne,
            Pathway::WildAnimals => self.wild_animals,
            Pathway::AnimalProduct => self.animal_product,
            Pathway::LiveAnimal => self.live_animal,
            Pathway::Fomite => self.fomite,
        }
    }

    pub fn set(&mut self, pathway: Pathway, value: f64) {
        match pathway {
            Pathway::Airborne => self.airborne = value,
            Pathway::Vectorborne => self.vectorborne = value,
            Pathway::WildAnimals => self.wild_animals = value,
            Pathway::AnimalProduct => self.animal_product = value,
            Pathway::LiveAnimal => self.live_animal = value,
            Pathway::Fomite => self.fomite = value,
        }
    }

    pub fn total(&self) -> f64 {
        Pathway::ALL.iter().map(|p| self.get(*p)).sum()
    }
}

/// One pathway with its effectiveness for every disease, for the reference stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayChartRow {
    pub pathway: Pathway,
    pub label: String,
    pub scores: Vec<(Disease, u8)>,
}
