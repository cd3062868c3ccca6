//! Country domain models.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a country by the country directory.
pub type CountryId = i64;

/// Reference entity describing a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: CountryId,
    pub iso3: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
}

impl Country {
    pub fn new(id: CountryId, iso3: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            iso3: iso3.into(),
            display_name: display_name.into(),
            subregion: None,
        }
    }

    pub fn with_subregion(mut self, subregion: impl Into<String>) -> Self {
        self.subregion = Some(subregion.into());
        self
    }
}
