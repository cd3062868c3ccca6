use crate::countries::countries_model::Country;
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for the external country directory.
///
/// Both calls are fallible; callers decide how to degrade when they fail.
#[async_trait]
pub trait CountryDirectoryTrait: Send + Sync {
    async fn list_countries(&self) -> Result<Vec<Country>>;
    async fn list_group_members(&self, group_id: &str) -> Result<Vec<Country>>;
}
