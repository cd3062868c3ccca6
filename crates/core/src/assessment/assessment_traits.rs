use async_trait::async_trait;
use chrono::NaiveDate;

use super::assessment_model::{
    ConnectionField, ConnectionRecord, DiseaseScoreRow, DiseaseScoreSnapshot, WorkflowStage,
};
use crate::countries::{Country, CountryId};
use crate::diseases::Disease;
use crate::errors::Result;
use crate::risk::AssessmentReport;

/// Trait for the external store of per-country assessment records.
///
/// Reads may fail or time out; the workflow degrades to `None` values
/// rather than aborting.
#[async_trait]
pub trait AssessmentDataStoreTrait: Send + Sync {
    async fn latest_disease_status(&self, country_id: CountryId) -> Result<DiseaseScoreSnapshot>;
    async fn latest_mitigation_measures(
        &self,
        country_id: CountryId,
    ) -> Result<DiseaseScoreSnapshot>;
    async fn save_disease_status(&self, rows: Vec<DiseaseScoreRow>, date: NaiveDate)
        -> Result<usize>;
    async fn save_mitigation_measures(
        &self,
        rows: Vec<DiseaseScoreRow>,
        date: NaiveDate,
    ) -> Result<usize>;
    async fn save_connections(&self, rows: Vec<ConnectionRecord>, date: NaiveDate)
        -> Result<usize>;
}

/// Trait for assessment service operations
#[async_trait]
pub trait AssessmentServiceTrait: Send + Sync {
    async fn select_receiver(&self, country_id: CountryId) -> Result<Country>;
    async fn add_source_country(&self, country_id: CountryId) -> Result<bool>;
    async fn add_country_group(&self, group_id: &str) -> Result<usize>;
    async fn remove_source_country(&self, country_id: CountryId) -> Result<bool>;
    async fn set_disease_status(
        &self,
        country_id: CountryId,
        disease: Disease,
        score: Option<u8>,
    ) -> Result<()>;
    async fn set_mitigation_measure(
        &self,
        country_id: CountryId,
        disease: Disease,
        score: Option<u8>,
    ) -> Result<()>;
    async fn set_connection(
        &self,
        country_id: CountryId,
        field: ConnectionField,
        score: Option<u8>,
    ) -> Result<()>;
    async fn current_stage(&self) -> WorkflowStage;
    async fn advance(&self) -> Result<WorkflowStage>;
    async fn retreat(&self) -> Result<WorkflowStage>;
    async fn restart(&self);
    async fn calculate(&self) -> Result<AssessmentReport>;
    async fn save_current_stage(&self) -> Result<usize>;
}
