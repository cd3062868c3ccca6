//! Assessment module - input records, the stage workflow and its service.

mod assessment_errors;
mod assessment_model;
mod assessment_service;
mod assessment_traits;
mod assessment_workflow;

pub use assessment_errors::AssessmentError;
pub use assessment_model::*;
pub use assessment_service::AssessmentService;
pub use assessment_traits::{AssessmentDataStoreTrait, AssessmentServiceTrait};
pub use assessment_workflow::{AssessmentWorkflow, SubmittedAssessment, WorkflowState};


#[cfg(test)]
mod assessment_workflow_tests;
