//! Pathways module - introduction pathways and the effectiveness reference matrix.

mod pathway_matrix;
mod pathways_model;

pub use pathway_matrix::PathwayMatrix;
pub use pathways_model::{
    Pathway, PathwayBreakdown, PathwayChartRow, PathwayEffectivenessEntry, PathwayScores,
    PathwayWeights,
};
