//! Diseases module - the fixed set of assessed diseases and per-disease score rows.

mod diseases_model;

pub use diseases_model::{Disease, DiseaseScores};
