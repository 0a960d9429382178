//! `vincheck-recon`: tolerant comparison of resolved vehicle records against
//! a reference dataset.
//!
//! Pure engine crate: receives pre-loaded records, returns verdicts and
//! summaries. No CLI or network dependencies.

pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reference;
pub mod summary;

pub use compare::compare;
pub use config::MatchConfig;
pub use engine::{extract_features, match_engine, EngineFeatures};
pub use error::ReconError;
pub use model::{
    ComparableField, ComparisonVerdict, EngineMatchDetail, FieldComparison, MatchSource,
    ReferenceRecord,
};
pub use normalize::normalize;
pub use reference::{load_reference_dataset, load_reference_file, ReferenceDataset, SkippedRecord};
pub use summary::{compute_summary, BatchSummary};
