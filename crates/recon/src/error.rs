use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// The reference dataset is not valid JSON.
    #[error("reference dataset parse error: {0}")]
    DatasetParse(String),

    /// The reference dataset parsed, but is not an object keyed by VIN.
    #[error("reference dataset must be a JSON object keyed by VIN (found {found})")]
    DatasetShape { found: &'static str },

    #[error("displacement tolerance must be a finite, non-negative number of liters (got {0})")]
    InvalidTolerance(f64),

    #[error("IO error: {0}")]
    Io(String),
}
