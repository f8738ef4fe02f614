//! ---
//! rw_section: "08-energy-models-optimization"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Error taxonomy for the calculation layer."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalcError>;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("invalid configuration: {field} must be a finite, non-negative number (got {value})")]
    InvalidConfiguration { field: &'static str, value: f64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
