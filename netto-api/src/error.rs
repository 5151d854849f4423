use netto_core::ValidationError;
use netto_core::models::ParameterError;
use thiserror::Error;

/// Everything a compute endpoint can fail with.
///
/// Validation failures identify the offending field and are raised before
/// any computation; parameter failures mean the requested tax year is not
/// available, never silently substituted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComputeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl ComputeError {
    /// Name of the offending request field, when one can be identified.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation(err) => err.field(),
            Self::Parameter(_) => None,
        }
    }
}
