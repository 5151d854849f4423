use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejection, raised before any computation starts.
///
/// A request that fails validation is never partially computed; the offending
/// field is carried in the error so callers can point at it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The municipality name did not match any entry in the rate table.
    /// Lookup is by exact name; there is no fallback municipality.
    #[error("unknown municipality: {0}")]
    UnknownMunicipality(String),

    /// An amount field (DKK, hours, km) was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A rate field was outside the fraction range [0, 1].
    #[error("{field} must be a fraction between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    /// The regime inputs do not combine into a well-formed request
    /// (e.g. both or neither of annual/monthly gross supplied, or an
    /// enrollment calendar whose month counts do not add up).
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl ValidationError {
    /// Name of the offending field, when one can be identified.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnknownMunicipality(_) => Some("kommune"),
            Self::NegativeAmount { field, .. } => Some(field),
            Self::RateOutOfRange { field, .. } => Some(field),
            Self::MalformedInput(_) => None,
        }
    }
}

/// Checks that an amount is non-negative.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

/// Checks that a rate is a fraction in [0, 1].
pub(crate) fn ensure_fraction(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ValidationError::RateOutOfRange { field, value });
    }
    Ok(())
}
