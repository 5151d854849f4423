//! Versioned Danish tax datasets: the national parameter constants per tax
//! year plus the per-municipality rate table, ready to activate in a
//! [`netto_core::ParameterStore`].

pub mod municipalities;
pub mod year2026;

pub use municipalities::{MunicipalityLoader, MunicipalityLoaderError, MunicipalityRecord};
pub use year2026::parameter_set_2026;

use netto_core::{MunicipalityTable, TaxParameterSet};

/// The complete bundled 2026 dataset: parameter set and municipality table.
pub fn bundle_2026() -> Result<(TaxParameterSet, MunicipalityTable), MunicipalityLoaderError> {
    Ok((parameter_set_2026(), MunicipalityLoader::bundled()?))
}
