//! Shared parameter state: the active tax-year handle.
//!
//! Parameter sets are loaded once, validated, and shared read-only across
//! every concurrent computation. Rotating to a new tax year swaps the active
//! reference atomically; a set is never mutated in place after activation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::models::{ParameterError, TaxParameterSet};

#[derive(Debug, Default)]
struct StoreInner {
    active_year: Option<i32>,
    years: HashMap<i32, Arc<TaxParameterSet>>,
}

/// Registry of loaded parameter sets with one active year.
///
/// Requests for a year that is not loaded fail with
/// [`ParameterError::YearNotLoaded`]; there is deliberately no fallback to
/// a different year.
#[derive(Debug, Default)]
pub struct ParameterStore {
    inner: RwLock<StoreInner>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and loads a parameter set without changing the active year.
    pub fn load(&self, set: TaxParameterSet) -> Result<(), ParameterError> {
        set.validate()?;
        let year = set.tax_year;
        let mut inner = self.write();
        inner.years.insert(year, Arc::new(set));
        info!(tax_year = year, "parameter set loaded");
        Ok(())
    }

    /// Validates, loads, and makes a parameter set the active one.
    ///
    /// This is the only way the active year changes; readers holding an
    /// `Arc` from before the swap keep computing against the set they
    /// started with.
    pub fn activate(&self, set: TaxParameterSet) -> Result<(), ParameterError> {
        set.validate()?;
        let year = set.tax_year;
        let mut inner = self.write();
        inner.years.insert(year, Arc::new(set));
        inner.active_year = Some(year);
        info!(tax_year = year, "parameter set activated");
        Ok(())
    }

    /// The active parameter set.
    pub fn current(&self) -> Result<Arc<TaxParameterSet>, ParameterError> {
        let inner = self.read();
        let year = inner.active_year.ok_or(ParameterError::NoActiveYear)?;
        inner
            .years
            .get(&year)
            .cloned()
            .ok_or(ParameterError::YearNotLoaded(year))
    }

    /// The parameter set for a specific year.
    pub fn for_year(&self, year: i32) -> Result<Arc<TaxParameterSet>, ParameterError> {
        self.read()
            .years
            .get(&year)
            .cloned()
            .ok_or(ParameterError::YearNotLoaded(year))
    }

    /// All loaded years, ascending.
    pub fn loaded_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.read().years.keys().copied().collect();
        years.sort_unstable();
        years
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
