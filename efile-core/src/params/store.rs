use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::parameters::{ParameterError, TaxParameters};

/// Append-only cache of published parameter sets, keyed by tax year.
///
/// New years may be published at any time; an existing year is never
/// replaced, so a snapshot handed out for one filing stays valid for its
/// whole compute/encode/transmit cycle.
#[derive(Debug, Default)]
pub struct ParameterStore {
    years: RwLock<HashMap<i32, Arc<TaxParameters>>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and publishes one year's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if the set fails [`TaxParameters::validate`]
    /// or the year is already published.
    pub fn publish(&self, params: TaxParameters) -> Result<(), ParameterError> {
        params.validate()?;
        let mut years = self.years.write().unwrap();
        if years.contains_key(&params.tax_year) {
            return Err(ParameterError::YearAlreadyPublished(params.tax_year));
        }
        years.insert(params.tax_year, Arc::new(params));
        Ok(())
    }

    pub fn get(&self, tax_year: i32) -> Option<Arc<TaxParameters>> {
        self.years.read().unwrap().get(&tax_year).cloned()
    }

    pub fn published_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.years.read().unwrap().keys().copied().collect();
        years.sort_unstable();
        years
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::testutil::parameters_2024;

    use super::*;

    #[test]
    fn publish_then_get_returns_shared_snapshot() {
        let store = ParameterStore::new();
        store.publish(parameters_2024()).unwrap();

        let first = store.get(2024).unwrap();
        let second = store.get(2024).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.tax_year, 2024);
    }

    #[test]
    fn get_unknown_year_returns_none() {
        let store = ParameterStore::new();

        assert!(store.get(2019).is_none());
    }

    #[test]
    fn republishing_a_year_is_refused() {
        let store = ParameterStore::new();
        store.publish(parameters_2024()).unwrap();

        let result = store.publish(parameters_2024());

        assert_eq!(result, Err(ParameterError::YearAlreadyPublished(2024)));
    }

    #[test]
    fn published_years_are_sorted() {
        let store = ParameterStore::new();
        let mut later = parameters_2024();
        later.tax_year = 2025;
        store.publish(later).unwrap();
        store.publish(parameters_2024()).unwrap();

        assert_eq!(store.published_years(), vec![2024, 2025]);
    }
}
