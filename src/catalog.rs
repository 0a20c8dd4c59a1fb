//! Static cohort-to-content tables shared by the tip selector and the quiz engine

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AwarenessError, Result};
use crate::Cohort;

/// Content stored in a catalog; `check` rejects malformed entries at load time
pub trait CatalogEntry {
    fn check(&self) -> std::result::Result<(), String> {
        Ok(())
    }

    /// Checks that span a whole cohort sequence (e.g. duplicate ids)
    fn check_sequence(_items: &[Self]) -> std::result::Result<(), String>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Immutable mapping from cohort key to an ordered content sequence.
///
/// Keys are plain strings so catalogs loaded from JSON may carry cohorts the
/// enum does not know about; lookups for those still fall back to `student`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContentCatalog<T> {
    entries: BTreeMap<String, Vec<T>>,
}

impl<T: CatalogEntry> ContentCatalog<T> {
    pub fn new(entries: BTreeMap<String, Vec<T>>) -> Result<Self> {
        let fallback = Cohort::FALLBACK.as_str();
        match entries.get(fallback) {
            Some(items) if !items.is_empty() => {}
            _ => {
                return Err(AwarenessError::InvalidCatalog {
                    message: format!("the '{}' sequence must exist and be non-empty", fallback),
                })
            }
        }

        for (cohort, items) in &entries {
            for (position, item) in items.iter().enumerate() {
                item.check().map_err(|message| AwarenessError::InvalidCatalog {
                    message: format!("{}[{}]: {}", cohort, position, message),
                })?;
            }
            T::check_sequence(items).map_err(|message| AwarenessError::InvalidCatalog {
                message: format!("{}: {}", cohort, message),
            })?;
        }

        Ok(Self { entries })
    }

    /// Build a catalog from `(cohort, items)` pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Cohort, Vec<T>)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(cohort, items)| (cohort.as_str().to_string(), items))
                .collect(),
        )
    }

    /// Strict lookup: fails with `EmptyCohortCatalog` if the key is absent or empty
    pub fn try_entries(&self, cohort: &str) -> Result<&[T]> {
        match self.entries.get(cohort) {
            Some(items) if !items.is_empty() => Ok(items),
            _ => Err(AwarenessError::EmptyCohortCatalog {
                cohort: cohort.to_string(),
            }),
        }
    }

    /// Lookup with the `student` fallback; never empty
    pub fn entries_for(&self, cohort: &str) -> &[T] {
        match self.try_entries(cohort) {
            Ok(items) => items,
            Err(err) => {
                tracing::debug!(%err, "falling back to {} content", Cohort::FALLBACK);
                &self.entries[Cohort::FALLBACK.as_str()]
            }
        }
    }

    pub fn cohorts(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: CatalogEntry + DeserializeOwned> ContentCatalog<T> {
    /// Parse `{"student": [...], "senior": [...]}`
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let entries: BTreeMap<String, Vec<T>> = serde_json::from_str(raw)?;
        Self::new(entries)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), cohorts = catalog.len(), "loaded content catalog");
        Ok(catalog)
    }
}
