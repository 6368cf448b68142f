//! Read-only reference data: battery models, incentive programs and season rates

mod battery;
mod program;
mod season;
pub mod loader;

pub use battery::BatterySpec;
pub use program::ProgramTerms;
pub use season::{season_for_date, season_for_month, SeasonRate};
pub use loader::LoadedCatalogs;

use log::warn;
use std::collections::HashSet;
use std::path::Path;

use crate::error::CatalogError;

/// An entry that can be looked up by key in a [`Catalog`]
pub trait CatalogEntry {
    /// Catalog name used in log and error messages
    const KIND: &'static str;

    fn key(&self) -> &str;

    /// Check the entry's numeric fields; returns a reason on failure
    fn validate(&self) -> Result<(), String>;
}

/// Ordered, non-empty list of entries with unique keys
///
/// The first entry is the default used when a key does not resolve.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
}

impl<T: CatalogEntry> Catalog<T> {
    /// Build a catalog, rejecting empty lists, duplicate keys and invalid entries
    pub fn new(entries: Vec<T>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty(T::KIND));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.key().to_string()) {
                return Err(CatalogError::DuplicateKey {
                    catalog: T::KIND,
                    key: entry.key().to_string(),
                });
            }
            entry.validate().map_err(|reason| CatalogError::InvalidEntry {
                catalog: T::KIND,
                key: entry.key().to_string(),
                reason,
            })?;
        }

        Ok(Self { entries })
    }

    /// Built-in tables are known to be non-empty and valid
    fn builtin(entries: Vec<T>) -> Self {
        debug_assert!(!entries.is_empty());
        Self { entries }
    }

    /// Exact key lookup
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Look up `key`, falling back to the first entry when it is missing or unknown
    pub fn resolve(&self, key: Option<&str>) -> &T {
        match key.map(str::trim).filter(|k| !k.is_empty()) {
            None => self.default_entry(),
            Some(k) => self.get(k).unwrap_or_else(|| {
                warn!("unknown {} key '{}', using '{}'", T::KIND, k, self.default_entry().key());
                self.default_entry()
            }),
        }
    }

    pub fn default_entry(&self) -> &T {
        &self.entries[0]
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Container for all reference catalogs
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub batteries: Catalog<BatterySpec>,
    pub programs: Catalog<ProgramTerms>,
    pub seasons: Catalog<SeasonRate>,
}

impl Catalogs {
    /// Built-in catalogs matching the published estimator
    pub fn default_catalogs() -> Self {
        Self {
            batteries: Catalog::builtin(BatterySpec::defaults()),
            programs: Catalog::builtin(ProgramTerms::defaults()),
            seasons: Catalog::builtin(SeasonRate::defaults()),
        }
    }

    /// Load catalogs from CSV files in the default location (data/catalogs/)
    pub fn from_csv() -> Result<Self, CatalogError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_CATALOGS_PATH))
    }

    /// Load catalogs from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, CatalogError> {
        let loaded = LoadedCatalogs::load_from(path)?;

        Ok(Self {
            batteries: Catalog::new(loaded.batteries)?,
            programs: Catalog::new(loaded.programs)?,
            seasons: Catalog::new(loaded.seasons)?,
        })
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::default_catalogs()
    }
}
