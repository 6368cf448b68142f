//! CSV-based catalog loader
//!
//! Loads reference catalogs from CSV files in data/catalogs/

use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

use super::{BatterySpec, ProgramTerms, SeasonRate};
use crate::error::CatalogError;

/// Default path to catalogs directory
pub const DEFAULT_CATALOGS_PATH: &str = "data/catalogs";

/// Deserialize every row of a headed CSV file
fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Load battery specs from batteries.csv
/// Columns: key, label, usable_capacity_kwh, max_discharge_kw, default_committed_kw
pub fn load_batteries(path: &Path) -> Result<Vec<BatterySpec>, CatalogError> {
    load_rows(&path.join("batteries.csv"))
}

/// Load program terms from programs.csv
/// Columns: key, label, rate_per_kw_per_season, seasons_per_year, description
pub fn load_programs(path: &Path) -> Result<Vec<ProgramTerms>, CatalogError> {
    load_rows(&path.join("programs.csv"))
}

/// Load season rates from seasons.csv
/// Columns: key, label, peak_value_per_kwh, on_peak_rate, off_peak_rate
pub fn load_seasons(path: &Path) -> Result<Vec<SeasonRate>, CatalogError> {
    load_rows(&path.join("seasons.csv"))
}

/// Raw catalog rows as read from disk, before validation
pub struct LoadedCatalogs {
    pub batteries: Vec<BatterySpec>,
    pub programs: Vec<ProgramTerms>,
    pub seasons: Vec<SeasonRate>,
}

impl LoadedCatalogs {
    /// Load all catalogs from the default path
    pub fn load_default() -> Result<Self, CatalogError> {
        Self::load_from(Path::new(DEFAULT_CATALOGS_PATH))
    }

    /// Load all catalogs from a specific path
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let loaded = Self {
            batteries: load_batteries(path)?,
            programs: load_programs(path)?,
            seasons: load_seasons(path)?,
        };
        info!(
            "Loaded {} batteries, {} programs, {} seasons from {}",
            loaded.batteries.len(),
            loaded.programs.len(),
            loaded.seasons.len(),
            path.display()
        );
        Ok(loaded)
    }
}
