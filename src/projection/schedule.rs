//! Year-by-year savings schedule

use serde::{Deserialize, Serialize};
use std::io::Write;

/// One projection year for both series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: u32,

    // Amount in the last month of the year
    pub utility_monthly: f64,
    pub solar_monthly: f64,

    // Sum of the year's twelve months
    pub utility_annual: f64,
    pub solar_annual: f64,

    // Running totals from month 1
    pub utility_cumulative: f64,
    pub solar_cumulative: f64,
    pub cumulative_savings: f64,
}

impl YearRow {
    pub fn new(year: u32) -> Self {
        Self {
            year,
            utility_monthly: 0.0,
            solar_monthly: 0.0,
            utility_annual: 0.0,
            solar_annual: 0.0,
            utility_cumulative: 0.0,
            solar_cumulative: 0.0,
            cumulative_savings: 0.0,
        }
    }

    /// Empty row for the following year, carrying the running totals
    pub fn next_year(&self) -> Self {
        Self {
            utility_cumulative: self.utility_cumulative,
            solar_cumulative: self.solar_cumulative,
            cumulative_savings: self.cumulative_savings,
            ..Self::new(self.year + 1)
        }
    }

    pub fn annual_savings(&self) -> f64 {
        self.utility_annual - self.solar_annual
    }
}

/// Complete year-by-year schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsSchedule {
    pub horizon_years: u32,
    pub rows: Vec<YearRow>,
}

impl SavingsSchedule {
    pub fn new(horizon_years: u32) -> Self {
        Self {
            horizon_years,
            rows: Vec::with_capacity(horizon_years as usize),
        }
    }

    pub fn add_row(&mut self, row: YearRow) {
        self.rows.push(row);
    }

    /// First year whose cumulative savings are positive
    pub fn break_even_year(&self) -> Option<u32> {
        self.rows
            .iter()
            .find(|r| r.cumulative_savings > 0.0)
            .map(|r| r.year)
    }

    pub fn summary(&self) -> ScheduleSummary {
        let last = self.rows.last();
        ScheduleSummary {
            total_years: self.rows.len() as u32,
            utility_total: last.map(|r| r.utility_cumulative).unwrap_or(0.0),
            solar_total: last.map(|r| r.solar_cumulative).unwrap_or(0.0),
            total_savings: last.map(|r| r.cumulative_savings).unwrap_or(0.0),
            best_year_savings: self
                .rows
                .iter()
                .map(YearRow::annual_savings)
                .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))
                .unwrap_or(0.0),
            break_even_year: self.break_even_year(),
        }
    }

    /// Write one CSV record per year, with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_years: u32,
    pub utility_total: f64,
    pub solar_total: f64,
    pub total_savings: f64,
    pub best_year_savings: f64,
    pub break_even_year: Option<u32>,
}
