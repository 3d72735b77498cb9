//! Tabular snapshot consumed by the scoring engine.
//!
//! A `RiskDataset` is loaded once per refresh, never mutated afterwards, and
//! shared behind an `Arc` through [`SnapshotStore`].

mod parser;
mod snapshot;

pub use parser::{
    parse_adverse, parse_health_system, parse_infection, parse_prevalence, parse_transmission,
};
pub use snapshot::SnapshotStore;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::scoring::{
    AdverseTable, CityCode, HealthSystemTable, InfectionTable, ObservationSeries, RiskError,
    TransmissionTable,
};

/// Failure while reading a snapshot from disk or memory.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in {file}: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("{file} row {row}, column {column}: cannot parse '{value}'")]
    MalformedCell {
        file: &'static str,
        row: usize,
        column: String,
        value: String,
    },
    #[error("{file} holds invalid data: {source}")]
    Table {
        file: &'static str,
        #[source]
        source: RiskError,
    },
}

/// Live per-city active-case and growth-rate feeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrevalenceFeed {
    active: BTreeMap<CityCode, ObservationSeries>,
    growth: BTreeMap<CityCode, ObservationSeries>,
}

impl PrevalenceFeed {
    pub fn new(
        active: BTreeMap<CityCode, ObservationSeries>,
        growth: BTreeMap<CityCode, ObservationSeries>,
    ) -> Self {
        Self { active, growth }
    }

    pub fn active(&self, city: CityCode) -> Result<&ObservationSeries, RiskError> {
        self.active.get(&city).ok_or_else(|| RiskError::LookupNotFound {
            table: "active cases",
            key: format!("city {city}"),
        })
    }

    pub fn growth(&self, city: CityCode) -> Result<&ObservationSeries, RiskError> {
        self.growth.get(&city).ok_or_else(|| RiskError::LookupNotFound {
            table: "growth rate",
            key: format!("city {city}"),
        })
    }

    pub fn cities(&self) -> impl Iterator<Item = CityCode> + '_ {
        self.active.keys().copied()
    }
}

/// Every table the engine reads, captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskDataset {
    pub health_system: HealthSystemTable,
    pub infection: InfectionTable,
    pub adverse: AdverseTable,
    pub prevalence: PrevalenceFeed,
    pub transmission: TransmissionTable,
}

impl RiskDataset {
    /// Loads the five CSV files that make up a snapshot from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            let path = dir.join(name);
            File::open(&path).map_err(|source| DatasetError::Io { path, source })
        };

        let dataset = Self::from_readers(
            open(parser::HEALTH_SYSTEM_FILE)?,
            open(parser::INFECTION_FILE)?,
            open(parser::ADVERSE_FILE)?,
            open(parser::PREVALENCE_FILE)?,
            open(parser::TRANSMISSION_FILE)?,
        )?;

        info!(
            dir = %dir.display(),
            cities = dataset.health_system.rows().len(),
            infection_rows = dataset.infection.rows().len(),
            adverse_rows = dataset.adverse.rows().len(),
            "risk dataset loaded"
        );

        Ok(dataset)
    }

    pub fn from_readers<H, I, A, P, T>(
        health_system: H,
        infection: I,
        adverse: A,
        prevalence: P,
        transmission: T,
    ) -> Result<Self, DatasetError>
    where
        H: Read,
        I: Read,
        A: Read,
        P: Read,
        T: Read,
    {
        Ok(Self {
            health_system: parse_health_system(health_system)?,
            infection: parse_infection(infection)?,
            adverse: parse_adverse(adverse)?,
            prevalence: parse_prevalence(prevalence)?,
            transmission: parse_transmission(transmission)?,
        })
    }
}
