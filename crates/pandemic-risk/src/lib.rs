//! Pandemic risk estimation.
//!
//! Combines health-system strain, disease prevalence, transmission intensity and
//! a personal comorbidity profile into normalized domain scores and one overall
//! risk level.

pub mod config;
pub mod data;
pub mod error;
pub mod scoring;
pub mod telemetry;
