#![forbid(unsafe_code)]

//! Core domain model and business logic for the Clubdesk system.
//!
//! This crate provides:
//! - Domain types (problems, filters, registrations)
//! - The built-in problem catalog
//! - Daily problem rotation
//! - Practice session engine
//! - Registration roster persistence (JSONL, CSV export)
//! - Admin override of the live problem

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod rotation;
pub mod session;
pub mod roster;
pub mod export;
pub mod current;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use rotation::{
    date_for_problem_number, days_until_problem, problem_number_for_date, todays_problem_number,
    DEFAULT_EPOCH,
};
pub use session::{Phase, PracticeSession};
pub use roster::{load_registrations, JsonlRoster, RegistrationSink};
pub use current::{resolve_current, CurrentProblemState};
