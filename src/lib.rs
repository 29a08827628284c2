pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{toml_config::TomlConfig, Settings};
pub use core::engine::{
    compute_breakdown, compute_gpa, compute_gpa_by_id, lookup_grade_point,
    lookup_grade_point_by_id, parse_credit, GpaEngine,
};
pub use core::form::{FormField, FormSnapshot, SubjectForm};
pub use core::report::{GpaReport, OutputFormat};
pub use domain::model::{GpaBreakdown, GpaOutcome, GradingSystem, Subject};
pub use utils::error::{GpaError, Result};
