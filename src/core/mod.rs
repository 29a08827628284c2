pub mod engine;
pub mod form;
pub mod report;

pub use crate::domain::model::{GpaBreakdown, GpaOutcome, GradingSystem, Subject};
pub use crate::domain::ports::{ConfigProvider, SubjectSource};
pub use crate::utils::error::Result;
