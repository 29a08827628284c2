use crate::domain::model::{GradingSystem, OutputFormat, Subject};
use crate::utils::error::Result;

/// Anything that can hand the engine an ordered snapshot of subjects.
pub trait SubjectSource {
    fn load_subjects(&self) -> Result<Vec<Subject>>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;
}

impl<T: SubjectSource + ?Sized> SubjectSource for &T {
    fn load_subjects(&self) -> Result<Vec<Subject>> {
        (**self).load_subjects()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

pub trait ConfigProvider {
    fn grading_system(&self) -> Option<GradingSystem>;
    fn output_format(&self) -> Option<OutputFormat>;
}
