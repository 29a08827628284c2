use crate::core::engine::GpaEngine;
use crate::domain::model::{GpaBreakdown, GpaOutcome, GradingSystem, Subject};
use crate::utils::error::{GpaError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Grade,
    Credit,
}

impl FromStr for FormField {
    type Err = GpaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(FormField::Name),
            "grade" => Ok(FormField::Grade),
            "credit" | "credits" => Ok(FormField::Credit),
            other => Err(GpaError::InputParseError {
                input: other.to_string(),
                reason: "field must be one of: name, grade, credit".to_string(),
            }),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormField::Name => "name",
            FormField::Grade => "grade",
            FormField::Credit => "credit",
        })
    }
}

/// Frozen copy of the form inputs handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub subjects: Vec<Subject>,
    pub system: GradingSystem,
}

impl FormSnapshot {
    pub fn compute(&self) -> GpaBreakdown {
        GpaEngine::new(self.system).compute(&self.subjects)
    }
}

#[derive(Debug, Clone)]
pub struct Computation {
    pub snapshot: FormSnapshot,
    pub breakdown: GpaBreakdown,
    pub outcome: GpaOutcome,
}

/// Editable subject rows plus the last submitted result.
///
/// Edits never touch the result: it stays as computed until the next
/// [`SubjectForm::submit`], and [`SubjectForm::is_stale`] reports whether the
/// inputs have moved on since then.
#[derive(Debug, Clone)]
pub struct SubjectForm {
    subjects: Vec<Subject>,
    system: GradingSystem,
    last: Option<Computation>,
}

impl Default for SubjectForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectForm {
    pub fn new() -> Self {
        Self::with_subjects(vec![Subject::default()], GradingSystem::default())
    }

    pub fn with_subjects(subjects: Vec<Subject>, system: GradingSystem) -> Self {
        Self {
            subjects,
            system,
            last: None,
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn grading_system(&self) -> GradingSystem {
        self.system
    }

    pub fn add_subject(&mut self) -> usize {
        self.subjects.push(Subject::default());
        self.subjects.len() - 1
    }

    pub fn remove_subject(&mut self, index: usize) -> Result<Subject> {
        self.check_index(index)?;
        Ok(self.subjects.remove(index))
    }

    pub fn update_field(&mut self, index: usize, field: FormField, value: &str) -> Result<()> {
        self.check_index(index)?;
        let subject = &mut self.subjects[index];
        let slot = match field {
            FormField::Name => &mut subject.name,
            FormField::Grade => &mut subject.grade,
            FormField::Credit => &mut subject.credit,
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn set_grading_system(&mut self, system: GradingSystem) {
        self.system = system;
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            subjects: self.subjects.clone(),
            system: self.system,
        }
    }

    /// Recomputes from scratch on a snapshot and stores the result.
    pub fn submit(&mut self) -> &Computation {
        let snapshot = self.snapshot();
        let breakdown = snapshot.compute();
        let outcome = breakdown.outcome();
        tracing::info!(system = %snapshot.system, rows = snapshot.subjects.len(), %outcome, "form submitted");

        self.last.insert(Computation {
            snapshot,
            breakdown,
            outcome,
        })
    }

    pub fn result(&self) -> Option<&Computation> {
        self.last.as_ref()
    }

    pub fn is_stale(&self) -> bool {
        match &self.last {
            Some(computation) => computation.snapshot != self.snapshot(),
            None => false,
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.subjects.len() {
            return Err(GpaError::RowOutOfRange {
                index: index + 1,
                len: self.subjects.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_form_has_one_empty_row() {
        let form = SubjectForm::new();
        assert_eq!(form.len(), 1);
        assert!(form.subjects()[0].is_blank());
        assert_eq!(form.grading_system(), GradingSystem::FourPoint);
        assert!(form.result().is_none());
        assert!(!form.is_stale());
    }

    #[test]
    fn test_add_update_remove() {
        let mut form = SubjectForm::new();
        let second = form.add_subject();
        assert_eq!(second, 1);

        form.update_field(0, FormField::Name, "Math").unwrap();
        form.update_field(0, FormField::Grade, "a").unwrap();
        form.update_field(0, FormField::Credit, "3").unwrap();
        form.update_field(1, FormField::Name, "Art").unwrap();
        assert_eq!(form.subjects()[0], Subject::new("Math", "a", "3"));

        let removed = form.remove_subject(1).unwrap();
        assert_eq!(removed.name, "Art");
        assert_eq!(form.len(), 1);

        form.remove_subject(0).unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn test_out_of_range_rows() {
        let mut form = SubjectForm::new();
        assert!(matches!(
            form.remove_subject(3),
            Err(GpaError::RowOutOfRange { index: 4, len: 1 })
        ));
        assert!(form.update_field(1, FormField::Grade, "A").is_err());
    }

    #[test]
    fn test_result_is_stale_until_resubmitted() {
        let mut form = SubjectForm::new();
        form.update_field(0, FormField::Grade, "A").unwrap();
        form.update_field(0, FormField::Credit, "3").unwrap();

        let outcome = form.submit().outcome;
        assert_eq!(outcome, GpaOutcome::Value(4.0));
        assert!(!form.is_stale());

        form.update_field(0, FormField::Grade, "C").unwrap();
        assert!(form.is_stale());
        assert_eq!(form.result().unwrap().outcome, GpaOutcome::Value(4.0));

        form.set_grading_system(GradingSystem::FivePoint);
        assert_eq!(form.submit().outcome, GpaOutcome::Value(3.0));
        assert!(!form.is_stale());
    }

    #[test]
    fn test_submit_on_untouched_form_reports_invalid_credit() {
        // the single starting row has an empty credit, which parses to NaN
        let mut form = SubjectForm::new();
        assert_eq!(form.submit().outcome, GpaOutcome::InvalidCredit);
    }

    #[test]
    fn test_submit_on_empty_form_reports_zero_credits() {
        let mut form = SubjectForm::new();
        form.remove_subject(0).unwrap();
        assert_eq!(form.submit().outcome, GpaOutcome::ZeroCredits);
    }

    #[test]
    fn test_form_field_parsing() {
        assert_eq!("Grade".parse::<FormField>().unwrap(), FormField::Grade);
        assert_eq!("credits".parse::<FormField>().unwrap(), FormField::Credit);
        assert!("teacher".parse::<FormField>().is_err());
    }
}
