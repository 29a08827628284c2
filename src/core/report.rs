use crate::core::engine::{lookup_grade_point, parse_credit};
use crate::domain::model::{GpaBreakdown, GpaOutcome, GradingSystem, Subject};
use crate::utils::error::{GpaError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

pub use crate::domain::model::OutputFormat;

#[derive(Debug, Clone, Serialize)]
pub struct SubjectLine {
    pub row: usize,
    pub name: String,
    pub grade: String,
    pub credit: String,
    pub grade_point: f64,
    pub recognized: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GpaReport {
    pub grading_system: GradingSystem,
    pub subjects: Vec<SubjectLine>,
    pub total_points: f64,
    pub total_credits: f64,
    pub outcome: GpaOutcome,
    /// Two-decimal GPA, or `None` when the outcome is not a number.
    pub gpa: Option<String>,
    pub computed_at: DateTime<Utc>,
}

impl GpaReport {
    pub fn new(subjects: &[Subject], breakdown: &GpaBreakdown) -> Self {
        let outcome = breakdown.outcome();
        let lines = subjects
            .iter()
            .enumerate()
            .map(|(position, subject)| SubjectLine {
                row: position + 1,
                name: subject.name.clone(),
                grade: subject.grade.clone(),
                credit: subject.credit.clone(),
                grade_point: lookup_grade_point(&subject.grade, breakdown.system),
                recognized: !breakdown.unrecognized_grades.contains(&position),
            })
            .collect();

        Self {
            grading_system: breakdown.system,
            subjects: lines,
            total_points: breakdown.total_points,
            total_credits: breakdown.total_credits,
            outcome,
            gpa: outcome.value().map(|gpa| format!("{:.2}", gpa)),
            computed_at: Utc::now(),
        }
    }

    /// One line per row whose grade scored 0.0 only because it is not on the scale.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .subjects
            .iter()
            .filter(|line| !line.recognized)
            .map(|line| {
                format!(
                    "row {} ({}): grade '{}' is not on the {} scale and counts as 0.00 points",
                    line.row,
                    display_name(&line.name),
                    line.grade,
                    self.grading_system
                )
            })
            .collect();

        for line in &self.subjects {
            if parse_credit(&line.credit).is_nan() {
                warnings.push(format!(
                    "row {} ({}): credit '{}' is not a number",
                    line.row,
                    display_name(&line.name),
                    line.credit
                ));
            }
        }
        warnings
    }

    /// Warnings that `render(format)` does not already print. Only the text
    /// format carries them inline.
    pub fn unrendered_warnings(&self, format: OutputFormat) -> Vec<String> {
        match format {
            OutputFormat::Text => Vec::new(),
            OutputFormat::Json | OutputFormat::Csv => self.warnings(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => self.render_json(),
            OutputFormat::Csv => self.render_csv(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Grading system: {}", self.grading_system);
        for line in &self.subjects {
            let _ = writeln!(
                out,
                "  {:>2}. {:<20} {:<3} {:>6}  ({:.2} pts)",
                line.row,
                display_name(&line.name),
                line.grade,
                line.credit,
                line.grade_point
            );
        }
        for warning in self.warnings() {
            let _ = writeln!(out, "warning: {}", warning);
        }
        match &self.gpa {
            Some(gpa) => {
                let _ = writeln!(out, "Your GPA is: {}", gpa);
            }
            None => {
                let _ = writeln!(out, "{}", self.outcome);
            }
        }
        out
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["row", "name", "grade", "credit", "grade_point"])?;
        for line in &self.subjects {
            writer.write_record([
                line.row.to_string(),
                line.name.clone(),
                line.grade.clone(),
                line.credit.clone(),
                format!("{:.2}", line.grade_point),
            ])?;
        }
        let summary = self.gpa.clone().unwrap_or_else(|| self.outcome.to_string());
        // NaN and inf totals stay out of the sheet; the summary cell carries the reason.
        let total_credits = if self.total_credits.is_finite() {
            self.total_credits.to_string()
        } else {
            String::new()
        };
        writer.write_record([
            String::new(),
            "GPA".to_string(),
            self.grading_system.to_string(),
            total_credits,
            summary,
        ])?;

        let bytes = writer
            .into_inner()
            .map_err(|e| GpaError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| GpaError::ProcessingError {
            message: format!("CSV output is not valid UTF-8: {}", e),
        })
    }
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "unnamed"
    } else {
        name
    }
}
