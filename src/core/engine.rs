use crate::domain::model::{GpaBreakdown, GradingSystem, Subject};
use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;

// Longest leading decimal literal, the same prefix a browser's parseFloat accepts.
static CREDIT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("credit prefix pattern is valid")
});

/// Point value of `grade` under `system`, matched case-insensitively.
///
/// Grades that are not on the scale (empty text, "E" under 4.0, stray
/// whitespace) score 0.0 instead of failing. Their credits still count toward
/// the denominator, so a typo quietly lowers the average.
pub fn lookup_grade_point(grade: &str, system: GradingSystem) -> f64 {
    system.points_for(&grade.to_uppercase()).unwrap_or(0.0)
}

/// Lookup with a textual system id; an unknown id is rejected rather than scored.
pub fn lookup_grade_point_by_id(grade: &str, system_id: &str) -> Result<f64> {
    Ok(lookup_grade_point(grade, system_id.parse()?))
}

/// Best-effort credit parsing. Leading whitespace is skipped and the longest
/// numeric prefix is used ("3 credits" is 3); anything else is NaN.
pub fn parse_credit(raw: &str) -> f64 {
    CREDIT_PREFIX
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Single pass over the snapshot. A NaN credit poisons both totals.
pub fn compute_breakdown(subjects: &[Subject], system: GradingSystem) -> GpaBreakdown {
    let mut total_points = 0.0;
    let mut total_credits = 0.0;
    let mut unrecognized_grades = Vec::new();

    for (position, subject) in subjects.iter().enumerate() {
        let upper = subject.grade.to_uppercase();
        let grade_point = match system.points_for(&upper) {
            Some(points) => points,
            None => {
                tracing::debug!(
                    row = position + 1,
                    grade = %subject.grade,
                    system = %system,
                    "grade not on scale, scoring 0.0"
                );
                unrecognized_grades.push(position);
                0.0
            }
        };
        let credit = parse_credit(&subject.credit);
        if credit.is_nan() {
            tracing::debug!(row = position + 1, credit = %subject.credit, "credit is not a number");
        }

        total_points += grade_point * credit;
        total_credits += credit;
    }

    GpaBreakdown {
        system,
        subject_count: subjects.len(),
        total_points,
        total_credits,
        unrecognized_grades,
    }
}

/// `Σ(points × credit) / Σ credit`. Empty or zero-credit input yields the raw
/// IEEE result (NaN or ±inf), never a substituted 0.
pub fn compute_gpa(subjects: &[Subject], system: GradingSystem) -> f64 {
    compute_breakdown(subjects, system).gpa()
}

pub fn compute_gpa_by_id(subjects: &[Subject], system_id: &str) -> Result<f64> {
    Ok(compute_gpa(subjects, system_id.parse()?))
}

/// Engine bound to one grading system.
#[derive(Debug, Clone, Copy, Default)]
pub struct GpaEngine {
    system: GradingSystem,
}

impl GpaEngine {
    pub fn new(system: GradingSystem) -> Self {
        Self { system }
    }

    pub fn system(&self) -> GradingSystem {
        self.system
    }

    pub fn lookup(&self, grade: &str) -> f64 {
        lookup_grade_point(grade, self.system)
    }

    pub fn compute(&self, subjects: &[Subject]) -> GpaBreakdown {
        let breakdown = compute_breakdown(subjects, self.system);
        tracing::debug!(
            system = %self.system,
            subjects = breakdown.subject_count,
            total_points = breakdown.total_points,
            total_credits = breakdown.total_credits,
            "computed GPA breakdown"
        );
        breakdown
    }
}
