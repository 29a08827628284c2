use crate::utils::error::GpaError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the form. All three fields hold the raw text the user typed;
/// the credit is only interpreted when a GPA is computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default, deserialize_with = "credit_from_text_or_number")]
    pub credit: String,
}

impl Subject {
    pub fn new(
        name: impl Into<String>,
        grade: impl Into<String>,
        credit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            grade: grade.into(),
            credit: credit.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.grade.is_empty() && self.credit.is_empty()
    }
}

// TOML and JSON inputs may write `credit = 3` or `credit = "3"`.
fn credit_from_text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCredit {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawCredit::deserialize(deserializer)? {
        RawCredit::Text(text) => text,
        RawCredit::Integer(value) => value.to_string(),
        RawCredit::Float(value) => value.to_string(),
    })
}

const FOUR_POINT_SCALE: &[(&str, f64)] = &[
    ("A", 4.0),
    ("B", 3.0),
    ("C", 2.0),
    ("D", 1.0),
    ("F", 0.0),
];

const FIVE_POINT_SCALE: &[(&str, f64)] = &[
    ("A", 5.0),
    ("B", 4.0),
    ("C", 3.0),
    ("D", 2.0),
    ("E", 1.0),
    ("F", 0.0),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradingSystem {
    #[default]
    #[serde(rename = "4.0")]
    FourPoint,
    #[serde(rename = "5.0")]
    FivePoint,
}

impl GradingSystem {
    pub const ALL: [GradingSystem; 2] = [GradingSystem::FourPoint, GradingSystem::FivePoint];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradingSystem::FourPoint => "4.0",
            GradingSystem::FivePoint => "5.0",
        }
    }

    /// Letter grades (uppercase) and their point values, best grade first.
    pub fn scale(&self) -> &'static [(&'static str, f64)] {
        match self {
            GradingSystem::FourPoint => FOUR_POINT_SCALE,
            GradingSystem::FivePoint => FIVE_POINT_SCALE,
        }
    }

    /// Exact lookup of an uppercase letter. `None` when the letter is not on this scale.
    pub fn points_for(&self, letter: &str) -> Option<f64> {
        self.scale()
            .iter()
            .find(|(grade, _)| *grade == letter)
            .map(|(_, points)| *points)
    }

    pub fn letters(&self) -> Vec<&'static str> {
        self.scale().iter().map(|(grade, _)| *grade).collect()
    }
}

impl fmt::Display for GradingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradingSystem {
    type Err = GpaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradingSystem::ALL
            .into_iter()
            .find(|system| system.as_str() == s.trim())
            .ok_or_else(|| GpaError::UnknownGradingSystem {
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = GpaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(GpaError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

/// Sums gathered from one pass over a subject snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaBreakdown {
    pub system: GradingSystem,
    pub subject_count: usize,
    pub total_points: f64,
    pub total_credits: f64,
    /// Zero-based positions of rows whose grade is not on the selected scale.
    pub unrecognized_grades: Vec<usize>,
}

impl GpaBreakdown {
    /// Raw IEEE quotient; NaN or infinite when the credits do not sum to a usable value.
    pub fn gpa(&self) -> f64 {
        self.total_points / self.total_credits
    }

    pub fn outcome(&self) -> GpaOutcome {
        GpaOutcome::from_breakdown(self)
    }
}

/// What the presentation layer shows for a computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "gpa", rename_all = "snake_case")]
pub enum GpaOutcome {
    Value(f64),
    /// Empty input or credits summing to exactly zero.
    ZeroCredits,
    /// At least one credit did not parse, so every sum is NaN.
    InvalidCredit,
    /// Credits summed to something non-zero but the quotient is still not finite.
    NonFinite(f64),
}

impl GpaOutcome {
    pub fn from_breakdown(breakdown: &GpaBreakdown) -> Self {
        let gpa = breakdown.gpa();
        if breakdown.total_credits.is_nan() {
            GpaOutcome::InvalidCredit
        } else if breakdown.total_credits == 0.0 {
            GpaOutcome::ZeroCredits
        } else if gpa.is_finite() {
            GpaOutcome::Value(gpa)
        } else {
            GpaOutcome::NonFinite(gpa)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            GpaOutcome::Value(gpa) => Some(*gpa),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        self.value().is_some()
    }
}

impl fmt::Display for GpaOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpaOutcome::Value(gpa) => write!(f, "{:.2}", gpa),
            GpaOutcome::ZeroCredits => f.write_str("cannot compute GPA with zero total credits"),
            GpaOutcome::InvalidCredit => {
                f.write_str("cannot compute GPA: at least one credit value is not a number")
            }
            GpaOutcome::NonFinite(_) => {
                f.write_str("cannot compute GPA: credits do not produce a finite average")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(total_points: f64, total_credits: f64) -> GpaBreakdown {
        GpaBreakdown {
            system: GradingSystem::FourPoint,
            subject_count: 1,
            total_points,
            total_credits,
            unrecognized_grades: vec![],
        }
    }

    #[test]
    fn test_grading_system_from_str() {
        assert_eq!("4.0".parse::<GradingSystem>().unwrap(), GradingSystem::FourPoint);
        assert_eq!(" 5.0 ".parse::<GradingSystem>().unwrap(), GradingSystem::FivePoint);
        assert!(matches!(
            "6.0".parse::<GradingSystem>(),
            Err(GpaError::UnknownGradingSystem { .. })
        ));
        assert!("4".parse::<GradingSystem>().is_err());
    }

    #[test]
    fn test_scales() {
        assert_eq!(GradingSystem::FourPoint.letters(), vec!["A", "B", "C", "D", "F"]);
        assert_eq!(GradingSystem::FivePoint.points_for("E"), Some(1.0));
        assert_eq!(GradingSystem::FourPoint.points_for("E"), None);
        assert_eq!(GradingSystem::FourPoint.points_for("a"), None);
    }

    #[test]
    fn test_grading_system_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            system: GradingSystem,
        }

        let parsed: Wrapper = toml::from_str(r#"system = "5.0""#).unwrap();
        assert_eq!(parsed.system, GradingSystem::FivePoint);
        assert!(toml::from_str::<Wrapper>(r#"system = "10.0""#).is_err());
        assert_eq!(
            serde_json::to_string(&GradingSystem::FourPoint).unwrap(),
            r#""4.0""#
        );
    }

    #[test]
    fn test_subject_credit_accepts_numbers_and_text() {
        let subject: Subject =
            serde_json::from_str(r#"{"name":"Math","grade":"A","credit":3}"#).unwrap();
        assert_eq!(subject.credit, "3");

        let subject: Subject =
            serde_json::from_str(r#"{"name":"Art","grade":"b","credit":"2.5"}"#).unwrap();
        assert_eq!(subject.credit, "2.5");

        let subject: Subject = serde_json::from_str(r#"{"name":"Gym"}"#).unwrap();
        assert!(subject.grade.is_empty());
        assert!(subject.credit.is_empty());
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(breakdown(12.0, 3.0).outcome(), GpaOutcome::Value(4.0));
        assert_eq!(breakdown(0.0, 0.0).outcome(), GpaOutcome::ZeroCredits);
        assert_eq!(breakdown(f64::NAN, f64::NAN).outcome(), GpaOutcome::InvalidCredit);
        assert!(matches!(
            breakdown(4.0, 0.0).outcome(),
            GpaOutcome::ZeroCredits
        ));
        assert!(matches!(
            breakdown(f64::INFINITY, 3.0).outcome(),
            GpaOutcome::NonFinite(v) if v.is_infinite()
        ));
    }

    #[test]
    fn test_output_format_serde() {
        assert_eq!(serde_json::to_string(&OutputFormat::Csv).unwrap(), r#""csv""#);
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(GpaOutcome::Value(24.0 / 7.0).to_string(), "3.43");
        assert_eq!(
            GpaOutcome::ZeroCredits.to_string(),
            "cannot compute GPA with zero total credits"
        );
        assert!(!GpaOutcome::InvalidCredit.to_string().contains("NaN"));
    }
}
