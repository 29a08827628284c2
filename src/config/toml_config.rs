use crate::adapters::csv_input::read_subjects_csv;
use crate::core::report::OutputFormat;
use crate::core::{ConfigProvider, SubjectSource};
use crate::domain::model::{GradingSystem, Subject};
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::{validate_file_extensions, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsSection {
    pub grading_system: Option<GradingSystem>,
    pub output_format: Option<OutputFormat>,
    /// CSV file to read subjects from when no `[[subjects]]` are listed.
    pub input: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GpaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GpaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GRADES_FILE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GpaError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn grading_system(&self) -> Option<GradingSystem> {
        self.settings.grading_system
    }

    fn output_format(&self) -> Option<OutputFormat> {
        self.settings.output_format
    }
}

impl SubjectSource for TomlConfig {
    fn load_subjects(&self) -> Result<Vec<Subject>> {
        if !self.subjects.is_empty() {
            return Ok(self.subjects.clone());
        }
        match &self.settings.input {
            Some(path) => read_subjects_csv(path),
            None => Err(GpaError::MissingConfigError {
                field: "[[subjects]] or settings.input".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        if !self.subjects.is_empty() {
            format!("{} [[subjects]] table(s)", self.subjects.len())
        } else {
            match &self.settings.input {
                Some(path) => format!("CSV file {} (from config)", path),
                None => "empty config".to_string(),
            }
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.settings.input {
            validate_file_extensions("settings.input", std::slice::from_ref(input), &["csv"])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[settings]
grading_system = "5.0"
output_format = "json"

[[subjects]]
name = "Math"
grade = "A"
credit = 3

[[subjects]]
name = "Chemistry"
grade = "e"
credit = "2.5"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.grading_system(), Some(GradingSystem::FivePoint));
        assert_eq!(config.output_format(), Some(OutputFormat::Json));
        let subjects = config.load_subjects().unwrap();
        assert_eq!(subjects[0], Subject::new("Math", "A", "3"));
        assert_eq!(subjects[1].credit, "2.5");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_grading_system_fails_fast() {
        let err = TomlConfig::from_toml_str(
            r#"
[settings]
grading_system = "4.3"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, GpaError::ConfigValidationError { .. }));
        assert!(err.to_string().contains("4.3"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GPA_CALC_TEST_GRADES", "spring.csv");

        let config = TomlConfig::from_toml_str(
            r#"
[settings]
input = "${GPA_CALC_TEST_GRADES}"
"#,
        )
        .unwrap();
        assert_eq!(config.settings.input.as_deref(), Some("spring.csv"));

        std::env::remove_var("GPA_CALC_TEST_GRADES");
    }

    #[test]
    fn test_input_must_be_csv() {
        let config = TomlConfig::from_toml_str(
            r#"
[settings]
input = "grades.xlsx"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_config_has_no_subjects() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.grading_system(), None);
        assert!(matches!(
            config.load_subjects(),
            Err(GpaError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file_with_csv_input() {
        let mut csv_file = NamedTempFile::new().unwrap();
        csv_file.write_all(b"name,grade,credit\nMath,B,4\n").unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        let toml_content = format!(
            "[settings]\ninput = \"{}\"\n",
            csv_file.path().display().to_string().replace('\\', "/")
        );
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        let subjects = config.load_subjects().unwrap();
        assert_eq!(subjects, vec![Subject::new("Math", "B", "4")]);
    }
}
