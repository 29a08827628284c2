pub mod toml_config;

use crate::core::report::OutputFormat;
use crate::core::ConfigProvider;
use crate::domain::model::GradingSystem;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// Effective settings after layering command line over config file over defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub system: GradingSystem,
    pub format: OutputFormat,
}

impl Settings {
    pub fn resolve(primary: &dyn ConfigProvider, fallback: Option<&dyn ConfigProvider>) -> Self {
        let system = primary
            .grading_system()
            .or_else(|| fallback.and_then(|f| f.grading_system()))
            .unwrap_or_default();
        let format = primary
            .output_format()
            .or_else(|| fallback.and_then(|f| f.output_format()))
            .unwrap_or_default();
        Self { system, format }
    }
}

#[cfg(feature = "cli")]
pub mod cli {
    use super::toml_config::TomlConfig;
    use crate::adapters::{ArgSubjects, CsvSubjectFile};
    use crate::core::report::OutputFormat;
    use crate::core::{ConfigProvider, SubjectSource};
    use crate::domain::model::GradingSystem;
    use crate::utils::error::{GpaError, Result};
    use crate::utils::validation::{validate_file_extensions, validate_non_empty_string, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Default, Parser)]
    #[command(name = "gpa-calc")]
    #[command(about = "Compute a credit-weighted GPA on a 4.0 or 5.0 grading scale")]
    pub struct CliConfig {
        /// Grading system: 4.0 or 5.0 [default: 4.0]
        #[arg(short, long)]
        pub system: Option<GradingSystem>,

        /// A subject as NAME:GRADE:CREDIT (repeatable)
        #[arg(long = "subject", value_name = "NAME:GRADE:CREDIT")]
        pub subjects: Vec<String>,

        /// CSV file with name,grade,credit columns
        #[arg(short, long)]
        pub input: Option<String>,

        /// TOML file with [settings] and [[subjects]]
        #[arg(short, long)]
        pub config: Option<String>,

        /// Report format [default: text]
        #[arg(short, long, value_enum)]
        pub format: Option<OutputFormat>,

        /// Edit the subject list line by line instead of computing once
        #[arg(long)]
        pub interactive: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// `--subject` wins over `--input`, which wins over the config file.
        pub fn subject_source<'a>(
            &self,
            file: Option<&'a TomlConfig>,
        ) -> Result<Box<dyn SubjectSource + 'a>> {
            if !self.subjects.is_empty() {
                return Ok(Box::new(ArgSubjects::new(self.subjects.clone())));
            }
            if let Some(input) = &self.input {
                return Ok(Box::new(CsvSubjectFile::new(input)));
            }
            match file {
                Some(config) => Ok(Box::new(config)),
                None => Err(GpaError::MissingConfigError {
                    field: "--subject, --input or --config".to_string(),
                }),
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn grading_system(&self) -> Option<GradingSystem> {
            self.system
        }

        fn output_format(&self) -> Option<OutputFormat> {
            self.format
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            for subject in &self.subjects {
                validate_non_empty_string("--subject", subject)?;
            }
            if let Some(input) = &self.input {
                validate_file_extensions("--input", std::slice::from_ref(input), &["csv"])?;
            }
            if let Some(config) = &self.config {
                validate_file_extensions("--config", std::slice::from_ref(config), &["toml"])?;
            }
            if !self.interactive
                && self.subjects.is_empty()
                && self.input.is_none()
                && self.config.is_none()
            {
                return Err(GpaError::MissingConfigError {
                    field: "--subject, --input or --config".to_string(),
                });
            }
            Ok(())
        }
    }

}
