use clap::Parser;
use gpa_calc::app::Session;
use gpa_calc::core::ConfigProvider;
use gpa_calc::utils::error::{ErrorSeverity, GpaError};
use gpa_calc::utils::{logger, validation::Validate};
use gpa_calc::{CliConfig, GpaEngine, GpaReport, Settings, SubjectForm, TomlConfig};

fn exit_code(e: &GpaError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

fn run(config: &CliConfig) -> gpa_calc::Result<i32> {
    config.validate()?;

    let file_config = match &config.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            Some(file_config)
        }
        None => None,
    };

    let settings = Settings::resolve(
        config,
        file_config.as_ref().map(|c| c as &dyn ConfigProvider),
    );
    tracing::debug!("Effective settings: {:?}", settings);

    if config.interactive {
        let subjects = match config.subject_source(file_config.as_ref()) {
            Ok(source) => source.load_subjects()?,
            Err(_) => Vec::new(),
        };
        let form = if subjects.is_empty() {
            let mut form = SubjectForm::new();
            form.set_grading_system(settings.system);
            form
        } else {
            SubjectForm::with_subjects(subjects, settings.system)
        };

        let stdin = std::io::stdin();
        let mut session = Session::new(form, stdin.lock(), std::io::stdout());
        session.run()?;
        return Ok(0);
    }

    // 讀取科目
    let source = config.subject_source(file_config.as_ref())?;
    tracing::info!("Reading subjects from {}", source.describe());
    let subjects = source.load_subjects()?;

    let breakdown = GpaEngine::new(settings.system).compute(&subjects);
    let report = GpaReport::new(&subjects, &breakdown);
    for warning in report.unrendered_warnings(settings.format) {
        tracing::warn!("{}", warning);
    }

    print!("{}", report.render(settings.format)?);

    if report.outcome.is_value() {
        Ok(0)
    } else {
        tracing::error!("GPA could not be computed: {}", report.outcome);
        Ok(4)
    }
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    match run(&config) {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}
