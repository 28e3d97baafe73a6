use clap::Parser;
use percent_calc::core::export::write_export;
use percent_calc::utils::error::ErrorSeverity;
use percent_calc::utils::logger;
use percent_calc::{
    CalcError, CalculatorEngine, CalculatorKind, CliConfig, Command, ConfigProvider,
    HistoryStore, JsonFileHistoryStore, Settings, TomlConfig,
};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    if settings.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);
    tracing::debug!("Effective settings: {:?}", settings);

    let store = JsonFileHistoryStore::with_limit(settings.history_dir(), settings.history_limit());
    let mut engine = CalculatorEngine::new(store)
        .with_grade_scale(settings.grade_scale.clone())
        .with_history(settings.history_enabled());

    if let Err(e) = run(&cli, &settings, &mut engine) {
        tracing::error!(
            "{} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(&e);
    }

    Ok(())
}

fn load_settings(cli: &CliConfig) -> percent_calc::Result<Settings> {
    let file_config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };
    Settings::resolve(&file_config, &cli.overrides())
}

fn exit_with(e: &CalcError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e))
}

fn exit_code(e: &CalcError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn run<S: HistoryStore>(
    cli: &CliConfig,
    settings: &Settings,
    engine: &mut CalculatorEngine<S>,
) -> percent_calc::Result<()> {
    match &cli.command {
        Command::History { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind.parse::<CalculatorKind>()?],
                None => CalculatorKind::ALL.to_vec(),
            };
            for kind in kinds {
                let entries = engine.history(kind)?;
                if entries.is_empty() {
                    continue;
                }
                println!("[{}]", kind);
                for entry in entries {
                    println!("  {}", entry);
                }
            }
        }
        Command::ClearHistory { kind } => {
            let kind = kind.parse::<CalculatorKind>()?;
            engine.clear_history(kind)?;
            println!("Cleared {} history", kind);
        }
        command => {
            if let Some(request) = command.to_request()? {
                let calculation = engine.calculate(&request)?;
                println!("{}", calculation);

                if cli.export {
                    let path = write_export(&calculation, Path::new(settings.export_dir()))?;
                    println!("📁 Exported to: {}", path.display());
                }
            }
        }
    }
    Ok(())
}
