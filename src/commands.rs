use crate::batch::{self, BatchReport};
use crate::config::{AppConfig, Command, ConfigAction, LengthArg, Settings};
use crate::errors::InputError;
use crate::report;
use crate::summarize::Engine;
use anyhow::Context;
use std::path::Path;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_INTERRUPTED: u8 = 130;

pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let settings_path = cfg.settings_path();
    let settings = Settings::load(&settings_path);

    match &cfg.command {
        Command::Config { action } => run_config(action, settings, &settings_path),
        Command::Summarize { input, length } => {
            let engine = build_engine(&cfg, &settings);
            let target = target_length(length, &settings);
            let summary = if input == "-" {
                let text = std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?;
                engine.summarize(&text, target)
            } else {
                engine.summarize_source(Path::new(input), target)?
            };
            print!("{}", report::render_summary(&summary));
            Ok(())
        }
        Command::Batch {
            directory,
            pattern,
            length,
            output,
        } => {
            let engine = build_engine(&cfg, &settings);
            let report = batch::process_directory(directory, pattern, target_length(length, &settings), &engine)?;
            emit(&report, output.as_deref())
        }
        Command::Files { files, length, output } => {
            let engine = build_engine(&cfg, &settings);
            let report = batch::process_collection(files.iter().cloned(), target_length(length, &settings), &engine);
            emit(&report, output.as_deref())
        }
    }
}

fn build_engine(cfg: &AppConfig, settings: &Settings) -> Engine {
    let engine = Engine::new(cfg.engine_config(settings));
    tracing::debug!(mode = ?engine.mode(), "summarization engine ready");
    engine
}

fn target_length(arg: &LengthArg, settings: &Settings) -> usize {
    arg.length.unwrap_or(settings.default_length) as usize
}

fn emit(report: &BatchReport, output: Option<&Path>) -> anyhow::Result<()> {
    if report.is_empty() {
        tracing::info!("batch produced no summaries");
    } else {
        tracing::info!(files = report.len(), errors = report.error_count(), "batch complete");
    }
    match output {
        Some(path) => {
            report::save_report(report, path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Results saved to: {}", path.display());
        }
        None => print!("{}", report::render_terminal(report)),
    }
    Ok(())
}

fn run_config(action: &ConfigAction, mut settings: Settings, path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Set { key, value } => {
            settings.set(key, value)?;
            settings.save(path)?;
            println!("Set {key} = {value} in {}", path.display());
        }
    }
    Ok(())
}

/// Maps a failed run to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<InputError>()
        .map(InputError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
