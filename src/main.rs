mod batch;
mod commands;
mod config;
mod errors;
mod logging;
mod report;
mod summarize;

use crate::config::AppConfig;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging();

    let cfg = AppConfig::from_env_and_args();
    if let Err(e) = cfg.validate() {
        tracing::error!(config_error=%e, "invalid config");
        return ExitCode::from(commands::EXIT_USAGE);
    }

    // The core is synchronous; run it off the runtime so Ctrl-C stays observable
    let work = tokio::task::spawn_blocking(move || commands::run(cfg));
    tokio::select! {
        res = work => match res {
            Ok(Ok(())) => ExitCode::SUCCESS,
            Ok(Err(e)) => {
                eprintln!("Error: {e:#}");
                ExitCode::from(commands::exit_code(&e))
            }
            Err(e) => {
                tracing::error!(error=?e, "summarization task terminated abnormally");
                ExitCode::from(commands::EXIT_FAILURE)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            // an in-flight blocking call cannot be cancelled, so do not wait for it
            std::process::exit(i32::from(commands::EXIT_INTERRUPTED));
        }
    }
}
