mod cli;
mod commands;
mod envelope;
mod error;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;
use crate::envelope::Envelope;
use crate::error::CliError;
use crate::metadata::Metadata;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(code = error.code(), "{error}");
            // The report is already on stdout when strict mode trips.
            if !matches!(error, CliError::StrictModeViolation { .. }) {
                let envelope = Envelope::failure(Metadata::new(None, 0), &error);
                if output::render(&envelope, cli.format, cli.pretty).is_err() {
                    eprintln!("error: {error}");
                }
            }
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockcast=info".into()),
        )
        .init();
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let envelope = commands::run(cli).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if cli.strict && !envelope.meta.warnings.is_empty() {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
        });
    }

    Ok(ExitCode::SUCCESS)
}
