mod exchanges;
mod run;

use std::time::Instant;

use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::envelope::Envelope;
use crate::error::CliError;
use crate::metadata::Metadata;

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub source: Option<&'static str>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            source: None,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Run(args) => run::run(cli, args).await?,
        Command::Exchanges => exchanges::run()?,
    };

    let CommandResult {
        data,
        warnings,
        source,
    } = command_result;

    let mut metadata = Metadata::new(source, started.elapsed().as_millis() as u64);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    Ok(Envelope::ok(metadata, data))
}
