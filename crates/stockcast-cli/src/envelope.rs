use serde::Serialize;

use crate::error::CliError;
use crate::metadata::Metadata;

/// Report wrapper written to stdout: `{meta, data, errors}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub meta: Metadata,
    pub data: T,
    pub errors: Vec<EnvelopeError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn ok(meta: Metadata, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }
}

impl Envelope<serde_json::Value> {
    /// Envelope for a run that halted with `error`.
    pub fn failure(meta: Metadata, error: &CliError) -> Self {
        Self {
            meta,
            data: serde_json::Value::Null,
            errors: vec![EnvelopeError {
                code: error.code().to_owned(),
                message: error.to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcast_core::{resolve, PipelineError};

    #[test]
    fn failure_carries_code_and_message() {
        let error = CliError::from(PipelineError::from(
            resolve("ATLANTIS", "AAPL").expect_err("unsupported"),
        ));
        let envelope = Envelope::failure(Metadata::new(None, 0), &error);
        let json = serde_json::to_value(&envelope).expect("serializes");

        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["errors"][0]["code"], "run.unsupported_exchange");
        assert_eq!(
            json["errors"][0]["message"],
            "the stock exchange for 'ATLANTIS' is not supported"
        );
    }
}
