use serde::Serialize;
use stockcast_core::{ExchangeEntry, EXCHANGES};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ExchangesResponseData {
    exchanges: &'static [ExchangeEntry],
}

pub fn run() -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(ExchangesResponseData {
        exchanges: &EXCHANGES,
    })?;
    Ok(CommandResult::ok(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_twelve_exchanges() {
        let result = run().expect("static table");
        let exchanges = result.data["exchanges"].as_array().expect("array");

        assert_eq!(exchanges.len(), 12);
        assert_eq!(exchanges[0]["country"], "USA");
        assert_eq!(exchanges[1]["suffix"], ".T");
    }
}
