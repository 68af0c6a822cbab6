//! Behavior-driven tests for ticker resolution.
//!
//! These tests verify HOW a (country, base ticker) pair becomes an
//! exchange-qualified ticker, and that unsupported countries stop a run
//! before any retrieval happens.

use std::sync::Arc;

use stockcast_core::{
    resolve, supported_countries, DataLoader, Pipeline, PipelineError, RunParameters,
    YahooChartSource, EXCHANGES,
};
use stockcast_tests::{date, ScriptedHttpClient};

// =============================================================================
// Resolver: Supported Exchanges
// =============================================================================

#[test]
fn when_country_is_usa_ticker_is_used_verbatim() {
    // Given: the USA exchange, which has no suffix
    // When: AAPL is resolved
    let resolved = resolve("USA", "AAPL").expect("USA is supported");

    // Then: the ticker is unchanged and priced in dollars
    assert_eq!(resolved.ticker, "AAPL");
    assert_eq!(resolved.currency, "USD");
}

#[test]
fn when_country_is_japan_tokyo_suffix_is_appended() {
    // Given / When: a Tokyo listing is resolved
    let resolved = resolve("JAPAN", "7203").expect("JAPAN is supported");

    // Then: the .T suffix and yen apply
    assert_eq!(resolved.ticker, "7203.T");
    assert_eq!(resolved.currency, "JPY");
}

#[test]
fn every_supported_country_resolves_case_insensitively() {
    // Given: all twelve exchanges
    assert_eq!(supported_countries().count(), 12);

    for entry in EXCHANGES.iter() {
        // When: the country is given in lower and mixed case
        let lower = resolve(&entry.country.to_lowercase(), "abc").expect("lowercase resolves");
        let upper = resolve(entry.country, "ABC").expect("canonical resolves");

        // Then: both resolve to the same ticker with the exchange suffix
        assert_eq!(lower, upper, "case changed the result for {}", entry.country);
        assert_eq!(upper.ticker, format!("ABC{}", entry.suffix));
        assert_eq!(upper.currency, entry.currency);
    }
}

// =============================================================================
// Resolver: Unsupported Exchanges
// =============================================================================

#[test]
fn when_country_is_unknown_resolution_fails_with_its_name() {
    // Given / When: a country outside the table
    let error = resolve("ATLANTIS", "AAPL").expect_err("unsupported");

    // Then: the error names the country
    assert_eq!(error.country, "ATLANTIS");
    assert!(error.to_string().contains("not supported"));
}

#[tokio::test]
async fn when_country_is_unknown_run_halts_without_network_call() {
    // Given: a pipeline whose transport records every request
    let client = Arc::new(ScriptedHttpClient::new(Vec::new()));
    let source = YahooChartSource::new(client.clone());
    let pipeline = Pipeline::new(DataLoader::new(Arc::new(source)));
    let params = RunParameters::new("ATLANTIS", "AAPL", date("2020-01-01"), date("2021-01-01"), 91)
        .expect("parameters are well-formed");

    // When: the run starts
    let error = pipeline.run(&params).await.expect_err("unsupported exchange");

    // Then: it stops at resolution and the transport was never touched
    assert!(matches!(error, PipelineError::UnsupportedExchange(_)));
    assert_eq!(client.call_count(), 0);
}
