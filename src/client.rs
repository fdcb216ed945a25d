//! Data-endpoint client: one fetch, one render pass.
//!
//! The dashboard is built from a single GET of the data endpoint. Failures
//! are returned to the caller with their reason instead of being swallowed;
//! nothing is rendered unless the whole payload parsed.

use thiserror::Error;
use tracing::debug;

use crate::chart::{self, ChartError, ChartSink, ChartTheme, RangePolicy};
use crate::Benchmark;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Parse a response body as the benchmark payload. Missing fields are a
/// decode failure; they never reach the renderer as defaults.
pub fn parse_payload(body: &[u8]) -> Result<Vec<Benchmark>, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

/// Issue a single GET against the data endpoint and parse the payload.
pub async fn fetch_benchmarks(url: &str) -> Result<Vec<Benchmark>, FetchError> {
    debug!(%url, "fetching benchmark data");
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let body = response.bytes().await?;
    parse_payload(&body)
}

/// The complete load pass: fetch once, then render every benchmark in
/// payload order. Returns the number of charts rendered.
pub async fn load_and_render<S: ChartSink>(
    url: &str,
    theme: &ChartTheme,
    policy: RangePolicy,
    sink: &mut S,
) -> Result<usize, LoaderError> {
    let benchmarks = fetch_benchmarks(url).await?;
    debug!(benchmarks = benchmarks.len(), "payload fetched");
    Ok(chart::render_all(&benchmarks, theme, policy, sink)?)
}
