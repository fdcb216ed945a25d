//! Benchboard benchmark trend dashboard
//!
//! This crate tracks benchmark timings across branches and renders them as
//! time-series charts. It covers:
//! - Ingesting criterion-style estimate files from a results directory
//! - Serving the merged data and a CI notification webhook over HTTP
//! - Building one chart specification per benchmark, one series per branch
//! - Writing a static HTML dashboard from a single fetch of the data endpoint

pub mod chart;
pub mod client;
pub mod config;
pub mod html;
pub mod server;
pub mod store;
pub mod webhook;

use serde::{Deserialize, Serialize};

/// A benchmark tracked over time. Each benchmark becomes one chart, targeted
/// at a page element whose id equals `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmark {
    pub name: String,
    pub branches: Vec<Branch>,
}

/// One branch's history for a benchmark. Each branch becomes one chart series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub results: Vec<TimingResult>,
}

/// A single measured run: when it ran and the average duration in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingResult {
    pub timestamp: String,
    pub avg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_roundtrips_through_wire_format() {
        let payload = vec![Benchmark {
            name: "bench1".to_string(),
            branches: vec![Branch {
                name: "main".to_string(),
                results: vec![TimingResult {
                    timestamp: "2024-01-01T00:00:00Z".to_string(),
                    avg: 1.5,
                }],
            }],
        }];

        let json = serde_json::to_string(&payload).unwrap();
        let decoded: Vec<Benchmark> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "bench1");
        assert_eq!(decoded[0].branches[0].results, payload[0].branches[0].results);
    }
}
