//! Results-directory ingestion.
//!
//! Benchmark runs land on disk as `<results_dir>/<branch>/<timestamp>-<commit>/
//! <benchmark name>`, one criterion-style estimate file per benchmark per run.
//! The scan turns that layout into the merged `/data` payload: one entry per
//! benchmark, one branch per series, points sorted chronologically.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{Benchmark, Branch, TimingResult};

// Run directories are named `<timestamp>-<commit>` with a fixed-width
// `YYYY-MM-DDTHH:MM:SSZ` prefix.
const TIMESTAMP_LEN: usize = "YYYY-MM-DDTHH:MM:SSZ".len();

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Criterion estimate file contents. Only the mean feeds the charts, but the
/// full shape must be present for a file to count as a result.
#[derive(Debug, Deserialize)]
pub struct Estimates {
    #[serde(rename = "Mean")]
    pub mean: Metric,
    #[serde(rename = "Median")]
    pub median: Metric,
    #[serde(rename = "MedianAbsDev")]
    pub median_abs_dev: Metric,
    #[serde(rename = "Slope")]
    pub slope: Metric,
    #[serde(rename = "StdDev")]
    pub std_dev: Metric,
}

#[derive(Debug, Deserialize)]
pub struct Metric {
    pub confidence_interval: ConfidenceInterval,
    pub point_estimate: f64,
    pub standard_error: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConfidenceInterval {
    pub confidence_level: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Scan the results directory and merge every readable run into the payload.
///
/// Unreadable or unparseable entries are skipped with a warning; they never
/// abort the scan. A missing directory yields an empty payload. Output is
/// deterministic: benchmarks and branches sorted by name, results by
/// timestamp.
pub fn scan(results_dir: &Path) -> Vec<Benchmark> {
    if !results_dir.is_dir() {
        warn!(path = %results_dir.display(), "results directory missing, serving empty payload");
        return Vec::new();
    }

    let mut merged: HashMap<String, Benchmark> = HashMap::new();
    for entry in WalkDir::new(results_dir).min_depth(3).max_depth(3) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable results entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(bench) = load_entry(&entry) {
            merge(&mut merged, bench);
        }
    }

    let mut benchmarks: Vec<Benchmark> = merged.into_values().collect();
    for bench in &mut benchmarks {
        bench.branches.sort_by(|a, b| a.name.cmp(&b.name));
        for branch in &mut bench.branches {
            branch.results.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        }
    }
    benchmarks.sort_by(|a, b| a.name.cmp(&b.name));
    benchmarks
}

/// Read one estimate file into a single-point benchmark. The benchmark name
/// is the file name, the branch the grandparent directory, the timestamp the
/// run directory prefix.
fn load_entry(entry: &DirEntry) -> Option<Benchmark> {
    let name = entry.file_name().to_str()?.to_owned();
    let run_dir = entry.path().parent()?;
    let branch = run_dir.parent()?.file_name()?.to_str()?.to_owned();

    let run_name = run_dir.file_name()?.to_str()?;
    let timestamp = match run_timestamp(run_name) {
        Some(timestamp) => timestamp.to_owned(),
        None => {
            warn!(run = %run_name, "skipping run directory without a timestamp prefix");
            return None;
        }
    };

    let content = match fs::read_to_string(entry.path()) {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %entry.path().display(), %err, "skipping unreadable estimate file");
            return None;
        }
    };
    let estimates: Estimates = match serde_json::from_str(&content) {
        Ok(estimates) => estimates,
        Err(err) => {
            warn!(path = %entry.path().display(), %err, "skipping unparseable estimate file");
            return None;
        }
    };

    debug!(benchmark = %name, %branch, %timestamp, "loaded benchmark result");
    Some(Benchmark {
        name,
        branches: vec![Branch {
            name: branch,
            results: vec![TimingResult {
                timestamp,
                avg: estimates.mean.point_estimate / NANOS_PER_SEC,
            }],
        }],
    })
}

fn run_timestamp(run_name: &str) -> Option<&str> {
    let timestamp = run_name.get(..TIMESTAMP_LEN)?;
    if run_name.as_bytes().get(TIMESTAMP_LEN) != Some(&b'-') {
        return None;
    }
    DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(timestamp)
}

/// Merge a single-point benchmark into the accumulated payload: append the
/// point to its branch when the branch exists, otherwise adopt the branch.
fn merge(merged: &mut HashMap<String, Benchmark>, mut bench: Benchmark) {
    match merged.entry(bench.name.clone()) {
        Entry::Occupied(mut slot) => {
            let incoming = bench.branches.remove(0);
            let existing = slot.get_mut();
            match existing
                .branches
                .iter_mut()
                .find(|branch| branch.name == incoming.name)
            {
                Some(branch) => branch.results.extend(incoming.results),
                None => existing.branches.push(incoming),
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(bench);
        }
    }
}
