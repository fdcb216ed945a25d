//! Chart specification building for benchmark time series.
//!
//! Turns the `/data` payload into renderer-agnostic chart specs: one chart
//! per benchmark, one series per branch, points as (epoch-millisecond, avg)
//! pairs in payload order.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Benchmark, Branch};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("unparseable timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// How the y-axis range of a chart is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Let the rendering library autoscale.
    #[default]
    Auto,
    /// Widen the observed value range to at least 10% around its midpoint.
    Padded,
}

/// One chart series: a branch name and its (epoch-millisecond, avg) points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<(i64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

/// A fully built chart, ready to hand to a rendering sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Id of the page element the chart is drawn into (the benchmark name).
    pub target: String,
    pub title: String,
    pub y_label: String,
    pub y_bounds: Option<AxisBounds>,
    pub series: Vec<Series>,
}

/// Chart colors and surfaces. Passed explicitly into every render call, never
/// installed as process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTheme {
    pub colors: Vec<String>,
    pub background: String,
    pub text_color: String,
    pub highlight_color: String,
}

impl ChartTheme {
    pub fn dark() -> Self {
        Self {
            colors: [
                "#ac4142", "#90a959", "#f4bf75", "#6a9fb5", "#aa759f", "#75b5aa",
                "#752a2a", "#5d742a", "#754e2a", "#2a4e74", "#703664", "#297366",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            background: "#222".to_string(),
            text_color: "#ccc".to_string(),
            highlight_color: "#fff".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            colors: [
                "#ac4142", "#90a959", "#6a9fb5", "#aa759f", "#75b5aa", "#f4bf75",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            background: "#ffffff".to_string(),
            text_color: "#333".to_string(),
            highlight_color: "#000".to_string(),
        }
    }
}

/// Named theme selection for configuration files and CLI flags.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn theme(&self) -> ChartTheme {
        match self {
            ThemeKind::Dark => ChartTheme::dark(),
            ThemeKind::Light => ChartTheme::light(),
        }
    }
}

/// Rendering sink. One call per chart; implementations decide what a render
/// means (HTML section, test recording, ...).
pub trait ChartSink {
    fn render(&mut self, spec: &ChartSpec, theme: &ChartTheme);
}

/// Map a branch to a chart series. Ordering is preserved exactly; nothing is
/// filtered or deduplicated.
pub fn build_series(branch: &Branch) -> Result<Series, ChartError> {
    let mut data = Vec::with_capacity(branch.results.len());
    for result in &branch.results {
        let parsed =
            DateTime::parse_from_rfc3339(&result.timestamp).map_err(|source| {
                ChartError::Timestamp {
                    value: result.timestamp.clone(),
                    source,
                }
            })?;
        data.push((parsed.timestamp_millis(), result.avg));
    }
    Ok(Series {
        name: branch.name.clone(),
        data,
    })
}

/// Build the chart for one benchmark: series in branch order, y-axis labeled
/// in seconds, bounds per the range policy.
pub fn build_chart(bench: &Benchmark, policy: RangePolicy) -> Result<ChartSpec, ChartError> {
    let mut series = Vec::with_capacity(bench.branches.len());
    for branch in &bench.branches {
        series.push(build_series(branch)?);
    }

    let y_bounds = match policy {
        RangePolicy::Auto => None,
        RangePolicy::Padded => padded_bounds(&series),
    };

    Ok(ChartSpec {
        target: bench.name.clone(),
        title: bench.name.clone(),
        y_label: "Seconds".to_string(),
        y_bounds,
        series,
    })
}

/// Render every benchmark in payload order, exactly one render call each.
///
/// All specs are built before the first render call, so a malformed payload
/// never produces a partial page. Returns the number of charts rendered.
pub fn render_all<S: ChartSink>(
    benchmarks: &[Benchmark],
    theme: &ChartTheme,
    policy: RangePolicy,
    sink: &mut S,
) -> Result<usize, ChartError> {
    let mut specs = Vec::with_capacity(benchmarks.len());
    for bench in benchmarks {
        specs.push(build_chart(bench, policy)?);
    }
    for spec in &specs {
        sink.render(spec, theme);
    }
    Ok(specs.len())
}

fn padded_bounds(series: &[Series]) -> Option<AxisBounds> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for s in series {
        for &(_, avg) in &s.data {
            min = min.min(avg);
            max = max.max(avg);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    let mid = (min + max) / 2.0;
    Some(AxisBounds {
        min: min.min(mid * 0.90),
        max: max.max(mid * 1.10),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimingResult;

    #[derive(Default)]
    struct RecordingSink {
        specs: Vec<ChartSpec>,
    }

    impl ChartSink for RecordingSink {
        fn render(&mut self, spec: &ChartSpec, _theme: &ChartTheme) {
            self.specs.push(spec.clone());
        }
    }

    fn branch(name: &str, results: &[(&str, f64)]) -> Branch {
        Branch {
            name: name.to_string(),
            results: results
                .iter()
                .map(|(timestamp, avg)| TimingResult {
                    timestamp: timestamp.to_string(),
                    avg: *avg,
                })
                .collect(),
        }
    }

    #[test]
    fn series_preserves_length_and_order() {
        // Deliberately out of chronological order: the pipeline must not reorder.
        let branch = branch(
            "main",
            &[
                ("2024-02-01T00:00:00Z", 2.0),
                ("2024-01-01T00:00:00Z", 1.5),
                ("2024-03-01T00:00:00Z", 1.0),
            ],
        );

        let series = build_series(&branch).unwrap();
        assert_eq!(series.name, "main");
        assert_eq!(series.data.len(), branch.results.len());
        assert_eq!(series.data[0].1, 2.0);
        assert_eq!(series.data[1].1, 1.5);
        assert_eq!(series.data[2].1, 1.0);
        assert!(series.data[0].0 > series.data[1].0);
    }

    #[test]
    fn example_payload_renders_single_chart() {
        let payload: Vec<Benchmark> = serde_json::from_str(
            r#"[{"name":"bench1","branches":[{"name":"main","results":[
                {"timestamp":"2024-01-01T00:00:00Z","avg":1.5},
                {"timestamp":"2024-01-02T00:00:00Z","avg":2.0}]}]}]"#,
        )
        .unwrap();

        let mut sink = RecordingSink::default();
        let rendered =
            render_all(&payload, &ChartTheme::dark(), RangePolicy::Auto, &mut sink).unwrap();

        assert_eq!(rendered, 1);
        assert_eq!(sink.specs.len(), 1);
        let spec = &sink.specs[0];
        assert_eq!(spec.target, "bench1");
        assert_eq!(spec.y_label, "Seconds");
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].name, "main");
        assert_eq!(
            spec.series[0].data,
            vec![(1_704_067_200_000, 1.5), (1_704_153_600_000, 2.0)]
        );
    }

    #[test]
    fn empty_payload_renders_nothing() {
        let mut sink = RecordingSink::default();
        let rendered =
            render_all(&[], &ChartTheme::dark(), RangePolicy::Auto, &mut sink).unwrap();
        assert_eq!(rendered, 0);
        assert!(sink.specs.is_empty());
    }

    #[test]
    fn benchmark_without_branches_still_renders() {
        let payload = vec![Benchmark {
            name: "empty".to_string(),
            branches: Vec::new(),
        }];

        let mut sink = RecordingSink::default();
        let rendered =
            render_all(&payload, &ChartTheme::dark(), RangePolicy::Auto, &mut sink).unwrap();
        assert_eq!(rendered, 1);
        assert!(sink.specs[0].series.is_empty());
    }

    #[test]
    fn bad_timestamp_fails_without_partial_render() {
        let payload = vec![
            Benchmark {
                name: "good".to_string(),
                branches: vec![branch("main", &[("2024-01-01T00:00:00Z", 1.0)])],
            },
            Benchmark {
                name: "bad".to_string(),
                branches: vec![branch("main", &[("not a date", 1.0)])],
            },
        ];

        let mut sink = RecordingSink::default();
        let err = render_all(&payload, &ChartTheme::dark(), RangePolicy::Auto, &mut sink)
            .unwrap_err();
        assert!(matches!(err, ChartError::Timestamp { .. }));
        assert!(sink.specs.is_empty());
    }

    #[test]
    fn auto_policy_leaves_axis_unbounded() {
        let bench = Benchmark {
            name: "b".to_string(),
            branches: vec![branch("main", &[("2024-01-01T00:00:00Z", 1.0)])],
        };
        let spec = build_chart(&bench, RangePolicy::Auto).unwrap();
        assert!(spec.y_bounds.is_none());
    }

    #[test]
    fn padded_policy_widens_tight_ranges() {
        let bench = Benchmark {
            name: "b".to_string(),
            branches: vec![branch(
                "main",
                &[("2024-01-01T00:00:00Z", 2.0), ("2024-01-02T00:00:00Z", 2.1)],
            )],
        };
        let bounds = build_chart(&bench, RangePolicy::Padded)
            .unwrap()
            .y_bounds
            .unwrap();

        // Midpoint 2.05; the axis reaches at least 10% beyond it on each side.
        assert!((bounds.min - 1.845).abs() < 1e-9);
        assert!((bounds.max - 2.255).abs() < 1e-9);
    }

    #[test]
    fn padded_policy_keeps_wide_ranges() {
        let bench = Benchmark {
            name: "b".to_string(),
            branches: vec![branch(
                "main",
                &[("2024-01-01T00:00:00Z", 1.0), ("2024-01-02T00:00:00Z", 3.0)],
            )],
        };
        let bounds = build_chart(&bench, RangePolicy::Padded)
            .unwrap()
            .y_bounds
            .unwrap();

        assert_eq!(bounds.min, 1.0);
        assert_eq!(bounds.max, 3.0);
    }

    #[test]
    fn padded_policy_without_data_has_no_bounds() {
        let bench = Benchmark {
            name: "b".to_string(),
            branches: Vec::new(),
        };
        let spec = build_chart(&bench, RangePolicy::Padded).unwrap();
        assert!(spec.y_bounds.is_none());
    }
}
