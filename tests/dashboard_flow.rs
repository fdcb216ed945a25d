//! End-to-end dashboard flow: a seeded results tree is scanned, merged and
//! rendered into the HTML dashboard.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::tempdir;

use benchboard::chart::{self, ChartTheme, RangePolicy};
use benchboard::html::DashboardPage;
use benchboard::store;

fn metric(value: f64) -> serde_json::Value {
    json!({
        "confidence_interval": {
            "confidence_level": 0.95,
            "lower_bound": value,
            "upper_bound": value,
        },
        "point_estimate": value,
        "standard_error": 0.0,
    })
}

fn write_result(root: &Path, branch: &str, run: &str, bench: &str, mean_ns: f64) {
    let estimates = json!({
        "Mean": metric(mean_ns),
        "Median": metric(mean_ns),
        "MedianAbsDev": metric(mean_ns / 100.0),
        "Slope": metric(mean_ns),
        "StdDev": metric(mean_ns / 50.0),
    });
    let dir = root.join(branch).join(run);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(bench), estimates.to_string()).unwrap();
}

#[test]
fn seeded_results_render_one_chart_per_benchmark() {
    let dir = tempdir().unwrap();
    write_result(dir.path(), "Master", "2024-01-02T00:00:00Z-def456", "parse", 2.0e9);
    write_result(dir.path(), "Master", "2024-01-01T00:00:00Z-abc123", "parse", 1.5e9);
    write_result(dir.path(), "faster io (#12)", "2024-01-03T00:00:00Z-0ff1ce", "parse", 1.2e9);
    write_result(dir.path(), "Master", "2024-01-01T00:00:00Z-abc123", "compile", 60.0e9);

    let benchmarks = store::scan(dir.path());
    assert_eq!(benchmarks.len(), 2);

    let compile = &benchmarks[0];
    assert_eq!(compile.name, "compile");
    assert_eq!(compile.branches.len(), 1);
    assert_eq!(compile.branches[0].results[0].avg, 60.0);

    let parse = &benchmarks[1];
    assert_eq!(parse.name, "parse");
    assert_eq!(parse.branches.len(), 2);
    assert_eq!(parse.branches[0].name, "Master");
    assert_eq!(parse.branches[0].results.len(), 2);
    assert_eq!(parse.branches[0].results[0].timestamp, "2024-01-01T00:00:00Z");
    assert_eq!(parse.branches[0].results[0].avg, 1.5);
    assert_eq!(parse.branches[0].results[1].avg, 2.0);

    let mut page = DashboardPage::new("Benchmark Trends");
    let rendered =
        chart::render_all(&benchmarks, &ChartTheme::dark(), RangePolicy::Auto, &mut page).unwrap();
    assert_eq!(rendered, benchmarks.len());
    assert_eq!(page.chart_count(), 2);

    let html = page.into_html();
    assert!(html.contains(r#"<div id="parse" class="chart">"#));
    assert!(html.contains(r#"<div id="compile" class="chart">"#));
    // 2024-01-01T00:00:00Z as epoch milliseconds.
    assert!(html.contains("1704067200000"));
    assert!(html.contains(r#""name":"faster io (#12)""#));
}

#[test]
fn empty_results_tree_renders_an_empty_dashboard() {
    let dir = tempdir().unwrap();

    let benchmarks = store::scan(dir.path());
    assert!(benchmarks.is_empty());

    let mut page = DashboardPage::new("Benchmark Trends");
    let rendered =
        chart::render_all(&benchmarks, &ChartTheme::dark(), RangePolicy::Auto, &mut page).unwrap();
    assert_eq!(rendered, 0);
    assert_eq!(page.chart_count(), 0);
    assert!(!page.into_html().contains("Highcharts.chart("));
}
