//! Static HTML dashboard generation.
//!
//! Produces a single self-contained page: one container element per benchmark
//! (id equals the benchmark name) and one charting call per container. The
//! theme is inlined into each call rather than installed as library-global
//! options.

use std::io;
use std::path::Path;

use serde_json::json;

use crate::chart::{ChartSink, ChartSpec, ChartTheme};

/// Accumulates rendered charts and writes them out as one dashboard page.
pub struct DashboardPage {
    title: String,
    sections: Vec<String>,
    scripts: Vec<String>,
}

impl DashboardPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
            scripts: Vec::new(),
        }
    }

    pub fn chart_count(&self) -> usize {
        self.scripts.len()
    }

    /// Assemble the final page.
    pub fn into_html(self) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://code.highcharts.com/highcharts.js"></script>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 40px; }}
        .container {{ max-width: 1200px; margin: 0 auto; }}
        .chart {{ margin: 30px 0; min-height: 400px; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
"#,
            title = self.title
        ));

        for section in &self.sections {
            html.push_str(section);
            html.push('\n');
        }

        html.push_str("    </div>\n    <script>\n");
        for script in &self.scripts {
            html.push_str("        ");
            html.push_str(script);
            html.push('\n');
        }
        html.push_str("    </script>\n</body>\n</html>\n");

        html
    }

    pub fn write_to(self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.into_html())
    }
}

impl ChartSink for DashboardPage {
    fn render(&mut self, spec: &ChartSpec, theme: &ChartTheme) {
        self.sections.push(format!(
            r#"        <div id="{}" class="chart"></div>"#,
            spec.target
        ));

        let target = json!(&spec.target);
        let options = chart_options(spec, theme);
        self.scripts
            .push(format!("Highcharts.chart({target}, {options});"));
    }
}

fn chart_options(spec: &ChartSpec, theme: &ChartTheme) -> serde_json::Value {
    let mut y_axis = json!({
        "title": {
            "text": &spec.y_label,
            "style": { "color": &theme.text_color },
        },
        "labels": { "style": { "color": &theme.text_color } },
    });
    if let Some(bounds) = spec.y_bounds {
        y_axis["min"] = json!(bounds.min);
        y_axis["max"] = json!(bounds.max);
    }

    json!({
        "colors": &theme.colors,
        "chart": { "backgroundColor": &theme.background },
        "title": {
            "text": &spec.title,
            "style": { "color": &theme.text_color },
        },
        "legend": {
            "itemStyle": { "color": &theme.text_color },
            "itemHoverStyle": { "color": &theme.highlight_color },
        },
        "xAxis": {
            "type": "datetime",
            "labels": { "style": { "color": &theme.text_color } },
        },
        "yAxis": y_axis,
        "series": &spec.series,
    })
}
