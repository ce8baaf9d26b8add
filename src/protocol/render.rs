//! Response body rendering.

use crate::metric::{format_counter, format_gauge, MetricKind};
use crate::storage::{Storage, StorageError};

/// Look up a single metric and render it as a plain-text scalar.
pub fn render_value(storage: &dyn Storage, kind: &str, name: &str) -> Result<String, StorageError> {
    match kind.parse::<MetricKind>()? {
        MetricKind::Gauge => storage.get_gauge(name).map(format_gauge),
        MetricKind::Counter => storage.get_counter(name).map(format_counter),
    }
}

/// Render the metric listing page.
pub fn render_listing(metrics: &[String]) -> String {
    let mut html = String::from("<html><head><title>Metrics</title></head><body>");
    html.push_str("<h1>Current Metrics</h1><ul>");
    for metric in metrics {
        html.push_str("<li>");
        html.push_str(&escape_html(metric));
        html.push_str("</li>");
    }
    html.push_str("</ul></body></html>");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
