//! Markdown analysis report.

use chrono::{DateTime, Utc};
use newsdata_lib::analysis::TOP_SOURCES;
use newsdata_lib::snapshot::AggregateSnapshot;
use newsdata_lib::FetchSession;

use crate::output::report_rows;

/// Renders the full report for one fetch. The API key never appears: request
/// details only carry the endpoint URL and filter parameters.
pub fn render_report(
    session: &FetchSession,
    snapshot: &AggregateSnapshot,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("# NewsData.io Analysis Report".to_string());
    out.push(String::new());
    out.push(format!(
        "Generated on: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !session.termination.is_complete() {
        out.push(String::new());
        out.push(format!(
            "> **Partial results:** the fetch stopped early ({}). \
             Statistics cover the {} articles collected before that point.",
            session.termination,
            session.len()
        ));
    }

    out.push(String::new());
    out.push("## API Request Details".to_string());
    out.push(String::new());
    match session.last_request {
        Some(ref request) => out.push(report_rows::params(request)),
        None => out.push(format!("Endpoint: {}", session.endpoint)),
    }

    out.push(String::new());
    out.push("## Summary Statistics".to_string());
    out.push(String::new());
    out.push(report_rows::summary(snapshot));

    if let Some(ref summary) = snapshot.sentiment {
        out.push(String::new());
        out.push("## Sentiment Analysis Results".to_string());
        out.push(String::new());
        out.push(report_rows::sentiment(summary));
    }

    out.push(String::new());
    out.push(format!("## Top {} News Sources", TOP_SOURCES));
    out.push(String::new());
    out.push(report_rows::ranked(&snapshot.top_sources));

    out.push(String::new());
    out.push("## Sentiment Distribution".to_string());
    out.push(String::new());
    out.push(report_rows::shares(snapshot));

    out.push(String::new());
    out.push("## Fetch Status".to_string());
    out.push(String::new());
    out.push(format!("- Pages fetched: {}", session.pages_fetched));
    out.push(format!("- Articles collected: {}", session.len()));
    if let Some(total) = session.total_results {
        out.push(format!("- Total results reported by the API: {}", total));
    }
    out.push(format!("- Stopped because: {}", session.termination));
    out.push(String::new());

    out.join("\n")
}
