use std::io::Write;

use anyhow::Result;
use newsdata_lib::analysis::{clean_keywords, SentimentSummary};
use newsdata_lib::snapshot::AggregateSnapshot;
use newsdata_lib::types::Article;
use newsdata_lib::{raw_records, PagePreview, RequestDetails};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

/// Separator for list-valued columns in flat exports.
pub const LIST_SEPARATOR: &str = "; ";

#[derive(Tabled, Serialize)]
struct ParamRow {
    #[tabled(rename = "Parameter")]
    #[serde(rename = "Parameter")]
    name: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    #[serde(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct SentimentStatRow {
    #[tabled(rename = "Sentiment")]
    #[serde(rename = "Sentiment")]
    label: String,
    #[tabled(rename = "Average")]
    #[serde(rename = "Average")]
    average: String,
    #[tabled(rename = "Maximum")]
    #[serde(rename = "Maximum")]
    maximum: String,
    #[tabled(rename = "Minimum")]
    #[serde(rename = "Minimum")]
    minimum: String,
}

#[derive(Tabled, Serialize)]
struct RankRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Articles")]
    #[serde(rename = "Articles")]
    count: usize,
}

#[derive(Tabled, Serialize)]
struct ShareRow {
    #[tabled(rename = "Sentiment")]
    #[serde(rename = "Sentiment")]
    label: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    count: usize,
    #[tabled(rename = "Percentage")]
    #[serde(rename = "Percentage")]
    percentage: String,
}

#[derive(Tabled, Serialize)]
struct DayRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    day: String,
    #[tabled(rename = "Articles")]
    #[serde(rename = "Articles")]
    count: usize,
}

#[derive(Tabled, Serialize)]
struct ArticleRow {
    #[tabled(rename = "Published")]
    #[serde(rename = "Published")]
    published: String,
    #[tabled(rename = "Source")]
    #[serde(rename = "Source")]
    source: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Sentiment")]
    #[serde(rename = "Sentiment")]
    sentiment: String,
    #[tabled(rename = "Link")]
    #[serde(rename = "Link")]
    link: String,
}

/// One flattened statistic, used when a snapshot is printed as CSV.
#[derive(Serialize)]
struct StatRow {
    section: &'static str,
    label: String,
    value: String,
}

/// Flat article record for CSV export.
#[derive(Serialize)]
struct ArticleCsvRow {
    source_id: String,
    source_name: String,
    title: String,
    description: String,
    link: String,
    #[serde(rename = "pubDate")]
    pub_date: String,
    sentiment: String,
    sentiment_positive: Option<f64>,
    sentiment_neutral: Option<f64>,
    sentiment_negative: Option<f64>,
    keywords: String,
    category: String,
    country: String,
}

// -- Row builders --

fn build_param_rows(request: &RequestDetails) -> Vec<ParamRow> {
    let mut rows = vec![
        ParamRow {
            name: "endpoint".to_string(),
            value: request.endpoint.to_string(),
        },
        ParamRow {
            name: "url".to_string(),
            value: request.url.clone(),
        },
    ];
    rows.extend(request.params.iter().map(|(k, v)| ParamRow {
        name: k.clone(),
        value: v.clone(),
    }));
    rows
}

fn build_summary_rows(snapshot: &AggregateSnapshot) -> Vec<MetricRow> {
    let mut rows = vec![
        MetricRow {
            metric: "Total Articles".to_string(),
            value: snapshot.total_articles.to_string(),
        },
        MetricRow {
            metric: "Unique Sources".to_string(),
            value: snapshot.unique_sources.to_string(),
        },
        MetricRow {
            metric: "Countries Covered".to_string(),
            value: snapshot.unique_countries.to_string(),
        },
    ];
    if let Some(summary) = &snapshot.sentiment {
        rows.push(MetricRow {
            metric: "Articles With Sentiment Scores".to_string(),
            value: summary.sample_size.to_string(),
        });
    }
    rows
}

fn build_sentiment_stat_rows(summary: &SentimentSummary) -> Vec<SentimentStatRow> {
    vec![
        SentimentStatRow {
            label: "Positive".to_string(),
            average: format_score(summary.avg_positive),
            maximum: format_score(summary.max_positive),
            minimum: format_score(summary.min_positive),
        },
        SentimentStatRow {
            label: "Neutral".to_string(),
            average: format_score(summary.avg_neutral),
            maximum: "-".to_string(),
            minimum: "-".to_string(),
        },
        SentimentStatRow {
            label: "Negative".to_string(),
            average: format_score(summary.avg_negative),
            maximum: format_score(summary.max_negative),
            minimum: format_score(summary.min_negative),
        },
    ]
}

fn build_rank_rows(ranked: &[(String, usize)]) -> Vec<RankRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, (name, count))| RankRow {
            rank: i + 1,
            name: name.clone(),
            count: *count,
        })
        .collect()
}

fn build_share_rows(snapshot: &AggregateSnapshot) -> Vec<ShareRow> {
    snapshot
        .sentiment_distribution
        .iter()
        .map(|s| ShareRow {
            label: capitalize(&s.label.to_string()),
            count: s.count,
            percentage: format!("{:.2}%", s.percentage),
        })
        .collect()
}

fn build_day_rows(timeline: &[(String, usize)]) -> Vec<DayRow> {
    timeline
        .iter()
        .map(|(day, count)| DayRow {
            day: day.clone(),
            count: *count,
        })
        .collect()
}

fn build_article_rows(articles: &[Article]) -> Vec<ArticleRow> {
    articles
        .iter()
        .map(|a| ArticleRow {
            published: a.pub_date.clone().unwrap_or_default(),
            source: a.source_name.clone().unwrap_or_default(),
            title: truncate(a.title.as_deref().unwrap_or_default(), 80),
            sentiment: a.sentiment.map(|s| s.to_string()).unwrap_or_default(),
            link: a.link.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_stat_rows(snapshot: &AggregateSnapshot) -> Vec<StatRow> {
    let mut rows: Vec<StatRow> = build_summary_rows(snapshot)
        .into_iter()
        .map(|r| StatRow {
            section: "summary",
            label: r.metric,
            value: r.value,
        })
        .collect();
    if let Some(summary) = &snapshot.sentiment {
        for (label, value) in [
            ("avg_positive", summary.avg_positive),
            ("avg_neutral", summary.avg_neutral),
            ("avg_negative", summary.avg_negative),
            ("max_positive", summary.max_positive),
            ("min_positive", summary.min_positive),
            ("max_negative", summary.max_negative),
            ("min_negative", summary.min_negative),
        ] {
            rows.push(StatRow {
                section: "sentiment",
                label: label.to_string(),
                value: format_score(value),
            });
        }
    }
    let ranked = [
        ("source", &snapshot.top_sources),
        ("category", &snapshot.top_categories),
        ("country", &snapshot.top_countries),
        ("keyword", &snapshot.keywords),
        ("day", &snapshot.timeline),
    ];
    for (section, counts) in ranked {
        rows.extend(counts.iter().map(|(label, count)| StatRow {
            section,
            label: label.clone(),
            value: count.to_string(),
        }));
    }
    rows.extend(snapshot.sentiment_distribution.iter().map(|s| StatRow {
        section: "sentiment_distribution",
        label: s.label.to_string(),
        value: s.count.to_string(),
    }));
    rows
}

fn build_csv_row(article: &Article) -> ArticleCsvRow {
    let stats = article.sentiment_stats;
    ArticleCsvRow {
        source_id: article.source_id.clone().unwrap_or_default(),
        source_name: article.source_name.clone().unwrap_or_default(),
        title: article.title.clone().unwrap_or_default(),
        description: article.description.clone().unwrap_or_default(),
        link: article.link.clone().unwrap_or_default(),
        pub_date: article.pub_date.clone().unwrap_or_default(),
        sentiment: article.sentiment.map(|s| s.to_string()).unwrap_or_default(),
        sentiment_positive: stats.map(|s| s.positive),
        sentiment_neutral: stats.map(|s| s.neutral),
        sentiment_negative: stats.map(|s| s.negative),
        keywords: clean_keywords(&article.keywords).join(LIST_SEPARATOR),
        category: article.category.join(LIST_SEPARATOR),
        country: article.country.join(LIST_SEPARATOR),
    }
}

// -- Rendering --

fn render<T: Tabled>(rows: &[T], format: &OutputFormat) -> String {
    let mut table = Table::new(rows);
    if *format == OutputFormat::Markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

pub(crate) fn markdown_table<T: Tabled>(rows: &[T]) -> String {
    render(rows, &OutputFormat::Markdown)
}

fn print_section<T: Tabled>(title: &str, rows: &[T], format: &OutputFormat) {
    if rows.is_empty() {
        return;
    }
    match format {
        OutputFormat::Markdown => println!("\n### {}\n", title),
        _ => println!("\n{}", title),
    }
    println!("{}", render(rows, format));
}

fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- Public printers --

pub fn print_preview(preview: &PagePreview, format: &OutputFormat) -> Result<()> {
    let rows = build_param_rows(&preview.request);
    match format {
        OutputFormat::Json => print_json(preview),
        OutputFormat::Csv => print_csv(&rows)?,
        OutputFormat::Table | OutputFormat::Markdown => {
            print_section("Request", &rows, format);
        }
    }
    Ok(())
}

pub fn print_snapshot(snapshot: &AggregateSnapshot, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(snapshot),
        OutputFormat::Csv => print_csv(&build_stat_rows(snapshot))?,
        OutputFormat::Table | OutputFormat::Markdown => {
            print_section("Summary", &build_summary_rows(snapshot), format);
            if let Some(summary) = &snapshot.sentiment {
                print_section("Sentiment Scores", &build_sentiment_stat_rows(summary), format);
            }
            print_section("Top Sources", &build_rank_rows(&snapshot.top_sources), format);
            print_section("Top Categories", &build_rank_rows(&snapshot.top_categories), format);
            print_section("Top Countries", &build_rank_rows(&snapshot.top_countries), format);
            print_section("Sentiment Distribution", &build_share_rows(snapshot), format);
            print_section("Top Keywords", &build_rank_rows(&snapshot.keywords), format);
            print_section("Articles per Day", &build_day_rows(&snapshot.timeline), format);
        }
    }
    Ok(())
}

pub fn print_articles(articles: &[Article], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&articles),
        OutputFormat::Csv => write_articles_csv(std::io::stdout(), articles)?,
        OutputFormat::Table | OutputFormat::Markdown => {
            print_section("Sample Articles", &build_article_rows(articles), format);
        }
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Export writers --

/// Writes one flattened CSV row per article.
pub fn write_articles_csv<W: Write>(writer: W, articles: &[Article]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for article in articles {
        wtr.serialize(build_csv_row(article))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the articles exactly as the API sent them, as a pretty-printed
/// JSON array.
pub fn write_articles_json<W: Write>(mut writer: W, articles: &[Article]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, &raw_records(articles)?)?;
    writeln!(writer)?;
    Ok(())
}

// -- Formatting helpers --

pub(crate) fn format_score(value: f64) -> String {
    format!("{:.2}", value)
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

pub(crate) mod report_rows {
    //! Row builders shared with the Markdown report.
    use super::*;

    pub fn summary(snapshot: &AggregateSnapshot) -> String {
        markdown_table(&build_summary_rows(snapshot))
    }

    pub fn sentiment(summary: &SentimentSummary) -> String {
        markdown_table(&build_sentiment_stat_rows(summary))
    }

    pub fn ranked(counts: &[(String, usize)]) -> String {
        markdown_table(&build_rank_rows(counts))
    }

    pub fn shares(snapshot: &AggregateSnapshot) -> String {
        markdown_table(&build_share_rows(snapshot))
    }

    pub fn params(request: &RequestDetails) -> String {
        markdown_table(&build_param_rows(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdata_lib::types::NewsResponse;

    fn load_fixture_articles() -> Vec<Article> {
        let json_str = include_str!("../../newsdata_api/tests/fixtures/latest_page.json");
        let resp: NewsResponse = serde_json::from_str(json_str).unwrap();
        resp.into_articles()
    }

    fn csv_from_articles(articles: &[Article]) -> String {
        let mut buf = Vec::new();
        write_articles_csv(&mut buf, articles).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // -- Formatting helpers --

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(70.0), "70.00");
        assert_eq!(format_score(4.456), "4.46");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("positive"), "Positive");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    // -- CSV export --

    #[test]
    fn test_csv_export_headers() {
        let csv = csv_from_articles(&load_fixture_articles());
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "source_id,source_name,title,description,link,pubDate,sentiment,\
             sentiment_positive,sentiment_neutral,sentiment_negative,keywords,category,country"
        );
    }

    #[test]
    fn test_csv_export_flattens_lists() {
        let articles = load_fixture_articles();
        let row = build_csv_row(&articles[0]);
        assert_eq!(row.keywords, "ai; semiconductors; markets");
        assert_eq!(row.category, "business; technology");
        assert_eq!(row.country, "united states of america; us");
        assert_eq!(row.sentiment, "positive");
        assert_eq!(row.sentiment_positive, Some(80.5));
    }

    #[test]
    fn test_csv_export_missing_fields_are_blank() {
        let articles = load_fixture_articles();
        let row = build_csv_row(&articles[2]);
        assert_eq!(row.sentiment, "");
        assert_eq!(row.sentiment_positive, None);
        assert_eq!(row.keywords, "");
        assert_eq!(row.category, "");
        assert_eq!(row.country, "us");
    }

    #[test]
    fn test_csv_export_one_row_per_article() {
        let csv = csv_from_articles(&load_fixture_articles());
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        assert_eq!(rdr.records().count(), 3);
    }

    // -- JSON export --

    #[test]
    fn test_json_export_keeps_unmodeled_fields() {
        let mut buf = Vec::new();
        write_articles_json(&mut buf, &load_fixture_articles()).unwrap();
        let val: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let arr = val.as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr[0]["article_id"], "a1b2c3");
        assert_eq!(arr[0]["source_priority"], 1200);
        assert_eq!(arr[0]["pubDate"], "2024-01-02 10:00:00");
    }

    #[test]
    fn test_json_export_reproduces_api_records() {
        let json_str = include_str!("../../newsdata_api/tests/fixtures/latest_page.json");
        let original: serde_json::Value = serde_json::from_str(json_str).unwrap();
        let mut buf = Vec::new();
        write_articles_json(&mut buf, &load_fixture_articles()).unwrap();
        let val: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(val, original["results"]);
        assert_eq!(
            val[2]["sentiment"],
            "ONLY AVAILABLE IN PROFESSIONAL AND CORPORATE PLANS"
        );
        assert_eq!(val[2]["country"], "us");
        assert!(val[1]["keywords"].is_null());
    }

    // -- Row builders --

    #[test]
    fn test_sentiment_rows_neutral_has_no_extrema() {
        let snapshot = AggregateSnapshot::compute(&load_fixture_articles());
        let rows = build_sentiment_stat_rows(snapshot.sentiment.as_ref().unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].maximum, "80.50");
        assert_eq!(rows[1].maximum, "-");
        assert_eq!(rows[1].minimum, "-");
        assert_eq!(rows[2].maximum, "70.00");
    }

    #[test]
    fn test_rank_rows_numbered_from_one() {
        let rows = build_rank_rows(&[("a".to_string(), 3), ("b".to_string(), 1)]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].name, "b");
    }

    #[test]
    fn test_share_rows_formatting() {
        let snapshot = AggregateSnapshot::compute(&load_fixture_articles());
        let rows = build_share_rows(&snapshot);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.percentage == "33.33%"));
        assert_eq!(rows[0].label, "Positive");
    }

    #[test]
    fn test_stat_rows_cover_sections() {
        let snapshot = AggregateSnapshot::compute(&load_fixture_articles());
        let rows = build_stat_rows(&snapshot);
        for section in ["summary", "sentiment", "source", "country", "day", "sentiment_distribution"] {
            assert!(rows.iter().any(|r| r.section == section), "missing {}", section);
        }
    }

    #[test]
    fn test_article_rows_mapping() {
        let rows = build_article_rows(&load_fixture_articles());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].source, "Example News");
        assert_eq!(rows[0].published, "2024-01-02 10:00:00");
        assert_eq!(rows[2].sentiment, "");
    }

    // -- Markdown --

    #[test]
    fn test_markdown_table_structure() {
        let snapshot = AggregateSnapshot::compute(&load_fixture_articles());
        let md = markdown_table(&build_summary_rows(&snapshot));
        assert!(md.contains('|'));
        assert!(md.contains("---"));
        assert!(md.lines().next().unwrap().contains("Metric"));
        assert!(md.contains("Total Articles"));
    }
}
