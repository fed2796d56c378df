use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use newsdata_lib::validation;
use newsdata_lib::{FetchConfig, NewsClient};

use crate::commands::filters::FilterArgs;
use crate::output::{print_articles, print_snapshot, write_articles_csv, write_articles_json, OutputFormat};
use crate::report::render_report;

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Maximum pages to fetch (1-50), overrides NEWSDATA_MAX_PAGES
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Write the fetched articles to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the fetched articles to this JSON file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write a Markdown analysis report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Also print the first N articles
    #[arg(long)]
    pub sample: Option<usize>,
}

pub async fn run(args: &AnalyzeArgs, format: &OutputFormat) -> Result<()> {
    let endpoint = args.filters.endpoint()?;
    let filters = args.filters.to_filters(endpoint)?;

    let mut config = FetchConfig::from_env();
    if let Some(max_pages) = args.max_pages {
        config = config.with_max_pages(validation::validate_max_pages(max_pages)?);
    }
    let client = NewsClient::with_config(&args.filters.api_key, config);

    let pb = ProgressBar::new(client.config().max_pages as u64);
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>2}/{len:2} {msg}",
    )?);
    pb.set_message(format!("fetching {}...", endpoint));

    let session = client
        .fetch_all(endpoint, &filters, |progress| {
            pb.set_position(progress.page as u64);
            pb.set_message(format!(
                "Pages Fetched: {} | Articles: {}",
                progress.page, progress.records
            ));
        })
        .await;

    pb.finish_with_message(format!(
        "Pages Fetched: {} | Articles: {}",
        session.pages_fetched,
        session.len()
    ));

    if session.is_empty() {
        if session.termination.is_error() {
            bail!("no articles fetched: {}", session.termination);
        }
        if session.pages_fetched == 0 {
            eprintln!("No pages were requested (page budget is 0).");
        } else {
            eprintln!("No articles found for this query.");
        }
        return Ok(());
    }

    if session.termination.is_complete() {
        eprintln!(
            "Fetched {} articles from {} pages",
            session.len(),
            session.pages_fetched
        );
    } else {
        eprintln!(
            "Warning: fetch stopped early ({}). Showing the {} articles collected so far.",
            session.termination,
            session.len()
        );
    }

    let snapshot = session.snapshot();
    print_snapshot(&snapshot, format)?;

    if let Some(n) = args.sample {
        let n = n.min(session.len());
        print_articles(&session.records[..n], format)?;
    }

    if let Some(ref path) = args.csv {
        write_articles_csv(BufWriter::new(File::create(path)?), &session.records)?;
        eprintln!("Wrote {} articles to {}", session.len(), path.display());
    }
    if let Some(ref path) = args.json {
        write_articles_json(BufWriter::new(File::create(path)?), &session.records)?;
        eprintln!("Wrote {} articles to {}", session.len(), path.display());
    }
    if let Some(ref path) = args.report {
        std::fs::write(path, render_report(&session, &snapshot, Utc::now()))?;
        eprintln!("Wrote report to {}", path.display());
    }

    Ok(())
}
