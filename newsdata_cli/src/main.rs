mod commands;
mod output;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "newsdata")]
#[command(about = "Search and analyze news from the NewsData.io API")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview a query: total matches and the request that would be paginated
    Search(Box<commands::search::SearchArgs>),
    /// Fetch every page of a query and print aggregate statistics
    Analyze(Box<commands::analyze::AnalyzeArgs>),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("newsdata=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Search(args) => commands::search::run(args.as_ref(), &format).await?,
        Commands::Analyze(args) => commands::analyze::run(args.as_ref(), &format).await?,
    }

    Ok(())
}
