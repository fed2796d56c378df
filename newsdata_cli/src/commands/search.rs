use anyhow::Result;
use clap::Args;
use newsdata_lib::NewsClient;

use crate::commands::filters::FilterArgs;
use crate::output::{print_preview, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Sends the first-page request only and reports the match count together
/// with the request that was made.
pub async fn run(args: &SearchArgs, format: &OutputFormat) -> Result<()> {
    let endpoint = args.filters.endpoint()?;
    let filters = args.filters.to_filters(endpoint)?;
    let client = NewsClient::new(&args.filters.api_key);

    let preview = client.preview(endpoint, &filters).await?;

    eprintln!(
        "{}: {} total results ({} on the first page)",
        endpoint, preview.total_results, preview.first_page_count
    );

    print_preview(&preview, format)
}
