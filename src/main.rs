use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use meta_ads_fetcher::{
    AdLibraryClient, EnvCredentials, ExportArtifact, ExportFormat, SEARCH_ENDPOINT, SearchRequest, StopReason,
    XLSX_FILE_NAME, flatten_ads,
};
use tracing_subscriber::EnvFilter;

/// Fetch active image ads from the Meta Ad Library and export them to a spreadsheet.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search query, e.g. a product category
    #[arg(short, long, default_value = "Cosmetics")]
    query: String,

    /// First ad start date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// Last ad start date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    end: Option<NaiveDate>,

    /// Maximum number of result pages to fetch
    #[arg(short = 'p', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: u32,

    /// Output file, or `-` for stdout
    #[arg(short, long, default_value = XLSX_FILE_NAME)]
    output: String,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Xlsx)]
    format: ExportFormat,

    /// Search endpoint URL
    #[arg(long, default_value = SEARCH_ENDPOINT)]
    endpoint: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let today = Local::now().date_naive();
    let request = SearchRequest::new(
        cli.query,
        cli.start.unwrap_or(today),
        cli.end.unwrap_or(today),
        cli.max_pages,
    )?;

    let credentials = EnvCredentials::new().require()?;
    let client = AdLibraryClient::new(credentials).endpoint(cli.endpoint);

    eprintln!(
        "Searching ads for \"{}\" from {} to {}...",
        request.query, request.start_date, request.end_date
    );

    let pb = ProgressBar::new(u64::from(request.page_limit));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} pages {msg}")?
            .progress_chars("##-"),
    );

    let outcome = client
        .fetch_ads_with_progress(&request, |progress| {
            pb.set_position(u64::from(progress.page));
            pb.set_message(format!("{} ads", progress.total_ads));
        })
        .await;
    pb.finish_and_clear();

    let records = flatten_ads(&outcome.ads);

    match outcome.stop {
        StopReason::Failed(err) if records.is_empty() => return Err(err.into()),
        StopReason::Failed(err) => {
            eprintln!("{err}");
            eprintln!("Keeping {} ads from {} earlier page(s)", records.len(), outcome.pages_fetched);
        }
        StopReason::PageLimit => {
            eprintln!("Stopped after {} page(s); more results are available", outcome.pages_fetched);
        }
        StopReason::Exhausted => {}
    }

    if records.is_empty() {
        eprintln!("No data found for the given query and date range.");
        return Ok(());
    }

    let artifact = ExportArtifact::build(&records, cli.format)?;
    artifact.save(&cli.output)?;

    eprintln!("Data fetched successfully!");
    eprintln!(
        "{} ads written to {} ({})",
        artifact.rows,
        cli.output,
        artifact.mime()
    );

    Ok(())
}
