use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use net_liquidity_lib::config::Settings;
use net_liquidity_lib::core::orchestrator;
use net_liquidity_lib::fetcher::fred::FredFetcher;
use net_liquidity_lib::view::{html, terminal};
use net_liquidity_lib::{init_tracing, DataLocation, DatasetLoader, Session};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "net-liquidity-dashboard", about = "Net liquidity history table and moving-average chart")]
struct Cli {
    /// Dataset location: a file path or an http(s) URL. Overrides LIQUIDITY_DATA.
    #[arg(long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the dataset from FRED and write it to the data path.
    Update {
        /// First business day to include (YYYY-MM-DD). Overrides LIQUIDITY_START.
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last business day to include. Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Load the dataset and write a static index.html.
    Render {
        /// Output directory. Overrides LIQUIDITY_OUT_DIR.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Open the page on the graph panel instead of the menu.
        #[arg(long)]
        graph: bool,
    },
    /// Load the dataset and print the history table.
    Table {
        /// Only print the newest N rows.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(data) = cli.data {
        settings.data = data.parse().unwrap_or_default();
    }

    match cli.command {
        Command::Update { start, end } => update(&settings, start, end).await,
        Command::Render { out_dir, graph } => render(&settings, out_dir, graph).await,
        Command::Table { limit } => table(&settings, limit).await,
    }
}

async fn update(settings: &Settings, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    let path = match &settings.data {
        DataLocation::File(path) => path.clone(),
        DataLocation::Http(url) => return Err(anyhow!("Cannot write the dataset to a URL: {}", url)),
    };
    let api_key = settings
        .fred_api_key
        .clone()
        .context("FRED_API_KEY is not set (environment or .env)")?;

    let start = start.unwrap_or(settings.start);
    let end = end.unwrap_or_else(|| chrono::Local::now().date_naive());

    let fetcher = FredFetcher::new(api_key, Some(start));
    let count = orchestrator::update_dataset(&fetcher, start, end, &path).await?;
    info!("Wrote {} records to {}", count, path.display());
    Ok(())
}

async fn render(settings: &Settings, out_dir: Option<PathBuf>, graph: bool) -> Result<()> {
    let loader = DatasetLoader::new();
    let mut session = Session::new(html::PageViews::default(), html::PageChartWidget);

    if !session.start(&loader, &settings.data).await {
        warn!("Rendering the page with the load failure message");
    }
    // The page carries the chart config either way; the graph panel only
    // starts visible when asked for.
    session.show_graph()?;
    if !graph {
        session.back_to_menu();
    }

    let page = html::render_page(session.table(), session.views(), session.chart());
    let out_dir = out_dir.unwrap_or_else(|| settings.out_dir.clone());
    let path = html::write_page(&out_dir, &page).await?;
    println!("{}", path.display());
    Ok(())
}

async fn table(settings: &Settings, limit: Option<usize>) -> Result<()> {
    let loader = DatasetLoader::new();
    let mut session = Session::new(html::PageViews::default(), html::PageChartWidget);
    let loaded = session.start(&loader, &settings.data).await;
    session.show_history();

    print!("{}", terminal::render_table(session.table(), limit));
    if !loaded {
        return Err(anyhow!("Failed to load {}", settings.data));
    }
    Ok(())
}
