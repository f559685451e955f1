use std::sync::Arc;

use clap::Parser;
use sw_cli::ingest::IngestContext;
use sw_cli::logging::init_logging;
use sw_cli::seed::seed_placeholder_articles;
use sw_cli::{Cli, Commands, IngestArgs};
use sw_core::ArticleStorage;
use sw_fetchers::prelude::*;
use sw_inference::prelude::*;
use sw_storage::prelude::*;
use sw_web::prelude::*;
use tracing::{error, info};

async fn ingest(args: IngestArgs, storage: Arc<dyn ArticleStorage>) -> anyhow::Result<()> {
    let source: Arc<dyn PriceSource> = match args.prices_url.as_deref() {
        Some(url) => Arc::new(YahooFinanceSource::with_base_url(url)?),
        None => Arc::new(YahooFinanceSource::new()?),
    };
    let fetcher = StockDataFetcher::new(args.tickers(), source).with_window_days(args.window_days);

    let model = create_model(Some(args.inference_config())).await?;
    info!("🤖 Using {} model", model.name());

    let mut context = IngestContext::new(fetcher, StockDataAnalyzer::new(model), storage);
    context.title = args.title;
    context.author = args.author;

    let report = context.run().await?;
    println!(
        "Stored article {} with {} stock rows.",
        report.article_id, report.stock_rows
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let storage = create_storage(&cli.database_url).await?;
    info!("🏦 Storage ready ({})", cli.database_url);

    let result = match cli.command {
        Commands::Serve { bind } => serve(AppState::new(storage.clone()), &bind)
            .await
            .map_err(anyhow::Error::from),
        Commands::InitDb => {
            info!("📦 Database initialized");
            Ok(())
        }
        Commands::Seed => match seed_placeholder_articles(storage.as_ref()).await {
            Ok(_) => {
                println!("Successfully inserted data.");
                Ok(())
            }
            Err(e) => {
                error!("Error inserting data: {}", e);
                Err(e.into())
            }
        },
        Commands::Ingest(args) => ingest(args, storage.clone()).await,
    };

    storage.close().await;
    result
}
