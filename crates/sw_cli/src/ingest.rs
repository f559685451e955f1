use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sw_core::{ArticleStorage, NewArticle, Result};
use sw_fetchers::StockDataFetcher;
use sw_inference::StockDataAnalyzer;
use tracing::{error, info};

pub const ARTICLE_TITLE: &str = "Weekly Stock Market Analysis";
pub const ARTICLE_AUTHOR: &str = "Financial Expert";

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub article_id: i64,
    pub stock_rows: usize,
}

/// Everything one ingestion run needs, handed in by the caller.
pub struct IngestContext {
    pub fetcher: StockDataFetcher,
    pub analyzer: StockDataAnalyzer,
    pub storage: Arc<dyn ArticleStorage>,
    pub title: String,
    pub author: String,
}

impl IngestContext {
    pub fn new(
        fetcher: StockDataFetcher,
        analyzer: StockDataAnalyzer,
        storage: Arc<dyn ArticleStorage>,
    ) -> Self {
        Self {
            fetcher,
            analyzer,
            storage,
            title: ARTICLE_TITLE.to_string(),
            author: ARTICLE_AUTHOR.to_string(),
        }
    }

    pub async fn run(&self) -> Result<IngestReport> {
        self.run_until(Utc::now().date_naive()).await
    }

    /// Fetch the window ending at `end`, summarize it and store the article
    /// together with its prices. Fetch and model errors are returned as-is;
    /// nothing is written unless both succeed.
    pub async fn run_until(&self, end: NaiveDate) -> Result<IngestReport> {
        let table = self.fetcher.fetch_until(end).await?;
        let analysis = self.analyzer.analyze(&table).await?;

        let article = NewArticle::new(self.title.clone(), self.author.clone(), analysis);
        let article_id = self
            .storage
            .insert_article_with_stock_data(&article, &table)
            .await
            .map_err(|e| {
                error!("Failed to insert article with stock data: {}", e);
                e
            })?;

        let report = IngestReport {
            article_id,
            stock_rows: table.cell_count(),
        };
        info!(
            "💾 Stored article {} with {} stock rows",
            report.article_id, report.stock_rows
        );
        Ok(report)
    }
}
