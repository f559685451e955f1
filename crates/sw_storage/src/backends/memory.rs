use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sw_core::types::validate_ticker;
use sw_core::{
    Article, ArticleStorage, ArticleWithStockData, Error, NewArticle, PriceTable, Result, StockData,
};
use tokio::sync::RwLock;

use crate::StorageBackend;

/// Plain in-process tables. Writers check every constraint before touching
/// anything, so a failed call leaves the store unchanged.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
    stock_data: Vec<StockData>,
    next_article_id: i64,
    next_stock_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_article_id: 1,
            next_stock_id: 1,
            ..Default::default()
        }
    }

    fn check_stock_data(&self, article_id: i64, table: &PriceTable) -> Result<()> {
        if !self.articles.iter().any(|a| a.id == article_id) {
            return Err(Error::Database(format!(
                "Failed to insert stock data: article {} does not exist",
                article_id
            )));
        }
        let existing: HashSet<(NaiveDate, &str)> = self
            .stock_data
            .iter()
            .filter(|row| row.article_id == article_id)
            .map(|row| (row.date, row.ticker.as_str()))
            .collect();
        for (date, ticker, _) in table.cells() {
            validate_ticker(ticker)?;
            if existing.contains(&(date, ticker)) {
                return Err(Error::Database(format!(
                    "Failed to insert stock data: duplicate {} on {} for article {}",
                    ticker, date, article_id
                )));
            }
        }
        Ok(())
    }

    fn push_article(&mut self, article: &NewArticle) -> i64 {
        let id = self.next_article_id;
        self.next_article_id += 1;
        self.articles.push(Article {
            id,
            title: article.title.clone(),
            author: article.author.clone(),
            content: article.content.clone(),
            date_posted: article.date_posted.unwrap_or_else(Utc::now),
        });
        id
    }

    fn push_stock_data(&mut self, article_id: i64, table: &PriceTable) -> usize {
        let mut inserted = 0;
        for (date, ticker, price) in table.cells() {
            let id = self.next_stock_id;
            self.next_stock_id += 1;
            self.stock_data.push(StockData {
                id,
                date,
                ticker: ticker.to_string(),
                value: price.value(),
                article_id,
            });
            inserted += 1;
        }
        inserted
    }

    pub fn insert_article(&mut self, article: &NewArticle) -> Result<i64> {
        article.validate()?;
        Ok(self.push_article(article))
    }

    pub fn insert_stock_data(&mut self, article_id: i64, table: &PriceTable) -> Result<usize> {
        self.check_stock_data(article_id, table)?;
        Ok(self.push_stock_data(article_id, table))
    }

    pub fn insert_article_with_stock_data(
        &mut self,
        article: &NewArticle,
        table: &PriceTable,
    ) -> Result<i64> {
        article.validate()?;
        for (_, ticker, _) in table.cells() {
            validate_ticker(ticker)?;
        }
        let id = self.push_article(article);
        self.push_stock_data(id, table);
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Option<ArticleWithStockData> {
        let article = self.articles.iter().find(|a| a.id == id)?.clone();
        let mut stock_data: Vec<StockData> = self
            .stock_data
            .iter()
            .filter(|row| row.article_id == id)
            .cloned()
            .collect();
        stock_data.sort_by(|a, b| (a.date, &a.ticker).cmp(&(b.date, &b.ticker)));
        Some(ArticleWithStockData {
            article,
            stock_data,
        })
    }
}

#[derive(Clone)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(_url: &str) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn list_articles(&self) -> Result<Vec<Article>> {
        Ok(self.store.read().await.articles.clone())
    }

    async fn get_article_with_stock_data(&self, id: i64) -> Result<Option<ArticleWithStockData>> {
        Ok(self.store.read().await.get(id))
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<i64> {
        self.store.write().await.insert_article(article)
    }

    async fn insert_articles(&self, articles: &[NewArticle]) -> Result<Vec<i64>> {
        for article in articles {
            article.validate()?;
        }
        let mut store = self.store.write().await;
        Ok(articles.iter().map(|a| store.push_article(a)).collect())
    }

    async fn insert_stock_data(&self, article_id: i64, table: &PriceTable) -> Result<usize> {
        self.store.write().await.insert_stock_data(article_id, table)
    }

    async fn insert_article_with_stock_data(
        &self,
        article: &NewArticle,
        table: &PriceTable,
    ) -> Result<i64> {
        self.store
            .write()
            .await
            .insert_article_with_stock_data(article, table)
    }
}
