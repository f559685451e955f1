use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, Sqlite, Transaction};
use sw_core::{
    Article, ArticleStorage, ArticleWithStockData, Error, NewArticle, PriceTable, Result, StockData,
};

use super::sql::{db_error, finish};
use crate::StorageBackend;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(80) NOT NULL,
        author VARCHAR(100) NOT NULL,
        content TEXT NOT NULL,
        date_posted DATETIME NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date DATE NOT NULL,
        ticker VARCHAR(20) NOT NULL CHECK (length(ticker) BETWEEN 1 AND 20),
        value REAL,
        article_id INTEGER NOT NULL REFERENCES articles (id) ON DELETE CASCADE,
        UNIQUE (article_id, date, ticker)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_stock_data_article ON stock_data (article_id)
    "#,
];

pub struct SQLiteStorage {
    pool: SqlitePool,
    url: String,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be reachable, e.g. sqlite:app.db"
    }

    async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_error("Invalid SQLite URL"))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every pooled connection to `:memory:` would get its own empty
        // database, so keep exactly one alive.
        let in_memory = url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(db_error("Failed to connect to database"))?;

        let storage = Self {
            pool,
            url: url.to_string(),
        };
        storage.migrate().await?;
        Ok(storage)
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::connect(&format!("sqlite:{}", db_path.display())).await
    }

    pub async fn migrate(&self) -> Result<()> {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))
    }
}

async fn insert_article_in(conn: &mut SqliteConnection, article: &NewArticle) -> Result<i64> {
    article.validate()?;
    let date_posted = article.date_posted.unwrap_or_else(Utc::now);

    let result = sqlx::query(
        r#"
        INSERT INTO articles (title, author, content, date_posted)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&article.title)
    .bind(&article.author)
    .bind(&article.content)
    .bind(date_posted)
    .execute(&mut *conn)
    .await
    .map_err(db_error("Failed to insert article"))?;

    Ok(result.last_insert_rowid())
}

async fn insert_stock_data_in(
    conn: &mut SqliteConnection,
    article_id: i64,
    table: &PriceTable,
) -> Result<usize> {
    let mut inserted = 0;
    for (date, ticker, price) in table.cells() {
        sqlx::query(
            r#"
            INSERT INTO stock_data (date, ticker, value, article_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(date)
        .bind(ticker)
        .bind(price.value())
        .bind(article_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error("Failed to insert stock data"))?;
        inserted += 1;
    }
    Ok(inserted)
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.try_get("id").map_err(db_error("Failed to read article"))?,
        title: row.try_get("title").map_err(db_error("Failed to read article"))?,
        author: row.try_get("author").map_err(db_error("Failed to read article"))?,
        content: row.try_get("content").map_err(db_error("Failed to read article"))?,
        date_posted: row
            .try_get("date_posted")
            .map_err(db_error("Failed to read article date"))?,
    })
}

fn stock_data_from_row(row: &SqliteRow) -> Result<StockData> {
    Ok(StockData {
        id: row.try_get("id").map_err(db_error("Failed to read stock data"))?,
        date: row.try_get("date").map_err(db_error("Failed to read stock date"))?,
        ticker: row.try_get("ticker").map_err(db_error("Failed to read stock data"))?,
        value: row.try_get("value").map_err(db_error("Failed to read stock value"))?,
        article_id: row
            .try_get("article_id")
            .map_err(db_error("Failed to read stock data"))?,
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn list_articles(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, content, date_posted
            FROM articles
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list articles"))?;

        rows.iter().map(article_from_row).collect()
    }

    async fn get_article_with_stock_data(&self, id: i64) -> Result<Option<ArticleWithStockData>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, content, date_posted
            FROM articles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get article"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let article = article_from_row(&row)?;

        let stock_rows = sqlx::query(
            r#"
            SELECT id, date, ticker, value, article_id
            FROM stock_data
            WHERE article_id = ?
            ORDER BY date, ticker
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to get stock data"))?;

        let stock_data = stock_rows
            .iter()
            .map(stock_data_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(ArticleWithStockData {
            article,
            stock_data,
        }))
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<i64> {
        let mut tx = self.begin().await?;
        let result = insert_article_in(&mut tx, article).await;
        finish(tx, result, "insert_article").await
    }

    async fn insert_articles(&self, articles: &[NewArticle]) -> Result<Vec<i64>> {
        let mut tx = self.begin().await?;
        let result = async {
            let mut ids = Vec::with_capacity(articles.len());
            for article in articles {
                ids.push(insert_article_in(&mut tx, article).await?);
            }
            Ok::<_, Error>(ids)
        }
        .await;
        finish(tx, result, "insert_articles").await
    }

    async fn insert_stock_data(&self, article_id: i64, table: &PriceTable) -> Result<usize> {
        let mut tx = self.begin().await?;
        let result = insert_stock_data_in(&mut tx, article_id, table).await;
        finish(tx, result, "insert_stock_data").await
    }

    async fn insert_article_with_stock_data(
        &self,
        article: &NewArticle,
        table: &PriceTable,
    ) -> Result<i64> {
        let mut tx = self.begin().await?;
        let result = async {
            let article_id = insert_article_in(&mut tx, article).await?;
            let rows = insert_stock_data_in(&mut tx, article_id, table).await?;
            tracing::debug!(article_id, rows, "Stock data staged");
            Ok::<_, Error>(article_id)
        }
        .await;
        finish(tx, result, "insert_article_with_stock_data").await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
