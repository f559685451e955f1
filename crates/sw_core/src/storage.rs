use async_trait::async_trait;

use crate::table::PriceTable;
use crate::types::{Article, ArticleWithStockData, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// All articles, oldest first
    async fn list_articles(&self) -> Result<Vec<Article>>;

    /// One article with every stock row it owns, or `None` if the id is unknown
    async fn get_article_with_stock_data(&self, id: i64) -> Result<Option<ArticleWithStockData>>;

    /// Insert a single article and return its new id
    async fn insert_article(&self, article: &NewArticle) -> Result<i64>;

    /// Insert several articles in one transaction
    async fn insert_articles(&self, articles: &[NewArticle]) -> Result<Vec<i64>>;

    /// Insert one stock row per cell of `table`, owned by `article_id`.
    /// Returns the number of rows written.
    async fn insert_stock_data(&self, article_id: i64, table: &PriceTable) -> Result<usize>;

    /// Insert an article and its stock rows atomically: either both land or
    /// neither does.
    async fn insert_article_with_stock_data(
        &self,
        article: &NewArticle,
        table: &PriceTable,
    ) -> Result<i64>;

    /// Release any pooled connections
    async fn close(&self) {}
}
