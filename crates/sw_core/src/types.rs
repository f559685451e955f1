use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MAX_TITLE_LEN: usize = 80;
pub const MAX_AUTHOR_LEN: usize = 100;
pub const MAX_TICKER_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
}

/// An article that has not been stored yet. `date_posted` falls back to the
/// insertion time when left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub content: String,
    pub date_posted: Option<DateTime<Utc>>,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            content: content.into(),
            date_posted: None,
        }
    }

    pub fn posted_at(mut self, date_posted: DateTime<Utc>) -> Self {
        self.date_posted = Some(date_posted);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::InvalidData(format!(
                "title is longer than {} characters",
                MAX_TITLE_LEN
            )));
        }
        if self.author.chars().count() > MAX_AUTHOR_LEN {
            return Err(Error::InvalidData(format!(
                "author is longer than {} characters",
                MAX_AUTHOR_LEN
            )));
        }
        Ok(())
    }
}

/// One closing price attached to an article. A `None` value is a cell the
/// data source had no price for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockData {
    pub id: i64,
    pub date: NaiveDate,
    pub ticker: String,
    pub value: Option<f64>,
    pub article_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleWithStockData {
    pub article: Article,
    pub stock_data: Vec<StockData>,
}

pub fn validate_ticker(ticker: &str) -> Result<()> {
    let len = ticker.chars().count();
    if len == 0 || len > MAX_TICKER_LEN {
        return Err(Error::InvalidData(format!(
            "ticker {:?} must be between 1 and {} characters",
            ticker, MAX_TICKER_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_article_validation() {
        assert!(NewArticle::new("Title", "Author", "Body").validate().is_ok());

        let long_title = "x".repeat(MAX_TITLE_LEN + 1);
        let err = NewArticle::new(long_title, "Author", "Body").validate().unwrap_err();
        assert!(err.to_string().contains("title"));

        let long_author = "y".repeat(MAX_AUTHOR_LEN + 1);
        assert!(NewArticle::new("Title", long_author, "Body").validate().is_err());
    }

    #[test]
    fn test_validate_ticker() {
        assert!(validate_ticker("BRK-B").is_ok());
        assert!(validate_ticker("").is_err());
        assert!(validate_ticker(&"T".repeat(MAX_TICKER_LEN + 1)).is_err());
    }
}
