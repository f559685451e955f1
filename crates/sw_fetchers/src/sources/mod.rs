use async_trait::async_trait;
use chrono::NaiveDate;
use sw_core::{Price, Result};

pub mod memory;
pub mod yahoo;

pub use memory::InMemoryPriceSource;
pub use yahoo::YahooFinanceSource;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: Price,
}

impl DailyClose {
    pub fn new(date: NaiveDate, close: impl Into<Price>) -> Self {
        Self {
            date,
            close: close.into(),
        }
    }
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Returns the name of the data provider
    fn name(&self) -> &str;

    /// Daily closing prices for `ticker` on every trading day in
    /// `[start, end)`
    async fn daily_closes(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<DailyClose>>;
}
