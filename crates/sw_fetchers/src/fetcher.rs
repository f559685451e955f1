use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sw_core::{Error, PriceObservation, PriceTable, Result};
use tracing::info;

use crate::sources::PriceSource;

pub const DEFAULT_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "GOOGL", "BRK-B", "V", "JNJ", "WMT", "PG",
];

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Longest look-back accepted, roughly ten years.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Pulls the trailing window of closing prices for a fixed list of tickers
/// and pivots them into a date×ticker table.
pub struct StockDataFetcher {
    tickers: Vec<String>,
    source: Arc<dyn PriceSource>,
    window_days: i64,
}

impl StockDataFetcher {
    pub fn new<I, S>(tickers: I, source: Arc<dyn PriceSource>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
            source,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, window_days: i64) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    fn window_start(&self, end: NaiveDate) -> Result<NaiveDate> {
        if !(1..=MAX_WINDOW_DAYS).contains(&self.window_days) {
            return Err(Error::InvalidData(format!(
                "window must be between 1 and {} days, got {}",
                MAX_WINDOW_DAYS, self.window_days
            )));
        }
        Duration::try_days(self.window_days)
            .and_then(|window| end.checked_sub_signed(window))
            .ok_or_else(|| {
                Error::InvalidData(format!(
                    "{} days before {} is out of range",
                    self.window_days, end
                ))
            })
    }

    /// Fetch the window ending today.
    pub async fn fetch(&self) -> Result<PriceTable> {
        self.fetch_until(Utc::now().date_naive()).await
    }

    /// Fetch `[end - window_days, end)`. Tickers are queried one after
    /// another; the first source error aborts the whole fetch.
    pub async fn fetch_until(&self, end: NaiveDate) -> Result<PriceTable> {
        let start = self.window_start(end)?;
        info!(
            "📈 Fetching {} tickers from {} ({} to {})",
            self.tickers.len(),
            self.source.name(),
            start,
            end
        );

        let mut observations = Vec::new();
        for ticker in &self.tickers {
            let closes = self.source.daily_closes(ticker, start, end).await?;
            tracing::debug!(ticker, days = closes.len(), "Fetched closes");
            observations.extend(
                closes
                    .into_iter()
                    .map(|c| PriceObservation::new(c.date, ticker.clone(), c.close)),
            );
        }

        let table = PriceTable::pivot(observations)?;
        info!(
            "✨ Price table ready: {} days x {} tickers",
            table.dates().count(),
            table.tickers().count()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{DailyClose, InMemoryPriceSource};
    use sw_core::{Price, MISSING_SENTINEL};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn source() -> InMemoryPriceSource {
        let trading_days = [4, 5, 6, 7, 8];
        InMemoryPriceSource::new()
            .with_series(
                "AAPL",
                trading_days
                    .iter()
                    .map(|d| DailyClose::new(day(*d), 170.0 + *d as f64))
                    .collect(),
            )
            .with_series(
                "MSFT",
                trading_days
                    .iter()
                    .filter(|d| **d != 6)
                    .map(|d| DailyClose::new(day(*d), 400.0 + *d as f64))
                    .collect(),
            )
    }

    #[tokio::test]
    async fn test_fetch_pivots_with_sentinel() {
        let fetcher = StockDataFetcher::new(["AAPL", "MSFT"], Arc::new(source()));
        let table = fetcher.fetch_until(day(11)).await.unwrap();

        assert_eq!(table.dates().count(), 5);
        assert_eq!(table.tickers().collect::<Vec<_>>(), vec!["AAPL", "MSFT"]);
        assert_eq!(table.cell_count(), 10);
        assert_eq!(table.get(day(6), "MSFT"), Price::Missing);
        assert_eq!(table.get(day(6), "MSFT").to_string(), MISSING_SENTINEL);
        assert_eq!(table.get(day(6), "AAPL"), Price::Value(176.0));
    }

    #[tokio::test]
    async fn test_window_end_is_exclusive() {
        let fetcher = StockDataFetcher::new(["AAPL"], Arc::new(source())).with_window_days(3);
        let table = fetcher.fetch_until(day(8)).await.unwrap();
        let dates: Vec<_> = table.dates().copied().collect();
        assert_eq!(dates, vec![day(5), day(6), day(7)]);
    }

    #[tokio::test]
    async fn test_window_out_of_range_is_rejected() {
        for window_days in [0, -3, MAX_WINDOW_DAYS + 1, 100_000_000, i64::MAX] {
            let fetcher =
                StockDataFetcher::new(["AAPL"], Arc::new(source())).with_window_days(window_days);
            let result = fetcher.fetch_until(day(8)).await;
            assert!(
                matches!(result, Err(Error::InvalidData(_))),
                "window {} should be rejected",
                window_days
            );
        }
    }

    #[tokio::test]
    async fn test_window_before_calendar_start_is_rejected() {
        let fetcher = StockDataFetcher::new(["AAPL"], Arc::new(source()))
            .with_window_days(MAX_WINDOW_DAYS);
        let result = fetcher.fetch_until(NaiveDate::MIN).await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let fetcher = StockDataFetcher::new(["AAPL", "TSLA"], Arc::new(source()));
        let result = fetcher.fetch_until(day(11)).await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[test]
    fn test_default_tickers() {
        let fetcher = StockDataFetcher::new(DEFAULT_TICKERS.iter().copied(), Arc::new(source()));
        assert_eq!(fetcher.tickers().len(), 9);
        assert!(fetcher.tickers().iter().any(|t| t == "BRK-B"));
    }
}
