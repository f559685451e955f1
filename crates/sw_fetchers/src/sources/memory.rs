use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sw_core::{Error, Result};

use super::{DailyClose, PriceSource};

/// Serves fixed series, for offline runs and tests. Unknown tickers are an
/// error, the same way a real provider rejects an unknown symbol.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    series: HashMap<String, Vec<DailyClose>>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: impl Into<String>, closes: Vec<DailyClose>) -> Self {
        self.series.insert(ticker.into(), closes);
        self
    }
}

#[async_trait]
impl PriceSource for InMemoryPriceSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>> {
        let closes = self
            .series
            .get(ticker)
            .ok_or_else(|| Error::Fetch(format!("No data found for {}", ticker)))?;
        Ok(closes
            .iter()
            .filter(|c| c.date >= start && c.date < end)
            .cloned()
            .collect())
    }
}
