use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::StockData;
use crate::{Error, Result};

/// Placeholder shown wherever a price is missing.
pub const MISSING_SENTINEL: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Price {
    Value(f64),
    Missing,
}

impl Price {
    pub fn value(&self) -> Option<f64> {
        match self {
            Price::Value(v) => Some(*v),
            Price::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Price::Missing)
    }
}

impl From<Option<f64>> for Price {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Price::Value(v),
            _ => Price::Missing,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Value(v) => write!(f, "{:.2}", v),
            Price::Missing => f.write_str(MISSING_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub ticker: String,
    pub close: Price,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, ticker: impl Into<String>, close: impl Into<Price>) -> Self {
        Self {
            date,
            ticker: ticker.into(),
            close: close.into(),
        }
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Some(value).into()
    }
}

/// One row of the ticker-by-date view: the prices of a single ticker, one
/// per date column.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRow {
    pub ticker: String,
    pub prices: Vec<Price>,
}

/// Closing prices indexed by date (rows) and ticker (columns).
///
/// Dates and tickers are kept sorted. Every date×ticker cell exists
/// logically; cells without an observation read as [`Price::Missing`], and
/// two tables are equal when their full grids are.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    dates: BTreeSet<NaiveDate>,
    tickers: BTreeSet<String>,
    cells: BTreeMap<(NaiveDate, String), Price>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reshape long `(date, ticker, close)` rows into the wide table.
    /// Two observations for the same cell are rejected; cells nobody
    /// observed are filled with [`Price::Missing`].
    pub fn pivot<I>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = PriceObservation>,
    {
        let mut table = Self::new();
        for obs in observations {
            table.insert(obs.date, obs.ticker, obs.close)?;
        }
        table.fill_missing();
        Ok(table)
    }

    fn fill_missing(&mut self) {
        for date in &self.dates {
            for ticker in &self.tickers {
                self.cells
                    .entry((*date, ticker.clone()))
                    .or_insert(Price::Missing);
            }
        }
    }

    pub fn from_stock_data(rows: &[StockData]) -> Result<Self> {
        Self::pivot(
            rows.iter()
                .map(|row| PriceObservation::new(row.date, row.ticker.clone(), row.value)),
        )
    }

    pub fn insert(
        &mut self,
        date: NaiveDate,
        ticker: impl Into<String>,
        close: Price,
    ) -> Result<()> {
        let ticker = ticker.into();
        let key = (date, ticker);
        if self.cells.contains_key(&key) {
            return Err(Error::InvalidData(format!(
                "duplicate price for {} on {}",
                key.1, key.0
            )));
        }
        self.dates.insert(date);
        self.tickers.insert(key.1.clone());
        self.cells.insert(key, close);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> + '_ {
        self.dates.iter()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> + '_ {
        self.tickers.iter().map(String::as_str)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.iter().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.iter().next_back().copied()
    }

    pub fn get(&self, date: NaiveDate, ticker: &str) -> Price {
        self.cells
            .get(&(date, ticker.to_string()))
            .copied()
            .unwrap_or(Price::Missing)
    }

    /// Number of cells in the full grid, sentinel cells included.
    pub fn cell_count(&self) -> usize {
        self.dates.len() * self.tickers.len()
    }

    /// Every cell of the grid in date-then-ticker order.
    pub fn cells(&self) -> impl Iterator<Item = (NaiveDate, &str, Price)> + '_ {
        self.dates.iter().flat_map(move |date| {
            self.tickers
                .iter()
                .map(move |ticker| (*date, ticker.as_str(), self.get(*date, ticker)))
        })
    }

    /// Transposed view: one row per ticker, one column per date.
    pub fn by_ticker(&self) -> Vec<TickerRow> {
        self.tickers
            .iter()
            .map(|ticker| TickerRow {
                ticker: ticker.clone(),
                prices: self.dates.iter().map(|date| self.get(*date, ticker)).collect(),
            })
            .collect()
    }
}

impl PartialEq for PriceTable {
    fn eq(&self, other: &Self) -> bool {
        self.dates == other.dates
            && self.tickers == other.tickers
            && self.cells().eq(other.cells())
    }
}

impl fmt::Display for PriceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self
            .tickers
            .iter()
            .map(|ticker| {
                self.dates
                    .iter()
                    .map(|date| self.get(*date, ticker).to_string().len())
                    .chain(std::iter::once(ticker.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<10}", "Date")?;
        for (ticker, width) in self.tickers.iter().zip(&widths) {
            write!(f, "  {:>width$}", ticker, width = *width)?;
        }
        writeln!(f)?;

        for date in &self.dates {
            write!(f, "{:<10}", date.to_string())?;
            for (ticker, width) in self.tickers.iter().zip(&widths) {
                write!(f, "  {:>width$}", self.get(*date, ticker).to_string(), width = *width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample() -> PriceTable {
        PriceTable::pivot(vec![
            PriceObservation::new(day(5), "MSFT", 402.65),
            PriceObservation::new(day(4), "AAPL", 175.10),
            PriceObservation::new(day(5), "AAPL", 170.12),
            PriceObservation::new(day(4), "MSFT", 414.92),
            PriceObservation::new(day(6), "AAPL", 169.12),
        ])
        .unwrap()
    }

    #[test]
    fn test_pivot_sorts_dates_and_tickers() {
        let table = sample();
        assert_eq!(table.dates().copied().collect::<Vec<_>>(), vec![day(4), day(5), day(6)]);
        assert_eq!(table.tickers().collect::<Vec<_>>(), vec!["AAPL", "MSFT"]);
        assert_eq!(table.first_date(), Some(day(4)));
        assert_eq!(table.last_date(), Some(day(6)));
    }

    #[test]
    fn test_missing_cell_reads_as_sentinel() {
        let table = sample();
        assert_eq!(table.get(day(6), "MSFT"), Price::Missing);
        assert_eq!(table.get(day(6), "MSFT").to_string(), MISSING_SENTINEL);
        assert_eq!(table.get(day(4), "AAPL"), Price::Value(175.10));
    }

    #[test]
    fn test_cells_cover_full_grid() {
        let table = sample();
        let cells: Vec<_> = table.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(table.cell_count(), 6);
        assert_eq!(cells[0], (day(4), "AAPL", Price::Value(175.10)));
        assert_eq!(cells[5], (day(6), "MSFT", Price::Missing));
    }

    #[test]
    fn test_duplicate_cell_is_rejected() {
        let result = PriceTable::pivot(vec![
            PriceObservation::new(day(4), "AAPL", 1.0),
            PriceObservation::new(day(4), "AAPL", 2.0),
        ]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_pivot_fills_gaps_and_matches_reloaded_grid() {
        let table = sample();
        assert_eq!(table.cells.len(), 6);
        assert_eq!(table.cells.get(&(day(6), "MSFT".to_string())), Some(&Price::Missing));

        let stored: Vec<StockData> = table
            .cells()
            .enumerate()
            .map(|(i, (date, ticker, price))| StockData {
                id: i as i64 + 1,
                date,
                ticker: ticker.to_string(),
                value: price.value(),
                article_id: 1,
            })
            .collect();
        assert_eq!(PriceTable::from_stock_data(&stored).unwrap(), table);
    }

    #[test]
    fn test_equality_ignores_explicit_missing_cells() {
        let mut sparse = PriceTable::new();
        sparse.insert(day(4), "AAPL", Price::Value(1.0)).unwrap();
        sparse.insert(day(5), "MSFT", Price::Value(2.0)).unwrap();

        let full = PriceTable::pivot(vec![
            PriceObservation::new(day(4), "AAPL", 1.0),
            PriceObservation::new(day(4), "MSFT", None::<f64>),
            PriceObservation::new(day(5), "AAPL", None::<f64>),
            PriceObservation::new(day(5), "MSFT", 2.0),
        ])
        .unwrap();
        assert_eq!(sparse, full);

        let mut different = full.clone();
        different.cells.insert((day(5), "AAPL".to_string()), Price::Value(3.0));
        assert_ne!(sparse, different);
    }

    #[test]
    fn test_nan_close_becomes_missing() {
        let obs = PriceObservation::new(day(4), "AAPL", f64::NAN);
        assert!(obs.close.is_missing());
    }

    #[test]
    fn test_by_ticker_transposes() {
        let rows = sample().by_ticker();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].ticker, "MSFT");
        assert_eq!(
            rows[1].prices,
            vec![Price::Value(414.92), Price::Value(402.65), Price::Missing]
        );
    }

    #[test]
    fn test_from_stock_data_keeps_null_cells() {
        let rows = vec![
            StockData {
                id: 1,
                date: day(4),
                ticker: "AAPL".into(),
                value: Some(175.1),
                article_id: 7,
            },
            StockData {
                id: 2,
                date: day(4),
                ticker: "MSFT".into(),
                value: None,
                article_id: 7,
            },
        ];
        let table = PriceTable::from_stock_data(&rows).unwrap();
        assert_eq!(table.cell_count(), 2);
        assert!(table.get(day(4), "MSFT").is_missing());
    }

    #[test]
    fn test_display_renders_aligned_text() {
        let rendered = sample().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[0].contains("AAPL") && lines[0].contains("MSFT"));
        assert!(lines[3].starts_with("2024-03-06"));
        assert!(lines[3].ends_with("N/A"));
    }
}
