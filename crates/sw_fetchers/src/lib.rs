pub mod fetcher;
pub mod sources;

pub use fetcher::{StockDataFetcher, DEFAULT_TICKERS, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
pub use sources::{DailyClose, InMemoryPriceSource, PriceSource, YahooFinanceSource};

pub mod prelude {
    pub use super::sources::{PriceSource, YahooFinanceSource};
    pub use super::{StockDataFetcher, DEFAULT_TICKERS};
    pub use sw_core::{Error, PriceTable, Result};
}
