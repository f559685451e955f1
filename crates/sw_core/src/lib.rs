pub mod error;
pub mod models;
pub mod storage;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use models::InferenceModel;
pub use storage::ArticleStorage;
pub use table::{Price, PriceObservation, PriceTable, TickerRow, MISSING_SENTINEL};
pub use types::{Article, ArticleWithStockData, NewArticle, StockData};
