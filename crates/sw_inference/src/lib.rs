use std::fmt;

pub mod analyzer;
pub mod models;

pub use analyzer::{StockDataAnalyzer, PROMPT_TEMPLATE};
pub use models::create_model;
pub use sw_core::InferenceModel;

#[derive(Clone, Default)]
pub struct Config {
    /// Which client to build: `openai` or `dummy`
    pub model: Option<String>,
    pub model_name: Option<String>,
    pub model_url: Option<String>,
    pub api_key: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.model)
            .field("model_name", &self.model_name)
            .field("model_url", &self.model_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::{Config, StockDataAnalyzer};
    pub use sw_core::{Error, InferenceModel, PriceTable, Result};
}
