use std::sync::Arc;

use sw_core::{Error, InferenceModel, PriceTable, Result};
use tracing::info;

pub const PROMPT_TEMPLATE: &str = r#"You are a financial expert specializing in analyzing trends in the stock market. Your role involves the weekly assessment of market performance, evaluating key indicators such as opening and closing prices, highs and lows, volumes of trade, and changes in percentages. You dissect this data to understand the market's sentiment, whether positive, neutral, or negative. You distill complex financial jargon into clear, digestible reports, helping others to understand the subject matter at hand. Utilizing your deep understanding of the market, you interpret these factors to provide a concise summary of the week's events in the financial world.
Include the dates in your analysis and start with: In this week (startdate - enddate) ...
Weekly Stock data: {data}
"#;

/// Turns a week of closing prices into prose by asking a language model.
pub struct StockDataAnalyzer {
    model: Arc<dyn InferenceModel>,
}

impl StockDataAnalyzer {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn build_prompt(table: &PriceTable) -> String {
        PROMPT_TEMPLATE.replace("{data}", &format!("\n{}", table))
    }

    /// One model call, no retry. The reply is returned as-is.
    pub async fn analyze(&self, table: &PriceTable) -> Result<String> {
        if table.is_empty() {
            return Err(Error::InvalidData("No stock data to analyze".to_string()));
        }

        let prompt = Self::build_prompt(table);
        tracing::debug!(prompt_length = prompt.len(), "Built analysis prompt");

        info!("🤖 Asking {} for the weekly summary", self.model.name());
        let analysis = self.model.complete(&prompt).await?;
        info!("✨ Summary generated ({} chars)", analysis.len());
        Ok(analysis)
    }
}
