use clap::{Args, Parser, Subcommand};
use sw_fetchers::{DEFAULT_TICKERS, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

use crate::ingest::{ARTICLE_AUTHOR, ARTICLE_TITLE};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Weekly stock summaries, stored and served as articles",
    long_about = None
)]
pub struct Cli {
    /// Database to use: sqlite:<path>, sqlite::memory:, postgresql://... or memory
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:app.db", global = true)]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the article pages over HTTP
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
        bind: String,
    },
    /// Create the tables if they do not exist yet
    InitDb,
    /// Insert two placeholder articles
    Seed,
    /// Fetch this week's prices, summarize them and store the article
    Ingest(IngestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// Comma separated ticker symbols (defaults to a fixed large-cap list)
    #[arg(long, value_delimiter = ',')]
    pub tickers: Option<Vec<String>>,

    /// Number of calendar days to look back from today
    #[arg(
        long,
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS)
    )]
    pub window_days: i64,

    /// Model to use for the summary. Available models: openai (default), dummy
    #[arg(long, env = "STOCKWIRE_MODEL", default_value = "openai")]
    pub model: String,

    #[arg(long, env = "OPENAI_MODEL")]
    pub model_name: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub model_url: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the price provider base URL
    #[arg(long, env = "STOCKWIRE_PRICES_URL")]
    pub prices_url: Option<String>,

    #[arg(long, default_value = ARTICLE_TITLE)]
    pub title: String,

    #[arg(long, default_value = ARTICLE_AUTHOR)]
    pub author: String,
}

impl IngestArgs {
    pub fn tickers(&self) -> Vec<String> {
        match &self.tickers {
            Some(tickers) if !tickers.is_empty() => tickers
                .iter()
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect(),
            _ => DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn inference_config(&self) -> sw_inference::Config {
        sw_inference::Config {
            model: Some(self.model.clone()),
            model_name: self.model_name.clone(),
            model_url: self.model_url.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_defaults() {
        let cli = Cli::try_parse_from(["stockwire", "--database-url", "memory", "ingest"]).unwrap();
        assert_eq!(cli.database_url, "memory");
        let Commands::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.tickers().len(), DEFAULT_TICKERS.len());
        assert_eq!(args.window_days, 7);
        assert_eq!(args.title, ARTICLE_TITLE);
        assert_eq!(args.author, ARTICLE_AUTHOR);
    }

    #[test]
    fn test_ingest_ticker_list() {
        let cli = Cli::try_parse_from([
            "stockwire",
            "ingest",
            "--tickers",
            "aapl, msft",
            "--model",
            "dummy",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(cli.database_url, "sqlite::memory:");
        let Commands::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.tickers(), vec!["AAPL".to_string(), "MSFT".to_string()]);
        assert_eq!(args.inference_config().model.as_deref(), Some("dummy"));
    }

    #[test]
    fn test_window_days_must_be_in_range() {
        for bad in ["0", "-1", "3651", "9223372036854775807"] {
            let result = Cli::try_parse_from(["stockwire", "ingest", "--window-days", bad]);
            assert!(result.is_err(), "--window-days {} should be rejected", bad);
        }

        let cli = Cli::try_parse_from(["stockwire", "ingest", "--window-days", "30"]).unwrap();
        let Commands::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.window_days, 30);
    }

    #[test]
    fn test_serve_bind() {
        let cli = Cli::try_parse_from(["stockwire", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { ref bind } if bind == "0.0.0.0:8080"));
    }
}
