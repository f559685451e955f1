use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use sw_core::{Error, Price, Result};
use url::Url;

use super::{DailyClose, PriceSource};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Daily candles from the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooFinanceSource {
    client: Client,
    base_url: Url,
}

impl YahooFinanceSource {
    const BASE_URL: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart/";
    const USER_AGENT: &'static str = "Mozilla/5.0 (compatible; stockwire/0.1)";

    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().user_agent(Self::USER_AGENT).build()?;
        Ok(Self { client, base_url })
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Url> {
        let mut url = self
            .base_url
            .join(ticker)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", ticker, e)))?;
        url.query_pairs_mut()
            .append_pair("period1", &midnight_timestamp(start)?.to_string())
            .append_pair("period2", &midnight_timestamp(end)?.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }
}

fn midnight_timestamp(date: NaiveDate) -> Result<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| Error::InvalidData(format!("no midnight for {}", date)))
}

/// Turn a chart payload into one close per exchange-local calendar day.
/// A null close stays in the series as a missing price.
fn parse_chart(
    response: ChartResponse,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyClose>> {
    if let Some(error) = response.chart.error {
        return Err(Error::Fetch(format!(
            "{}: {} ({})",
            ticker, error.description, error.code
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut by_date = BTreeMap::new();
    for (i, ts) in result.timestamp.iter().enumerate() {
        let local = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0).ok_or_else(|| {
            Error::Fetch(format!("{}: timestamp {} out of range", ticker, ts))
        })?;
        let date = local.date_naive();
        if date < start || date >= end {
            continue;
        }
        let close: Price = closes.get(i).copied().flatten().into();
        by_date.insert(date, close);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, close)| DailyClose { date, close })
        .collect())
}

#[async_trait]
impl PriceSource for YahooFinanceSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>> {
        let url = self.chart_url(ticker, start, end)?;
        tracing::debug!(%url, ticker, "Requesting daily chart");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Unknown symbols come back as 404 with a JSON error body
        let chart: ChartResponse = match serde_json::from_str(&body) {
            Ok(chart) => chart,
            Err(e) if !status.is_success() => {
                return Err(Error::Fetch(format!("{}: HTTP {} ({})", ticker, status, e)));
            }
            Err(e) => return Err(e.into()),
        };

        parse_chart(chart, ticker, start, end)
    }
}
