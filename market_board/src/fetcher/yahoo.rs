//! Yahoo Finance chart API source.
//!
//! Both quotes and history come from the v8 chart endpoint. Quote fields are read
//! from `chart.result[0].meta`; history is `indicators.quote[0].close` with null
//! samples dropped. A refresh cycle needs one chart request per key, since the
//! intraday chart carries the meta block as well. Yahoo has no official API and changes without notice, so every
//! field is optional and a missing one simply reads as "not reported".

use super::{FetchError, HistoryWindow, QuoteFetch, QuoteSource};
use log::debug;
use market_common::{FetchKey, RawQuote};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

/// Public chart API host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Blocking HTTP source for Yahoo's chart API.
pub struct YahooSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooSource {
    /// Build a source whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Same as `new` against a different host.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn chart_url(&self, key: &FetchKey, range: &str, interval: &str) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", key.as_str()]);
        url.query_pairs_mut()
            .append_pair("range", range)
            .append_pair("interval", interval);
        Ok(url)
    }

    fn get_chart(&self, key: &FetchKey, url: Url) -> Result<ChartData, FetchError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).send()?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::SymbolNotFound(key.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text()?;
        first_result(key, serde_json::from_str(&body)?)
    }
}

fn first_result(key: &FetchKey, resp: ChartResponse) -> Result<ChartData, FetchError> {
    if let Some(err) = resp.chart.error {
        return Err(if err.code == "Not Found" {
            FetchError::SymbolNotFound(key.to_string())
        } else {
            FetchError::EmptyPayload(format!(
                "{}: {}",
                err.code,
                err.description.unwrap_or_default()
            ))
        });
    }
    resp.chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::EmptyPayload(format!("no chart result for {key}")))
}

fn quote_from_chart(key: &FetchKey, data: &ChartData) -> Result<RawQuote, FetchError> {
    let meta = data
        .meta
        .as_ref()
        .ok_or_else(|| FetchError::EmptyPayload(format!("no meta for {key}")))?;
    Ok(RawQuote::Present {
        price: meta.regular_market_price,
        previous_close: meta.chart_previous_close.or(meta.previous_close),
        day_high: meta.regular_market_day_high,
        day_low: meta.regular_market_day_low,
    })
}

fn closes_from_chart(data: ChartData) -> Vec<f64> {
    data.indicators
        .and_then(|i| i.quote.into_iter().next())
        .map(|q| q.close.into_iter().flatten().collect())
        .unwrap_or_default()
}

impl QuoteSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn request_quote(&self, key: &FetchKey) -> Result<RawQuote, FetchError> {
        let url = self.chart_url(key, "1d", "1d")?;
        let data = self.get_chart(key, url)?;
        quote_from_chart(key, &data)
    }

    fn request_history(
        &self,
        key: &FetchKey,
        window: &HistoryWindow,
    ) -> Result<Vec<f64>, FetchError> {
        let url = self.chart_url(key, &window.range, &window.interval)?;
        let closes = closes_from_chart(self.get_chart(key, url)?);
        if closes.is_empty() {
            return Err(FetchError::EmptyPayload(format!("no closes for {key}")));
        }
        Ok(closes)
    }

    fn request_quote_and_history(
        &self,
        key: &FetchKey,
        window: &HistoryWindow,
    ) -> Result<QuoteFetch, FetchError> {
        let url = self.chart_url(key, &window.range, &window.interval)?;
        let data = self.get_chart(key, url)?;
        let quote = quote_from_chart(key, &data).unwrap_or_else(|e| {
            debug!("{}", e);
            RawQuote::Absent
        });
        let closes = closes_from_chart(data);
        Ok(QuoteFetch {
            quote,
            history: (!closes.is_empty()).then_some(closes),
        })
    }
}
