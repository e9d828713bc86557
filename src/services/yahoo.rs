// src/services/yahoo.rs
use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use log::{error, info};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{PricePoint, PriceSeries};

// Yahoo's chart API answers plain GETs as long as a browser user agent is sent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    close: Option<Vec<Option<f64>>>,
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Fetch daily close history for a ticker over [start, end] from the
/// Yahoo Finance chart API. Days with a null close are skipped.
pub async fn fetch_price_history(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries> {
    let url = format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
        ticker,
        unix_seconds(start),
        unix_seconds(end),
    );
    info!("Fetching price history from URL: {}", url);

    let client = Client::builder().user_agent(USER_AGENT).build()?;
    let envelope: ChartEnvelope = client.get(&url).send().await?.json().await?;

    if let Some(err) = envelope.chart.error {
        error!("Yahoo chart API error for {}: {}", ticker, err.description);
        bail!("Yahoo chart API error: {}", err.description);
    }

    let result = match envelope.chart.result {
        Some(mut r) if !r.is_empty() => r.remove(0),
        _ => bail!("No chart data returned for {}", ticker),
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.into_iter().zip(closes.into_iter()) {
        if let (Some(close), Some(dt)) = (close, DateTime::from_timestamp(ts, 0)) {
            if close.is_finite() && close > 0.0 {
                points.push(PricePoint {
                    date: dt.date_naive(),
                    close,
                });
            }
        }
    }

    if points.is_empty() {
        error!("No usable closes for {} between {} and {}", ticker, start, end);
        bail!("No price data found for {}", ticker);
    }

    info!("Fetched {} daily closes for {}", points.len(), ticker);
    Ok(PriceSeries::new(ticker, points))
}
