// src/handlers/prices.rs
use chrono::NaiveDate;
use log::{error, info};
use serde::Deserialize;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::wacc::default_window;
use crate::services::charts::price_chart;
use crate::services::yahoo::fetch_price_history;

#[derive(Debug, Default, Deserialize)]
pub struct PricesQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Raw price-history passthrough for the time-series plot.
pub async fn get_prices(ticker: String, query: PricesQuery) -> Result<Json, Rejection> {
    info!("Handling price history request for {}", ticker);

    let (default_start, default_end) = default_window();
    let start = query.start.unwrap_or(default_start);
    let end = query.end.unwrap_or(default_end);

    let series = fetch_price_history(&ticker, start, end).await.map_err(|e| {
        error!("Failed to fetch prices for {}: {}", ticker, e);
        warp::reject::custom(ApiError::external_error(e.to_string()))
    })?;

    Ok(warp::reply::json(&price_chart(&series)))
}
