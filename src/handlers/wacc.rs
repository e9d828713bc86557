// src/handlers/wacc.rs
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::env;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{CapitalStructureInputs, MarketAssumptions, WaccReport};
use crate::services::calculations::{compute_wacc, DebtRatingPolicy};
use crate::services::charts::{price_chart, regression_chart, PriceChart, RegressionChart};
use crate::services::yahoo::fetch_price_history;

pub const DEFAULT_MARKET_INDEX: &str = "^NSEI";
pub const DEFAULT_START: &str = "2023-01-01";
pub const DEFAULT_END: &str = "2024-03-31";

/// Query overrides for one run. Anything omitted falls back to the
/// environment-supplied configuration.
#[derive(Debug, Default, Deserialize)]
pub struct WaccQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub index: Option<String>,
    pub risk_free_rate: Option<f64>,
    pub market_return: Option<f64>,
    pub tax_rate: Option<f64>,
    pub debt_premium: Option<f64>,
    pub interest_expense: Option<f64>,
    pub ebit: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub book_debt: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct WaccResponse {
    pub report: WaccReport,
    pub regression_chart: RegressionChart,
    pub price_chart: PriceChart,
}

pub fn market_index() -> String {
    env::var("MARKET_INDEX").unwrap_or_else(|_| DEFAULT_MARKET_INDEX.to_string())
}

pub fn default_window() -> (NaiveDate, NaiveDate) {
    // The fixed fallback window; both literals parse.
    let start = DEFAULT_START.parse().unwrap_or_default();
    let end = DEFAULT_END.parse().unwrap_or_default();
    (start, end)
}

fn apply_overrides(
    query: &WaccQuery,
) -> (CapitalStructureInputs, MarketAssumptions) {
    let mut inputs = CapitalStructureInputs::from_env();
    let mut assumptions = MarketAssumptions::from_env();

    if let Some(v) = query.interest_expense {
        inputs.interest_expense = v;
    }
    if let Some(v) = query.ebit {
        inputs.ebit = v;
    }
    if let Some(v) = query.shares_outstanding {
        inputs.shares_outstanding = v;
    }
    if let Some(v) = query.book_debt {
        inputs.book_value_of_debt = v;
    }
    if let Some(v) = query.risk_free_rate {
        assumptions.risk_free_rate = v;
    }
    if let Some(v) = query.market_return {
        assumptions.expected_market_return = v;
    }
    if let Some(v) = query.tax_rate {
        assumptions.corporate_tax_rate = v;
    }
    if let Some(v) = query.debt_premium {
        assumptions.debt_premium_factor = v;
    }

    (inputs, assumptions)
}

pub async fn get_wacc(ticker: String, query: WaccQuery) -> Result<Json, Rejection> {
    info!("Handling WACC request for {}", ticker);

    let (default_start, default_end) = default_window();
    let start = query.start.unwrap_or(default_start);
    let end = query.end.unwrap_or(default_end);
    let index = query.index.clone().unwrap_or_else(market_index);

    if start >= end {
        return Err(warp::reject::custom(ApiError::invalid_input(format!(
            "start date {} is not before end date {}",
            start, end
        ))));
    }

    let asset_prices = fetch_price_history(&ticker, start, end).await.map_err(|e| {
        error!("Failed to fetch prices for {}: {}", ticker, e);
        warp::reject::custom(ApiError::external_error(e.to_string()))
    })?;
    let market_prices = fetch_price_history(&index, start, end).await.map_err(|e| {
        error!("Failed to fetch prices for {}: {}", index, e);
        warp::reject::custom(ApiError::external_error(e.to_string()))
    })?;

    let (inputs, assumptions) = apply_overrides(&query);
    let policy = DebtRatingPolicy::default();

    let computation = compute_wacc(&asset_prices, &market_prices, &inputs, &assumptions, &policy)
        .map_err(|e| {
            error!("Pipeline failed for {}: {}", ticker, e);
            warp::reject::custom(ApiError::from(e))
        })?;

    let response = WaccResponse {
        regression_chart: regression_chart(
            &computation.aligned_returns,
            &computation.report.regression,
        ),
        price_chart: price_chart(&asset_prices),
        report: computation.report,
    };

    info!(
        "WACC for {}: {:.4} (beta {:.4})",
        ticker, response.report.wacc, response.report.beta_equity
    );
    Ok(warp::reply::json(&response))
}
