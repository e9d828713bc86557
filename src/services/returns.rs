// src/services/returns.rs
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::WaccError;
use crate::models::{AlignedReturns, PriceSeries};

/// Simple percentage-change returns: (p[t] - p[t-1]) / p[t-1].
/// The first observation has no prior period and is dropped, so the
/// output is one shorter than the input.
fn simple_returns(series: &PriceSeries) -> Vec<(NaiveDate, f64)> {
    series
        .points
        .windows(2)
        .map(|w| (w[1].date, (w[1].close - w[0].close) / w[0].close))
        .collect()
}

/// Build aligned daily returns for the subject and market series.
///
/// Each series is converted to simple returns independently, then the two
/// are inner-joined on date. Days missing on either side, and any return
/// that is not a finite number, are dropped.
pub fn build_aligned_returns(
    asset: &PriceSeries,
    market: &PriceSeries,
) -> Result<AlignedReturns, WaccError> {
    if asset.len() < 2 {
        return Err(WaccError::EmptyInput(format!(
            "price history for {} has {} observation(s), need at least 2",
            asset.ticker,
            asset.len()
        )));
    }
    if market.len() < 2 {
        return Err(WaccError::EmptyInput(format!(
            "price history for {} has {} observation(s), need at least 2",
            market.ticker,
            market.len()
        )));
    }

    let asset_returns = simple_returns(asset);
    let market_by_date: HashMap<NaiveDate, f64> = simple_returns(market).into_iter().collect();

    let mut dates = Vec::new();
    let mut asset_col = Vec::new();
    let mut market_col = Vec::new();

    for (date, asset_ret) in asset_returns {
        if let Some(&market_ret) = market_by_date.get(&date) {
            if asset_ret.is_finite() && market_ret.is_finite() {
                dates.push(date);
                asset_col.push(asset_ret);
                market_col.push(market_ret);
            }
        }
    }

    if dates.is_empty() {
        return Err(WaccError::EmptyInput(format!(
            "no overlapping trading days between {} and {}",
            asset.ticker, market.ticker
        )));
    }

    Ok(AlignedReturns {
        dates,
        asset: asset_col,
        market: market_col,
    })
}
