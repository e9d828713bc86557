// src/services/charts.rs
use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AlignedReturns, PriceSeries, RegressionSummary};

/// One (market return, asset return) scatter point.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScatterPoint {
    pub date: NaiveDate,
    pub market_return: f64,
    pub asset_return: f64,
}

/// Data for the returns scatter plot with its fitted regression line.
/// The line is given as two endpoints evaluated at the extreme market
/// returns, plus slope/intercept for clients that draw it themselves.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionChart {
    pub points: Vec<ScatterPoint>,
    pub line_start: (f64, f64),
    pub line_end: (f64, f64),
    pub slope: f64,
    pub intercept: f64,
}

/// Data for the subject price-history plot.
#[derive(Debug, Clone, Serialize)]
pub struct PriceChart {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
}

/// Shape the aligned returns and fitted line into a plot-ready dataset.
pub fn regression_chart(returns: &AlignedReturns, fit: &RegressionSummary) -> RegressionChart {
    let points: Vec<ScatterPoint> = returns
        .dates
        .iter()
        .zip(returns.market.iter().zip(returns.asset.iter()))
        .map(|(&date, (&market_return, &asset_return))| ScatterPoint {
            date,
            market_return,
            asset_return,
        })
        .collect();

    let x_min = returns.market.iter().cloned().fold(f64::INFINITY, f64::min);
    let x_max = returns
        .market
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    RegressionChart {
        points,
        line_start: (x_min, fit.intercept + fit.beta * x_min),
        line_end: (x_max, fit.intercept + fit.beta * x_max),
        slope: fit.beta,
        intercept: fit.intercept,
    }
}

/// Shape a price series into a plot-ready dataset.
pub fn price_chart(series: &PriceSeries) -> PriceChart {
    PriceChart {
        ticker: series.ticker.clone(),
        dates: series.points.iter().map(|p| p.date).collect(),
        closes: series.points.iter().map(|p| p.close).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regression_line_spans_the_market_range() {
        let returns = AlignedReturns {
            dates: vec![
                NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 4).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            ],
            asset: vec![0.02, 0.04, -0.01],
            market: vec![0.01, 0.02, -0.005],
        };
        let fit = RegressionSummary {
            beta: 2.0,
            intercept: 0.0,
            r_value: 1.0,
            p_value: 0.0,
            std_err: 0.0,
        };

        let chart = regression_chart(&returns, &fit);
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.line_start.0, -0.005);
        assert_eq!(chart.line_end.0, 0.02);
        assert!((chart.line_end.1 - 0.04).abs() < 1e-12);
    }
}
