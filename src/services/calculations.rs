// src/services/calculations.rs
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::WaccError;
use crate::models::{
    AlignedReturns, CapitalStructureInputs, MarketAssumptions, PriceSeries, WaccReport,
};
use crate::services::regression::estimate_beta;
use crate::services::returns::build_aligned_returns;

/// CAPM: riskFree + beta * (expectedMarketReturn - riskFree).
/// Beta may be negative or exceed 1; no special-casing.
pub fn capm_cost_of_equity(beta: f64, assumptions: &MarketAssumptions) -> f64 {
    assumptions.risk_free_rate
        + beta * (assumptions.expected_market_return - assumptions.risk_free_rate)
}

/// Coverage-ratio tiers for the rule-based cost of debt, evaluated
/// highest threshold first. A ratio above `threshold` earns `rate`;
/// anything below every threshold falls through to `floor_rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtRatingPolicy {
    pub tiers: Vec<(f64, f64)>,
    pub floor_rate: f64,
}

impl Default for DebtRatingPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![(8.0, 0.05), (5.0, 0.06)],
            floor_rate: 0.08,
        }
    }
}

impl DebtRatingPolicy {
    pub fn rate_for(&self, coverage_ratio: f64) -> f64 {
        for &(threshold, rate) in &self.tiers {
            if coverage_ratio > threshold {
                return rate;
            }
        }
        self.floor_rate
    }
}

/// Rule-based cost of debt from the interest coverage ratio.
/// Returns (coverage ratio, cost of debt).
pub fn estimate_cost_of_debt(
    ebit: f64,
    interest_expense: f64,
    policy: &DebtRatingPolicy,
) -> Result<(f64, f64), WaccError> {
    if interest_expense == 0.0 {
        return Err(WaccError::DivisionByZero(
            "interest expense is zero, coverage ratio is undefined".to_string(),
        ));
    }
    let coverage_ratio = ebit / interest_expense;
    Ok((coverage_ratio, policy.rate_for(coverage_ratio)))
}

/// Market value of equity: latest close * shares outstanding.
pub fn market_value_of_equity(
    latest_close: Option<f64>,
    shares_outstanding: f64,
) -> Result<f64, WaccError> {
    let price = latest_close.ok_or_else(|| {
        WaccError::InvalidValuation("price series is empty, no latest close".to_string())
    })?;
    if !price.is_finite() || price <= 0.0 {
        return Err(WaccError::InvalidValuation(format!(
            "latest close {} is not a positive finite price",
            price
        )));
    }
    let value = price * shares_outstanding;
    if !value.is_finite() || value <= 0.0 {
        return Err(WaccError::InvalidValuation(format!(
            "market value of equity {} is not a positive finite value",
            value
        )));
    }
    Ok(value)
}

/// Market value of debt: book value marked up by the debt premium factor.
pub fn market_value_of_debt(
    book_value_of_debt: f64,
    debt_premium_factor: f64,
) -> Result<f64, WaccError> {
    let value = book_value_of_debt * debt_premium_factor;
    if !value.is_finite() || value <= 0.0 {
        return Err(WaccError::InvalidValuation(format!(
            "market value of debt {} is not a positive finite value",
            value
        )));
    }
    Ok(value)
}

/// Value-weighted blend of cost of equity and after-tax cost of debt.
pub fn combine_wacc(
    market_value_equity: f64,
    market_value_debt: f64,
    cost_of_equity: f64,
    cost_of_debt: f64,
    corporate_tax_rate: f64,
) -> Result<f64, WaccError> {
    let total_value = market_value_equity + market_value_debt;
    if !total_value.is_finite() || total_value <= 0.0 {
        return Err(WaccError::InvalidValuation(format!(
            "total capital value {} is not a positive finite value",
            total_value
        )));
    }
    let weight_equity = market_value_equity / total_value;
    let weight_debt = 1.0 - weight_equity;
    Ok(weight_equity * cost_of_equity + weight_debt * cost_of_debt * (1.0 - corporate_tax_rate))
}

/// Output of one full pipeline run: the report plus the aligned returns
/// it was estimated from (the front end needs them for the scatter plot).
#[derive(Debug, Clone, Serialize)]
pub struct WaccComputation {
    pub report: WaccReport,
    pub aligned_returns: AlignedReturns,
}

/// Run the full pipeline: prices -> returns -> beta -> costs -> WACC.
/// Fails with the first stage error; never produces a partial report.
pub fn compute_wacc(
    asset_prices: &PriceSeries,
    market_prices: &PriceSeries,
    inputs: &CapitalStructureInputs,
    assumptions: &MarketAssumptions,
    policy: &DebtRatingPolicy,
) -> Result<WaccComputation, WaccError> {
    let aligned = build_aligned_returns(asset_prices, market_prices)?;
    info!(
        "Aligned {} daily returns for {} against {}",
        aligned.len(),
        asset_prices.ticker,
        market_prices.ticker
    );

    let regression = estimate_beta(&aligned)?;
    let beta_equity = regression.beta;
    info!("Beta equity for {}: {:.4}", asset_prices.ticker, beta_equity);

    let cost_of_equity = capm_cost_of_equity(beta_equity, assumptions);
    let (interest_coverage_ratio, cost_of_debt) =
        estimate_cost_of_debt(inputs.ebit, inputs.interest_expense, policy)?;

    let market_value_equity =
        market_value_of_equity(asset_prices.latest_close(), inputs.shares_outstanding)?;
    let market_value_debt =
        market_value_of_debt(inputs.book_value_of_debt, assumptions.debt_premium_factor)?;

    let wacc = combine_wacc(
        market_value_equity,
        market_value_debt,
        cost_of_equity,
        cost_of_debt,
        assumptions.corporate_tax_rate,
    )?;
    info!("WACC for {}: {:.4}", asset_prices.ticker, wacc);

    let report = WaccReport {
        ticker: asset_prices.ticker.clone(),
        beta_equity,
        regression,
        cost_of_equity,
        cost_of_debt,
        interest_coverage_ratio,
        market_value_equity,
        market_value_debt,
        wacc,
    };

    Ok(WaccComputation {
        report,
        aligned_returns: aligned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::NaiveDate;

    #[test]
    fn capm_matches_reference_figures() {
        let assumptions = MarketAssumptions {
            risk_free_rate: 0.07,
            expected_market_return: 0.12,
            ..MarketAssumptions::default()
        };
        let cost = capm_cost_of_equity(1.2549, &assumptions);
        assert!((cost - 0.132745).abs() < 1e-6);
    }

    #[test]
    fn capm_handles_negative_beta() {
        let assumptions = MarketAssumptions::default();
        let cost = capm_cost_of_equity(-0.5, &assumptions);
        assert!((cost - (0.07 - 0.5 * 0.05)).abs() < 1e-12);
    }

    #[test]
    fn coverage_ratio_maps_to_mid_tier() {
        let (ratio, rate) =
            estimate_cost_of_debt(680_222_690.0, 102_895_440.0, &DebtRatingPolicy::default())
                .unwrap();
        assert!((ratio - 6.6108).abs() < 1e-4);
        assert!((rate - 0.06).abs() < 1e-12);
    }

    #[test]
    fn coverage_tiers_use_strict_thresholds() {
        let policy = DebtRatingPolicy::default();
        assert_eq!(policy.rate_for(8.5), 0.05);
        assert_eq!(policy.rate_for(8.0), 0.06);
        assert_eq!(policy.rate_for(5.0), 0.08);
        assert_eq!(policy.rate_for(1.0), 0.08);
    }

    #[test]
    fn zero_interest_expense_is_division_by_zero() {
        let err = estimate_cost_of_debt(1_000_000.0, 0.0, &DebtRatingPolicy::default())
            .unwrap_err();
        assert!(matches!(err, WaccError::DivisionByZero(_)));
    }

    #[test]
    fn empty_price_history_fails_valuation() {
        let err = market_value_of_equity(None, 125_820_190.0).unwrap_err();
        assert!(matches!(err, WaccError::InvalidValuation(_)));
    }

    #[test]
    fn non_positive_price_fails_valuation() {
        assert!(market_value_of_equity(Some(0.0), 1000.0).is_err());
        assert!(market_value_of_equity(Some(f64::NAN), 1000.0).is_err());
        assert!(market_value_of_equity(Some(-1.0), 1000.0).is_err());
    }

    #[test]
    fn debt_is_book_value_times_premium() {
        let value = market_value_of_debt(500_000_000.0, 1.10).unwrap();
        assert!((value - 550_000_000.0).abs() < 1e-3);
        assert!(market_value_of_debt(0.0, 1.10).is_err());
    }

    #[test]
    fn wacc_blend_matches_reference_figures() {
        let wacc = combine_wacc(1.5e11, 5.5e8, 0.1327, 0.06, 0.30).unwrap();
        // weightEquity ~ 0.9964, weightDebt ~ 0.0036
        assert!((wacc - 0.13237).abs() < 1e-4);
    }

    #[test]
    fn zero_total_value_is_invalid() {
        let err = combine_wacc(0.0, 0.0, 0.13, 0.06, 0.30).unwrap_err();
        assert!(matches!(err, WaccError::InvalidValuation(_)));
    }

    fn series(ticker: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        PriceSeries::new(
            ticker,
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: start + chrono::Days::new(i as u64),
                    close,
                })
                .collect(),
        )
    }

    #[test]
    fn pipeline_produces_a_full_report() {
        // Asset moves exactly twice as much as the market each day.
        let market = series("IDX", &[100.0, 101.0, 103.02, 101.9898]);
        let asset = series("AAA", &[50.0, 51.0, 53.04, 51.9792]);

        let out = compute_wacc(
            &asset,
            &market,
            &CapitalStructureInputs::default(),
            &MarketAssumptions::default(),
            &DebtRatingPolicy::default(),
        )
        .unwrap();

        assert_eq!(out.report.ticker, "AAA");
        assert!((out.report.beta_equity - 2.0).abs() < 1e-9);
        assert!((out.report.cost_of_debt - 0.06).abs() < 1e-12);
        assert!(out.report.market_value_equity > 0.0);
        assert!(out.report.wacc > 0.0);
        assert_eq!(out.aligned_returns.len(), 3);
    }

    #[test]
    fn pipeline_fails_on_constant_market() {
        let market = series("IDX", &[100.0, 100.0, 100.0]);
        let asset = series("AAA", &[50.0, 51.0, 52.0]);

        let err = compute_wacc(
            &asset,
            &market,
            &CapitalStructureInputs::default(),
            &MarketAssumptions::default(),
            &DebtRatingPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, WaccError::DegenerateInput(_)));
    }
}
