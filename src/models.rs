// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;

/// One daily close for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered daily close history for one ticker, dates strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last observed close, if any.
    pub fn latest_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

/// Inner-join of the subject and market return series on date.
/// All three vectors have identical length; dates are strictly increasing.
#[derive(Debug, Clone, Serialize)]
pub struct AlignedReturns {
    pub dates: Vec<NaiveDate>,
    pub asset: Vec<f64>,
    pub market: Vec<f64>,
}

impl AlignedReturns {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// OLS regression outputs, in the order the reference stats routine reports them.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RegressionSummary {
    pub beta: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    pub std_err: f64,
}

/// Financial-statement constants for one company, supplied by configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapitalStructureInputs {
    pub interest_expense: f64,
    pub ebit: f64,
    pub shares_outstanding: f64,
    pub book_value_of_debt: f64,
}

/// Rate assumptions for CAPM and the WACC blend, supplied by configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketAssumptions {
    pub risk_free_rate: f64,
    pub expected_market_return: f64,
    pub corporate_tax_rate: f64,
    pub debt_premium_factor: f64,
}

// Reference-company defaults, overridable through the environment.
const DEFAULT_INTEREST_EXPENSE: f64 = 102_895_440.0;
const DEFAULT_EBIT: f64 = 680_222_690.0;
const DEFAULT_SHARES_OUTSTANDING: f64 = 125_820_190.0;
const DEFAULT_BOOK_DEBT: f64 = 500_000_000.0;
const DEFAULT_RISK_FREE_RATE: f64 = 0.07;
const DEFAULT_MARKET_RETURN: f64 = 0.12;
const DEFAULT_TAX_RATE: f64 = 0.30;
const DEFAULT_DEBT_PREMIUM: f64 = 1.10;

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

impl CapitalStructureInputs {
    pub fn from_env() -> Self {
        Self {
            interest_expense: env_f64("WACC_INTEREST_EXPENSE", DEFAULT_INTEREST_EXPENSE),
            ebit: env_f64("WACC_EBIT", DEFAULT_EBIT),
            shares_outstanding: env_f64("WACC_SHARES_OUTSTANDING", DEFAULT_SHARES_OUTSTANDING),
            book_value_of_debt: env_f64("WACC_BOOK_DEBT", DEFAULT_BOOK_DEBT),
        }
    }
}

impl Default for CapitalStructureInputs {
    fn default() -> Self {
        Self {
            interest_expense: DEFAULT_INTEREST_EXPENSE,
            ebit: DEFAULT_EBIT,
            shares_outstanding: DEFAULT_SHARES_OUTSTANDING,
            book_value_of_debt: DEFAULT_BOOK_DEBT,
        }
    }
}

impl MarketAssumptions {
    pub fn from_env() -> Self {
        Self {
            risk_free_rate: env_f64("WACC_RISK_FREE_RATE", DEFAULT_RISK_FREE_RATE),
            expected_market_return: env_f64("WACC_MARKET_RETURN", DEFAULT_MARKET_RETURN),
            corporate_tax_rate: env_f64("WACC_TAX_RATE", DEFAULT_TAX_RATE),
            debt_premium_factor: env_f64("WACC_DEBT_PREMIUM", DEFAULT_DEBT_PREMIUM),
        }
    }
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            expected_market_return: DEFAULT_MARKET_RETURN,
            corporate_tax_rate: DEFAULT_TAX_RATE,
            debt_premium_factor: DEFAULT_DEBT_PREMIUM,
        }
    }
}

/// Final report for one pipeline run. Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct WaccReport {
    pub ticker: String,
    pub beta_equity: f64,
    pub regression: RegressionSummary,
    pub cost_of_equity: f64,
    pub cost_of_debt: f64,
    pub interest_coverage_ratio: f64,
    pub market_value_equity: f64,
    pub market_value_debt: f64,
    pub wacc: f64,
}
