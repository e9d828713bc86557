// src/services/regression.rs
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::WaccError;
use crate::models::{AlignedReturns, RegressionSummary};

// Guard against division by zero when |r| == 1 (perfect fit).
const TINY: f64 = 1e-20;

/// Ordinary least squares of asset returns on market returns.
///
/// Market returns are the independent variable. The slope is the equity
/// beta: cov(asset, market) / var(market). Alongside slope and intercept
/// the summary carries the correlation coefficient, the two-sided p-value
/// of the slope (Student's t, n - 2 degrees of freedom) and the standard
/// error of the slope.
pub fn estimate_beta(returns: &AlignedReturns) -> Result<RegressionSummary, WaccError> {
    let n = returns.len();
    let x = &returns.market;
    let y = &returns.asset;

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_xx == 0.0 {
        return Err(WaccError::DegenerateInput(format!(
            "market returns have zero variance over {} observation(s), beta is undefined",
            n
        )));
    }

    let beta = ss_xy / ss_xx;
    let intercept = mean_y - beta * mean_x;

    let r_value = if ss_yy == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
    };

    // With only two points the line fits exactly and there are no degrees
    // of freedom left for inference.
    let (p_value, std_err) = if n == 2 {
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0)
    } else {
        let df = (n - 2) as f64;
        let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
        let p = match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
            Err(_) => f64::NAN,
        };
        let std_err = ((1.0 - r_value * r_value) * ss_yy / ss_xx / df).sqrt();
        (p, std_err)
    };

    Ok(RegressionSummary {
        beta,
        intercept,
        r_value,
        p_value,
        std_err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn aligned(asset: Vec<f64>, market: Vec<f64>) -> AlignedReturns {
        let dates = (0..asset.len())
            .map(|i| NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Days::new(i as u64))
            .collect();
        AlignedReturns {
            dates,
            asset,
            market,
        }
    }

    #[test]
    fn doubled_returns_give_beta_of_two() {
        let returns = aligned(vec![0.02, 0.04, 0.06], vec![0.01, 0.02, 0.03]);
        let summary = estimate_beta(&returns).unwrap();

        assert!((summary.beta - 2.0).abs() < 1e-12);
        assert!(summary.intercept.abs() < 1e-12);
        assert!((summary.r_value - 1.0).abs() < 1e-9);
        assert!(summary.p_value < 1e-6);
        assert!(summary.std_err.abs() < 1e-9);
    }

    #[test]
    fn beta_is_scale_covariant() {
        let base = aligned(vec![0.03, -0.01, 0.04, 0.02], vec![0.02, -0.02, 0.03, 0.01]);
        let beta = estimate_beta(&base).unwrap().beta;

        let asset_scaled = aligned(
            base.asset.iter().map(|r| r * 3.0).collect(),
            base.market.clone(),
        );
        let beta_asset_scaled = estimate_beta(&asset_scaled).unwrap().beta;
        assert!((beta_asset_scaled - 3.0 * beta).abs() < 1e-12);

        let market_scaled = aligned(
            base.asset.clone(),
            base.market.iter().map(|r| r * 4.0).collect(),
        );
        let beta_market_scaled = estimate_beta(&market_scaled).unwrap().beta;
        assert!((beta_market_scaled - beta / 4.0).abs() < 1e-12);
    }

    #[test]
    fn noisy_regression_reports_diagnostics() {
        let returns = aligned(
            vec![0.021, 0.038, 0.055, 0.012, -0.008],
            vec![0.010, 0.020, 0.030, 0.005, -0.004],
        );
        let summary = estimate_beta(&returns).unwrap();

        assert!(summary.beta > 0.0);
        assert!(summary.r_value > 0.9);
        assert!(summary.p_value >= 0.0 && summary.p_value <= 1.0);
        assert!(summary.std_err > 0.0);
    }

    #[test]
    fn constant_market_returns_are_degenerate() {
        let returns = aligned(vec![0.01, 0.02, 0.03], vec![0.02, 0.02, 0.02]);
        let err = estimate_beta(&returns).unwrap_err();
        assert!(matches!(err, WaccError::DegenerateInput(_)));
    }

    #[test]
    fn two_points_fit_exactly_with_no_inference() {
        let returns = aligned(vec![0.01, 0.03], vec![0.02, 0.04]);
        let summary = estimate_beta(&returns).unwrap();

        assert!((summary.beta - 1.0).abs() < 1e-12);
        assert_eq!(summary.std_err, 0.0);
        assert_eq!(summary.p_value, 0.0);
    }
}
