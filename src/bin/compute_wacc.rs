use anyhow::Result;
use dotenv::dotenv;
use log::{error, info};
use std::env;

use wacc_dashboard::handlers::wacc::{default_window, market_index};
use wacc_dashboard::models::{CapitalStructureInputs, MarketAssumptions};
use wacc_dashboard::services::calculations::{compute_wacc, DebtRatingPolicy};
use wacc_dashboard::services::yahoo::fetch_price_history;

/// One-shot pipeline run: fetch both price histories, compute the WACC
/// report and print it as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let ticker = env::args()
        .nth(1)
        .or_else(|| env::var("TICKER").ok())
        .unwrap_or_else(|| "ONGC.NS".to_string());
    let index = market_index();
    let (start, end) = default_window();

    info!(
        "Computing WACC for {} against {} over {}..{}",
        ticker, index, start, end
    );

    let asset_prices = fetch_price_history(&ticker, start, end).await?;
    let market_prices = fetch_price_history(&index, start, end).await?;

    let inputs = CapitalStructureInputs::from_env();
    let assumptions = MarketAssumptions::from_env();
    let policy = DebtRatingPolicy::default();

    let computation = match compute_wacc(&asset_prices, &market_prices, &inputs, &assumptions, &policy) {
        Ok(c) => c,
        Err(e) => {
            error!("Pipeline failed for {}: {}", ticker, e);
            return Err(e.into());
        }
    };

    let report = &computation.report;
    info!("Beta Equity: {:.4}", report.beta_equity);
    info!("Cost of Equity: {:.4}", report.cost_of_equity);
    info!("Cost of Debt: {:.4}", report.cost_of_debt);
    info!("Market Value of Equity: {:.2}", report.market_value_equity);
    info!("Market Value of Debt: {:.2}", report.market_value_debt);
    info!("Weighted Average Cost of Capital (WACC): {:.4}", report.wacc);

    println!("{}", serde_json::to_string_pretty(report)?);

    Ok(())
}
