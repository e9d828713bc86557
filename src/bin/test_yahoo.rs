use anyhow::Result;
use dotenv::dotenv;
use log::{error, info};

use wacc_dashboard::handlers::wacc::default_window;
use wacc_dashboard::services::yahoo::fetch_price_history;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    info!("Testing Yahoo Finance price history fetching...");

    let (start, end) = default_window();
    match fetch_price_history("ONGC.NS", start, end).await {
        Ok(series) => {
            info!(
                "SUCCESS: fetched {} closes for {}, latest: {:?}",
                series.len(),
                series.ticker,
                series.latest_close()
            );
        }
        Err(e) => {
            error!("ERROR: Failed to fetch price history: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
