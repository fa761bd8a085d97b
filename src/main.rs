use anyhow::anyhow;
use chrono::{Datelike, NaiveDate, Utc};
use dotenv::dotenv;
use env_logger;
use log::{info, warn};
use std::env;
use std::path::Path;

use sp500_horizon::services::{calculations, prices, recessions, returns};

const DEFAULT_PRICES_URL: &str = "https://datahub.io/core/s-and-p-500/r/data.csv";
const DEFAULT_RECESSIONS_PATH: &str = "data/recessions.csv";

/// Principal used for every headline figure.
const PRINCIPAL: f64 = 10_000.0;
/// Long-run average dividend yield assumed for reinvestment.
const DIVIDEND_RATE: f64 = 0.04;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the long-horizon return report...");

    let prices_url = env::var("SP500_CSV_URL").unwrap_or_else(|_| {
        warn!("$SP500_CSV_URL not set, defaulting to {}", DEFAULT_PRICES_URL);
        DEFAULT_PRICES_URL.to_string()
    });
    let recessions_path = env::var("RECESSIONS_CSV").unwrap_or_else(|_| {
        warn!("$RECESSIONS_CSV not set, defaulting to {}", DEFAULT_RECESSIONS_PATH);
        DEFAULT_RECESSIONS_PATH.to_string()
    });

    let mut table = prices::fetch_price_table(&prices_url)
        .await
        .map_err(|e| anyhow!("failed to load price history: {e}"))?;
    calculations::apply_monthly_changes(&mut table);

    if let Some((worst, best)) = calculations::extreme_months(&table) {
        info!(
            "Worst month on record: {} ({:.1}%), best: {} (+{:.1}%)",
            worst.date,
            worst.pct_change.unwrap_or(0.0),
            best.date,
            best.pct_change.unwrap_or(0.0)
        );
    }

    let now = Utc::now();
    let present = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .ok_or_else(|| anyhow!("invalid current date"))?;
    let recession_table = recessions::load_recessions(Path::new(&recessions_path), present)
        .map_err(|e| anyhow!("failed to load recession dates: {e}"))?;

    // Headline: a fixed sum left alone from the first recorded month.
    let first = table.first().date;
    let last = table.last().date;
    let held = returns::buy_and_hold_quick(&table, first, last, PRINCIPAL)?;
    info!(
        "${:.0} invested {} would be worth ${:.0} of today's dollars by {} on price alone",
        PRINCIPAL,
        first,
        returns::end_value(&held)?,
        last
    );

    let reinvested = returns::compound_quick(&table, first, last, PRINCIPAL, DIVIDEND_RATE)?;
    info!(
        "With a {:.1}% dividend reinvested annually, the same sum reaches ${:.3e}",
        DIVIDEND_RATE * 100.0,
        returns::end_value(&reinvested)?
    );

    // Does waiting for the recession to end beat investing right at the peak?
    let mut dip_wins = 0u32;
    let mut peak_wins = 0u32;
    for recession in &recession_table {
        let at_peak = match returns::compound_40y(&table, recession.start, PRINCIPAL, DIVIDEND_RATE)
        {
            Ok(series) => returns::end_value(&series)?,
            Err(e) => {
                warn!("Skipping recession starting {}: {}", recession.start, e);
                continue;
            }
        };
        let after_dip = returns::end_value(&returns::buy_the_dip(
            &table,
            &recession_table,
            recession.start,
            PRINCIPAL,
            DIVIDEND_RATE,
        )?)?;

        if after_dip > at_peak {
            dip_wins += 1;
        } else {
            peak_wins += 1;
        }
        info!(
            "Recession {} to {}: invest at peak -> ${:.0}, wait for the trough -> ${:.0}",
            recession.start, recession.end, at_peak, after_dip
        );
    }
    info!(
        "Over {} comparable recessions, waiting for the trough won {} times, investing at the peak {} times",
        dip_wins + peak_wins,
        dip_wins,
        peak_wins
    );

    Ok(())
}
