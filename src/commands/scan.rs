use crate::config::ScanConfig;
use crate::error::{AppError, Result};
use crate::models::SectorGroups;
use crate::scanner::{ScanEngine, ScanSummary};
use crate::services::{TelegramClient, UniverseClient, YahooClient};
use chrono::Utc;

pub fn run(force: bool, lookback_days: Option<u32>, top_n: Option<usize>) {
    let mut config = ScanConfig::from_env();
    if let Some(days) = lookback_days {
        config.lookback_days = days;
    }
    if let Some(n) = top_n {
        config.top_n = n;
    }
    let force = force || config.force_send;

    if force {
        println!("🔧 Forced run: dedup store bypassed");
    }

    match scan_once(config, force) {
        Ok(summary) => {
            println!(
                "✅ Scan completed: {} symbols, {} hits ({} suppressed, {} failed)",
                summary.scanned, summary.hits, summary.suppressed, summary.failed
            );
            if !summary.notified.is_empty() {
                println!("📨 Notified: {}", summary.notified.join(", "));
            }
            if !summary.delivered {
                eprintln!("⚠️  Report delivery failed; see logs for details");
            }
        }
        Err(e) => {
            eprintln!("❌ Scan failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn scan_once(config: ScanConfig, force: bool) -> Result<ScanSummary> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        // Delivery credentials are validated before any scan work; a
        // missing token aborts here, not halfway through the universe.
        let sink = TelegramClient::from_env()?;

        let groups = match &config.sector_groups_file {
            Some(path) => SectorGroups::from_file(path)?,
            None => SectorGroups::defaults(),
        };
        let universe = UniverseClient::new(groups)?;
        let yahoo = YahooClient::new()?;

        let engine = ScanEngine::new(yahoo.clone(), yahoo, universe, sink, config);
        engine.run(force, Utc::now()).await
    })
}
