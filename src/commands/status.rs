use crate::config::ScanConfig;
use crate::state::AlertStore;
use chrono::Utc;

pub fn run() {
    let config = ScanConfig::from_env();
    let store = AlertStore::open(&config.state_path, Utc::now().date_naive());
    let state = store.state();

    println!("📋 Alert State\n");
    println!("   Date:    {}", state.date);
    println!("   Alerted: {} symbols", state.symbols.len());

    if state.symbols.is_empty() {
        println!("\n   No symbols alerted yet today.");
    } else {
        println!();
        for symbol in &state.symbols {
            println!("   • {}", symbol);
        }
    }

    println!("\n💡 State file: {}", config.state_path.display());
}
