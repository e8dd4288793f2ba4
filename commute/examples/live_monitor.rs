mod common;

use std::time::Duration;

use commute::{Leg, Monitor, TablePresenter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let leg = match std::env::args().nth(1).as_deref() {
        Some("return") => Leg::Return,
        _ => Leg::Outbound,
    };
    let catalog = common::load_catalog()?;
    // Real PTV client by default; CI may set COMMUTE_EXAMPLES_USE_MOCK to use a mock.
    let api = common::get_api(&catalog, leg).await?;

    let monitor = Monitor::builder()
        .with_api(api)
        .catalog(catalog)
        .leg(leg)
        .tick_period(Duration::from_secs(5))
        .build()?;

    let report = monitor.refresh().await?;
    println!(
        "initial refresh: {} connections, {} services, {} warnings",
        report.refreshed,
        report.services,
        report.warnings.len()
    );
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }

    println!("Monitoring for ~20s...");
    let handle = monitor.start_with(TablePresenter::stdout());
    tokio::time::sleep(Duration::from_secs(20)).await;
    handle.stop().await;
    println!("monitor stopped");

    Ok(())
}
