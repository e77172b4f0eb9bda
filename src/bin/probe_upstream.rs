//! One-shot probe: runs a single refresh cycle against the configured upstream
//! and prints what each category returned.

use smartrz::{build_cache, Category, RefreshOutcome, UpstreamConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = UpstreamConfig::load_default()?;
    let cache = build_cache(&cfg)?;

    match cache.refresh().await {
        RefreshOutcome::Completed { succeeded, failed } => {
            println!("cycle complete: {succeeded} ok, {failed} failed");
        }
        RefreshOutcome::Skipped => println!("cycle skipped"),
    }

    let snap = cache.current_snapshot();
    for c in Category::ALL {
        let items = snap.category(c);
        println!("{c:>10}: {} item(s)", items.len());
        if let Some(first) = items.first() {
            println!("{:>10}  first: {}", "", first.display_title());
        }
    }
    match snap.last_updated {
        Some(ts) => println!("lastUpdated: {}", ts.to_rfc3339()),
        None => println!("lastUpdated: never"),
    }
    Ok(())
}
