//! Read-through demo
//!
//! Caches a few computed country summaries, reads them back, invalidates one
//! entity and prints the resulting statistics.
//!
//! Run with `RUST_LOG=intel_cache=debug cargo run --example read_through`.

use std::time::Duration;

use intel_cache::{build_key, CacheConfig, EntryType, SharedCache};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Serialize)]
struct CountrySummary {
    name: String,
    vitality: u32,
}

async fn compute_summary(id: &str) -> anyhow::Result<CountrySummary> {
    // Stands in for an expensive scoring pass
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(CountrySummary {
        name: id.to_uppercase(),
        vitality: id.len() as u32 * 10,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intel_cache=debug,read_through=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(?config, "Configuration loaded");
    let cache: SharedCache<CountrySummary> = SharedCache::new(config)?;

    for id in ["aurelia", "brevania", "aurelia", "calder", "aurelia"] {
        let key = build_key("intelligence", id, Some("summary"));
        let summary = cache
            .get_with_fallback(&key, || compute_summary(id), EntryType::Historical)
            .await?;
        info!(key = %key, vitality = summary.vitality, "Summary ready");
    }

    let removed = cache.invalidate_by_entity("aurelia").await;
    info!(removed, "Invalidated aurelia");

    let stats = cache.stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    cache.destroy().await;
    Ok(())
}
