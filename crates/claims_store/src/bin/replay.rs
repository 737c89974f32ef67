//! Claims Store - Replay Binary
//!
//! Drives a store through recorded transport and push-channel traffic and
//! prints the resulting page as JSON.
//!
//! # Usage
//!
//! ```bash
//! claims-replay script.json
//! CLAIMS_STORE_DEFAULT_PAGE_SIZE=50 CLAIMS_STORE_LOG_LEVEL=debug claims-replay script.json
//! ```
//!
//! # Script format
//!
//! ```json
//! {
//!   "fetch": { "items": [...], "total": 2, "page": 1, "size": 20 },
//!   "events": [{ "claim_id": "c1", "status": "processing", "updated_fields": ["status"] }],
//!   "filters": { "status": "approved" },
//!   "sort": { "key": "tracking_number", "direction": "asc" },
//!   "page_size": 20,
//!   "page": 1,
//!   "select_all": false,
//!   "bulk_status": "paid"
//! }
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claims_store::{
    ClaimUpdateEvent, ClaimsStore, FilterSpec, PageFetchResult, SortSpec, StoreConfig,
};
use domain_claims::ClaimStatus;

#[derive(Debug, Deserialize)]
struct ReplayScript {
    fetch: Option<PageFetchResult>,
    #[serde(default)]
    events: Vec<ClaimUpdateEvent>,
    filters: Option<FilterSpec>,
    sort: Option<SortSpec>,
    page_size: Option<usize>,
    page: Option<usize>,
    #[serde(default)]
    select_all: bool,
    bulk_status: Option<ClaimStatus>,
}

#[derive(Debug, Serialize)]
struct ReplayReport<'a> {
    page: &'a claims_store::Page,
    selected: usize,
    rejected_events: usize,
    error: Option<&'a str>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StoreConfig::from_env().context("failed to load CLAIMS_STORE_* configuration")?;
    init_tracing(&config.log_level);

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: claims-replay <script.json>");
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let script: ReplayScript = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut store = ClaimsStore::new(config).context("invalid store configuration")?;
    replay(&mut store, script)?;

    let page = store.page();
    let report = ReplayReport {
        page: &page,
        selected: store.selected_count(),
        rejected_events: store.recent_rejections().count(),
        error: store.error(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn replay(store: &mut ClaimsStore, script: ReplayScript) -> anyhow::Result<()> {
    if let Some(fetch) = script.fetch {
        let outcome = store.load_page(fetch).context("page-fetch result rejected")?;
        tracing::info!(?outcome, claims = store.len(), "loaded page-fetch result");
    }

    for event in script.events {
        let claim_id = event.claim_id.clone();
        match store.handle_claim_update(event) {
            Ok(outcome) => tracing::info!(%claim_id, ?outcome, "update event"),
            Err(error) => tracing::warn!(%claim_id, %error, "update event rejected"),
        }
    }

    if let Some(filters) = script.filters {
        store.set_filters(filters);
    }
    if let Some(sort) = script.sort {
        store.set_sort(sort);
    }
    if let Some(page_size) = script.page_size {
        store.set_page_size(page_size)?;
    }
    if let Some(page) = script.page {
        store.set_page(page);
    }
    if script.select_all {
        store.select_all_filtered();
    }
    if let Some(status) = script.bulk_status {
        let outcome = store.bulk_update_status(status);
        tracing::info!(
            updated = outcome.updated.len(),
            rejected = outcome.rejected.len(),
            "bulk status change"
        );
    }
    Ok(())
}

/// Initializes the tracing subscriber, preferring `RUST_LOG` when set
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
