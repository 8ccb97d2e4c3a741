//! Delivery source abstraction
//!
//! The analysis pipeline never talks to the network itself. A
//! `DeliverySource` lists delivery summaries and fetches one order detail per
//! delivery; `collect_history` drives it and turns the details into purchase
//! records.
//!
//! # Architecture
//!
//! - `DeliverySource` trait: the collaborator interface
//! - `PicnicSource`: storefront HTTP API implementation
//! - `MockSource`: canned deliveries for tests and offline development
//!
//! # Failure model
//!
//! Listing deliveries is the only fatal step. A detail fetch that fails, or a
//! summary without any id, is recorded as a `SkippedDelivery` and the run
//! continues with the remaining deliveries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::extract::{extract, SkippedItem};
use crate::models::PurchaseRecord;

mod mock;
mod picnic;
pub mod types;

pub use mock::MockSource;
pub use picnic::{default_base_url, PicnicSource};
pub use types::{DeliverySummary, DeliveryWindow, OrderDetail};

/// Deliveries processed per run when not configured otherwise
pub const DEFAULT_MAX_DELIVERIES: usize = 50;

/// Delay between detail fetches when not configured otherwise
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(100);

/// Trait for delivery history providers
///
/// Implementations are expected to surface their own auth and network
/// failures as errors; retrying is not the caller's concern.
#[async_trait]
pub trait DeliverySource: Send + Sync {
    /// Human-readable name for this source
    fn name(&self) -> &str;

    /// List delivery summaries, most recent first
    async fn list_deliveries(&self) -> Result<Vec<DeliverySummary>>;

    /// Fetch the itemized detail of one delivery
    async fn fetch_delivery(&self, delivery_id: &str) -> Result<OrderDetail>;
}

/// How a history collection run is bounded
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Only the most recent N deliveries are fetched
    pub max_deliveries: usize,
    /// Pause after each detail fetch
    pub throttle: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_deliveries: DEFAULT_MAX_DELIVERIES,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

/// A delivery that contributed no records
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDelivery {
    /// Resolved delivery id, empty when the summary had none
    pub delivery_id: String,
    pub reason: String,
}

/// Purchase history gathered from a source, with diagnostics
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    /// Records in delivery order, then source order within each delivery
    pub records: Vec<PurchaseRecord>,
    /// Deliveries listed by the source before capping
    pub deliveries_listed: usize,
    /// Deliveries whose detail was fetched and extracted
    pub deliveries_fetched: usize,
    pub skipped_deliveries: Vec<SkippedDelivery>,
    pub skipped_items: Vec<SkippedItem>,
}

/// Progress callback for collection
/// Parameters: (current, total)
pub type CollectProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Collect purchase records from the most recent deliveries of a source
pub async fn collect_history(
    source: &dyn DeliverySource,
    options: &CollectOptions,
) -> Result<History> {
    collect_history_with_progress(source, options, None).await
}

/// Collect purchase records, reporting progress per delivery
pub async fn collect_history_with_progress(
    source: &dyn DeliverySource,
    options: &CollectOptions,
    progress: Option<CollectProgressCallback>,
) -> Result<History> {
    let deliveries = source.list_deliveries().await?;
    info!(
        "Found {} deliveries from {}",
        deliveries.len(),
        source.name()
    );

    let mut history = History {
        deliveries_listed: deliveries.len(),
        ..Default::default()
    };

    let recent = &deliveries[..deliveries.len().min(options.max_deliveries)];
    let total = recent.len();

    for (i, summary) in recent.iter().enumerate() {
        if let Some(ref cb) = progress {
            cb(i + 1, total);
        }

        let Some(delivery_id) = summary.resolved_id() else {
            warn!("Skipping delivery without id (created {})", summary.creation_time);
            history.skipped_deliveries.push(SkippedDelivery {
                delivery_id: String::new(),
                reason: "missing delivery id".to_string(),
            });
            continue;
        };

        match source.fetch_delivery(delivery_id).await {
            Ok(mut detail) => {
                detail.inherit_timestamps(summary);
                let extraction = extract(&detail);
                history.records.extend(extraction.records);
                history.skipped_items.extend(extraction.skipped);
                history.deliveries_fetched += 1;
            }
            Err(e) => {
                warn!("Skipping delivery {}: {}", delivery_id, e);
                history.skipped_deliveries.push(SkippedDelivery {
                    delivery_id: delivery_id.to_string(),
                    reason: e.to_string(),
                });
            }
        }

        if !options.throttle.is_zero() && i + 1 < total {
            tokio::time::sleep(options.throttle).await;
        }
    }

    info!(
        "Extracted {} product entries from {} deliveries ({} skipped deliveries, {} skipped items)",
        history.records.len(),
        history.deliveries_fetched,
        history.skipped_deliveries.len(),
        history.skipped_items.len()
    );

    Ok(history)
}
