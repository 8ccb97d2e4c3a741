//! Pantry Core Library
//!
//! Turns a household's grocery delivery history into shopping preferences:
//! - Delivery sources (storefront API, mock) and purchase record extraction
//! - Per-product aggregation and frequency ranking
//! - Rule-based category assignment (ordered, first match wins)
//! - Per-category default product and alternatives
//! - Snapshot storage with pluggable backends
//! - Intent resolution and top-products export

pub mod aggregate;
pub mod analysis;
pub mod categorize;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod preferences;
pub mod resolve;
pub mod snapshot;
pub mod source;

pub use aggregate::Aggregation;
pub use analysis::{analyze, analyze_with, Analysis, AnalysisOutcome};
pub use categorize::{CategoryRule, Classifier, RuleTable};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export_products, ExportFormat};
pub use extract::{extract, Extraction, SkipReason, SkippedItem};
pub use models::{Category, CategoryPreference, Preferences, ProductStats, PurchaseRecord};
pub use resolve::{resolve_intent, Resolution, ResolvedBy};
pub use snapshot::{
    persist, LocalSnapshotStore, MemorySnapshotStore, PersistReport, SnapshotStore,
};
pub use source::{
    collect_history, collect_history_with_progress, CollectOptions, DeliverySource, History,
    MockSource, PicnicSource,
};
