//! Entry extraction: flattens an order detail into purchase records
//!
//! Walks detail → orders → item groups → line items. Line items that are not
//! concrete articles, or that lack a product id or name, are skipped and
//! reported as diagnostics; extraction itself never fails.

use serde::Serialize;
use tracing::debug;

use crate::models::PurchaseRecord;
use crate::source::types::{OrderArticle, OrderDetail, OrderLine};

/// Why a line item produced no purchase record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum SkipReason {
    /// Type marker is not `ORDER_ARTICLE`
    NotAnArticle(String),
    MissingProductId,
    MissingName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnArticle(kind) if kind.is_empty() => write!(f, "untyped line item"),
            Self::NotAnArticle(kind) => write!(f, "not an article ({})", kind),
            Self::MissingProductId => write!(f, "missing product id"),
            Self::MissingName => write!(f, "missing name"),
        }
    }
}

/// A line item that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Product id if the item had one
    pub product_id: Option<String>,
    pub reason: SkipReason,
}

/// Records extracted from one order detail plus what was skipped
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<PurchaseRecord>,
    pub skipped: Vec<SkippedItem>,
}

/// Extract purchase records from one order detail, in source order
pub fn extract(detail: &OrderDetail) -> Extraction {
    let occurred_at = detail.occurred_at();
    let mut extraction = Extraction::default();

    for order in &detail.orders {
        for line in &order.items {
            for article in &line.items {
                match to_record(line, article, occurred_at) {
                    Ok(record) => extraction.records.push(record),
                    Err(reason) => {
                        debug!("Skipping line item {:?}: {}", article.id, reason);
                        extraction.skipped.push(SkippedItem {
                            product_id: Some(article.id.clone()).filter(|id| !id.is_empty()),
                            reason,
                        });
                    }
                }
            }
        }
    }

    extraction
}

fn to_record(
    line: &OrderLine,
    article: &OrderArticle,
    occurred_at: &str,
) -> std::result::Result<PurchaseRecord, SkipReason> {
    if !article.is_article() {
        return Err(SkipReason::NotAnArticle(article.kind.clone()));
    }
    let product_id = article.id.trim();
    if product_id.is_empty() {
        return Err(SkipReason::MissingProductId);
    }
    if article.name.trim().is_empty() {
        return Err(SkipReason::MissingName);
    }

    // A zero quantity means "not reported", not "none purchased"
    let quantity = match article.quantity() {
        0 => 1,
        q => q,
    };

    Ok(PurchaseRecord {
        product_id: product_id.to_string(),
        name: article.name.clone(),
        price_cents: line.price_cents(),
        unit_label: article.unit_quantity.clone(),
        quantity,
        occurred_at: occurred_at.to_string(),
    })
}
