//! Analysis entry point: records → ranked stats → categories → preferences
//!
//! Every stage is a pure function of its input and the rule table, so the
//! same record sequence always yields the same result.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::aggregate::Aggregation;
use crate::categorize::{Classifier, RuleTable};
use crate::error::Result;
use crate::models::{Category, Preferences, ProductStats, PurchaseRecord};
use crate::preferences::{partition, select, CategoryMembers};

/// Cutoff of the snapshot/export top-products view
pub const TOP_PRODUCTS_LIMIT: usize = 30;

/// Cutoff of the human-facing summary view
pub const DISPLAY_PRODUCTS_LIMIT: usize = 15;

/// Result of one analysis run over a non-empty history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Number of purchase records analyzed
    pub record_count: usize,
    /// All products, most purchased first
    pub ranked: Vec<ProductStats>,
    /// Ranked products grouped by category, fallback included
    pub members: CategoryMembers,
    pub preferences: Preferences,
    /// First [`TOP_PRODUCTS_LIMIT`] entries of `ranked`
    pub top_products: Vec<ProductStats>,
}

/// Outcome of [`analyze`]: either no purchase records or a full analysis
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    NoData,
    Analyzed(Analysis),
}

impl AnalysisOutcome {
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::Analyzed(analysis) => Some(analysis),
            Self::NoData => None,
        }
    }

    pub fn into_analysis(self) -> Option<Analysis> {
        match self {
            Self::Analyzed(analysis) => Some(analysis),
            Self::NoData => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Analyze records with the built-in grocery rule table
pub fn analyze(records: &[PurchaseRecord]) -> Result<AnalysisOutcome> {
    let rules = RuleTable::grocery()?;
    Ok(analyze_with(records, &rules))
}

/// Analyze records with an explicit classifier
pub fn analyze_with(records: &[PurchaseRecord], classifier: &dyn Classifier) -> AnalysisOutcome {
    if records.is_empty() {
        return AnalysisOutcome::NoData;
    }

    let ranked = Aggregation::from_records(records).ranked();
    let members = partition(&ranked, classifier);
    let preferences = select(&members);
    let top_products = ranked.iter().take(TOP_PRODUCTS_LIMIT).cloned().collect();

    info!(
        "Analyzed {} records: {} products, {} categories with preferences",
        records.len(),
        ranked.len(),
        preferences.len()
    );

    AnalysisOutcome::Analyzed(Analysis {
        record_count: records.len(),
        ranked,
        members,
        preferences,
        top_products,
    })
}

impl Analysis {
    /// First [`DISPLAY_PRODUCTS_LIMIT`] entries of the top-products view
    pub fn display_products(&self) -> &[ProductStats] {
        let end = self.top_products.len().min(DISPLAY_PRODUCTS_LIMIT);
        &self.top_products[..end]
    }

    /// Products no rule matched, in rank order
    pub fn unclassified(&self) -> &[ProductStats] {
        self.members
            .get(&Category::Other)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Hex SHA-256 over the serialized categorization and preferences
    ///
    /// Two runs over the same records produce the same fingerprint.
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(&self.members)?);
        hasher.update(serde_json::to_vec(&self.preferences)?);
        Ok(hex::encode(hasher.finalize()))
    }
}
