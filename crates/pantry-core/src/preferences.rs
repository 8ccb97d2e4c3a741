//! Preference selection: default and alternatives per category

use std::collections::BTreeMap;

use crate::categorize::Classifier;
use crate::models::{Category, CategoryPreference, Preferences, ProductStats};

/// Upper bound on alternatives per category
pub const MAX_ALTERNATIVES: usize = 5;

/// Ranked products grouped by category
///
/// Every product lands in exactly one group and each group keeps the rank
/// order it was given. Empty categories have no entry.
pub type CategoryMembers = BTreeMap<Category, Vec<ProductStats>>;

/// Group ranked products by the category the classifier assigns
pub fn partition(ranked: &[ProductStats], classifier: &dyn Classifier) -> CategoryMembers {
    let mut members = CategoryMembers::new();
    for product in ranked {
        members
            .entry(classifier.classify(product))
            .or_default()
            .push(product.clone());
    }
    members
}

/// Default (highest ranked) and up to [`MAX_ALTERNATIVES`] runners-up per
/// non-fallback category
pub fn select(members: &CategoryMembers) -> Preferences {
    members
        .iter()
        .filter(|(category, _)| !category.is_fallback())
        .filter_map(|(category, products)| {
            let (default, rest) = products.split_first()?;
            let alternatives = rest.iter().take(MAX_ALTERNATIVES).cloned().collect();
            Some((
                *category,
                CategoryPreference {
                    default: default.clone(),
                    alternatives,
                },
            ))
        })
        .collect()
}
