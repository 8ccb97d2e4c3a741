//! Aggregation of purchase records into per-product statistics

use std::collections::HashMap;

use crate::models::{ProductStats, PurchaseRecord};

/// Per-product statistics for one analysis run
///
/// Products are kept in first-seen order; the id index points into that list.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    products: Vec<ProductStats>,
    index: HashMap<String, usize>,
}

impl Aggregation {
    /// Build statistics from records in chronological arrival order
    pub fn from_records(records: &[PurchaseRecord]) -> Self {
        let mut aggregation = Self::default();
        for record in records {
            aggregation.add(record);
        }
        aggregation
    }

    fn add(&mut self, record: &PurchaseRecord) {
        let slot = match self.index.get(&record.product_id) {
            Some(&slot) => slot,
            None => {
                // First record for an id seeds name, unit and price
                self.products.push(ProductStats {
                    product_id: record.product_id.clone(),
                    name: record.name.clone(),
                    unit_label: record.unit_label.clone(),
                    price_cents: record.price_cents,
                    occurrence_count: 0,
                    total_quantity: 0,
                });
                let slot = self.products.len() - 1;
                self.index.insert(record.product_id.clone(), slot);
                slot
            }
        };

        let stats = &mut self.products[slot];
        stats.occurrence_count = stats.occurrence_count.saturating_add(1);
        // Quantities come straight off the wire; clamp instead of wrapping
        stats.total_quantity = stats.total_quantity.saturating_add(record.quantity.max(1));
    }

    pub fn get(&self, product_id: &str) -> Option<&ProductStats> {
        self.index.get(product_id).map(|&slot| &self.products[slot])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in the order their id first appeared
    pub fn first_seen(&self) -> &[ProductStats] {
        &self.products
    }

    /// Products by occurrence count, descending
    ///
    /// Equal counts keep first-seen order (the sort is stable).
    pub fn ranked(&self) -> Vec<ProductStats> {
        let mut ranked = self.products.clone();
        ranked.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count));
        ranked
    }
}
