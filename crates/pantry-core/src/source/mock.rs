//! Mock delivery source for testing
//!
//! Serves canned delivery summaries and details from memory. Individual
//! deliveries (or the listing itself) can be configured to fail.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{
    Decorator, DeliverySummary, DeliveryWindow, Order, OrderArticle, OrderDetail, OrderLine,
    ORDER_ARTICLE, QUANTITY_DECORATOR,
};
use super::DeliverySource;

/// In-memory delivery source
#[derive(Default)]
pub struct MockSource {
    summaries: Vec<DeliverySummary>,
    details: HashMap<String, OrderDetail>,
    failing: HashSet<String>,
    fail_list: bool,
    fetches: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a delivery whose detail holds one article per `(id, name, quantity)`
    ///
    /// Timestamps live on the summary only, the way the list endpoint
    /// reports them.
    pub fn with_delivery(self, delivery_id: &str, start: &str, articles: &[(&str, &str, u32)]) -> Self {
        let lines = articles
            .iter()
            .map(|(id, name, quantity)| OrderLine {
                kind: "ORDER_LINE".to_string(),
                items: vec![OrderArticle {
                    kind: ORDER_ARTICLE.to_string(),
                    id: id.to_string(),
                    name: name.to_string(),
                    unit_quantity: "1 stuk".to_string(),
                    decorators: vec![Decorator {
                        kind: QUANTITY_DECORATOR.to_string(),
                        quantity: Some(i64::from(*quantity)),
                    }],
                }],
                display_price: 0,
                price: 100,
            })
            .collect();

        let detail = OrderDetail {
            delivery_id: delivery_id.to_string(),
            orders: vec![Order {
                id: format!("{}-order", delivery_id),
                items: lines,
            }],
            ..Default::default()
        };

        self.with_detail(
            DeliverySummary {
                delivery_id: delivery_id.to_string(),
                creation_time: start.to_string(),
                delivery_time: Some(DeliveryWindow {
                    start: start.to_string(),
                    end: String::new(),
                }),
                ..Default::default()
            },
            detail,
        )
    }

    /// Add a summary and the detail served for its resolved id
    pub fn with_detail(mut self, summary: DeliverySummary, detail: OrderDetail) -> Self {
        if let Some(id) = summary.resolved_id() {
            self.details.insert(id.to_string(), detail);
        }
        self.summaries.push(summary);
        self
    }

    /// Add a summary with no detail behind it
    pub fn with_summary(mut self, summary: DeliverySummary) -> Self {
        self.summaries.push(summary);
        self
    }

    /// Make fetching this delivery fail
    pub fn failing(mut self, delivery_id: &str) -> Self {
        self.failing.insert(delivery_id.to_string());
        self
    }

    /// Make listing deliveries fail
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Number of detail fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliverySource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_deliveries(&self) -> Result<Vec<DeliverySummary>> {
        if self.fail_list {
            return Err(Error::Source("mock listing failure".into()));
        }
        Ok(self.summaries.clone())
    }

    async fn fetch_delivery(&self, delivery_id: &str) -> Result<OrderDetail> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(delivery_id) {
            return Err(Error::Source(format!("mock fetch failure for {}", delivery_id)));
        }
        self.details
            .get(delivery_id)
            .cloned()
            .ok_or_else(|| Error::Source(format!("unknown delivery {}", delivery_id)))
    }
}
