//! Delivery payload types
//!
//! Mirrors the storefront API's delivery JSON. Every field is optional on
//! the wire: missing or null values decode to their defaults so a ragged
//! payload degrades to skipped items instead of a failed delivery.

use serde::{Deserialize, Deserializer, Serialize};

/// Line-item type marker for a concrete ordered article
pub const ORDER_ARTICLE: &str = "ORDER_ARTICLE";

/// Decorator type carrying an article's ordered quantity
pub const QUANTITY_DECORATOR: &str = "QUANTITY";

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Planned delivery slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    #[serde(default, deserialize_with = "nullable")]
    pub start: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end: String,
}

/// One entry of the delivery list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySummary {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub delivery_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub creation_time: String,
    #[serde(default)]
    pub delivery_time: Option<DeliveryWindow>,
}

impl DeliverySummary {
    /// Identifier to fetch the detail with: `delivery_id`, else `id`
    pub fn resolved_id(&self) -> Option<&str> {
        [self.delivery_id.as_str(), self.id.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|id| !id.is_empty())
    }

    /// Delivery window start if present, else creation time
    pub fn occurred_at(&self) -> &str {
        occurred_at(self.delivery_time.as_ref(), &self.creation_time)
    }
}

/// Itemized breakdown of one delivery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub delivery_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub creation_time: String,
    #[serde(default)]
    pub delivery_time: Option<DeliveryWindow>,
    #[serde(default, deserialize_with = "nullable")]
    pub orders: Vec<Order>,
}

impl OrderDetail {
    /// Delivery window start if present, else creation time
    pub fn occurred_at(&self) -> &str {
        occurred_at(self.delivery_time.as_ref(), &self.creation_time)
    }

    /// Fill timestamps the detail lacks from the summary it was listed under
    pub fn inherit_timestamps(&mut self, summary: &DeliverySummary) {
        let has_window = self
            .delivery_time
            .as_ref()
            .is_some_and(|w| !w.start.is_empty());
        if !has_window {
            if let Some(window) = summary.delivery_time.as_ref().filter(|w| !w.start.is_empty()) {
                self.delivery_time = Some(window.clone());
            }
        }
        if self.creation_time.is_empty() {
            self.creation_time = summary.creation_time.clone();
        }
    }
}

fn occurred_at<'a>(window: Option<&'a DeliveryWindow>, creation_time: &'a str) -> &'a str {
    match window {
        Some(w) if !w.start.is_empty() => &w.start,
        _ => creation_time,
    }
}

/// One order within a delivery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Item groups (order lines)
    #[serde(default, deserialize_with = "nullable")]
    pub items: Vec<OrderLine>,
}

/// Item group: one order line holding the articles and the line's prices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub items: Vec<OrderArticle>,
    /// Promotional/display price in cents
    #[serde(default, deserialize_with = "nullable")]
    pub display_price: i64,
    /// List price in cents
    #[serde(default, deserialize_with = "nullable")]
    pub price: i64,
}

impl OrderLine {
    /// Display price if non-zero, else list price, else 0 (unknown)
    pub fn price_cents(&self) -> u32 {
        let cents = if self.display_price > 0 {
            self.display_price
        } else {
            self.price
        };
        u32::try_from(cents).unwrap_or(0)
    }
}

/// Line item within an item group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderArticle {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub unit_quantity: String,
    #[serde(default, deserialize_with = "nullable")]
    pub decorators: Vec<Decorator>,
}

impl OrderArticle {
    pub fn is_article(&self) -> bool {
        self.kind == ORDER_ARTICLE
    }

    /// Reported quantity, 0 when unset
    pub fn quantity(&self) -> u32 {
        self.decorators
            .iter()
            .find(|d| d.kind == QUANTITY_DECORATOR)
            .and_then(|d| d.quantity)
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or(0)
    }
}

/// Article annotation; only `QUANTITY` decorators are read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorator {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default)]
    pub quantity: Option<i64>,
}
