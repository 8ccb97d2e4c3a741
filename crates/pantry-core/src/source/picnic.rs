//! Storefront HTTP API delivery source
//!
//! Authenticates every request with an existing session token sent in the
//! `x-picnic-auth` header. Obtaining that token is left to the caller.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{DeliverySummary, OrderDetail};
use super::DeliverySource;

/// Header carrying the session token
const AUTH_HEADER: &str = "x-picnic-auth";

/// Storefront API version segment
const API_VERSION: &str = "15";

/// Delivery source backed by the storefront API
#[derive(Clone)]
pub struct PicnicSource {
    http_client: Client,
    base_url: String,
    auth_token: String,
}

impl PicnicSource {
    /// Create a source for a country's storefront
    pub fn new(country: &str, auth_token: &str) -> Self {
        Self::with_base_url(&default_base_url(country), auth_token)
    }

    /// Create a source against an explicit API base URL
    pub fn with_base_url(base_url: &str, auth_token: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    /// Create from environment variables
    ///
    /// Reads `PICNIC_AUTH_TOKEN` (required) and `PICNIC_COUNTRY` (default NL).
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("PICNIC_AUTH_TOKEN").ok()?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        let country = std::env::var("PICNIC_COUNTRY").unwrap_or_else(|_| "NL".to_string());
        Some(Self::new(&country, token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTH_HEADER, &self.auth_token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Source(format!(
                "authentication rejected ({}); refresh PICNIC_AUTH_TOKEN",
                status
            )));
        }
        Ok(response.error_for_status()?)
    }
}

/// Storefront API base URL for a country code
pub fn default_base_url(country: &str) -> String {
    format!(
        "https://storefront-prod.{}.picnicinternational.com/api/{}",
        country.trim().to_lowercase(),
        API_VERSION
    )
}

#[async_trait]
impl DeliverySource for PicnicSource {
    fn name(&self) -> &str {
        "picnic"
    }

    async fn list_deliveries(&self) -> Result<Vec<DeliverySummary>> {
        // An empty status filter returns every delivery
        let request = self
            .http_client
            .post(format!("{}/deliveries/summary", self.base_url))
            .json(&Vec::<String>::new());

        let deliveries: Vec<DeliverySummary> = self.send(request).await?.json().await?;
        debug!("Listed {} deliveries", deliveries.len());
        Ok(deliveries)
    }

    async fn fetch_delivery(&self, delivery_id: &str) -> Result<OrderDetail> {
        let request = self
            .http_client
            .get(format!("{}/deliveries/{}", self.base_url, delivery_id));

        let detail: OrderDetail = self.send(request).await?.json().await?;
        debug!(
            "Fetched delivery {} with {} orders",
            delivery_id,
            detail.orders.len()
        );
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        assert_eq!(
            default_base_url("NL"),
            "https://storefront-prod.nl.picnicinternational.com/api/15"
        );
        assert_eq!(
            default_base_url(" de "),
            "https://storefront-prod.de.picnicinternational.com/api/15"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = PicnicSource::with_base_url("http://localhost:8080/api/15/", "token");
        assert_eq!(source.base_url(), "http://localhost:8080/api/15");
    }

    #[test]
    fn test_summary_payload_decodes() {
        let json = r#"[
            {
                "type": "DELIVERY",
                "id": "internal-1",
                "delivery_id": "D-100",
                "creation_time": "2024-03-01T09:12:00.000+01:00",
                "slot": {"slot_id": "x"},
                "delivery_time": {"start": "2024-03-02T17:00:00.000+01:00", "end": "2024-03-02T18:00:00.000+01:00"},
                "status": "COMPLETED"
            },
            {"id": "internal-2", "creation_time": "2024-02-20T10:00:00.000+01:00"}
        ]"#;
        let summaries: Vec<DeliverySummary> = serde_json::from_str(json).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].resolved_id(), Some("D-100"));
        assert_eq!(summaries[0].occurred_at(), "2024-03-02T17:00:00.000+01:00");
        assert_eq!(summaries[1].resolved_id(), Some("internal-2"));
        assert_eq!(summaries[1].occurred_at(), "2024-02-20T10:00:00.000+01:00");
    }

    #[test]
    fn test_detail_payload_decodes_and_extracts() {
        let json = r#"{
            "delivery_id": "D-100",
            "creation_time": "2024-03-01T09:12:00.000+01:00",
            "orders": [{
                "id": "O-1",
                "items": [
                    {
                        "type": "ORDER_LINE",
                        "id": "L-1",
                        "display_price": 229,
                        "price": 259,
                        "items": [{
                            "type": "ORDER_ARTICLE",
                            "id": "s1001",
                            "name": "Halfvolle melk",
                            "unit_quantity": "1,5 liter",
                            "decorators": [{"type": "QUANTITY", "quantity": 2}]
                        }]
                    },
                    {
                        "type": "ORDER_LINE",
                        "id": "L-2",
                        "price": 0,
                        "items": [{"type": "ORDER_DEPOSIT", "id": "dep", "name": "Statiegeld"}]
                    }
                ]
            }]
        }"#;
        let detail: OrderDetail = serde_json::from_str(json).unwrap();
        let extraction = crate::extract::extract(&detail);

        assert_eq!(extraction.records.len(), 1);
        let milk = &extraction.records[0];
        assert_eq!(milk.product_id, "s1001");
        assert_eq!(milk.price_cents, 229);
        assert_eq!(milk.quantity, 2);
        assert_eq!(milk.unit_label, "1,5 liter");
        assert_eq!(milk.occurred_at, "2024-03-01T09:12:00.000+01:00");
        assert_eq!(extraction.skipped.len(), 1);
    }
}
