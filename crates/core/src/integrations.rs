//! Booking links and order-status lookups driven by a bot's integration settings.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::bot::BotConfiguration;
use crate::domain::integrations::{BookingPlatform, OrdersIntegration, OrdersPlatform};
use crate::errors::ApplicationError;

/// Visitor details that may be forwarded to the booking page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Returns the booking URL with the visitor's details appended under the configured parameter
/// names. `None` when booking is disabled or no URL is set.
pub fn booking_link(config: &BotConfiguration, contact: &BookingContact) -> Option<String> {
    let booking = &config.integrations.booking;
    let base = booking.booking_url.trim();
    if booking.platform == BookingPlatform::None || base.is_empty() {
        return None;
    }

    let prefill = &booking.prefill;
    let pairs = [
        (prefill.name.trim(), contact.name.as_deref()),
        (prefill.email.trim(), contact.email.as_deref()),
        (prefill.phone.trim(), contact.phone.as_deref()),
    ];
    let query: Vec<String> = pairs
        .into_iter()
        .filter_map(|(param, value)| {
            let value = value.map(str::trim).filter(|value| !value.is_empty())?;
            (!param.is_empty())
                .then(|| format!("{}={}", urlencoding::encode(param), urlencoding::encode(value)))
        })
        .collect();

    if query.is_empty() {
        return Some(base.to_string());
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    Some(format!("{base}{separator}{}", query.join("&")))
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("order lookups are not enabled for this bot")]
    NotConfigured,
    #[error("an order number is required")]
    MissingOrderId,
    #[error("the email used at checkout is required to look up this order")]
    IdentityRequired,
    #[error("order provider unavailable: {0}")]
    Provider(String),
}

impl From<LookupError> for ApplicationError {
    fn from(error: LookupError) -> Self {
        Self::Integration(error.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderLookupRequest {
    pub order_id: String,
    pub email: Option<String>,
}

impl OrderLookupRequest {
    pub fn new(order_id: impl Into<String>, email: Option<String>) -> Self {
        Self { order_id: order_id.into(), email }
    }

    fn normalized_order_id(&self) -> &str {
        self.order_id.trim().trim_start_matches('#')
    }

    fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStage {
    Processing,
    Shipped,
    InTransit,
    OutForDelivery,
    Delivered,
}

impl OrderStage {
    const ALL: [OrderStage; 5] = [
        OrderStage::Processing,
        OrderStage::Shipped,
        OrderStage::InTransit,
        OrderStage::OutForDelivery,
        OrderStage::Delivered,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderStatus {
    pub order_id: String,
    pub stage: OrderStage,
    pub tracking_reference: String,
}

/// Looking an order up has no side effects, so callers may retry or drop the future freely.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn lookup(&self, request: &OrderLookupRequest) -> Result<OrderStatus, LookupError>;
}

/// Stand-in provider for previews: answers after `delay` with a status derived from the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatedOrderLookup {
    pub platform: OrdersPlatform,
    pub require_identity: bool,
    pub delay: Duration,
}

impl SimulatedOrderLookup {
    pub fn new(require_identity: bool, delay: Duration) -> Self {
        Self { platform: OrdersPlatform::Custom, require_identity, delay }
    }

    pub fn for_integration(orders: &OrdersIntegration, delay: Duration) -> Self {
        Self { platform: orders.platform, require_identity: orders.require_identity, delay }
    }
}

#[async_trait]
impl OrderLookup for SimulatedOrderLookup {
    async fn lookup(&self, request: &OrderLookupRequest) -> Result<OrderStatus, LookupError> {
        if self.platform == OrdersPlatform::None {
            return Err(LookupError::NotConfigured);
        }
        let order_id = request.normalized_order_id();
        if order_id.is_empty() {
            return Err(LookupError::MissingOrderId);
        }
        let email = request.normalized_email();
        if self.require_identity && email.is_none() {
            return Err(LookupError::IdentityRequired);
        }

        debug!(
            event_name = "integrations.order_lookup.started",
            platform = %self.platform,
            delay_ms = self.delay.as_millis() as u64,
            "simulated order lookup started"
        );
        tokio::time::sleep(self.delay).await;

        let digest = request_digest(order_id, email.as_deref());
        let stage = OrderStage::ALL[usize::from(digest[0]) % OrderStage::ALL.len()];
        let tracking_reference = format!(
            "CD{}",
            digest[..5].iter().map(|byte| format!("{byte:02X}")).collect::<String>()
        );

        info!(
            event_name = "integrations.order_lookup.completed",
            platform = %self.platform,
            stage = ?stage,
            "simulated order lookup completed"
        );
        Ok(OrderStatus { order_id: order_id.to_string(), stage, tracking_reference })
    }
}

fn request_digest(order_id: &str, email: Option<&str>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(order_id.to_lowercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(email.unwrap_or_default().as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        booking_link, BookingContact, LookupError, OrderLookup, OrderLookupRequest,
        SimulatedOrderLookup,
    };
    use crate::domain::bot::BotConfiguration;
    use crate::domain::integrations::{BookingPlatform, OrdersIntegration, OrdersPlatform};

    fn booking_config(url: &str) -> BotConfiguration {
        let mut config = BotConfiguration::new("Bookings");
        config.integrations.booking.platform = BookingPlatform::Calendly;
        config.integrations.booking.booking_url = url.to_string();
        config
    }

    #[test]
    fn booking_link_encodes_prefill_values() {
        let config = booking_config("https://calendly.com/acme/intro");
        let contact = BookingContact {
            name: Some("Zoë Martin".to_string()),
            email: Some("zoe+demo@example.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
        };

        let link = booking_link(&config, &contact).expect("link");
        assert_eq!(
            link,
            "https://calendly.com/acme/intro?name=Zo%C3%AB%20Martin&email=zoe%2Bdemo%40example.com"
        );
    }

    #[test]
    fn booking_link_extends_existing_query() {
        let mut config = booking_config("https://cal.com/acme?month=2026-10");
        config.integrations.booking.prefill.phone = "tel".to_string();
        let contact =
            BookingContact { phone: Some("0100".to_string()), ..BookingContact::default() };

        let link = booking_link(&config, &contact).expect("link");
        assert_eq!(link, "https://cal.com/acme?month=2026-10&tel=0100");
    }

    #[test]
    fn booking_link_absent_without_url_or_platform() {
        let contact = BookingContact::default();
        assert_eq!(booking_link(&booking_config("   "), &contact), None);

        let mut disabled = booking_config("https://calendly.com/acme");
        disabled.integrations.booking.platform = BookingPlatform::None;
        assert_eq!(booking_link(&disabled, &contact), None);

        let plain = booking_link(&booking_config("https://calendly.com/acme"), &contact);
        assert_eq!(plain.as_deref(), Some("https://calendly.com/acme"));
    }

    #[tokio::test]
    async fn lookup_requires_identity_and_order_id() {
        let lookup = SimulatedOrderLookup::new(true, Duration::ZERO);

        let missing_email = lookup.lookup(&OrderLookupRequest::new("1001", None)).await;
        assert_eq!(missing_email, Err(LookupError::IdentityRequired));

        let blank_email = OrderLookupRequest::new("1001", Some("  ".to_string()));
        assert_eq!(lookup.lookup(&blank_email).await, Err(LookupError::IdentityRequired));

        let missing_id = OrderLookupRequest::new(" # ", Some("a@example.com".to_string()));
        assert_eq!(lookup.lookup(&missing_id).await, Err(LookupError::MissingOrderId));

        let anonymous = SimulatedOrderLookup::new(false, Duration::ZERO);
        assert!(anonymous.lookup(&OrderLookupRequest::new("1001", None)).await.is_ok());
    }

    #[tokio::test]
    async fn lookup_is_idempotent_across_retries() {
        let orders = OrdersIntegration { platform: OrdersPlatform::Shopify, ..Default::default() };
        let lookup = SimulatedOrderLookup::for_integration(&orders, Duration::from_millis(1));
        let first = OrderLookupRequest::new("#1001", Some("Buyer@Example.com".to_string()));
        let retry = OrderLookupRequest::new("1001 ", Some("buyer@example.com".to_string()));

        let a = lookup.lookup(&first).await.expect("first");
        let b = lookup.lookup(&retry).await.expect("retry");

        assert_eq!(a, b);
        assert_eq!(a.order_id, "1001");
        assert!(a.tracking_reference.starts_with("CD"));
        assert_eq!(a.tracking_reference.len(), 12);
    }

    #[tokio::test]
    async fn lookup_is_disabled_without_provider() {
        let orders = OrdersIntegration::default();
        let lookup = SimulatedOrderLookup::for_integration(&orders, Duration::ZERO);
        let request = OrderLookupRequest::new("1001", Some("a@example.com".to_string()));

        assert_eq!(lookup.lookup(&request).await, Err(LookupError::NotConfigured));
    }

    #[tokio::test]
    async fn dropped_lookup_is_cancelled() {
        let lookup = SimulatedOrderLookup::new(false, Duration::from_secs(60));
        let request = OrderLookupRequest::new("1001", None);

        let pending = lookup.lookup(&request);
        let outcome = tokio::time::timeout(Duration::from_millis(20), pending).await;
        assert!(outcome.is_err());
    }
}
