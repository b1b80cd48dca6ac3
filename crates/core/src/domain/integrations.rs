use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum BookingPlatform {
        None => "none",
        Calendly => "calendly",
        CalCom => "cal-com",
        Acuity => "acuity",
        Custom => "custom",
    }
    default = None;
}

wire_enum! {
    pub enum OpenMode {
        Modal => "modal",
        Tab => "tab",
    }
    default = Modal;
}

wire_enum! {
    pub enum OrdersPlatform {
        None => "none",
        Shopify => "shopify",
        WooCommerce => "woocommerce",
        Custom => "custom",
    }
    default = None;
}

/// Query-parameter names used to prefill the booking page. Blank means "do not send".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefillMapping {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Default for PrefillMapping {
    fn default() -> Self {
        Self { name: "name".to_string(), email: "email".to_string(), phone: String::new() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingIntegration {
    pub platform: BookingPlatform,
    pub booking_url: String,
    pub widget_script: String,
    pub open_mode: OpenMode,
    pub prefill: PrefillMapping,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersIntegration {
    pub platform: OrdersPlatform,
    pub orders_endpoint: String,
    pub tracking_endpoint: String,
    pub require_identity: bool,
    pub use_after_ship: bool,
}

impl Default for OrdersIntegration {
    fn default() -> Self {
        Self {
            platform: OrdersPlatform::None,
            orders_endpoint: String::new(),
            tracking_endpoint: String::new(),
            require_identity: true,
            use_after_ship: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integrations {
    pub booking: BookingIntegration,
    pub orders: OrdersIntegration,
}

/// Human handoff channels; each one is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handoff {
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub calendly_url: Option<String>,
}
