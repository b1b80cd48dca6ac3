//! Compiles a configuration into the snippet a customer pastes into their site.
//!
//! The attribute keys and their order are a compatibility surface for the widget loader:
//! new keys go at the end, existing keys are never renamed or dropped.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::bot::BotConfiguration;
use crate::i18n::Localizer;

pub const DEFAULT_BASE_URL: &str = "https://widget.chatdock.dev";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedOptions {
    pub base_url: String,
    pub script_src: String,
    pub localizer: Localizer,
}

impl EmbedOptions {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let script_src = format!("{base_url}/widget.js");
        Self { base_url, script_src, localizer: Localizer::default() }
    }
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScriptDirective {
    pub src: String,
    pub attributes: Vec<(&'static str, String)>,
}

impl ScriptDirective {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(name, _)| *name == key).map(|(_, value)| value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().map(|(name, _)| *name)
    }

    /// One attribute per line so that two compilations diff cleanly.
    pub fn render(&self) -> String {
        let mut lines = vec!["<script".to_string()];
        lines.push(format!("  src=\"{}\"", escape_attr(&self.src)));
        lines.extend(
            self.attributes
                .iter()
                .map(|(name, value)| format!("  data-{name}=\"{}\"", escape_attr(value))),
        );
        lines.push("  defer".to_string());
        lines.push("></script>".to_string());
        lines.join("\n")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IframeDirective {
    pub src: String,
    pub style: String,
}

impl IframeDirective {
    pub fn render(&self) -> String {
        format!(
            "<iframe src=\"{}\" style=\"{}\" title=\"Chat\" loading=\"lazy\"></iframe>",
            escape_attr(&self.src),
            escape_attr(&self.style)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedArtifact {
    pub script: ScriptDirective,
    pub iframe: IframeDirective,
    pub fingerprint: String,
}

pub fn compile(config: &BotConfiguration, options: &EmbedOptions) -> EmbedArtifact {
    let script = ScriptDirective {
        src: options.script_src.clone(),
        attributes: attributes(config, options),
    };
    let iframe = IframeDirective {
        src: format!("{}/embed/{}", options.base_url, urlencoding::encode(&config.id.0)),
        style: format!(
            "border:none;border-radius:{}px;width:380px;height:560px;",
            config.appearance.corner_radius
        ),
    };
    let fingerprint = fingerprint(&script, &iframe);

    debug!(
        event_name = "embed.compiled",
        bot_id = %config.id,
        attribute_count = script.attributes.len(),
        fingerprint = %fingerprint,
        "embed artifact compiled"
    );

    EmbedArtifact { script, iframe, fingerprint }
}

fn attributes(config: &BotConfiguration, options: &EmbedOptions) -> Vec<(&'static str, String)> {
    let appearance = &config.appearance;
    let llm = &config.llm_controls;
    let behavior = &config.behavior;
    let branding = &config.branding;
    let position = &config.position;
    let booking = &config.integrations.booking;
    let orders = &config.integrations.orders;
    let handoff = &config.handoff;

    vec![
        ("bot-id", config.id.0.clone()),
        ("primary", appearance.primary_color.to_string()),
        ("bg", appearance.background_color.to_string()),
        ("bot-bubble", appearance.bot_bubble_color.to_string()),
        ("bot-text", appearance.bot_text_color.to_string()),
        ("user-bubble", appearance.user_bubble_color.to_string()),
        ("user-text", appearance.user_text_color.to_string()),
        ("avatar-url", appearance.chat_avatar.clone()),
        ("radius", appearance.corner_radius.to_string()),
        ("temp", decimal(llm.temperature)),
        ("top-p", decimal(llm.top_p)),
        ("max-tokens", llm.max_tokens.to_string()),
        ("freq-penalty", decimal(llm.frequency_penalty)),
        ("pres-penalty", decimal(llm.presence_penalty)),
        ("stop", llm.stop_sequence_list().join(",")),
        ("style-length", behavior.response_length.to_string()),
        ("style-format", behavior.format_preference.to_string()),
        ("when-unsure", behavior.when_unsure.to_string()),
        ("emoji", behavior.emoji.to_string()),
        ("branding", on_off(branding.show_branding)),
        ("branding-text", branding.branding_text.clone()),
        ("branding-url", branding.branding_url.clone()),
        ("plan", config.settings.plan.to_string()),
        ("position", position.corner.to_string()),
        ("offset-x", position.offset_x.to_string()),
        ("offset-y", position.offset_y.to_string()),
        ("z-index", position.z_index.to_string()),
        ("mobile-override", on_off(position.mobile_override)),
        ("mobile-position", position.mobile_corner.to_string()),
        ("mobile-offset-x", position.mobile_offset_x.to_string()),
        ("mobile-offset-y", position.mobile_offset_y.to_string()),
        ("booking-platform", booking.platform.to_string()),
        ("booking-url", booking.booking_url.clone()),
        ("booking-open", booking.open_mode.to_string()),
        ("orders-provider", orders.platform.to_string()),
        ("orders-endpoint", orders.orders_endpoint.clone()),
        ("tracking-endpoint", orders.tracking_endpoint.clone()),
        ("require-identity", on_off(orders.require_identity)),
        ("analytics", on_off(config.analytics.enabled)),
        ("lang", config.localization.language.clone()),
        ("locale", options.localizer.locale(&config.localization.language)),
        ("handoff-email", handoff.email.clone().unwrap_or_default()),
        ("handoff-whatsapp", handoff.whatsapp.clone().unwrap_or_default()),
        ("handoff-phone", handoff.phone.clone().unwrap_or_default()),
        ("handoff-calendly-url", handoff.calendly_url.clone().unwrap_or_default()),
        // Additive keys.
        ("bot-name", appearance.bot_name.clone()),
        ("font-size", appearance.font_size.to_string()),
        ("font-stack", appearance.font_stack.clone()),
        ("spacing", appearance.message_spacing.to_string()),
        ("typing-indicator", on_off(appearance.show_typing_indicator)),
        ("launcher", on_off(appearance.show_launcher)),
        ("escalation-message", behavior.escalation_message.clone()),
        ("use-aftership", on_off(orders.use_after_ship)),
        ("gdpr", on_off(config.privacy.gdpr_mode)),
        ("reduced-motion", on_off(config.accessibility.reduced_motion)),
    ]
}

fn on_off(value: bool) -> String {
    let literal = if value { "on" } else { "off" };
    literal.to_string()
}

/// Fixed three-decimal rounding with trailing zeros removed (`0.7`, `1`, `0.125`).
fn decimal(value: f64) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn fingerprint(script: &ScriptDirective, iframe: &IframeDirective) -> String {
    let mut hasher = Sha256::new();
    hasher.update(script.render().as_bytes());
    hasher.update(b"\n");
    hasher.update(iframe.render().as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}
