//! Typed merge-patch for `BotConfiguration`.
//!
//! Every field is optional; absent fields leave the configuration untouched. Numeric fields are
//! wider than their storage so that out-of-range editor input reaches the clamp instead of
//! failing deserialization.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Deserialize;
use tracing::warn;

use crate::domain::appearance::{
    Corner, CORNER_RADIUS_RANGE, FONT_SIZE_RANGE, MESSAGE_SPACING_RANGE, OFFSET_RANGE,
    Z_INDEX_RANGE,
};
use crate::domain::behavior::{
    EmojiPolicy, FormatPreference, ResponseLength, WhenUnsure, MAX_ANSWER_LENGTH_RANGE,
    MAX_TOKENS_RANGE, PENALTY_RANGE, TEMPERATURE_RANGE, TOP_P_RANGE,
};
use crate::domain::bot::{
    BotConfiguration, KnowledgeSource, Persona, Plan, Status, Tone, Visibility,
};
use crate::domain::color::HexColor;
use crate::domain::integrations::{BookingPlatform, OpenMode, OrdersPlatform};
use crate::domain::snippet::Snippet;
use crate::errors::ValidationError;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    pub name: Option<String>,
    pub welcome_message: Option<String>,
    pub system_prompt: Option<String>,
    pub persona: Option<Persona>,
    pub tone: Option<Tone>,
    pub knowledge_source: Option<KnowledgeSource>,
    pub knowledge_content: Option<String>,
    pub safety_settings: Option<SafetyPatch>,
    pub llm_controls: Option<LlmControlsPatch>,
    pub behavior: Option<BehaviorPatch>,
    pub appearance: Option<AppearancePatch>,
    pub branding: Option<BrandingPatch>,
    pub position: Option<PositionPatch>,
    pub integrations: Option<IntegrationsPatch>,
    /// Replaces the whole list; ids must stay unique.
    pub snippets: Option<Vec<Snippet>>,
    pub privacy: Option<PrivacyPatch>,
    pub localization: Option<LocalizationPatch>,
    pub accessibility: Option<AccessibilityPatch>,
    pub analytics: Option<AnalyticsPatch>,
    pub handoff: Option<HandoffPatch>,
    pub settings: Option<SettingsPatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SafetyPatch {
    pub refusal_style: Option<bool>,
    pub guarded_topics: Option<bool>,
    pub max_answer_length: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LlmControlsPatch {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<i64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub stop_sequences: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BehaviorPatch {
    pub response_length: Option<ResponseLength>,
    pub format_preference: Option<FormatPreference>,
    pub when_unsure: Option<WhenUnsure>,
    pub escalation_message: Option<String>,
    pub emoji: Option<EmojiPolicy>,
    pub booking_intents: Option<BTreeSet<String>>,
    pub order_intents: Option<BTreeSet<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppearancePatch {
    pub background_color: Option<HexColor>,
    pub primary_color: Option<HexColor>,
    pub user_bubble_color: Option<HexColor>,
    pub user_text_color: Option<HexColor>,
    pub bot_bubble_color: Option<HexColor>,
    pub bot_text_color: Option<HexColor>,
    pub corner_radius: Option<i64>,
    pub font_size: Option<i64>,
    pub font_stack: Option<String>,
    pub message_spacing: Option<i64>,
    pub bot_name: Option<String>,
    pub chat_avatar: Option<String>,
    pub show_typing_indicator: Option<bool>,
    pub show_launcher: Option<bool>,
}

/// `show_branding` is not patchable; it follows the plan.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BrandingPatch {
    pub branding_text: Option<String>,
    pub branding_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PositionPatch {
    pub corner: Option<Corner>,
    pub offset_x: Option<i64>,
    pub offset_y: Option<i64>,
    pub z_index: Option<i64>,
    pub mobile_override: Option<bool>,
    pub mobile_corner: Option<Corner>,
    pub mobile_offset_x: Option<i64>,
    pub mobile_offset_y: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IntegrationsPatch {
    pub booking: Option<BookingPatch>,
    pub orders: Option<OrdersPatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookingPatch {
    pub platform: Option<BookingPlatform>,
    pub booking_url: Option<String>,
    pub widget_script: Option<String>,
    pub open_mode: Option<OpenMode>,
    pub prefill: Option<PrefillPatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrefillPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrdersPatch {
    pub platform: Option<OrdersPlatform>,
    pub orders_endpoint: Option<String>,
    pub tracking_endpoint: Option<String>,
    pub require_identity: Option<bool>,
    pub use_after_ship: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrivacyPatch {
    pub gdpr_mode: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocalizationPatch {
    pub language: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccessibilityPatch {
    pub reduced_motion: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyticsPatch {
    pub enabled: Option<bool>,
}

/// A blank string clears the channel.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HandoffPatch {
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub calendly_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub status: Option<Status>,
    pub visibility: Option<Visibility>,
    pub data_retention: Option<bool>,
    pub plan: Option<Plan>,
}

impl ConfigPatch {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn status(status: Status) -> Self {
        let settings = SettingsPatch { status: Some(status), ..SettingsPatch::default() };
        Self { settings: Some(settings), ..Self::default() }
    }

    pub fn plan(plan: Plan) -> Self {
        let settings = SettingsPatch { plan: Some(plan), ..SettingsPatch::default() };
        Self { settings: Some(settings), ..Self::default() }
    }

    pub fn is_publish_request(&self) -> bool {
        matches!(&self.settings, Some(SettingsPatch { status: Some(Status::Live), .. }))
    }

    /// Merges into `config`, clamping ranged numbers. Non-finite floats are rejected.
    pub fn merge_into(self, config: &mut BotConfiguration) -> Result<(), ValidationError> {
        set(&mut config.name, self.name);
        set(&mut config.welcome_message, self.welcome_message);
        set(&mut config.system_prompt, self.system_prompt);
        set(&mut config.persona, self.persona);
        set(&mut config.tone, self.tone);
        set(&mut config.knowledge_source, self.knowledge_source);
        set(&mut config.knowledge_content, self.knowledge_content);

        if let Some(safety) = self.safety_settings {
            let target = &mut config.safety_settings;
            set(&mut target.refusal_style, safety.refusal_style);
            set(&mut target.guarded_topics, safety.guarded_topics);
            if let Some(value) = safety.max_answer_length {
                target.max_answer_length =
                    clamp_int("safetySettings.maxAnswerLength", value, &MAX_ANSWER_LENGTH_RANGE)?;
            }
        }

        if let Some(llm) = self.llm_controls {
            let target = &mut config.llm_controls;
            if let Some(value) = llm.temperature {
                target.temperature =
                    clamp_float("llmControls.temperature", value, &TEMPERATURE_RANGE)?;
            }
            if let Some(value) = llm.top_p {
                target.top_p = clamp_float("llmControls.topP", value, &TOP_P_RANGE)?;
            }
            if let Some(value) = llm.max_tokens {
                target.max_tokens = clamp_int("llmControls.maxTokens", value, &MAX_TOKENS_RANGE)?;
            }
            if let Some(value) = llm.frequency_penalty {
                target.frequency_penalty =
                    clamp_float("llmControls.frequencyPenalty", value, &PENALTY_RANGE)?;
            }
            if let Some(value) = llm.presence_penalty {
                target.presence_penalty =
                    clamp_float("llmControls.presencePenalty", value, &PENALTY_RANGE)?;
            }
            set(&mut target.stop_sequences, llm.stop_sequences);
        }

        if let Some(behavior) = self.behavior {
            let target = &mut config.behavior;
            set(&mut target.response_length, behavior.response_length);
            set(&mut target.format_preference, behavior.format_preference);
            set(&mut target.when_unsure, behavior.when_unsure);
            set(&mut target.escalation_message, behavior.escalation_message);
            set(&mut target.emoji, behavior.emoji);
            set(&mut target.booking_intents, behavior.booking_intents.map(normalize_keywords));
            set(&mut target.order_intents, behavior.order_intents.map(normalize_keywords));
        }

        if let Some(appearance) = self.appearance {
            let target = &mut config.appearance;
            set(&mut target.background_color, appearance.background_color);
            set(&mut target.primary_color, appearance.primary_color);
            set(&mut target.user_bubble_color, appearance.user_bubble_color);
            set(&mut target.user_text_color, appearance.user_text_color);
            set(&mut target.bot_bubble_color, appearance.bot_bubble_color);
            set(&mut target.bot_text_color, appearance.bot_text_color);
            if let Some(value) = appearance.corner_radius {
                target.corner_radius =
                    clamp_int("appearance.cornerRadius", value, &CORNER_RADIUS_RANGE)?;
            }
            if let Some(value) = appearance.font_size {
                target.font_size = clamp_int("appearance.fontSize", value, &FONT_SIZE_RANGE)?;
            }
            set(&mut target.font_stack, appearance.font_stack);
            if let Some(value) = appearance.message_spacing {
                target.message_spacing =
                    clamp_int("appearance.messageSpacing", value, &MESSAGE_SPACING_RANGE)?;
            }
            set(&mut target.bot_name, appearance.bot_name);
            set(&mut target.chat_avatar, appearance.chat_avatar);
            set(&mut target.show_typing_indicator, appearance.show_typing_indicator);
            set(&mut target.show_launcher, appearance.show_launcher);
        }

        if let Some(branding) = self.branding {
            set(&mut config.branding.branding_text, branding.branding_text);
            set(&mut config.branding.branding_url, branding.branding_url);
        }

        if let Some(position) = self.position {
            let target = &mut config.position;
            set(&mut target.corner, position.corner);
            if let Some(value) = position.offset_x {
                target.offset_x = clamp_int("position.offsetX", value, &OFFSET_RANGE)?;
            }
            if let Some(value) = position.offset_y {
                target.offset_y = clamp_int("position.offsetY", value, &OFFSET_RANGE)?;
            }
            if let Some(value) = position.z_index {
                target.z_index = clamp_int("position.zIndex", value, &Z_INDEX_RANGE)?;
            }
            set(&mut target.mobile_override, position.mobile_override);
            set(&mut target.mobile_corner, position.mobile_corner);
            if let Some(value) = position.mobile_offset_x {
                target.mobile_offset_x =
                    clamp_int("position.mobileOffsetX", value, &OFFSET_RANGE)?;
            }
            if let Some(value) = position.mobile_offset_y {
                target.mobile_offset_y =
                    clamp_int("position.mobileOffsetY", value, &OFFSET_RANGE)?;
            }
        }

        if let Some(integrations) = self.integrations {
            if let Some(booking) = integrations.booking {
                let target = &mut config.integrations.booking;
                set(&mut target.platform, booking.platform);
                set(&mut target.booking_url, booking.booking_url);
                set(&mut target.widget_script, booking.widget_script);
                set(&mut target.open_mode, booking.open_mode);
                if let Some(prefill) = booking.prefill {
                    set(&mut target.prefill.name, prefill.name);
                    set(&mut target.prefill.email, prefill.email);
                    set(&mut target.prefill.phone, prefill.phone);
                }
            }
            if let Some(orders) = integrations.orders {
                let target = &mut config.integrations.orders;
                set(&mut target.platform, orders.platform);
                set(&mut target.orders_endpoint, orders.orders_endpoint);
                set(&mut target.tracking_endpoint, orders.tracking_endpoint);
                set(&mut target.require_identity, orders.require_identity);
                set(&mut target.use_after_ship, orders.use_after_ship);
            }
        }

        set(&mut config.snippets, self.snippets);

        if let Some(privacy) = self.privacy {
            set(&mut config.privacy.gdpr_mode, privacy.gdpr_mode);
        }
        if let Some(localization) = self.localization {
            let language = localization.language.map(|language| language.trim().to_string());
            set(&mut config.localization.language, language);
        }
        if let Some(accessibility) = self.accessibility {
            set(&mut config.accessibility.reduced_motion, accessibility.reduced_motion);
        }
        if let Some(analytics) = self.analytics {
            set(&mut config.analytics.enabled, analytics.enabled);
        }

        if let Some(handoff) = self.handoff {
            let target = &mut config.handoff;
            set_channel(&mut target.email, handoff.email);
            set_channel(&mut target.whatsapp, handoff.whatsapp);
            set_channel(&mut target.phone, handoff.phone);
            set_channel(&mut target.calendly_url, handoff.calendly_url);
        }

        if let Some(settings) = self.settings {
            let target = &mut config.settings;
            set(&mut target.status, settings.status);
            set(&mut target.visibility, settings.visibility);
            set(&mut target.data_retention, settings.data_retention);
            set(&mut target.plan, settings.plan);
        }

        Ok(())
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_channel(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let trimmed = value.trim();
        *target = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}

fn normalize_keywords(keywords: BTreeSet<String>) -> BTreeSet<String> {
    keywords
        .into_iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

pub(crate) fn clamp_int<T>(
    field: &'static str,
    value: i64,
    range: &RangeInclusive<T>,
) -> Result<T, ValidationError>
where
    T: Copy + Into<i64> + TryFrom<i64>,
{
    let (min, max) = ((*range.start()).into(), (*range.end()).into());
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(
            event_name = "config.field.clamped",
            field,
            requested = value,
            stored = clamped,
            "numeric field clamped into range"
        );
    }
    T::try_from(clamped).map_err(|_| ValidationError::OutOfStorageRange { field, value })
}

pub(crate) fn clamp_float(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        warn!(
            event_name = "config.field.clamped",
            field,
            requested = value,
            stored = clamped,
            "numeric field clamped into range"
        );
    }
    Ok(clamped)
}

#[cfg(test)]
mod tests {
    use super::{clamp_float, ConfigPatch};
    use crate::domain::appearance::Corner;
    use crate::domain::bot::{BotConfiguration, Plan, Status};
    use crate::errors::ValidationError;

    #[test]
    fn absent_fields_leave_configuration_untouched() {
        let original = BotConfiguration::new("Merge");
        let mut merged = original.clone();
        ConfigPatch::default().merge_into(&mut merged).expect("empty patch");
        assert_eq!(merged, original);
    }

    #[test]
    fn nested_json_patch_merges_only_named_fields() {
        let mut config = BotConfiguration::new("Merge");
        let patch = ConfigPatch::from_json(
            r##"{
                "appearance": { "primaryColor": "#123456", "cornerRadius": 18 },
                "position": { "corner": "top-left" },
                "handoff": { "email": " help@example.com " }
            }"##,
        )
        .expect("valid patch");

        patch.merge_into(&mut config).expect("merge");

        assert_eq!(config.appearance.primary_color.as_str(), "#123456");
        assert_eq!(config.appearance.corner_radius, 18);
        assert_eq!(config.appearance.font_size, 14);
        assert_eq!(config.position.corner, Corner::TopLeft);
        assert_eq!(config.position.offset_x, 20);
        assert_eq!(config.handoff.email.as_deref(), Some("help@example.com"));
    }

    #[test]
    fn out_of_range_numbers_are_clamped() {
        let mut config = BotConfiguration::new("Clamp");
        let patch = ConfigPatch::from_json(
            r#"{
                "safetySettings": { "maxAnswerLength": 5000 },
                "llmControls": { "temperature": 1.7, "topP": 0.0, "maxTokens": 10 },
                "appearance": { "cornerRadius": -3 },
                "position": { "zIndex": -1, "offsetX": 999 }
            }"#,
        )
        .expect("valid patch");

        patch.merge_into(&mut config).expect("merge");

        assert_eq!(config.safety_settings.max_answer_length, 1000);
        assert_eq!(config.llm_controls.temperature, 1.0);
        assert_eq!(config.llm_controls.top_p, 0.1);
        assert_eq!(config.llm_controls.max_tokens, 50);
        assert_eq!(config.appearance.corner_radius, 4);
        assert_eq!(config.position.z_index, 0);
        assert_eq!(config.position.offset_x, 200);
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let error = clamp_float("llmControls.temperature", f64::NAN, &(0.0..=1.0))
            .expect_err("NaN has no safe clamp");
        assert_eq!(error, ValidationError::NotFinite { field: "llmControls.temperature" });
    }

    #[test]
    fn unknown_enum_values_and_fields_fail_to_parse() {
        assert!(ConfigPatch::from_json(r#"{"settings":{"plan":"enterprise"}}"#).is_err());
        assert!(ConfigPatch::from_json(r#"{"position":{"corner":"center"}}"#).is_err());
        assert!(ConfigPatch::from_json(r#"{"branding":{"showBranding":false}}"#).is_err());
        assert!(ConfigPatch::from_json(r##"{"appearance":{"botTextColor":"#12"}}"##).is_err());
    }

    #[test]
    fn keywords_are_normalized_and_handoff_blank_clears() {
        let mut config = BotConfiguration::new("Keywords");
        config.handoff.phone = Some("+1 555 0100".to_string());
        let patch = ConfigPatch::from_json(
            r#"{
                "behavior": { "bookingIntents": [" Reserve ", "", "BOOK"] },
                "handoff": { "phone": "  " }
            }"#,
        )
        .expect("valid patch");

        patch.merge_into(&mut config).expect("merge");

        let intents: Vec<&str> =
            config.behavior.booking_intents.iter().map(String::as_str).collect();
        assert_eq!(intents, vec!["book", "reserve"]);
        assert_eq!(config.handoff.phone, None);
    }

    #[test]
    fn convenience_constructors_target_settings() {
        assert!(ConfigPatch::status(Status::Live).is_publish_request());
        assert!(!ConfigPatch::plan(Plan::Scale).is_publish_request());
    }
}
