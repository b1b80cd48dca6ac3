use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::appearance::{Appearance, Branding, Position};
use crate::domain::behavior::{Behavior, LlmControls, SafetySettings};
use crate::domain::integrations::{Handoff, Integrations};
use crate::domain::snippet::Snippet;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BotId(pub String);

impl BotId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for BotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

wire_enum! {
    pub enum Persona {
        Assistant => "assistant",
        Concierge => "concierge",
        Expert => "expert",
        Friend => "friend",
    }
    default = Assistant;
}

wire_enum! {
    pub enum Tone {
        Friendly => "friendly",
        Professional => "professional",
        Playful => "playful",
        Empathetic => "empathetic",
    }
    default = Friendly;
}

wire_enum! {
    pub enum KnowledgeSource {
        Upload => "upload",
        Text => "text",
        Url => "url",
    }
    default = Text;
}

wire_enum! {
    pub enum Status {
        Draft => "draft",
        Live => "live",
    }
    default = Draft;
}

wire_enum! {
    pub enum Visibility {
        Public => "public",
        Private => "private",
    }
    default = Public;
}

wire_enum! {
    pub enum Plan {
        Launch => "launch",
        Scale => "scale",
        Custom => "custom",
    }
    default = Launch;
}

impl Plan {
    /// Only the entry plan carries the "powered by" badge.
    pub fn requires_branding(self) -> bool {
        matches!(self, Self::Launch)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub status: Status,
    pub visibility: Visibility,
    pub data_retention: bool,
    pub plan: Plan,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    pub gdpr_mode: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    /// Language code, or `auto` to follow the deployment default.
    pub language: String,
}

impl Default for Localization {
    fn default() -> Self {
        Self { language: "auto".to_string() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessibility {
    pub reduced_motion: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub enabled: bool,
}

impl Default for Analytics {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfiguration {
    pub id: BotId,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub welcome_message: String,
    pub system_prompt: String,
    pub persona: Persona,
    pub tone: Tone,
    pub knowledge_source: KnowledgeSource,
    pub knowledge_content: String,
    pub safety_settings: SafetySettings,
    pub llm_controls: LlmControls,
    pub behavior: Behavior,
    pub appearance: Appearance,
    pub branding: Branding,
    pub position: Position,
    pub integrations: Integrations,
    pub snippets: Vec<Snippet>,
    pub privacy: Privacy,
    pub localization: Localization,
    pub accessibility: Accessibility,
    pub analytics: Analytics,
    pub handoff: Handoff,
    pub settings: Settings,
}

impl BotConfiguration {
    /// A fully defaulted configuration with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_at(BotId::generate(), name, Utc::now())
    }

    pub fn new_at(id: BotId, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_date: now,
            last_updated: now,
            welcome_message: "Hi there! How can I help you today?".to_string(),
            system_prompt: "You are {{botName}}, a {{tone}} {{persona}}. Answer from the provided \
                            knowledge and keep replies {{responseLength}}."
                .to_string(),
            persona: Persona::default(),
            tone: Tone::default(),
            knowledge_source: KnowledgeSource::default(),
            knowledge_content: String::new(),
            safety_settings: SafetySettings::default(),
            llm_controls: LlmControls::default(),
            behavior: Behavior::default(),
            appearance: Appearance::default(),
            branding: Branding::default(),
            position: Position::default(),
            integrations: Integrations::default(),
            snippets: Vec::new(),
            privacy: Privacy::default(),
            localization: Localization::default(),
            accessibility: Accessibility::default(),
            analytics: Analytics::default(),
            handoff: Handoff::default(),
            settings: Settings::default(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.settings.status == Status::Live
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{BotConfiguration, BotId, Plan, Status};

    #[test]
    fn new_configuration_is_fully_defaulted_draft() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid timestamp");
        let config = BotConfiguration::new_at(BotId("bot-1".to_string()), "Support", now);

        assert_eq!(config.settings.status, Status::Draft);
        assert_eq!(config.settings.plan, Plan::Launch);
        assert!(config.branding.show_branding);
        assert_eq!(config.created_date, config.last_updated);
        assert!(config.snippets.is_empty());
    }

    #[test]
    fn json_document_round_trips_exactly() {
        let config = BotConfiguration::new("Round trip");
        let encoded = serde_json::to_string(&config).expect("serialize");
        let decoded: BotConfiguration = serde_json::from_str(&encoded).expect("deserialize");

        assert_eq!(decoded, config);
        assert!(encoded.contains("\"lastUpdated\""));
        assert!(encoded.contains("\"corner\":\"bottom-right\""));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(BotId::generate(), BotId::generate());
    }
}
