use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const MAX_ANSWER_LENGTH_RANGE: RangeInclusive<u16> = 100..=1000;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const TOP_P_RANGE: RangeInclusive<f64> = 0.1..=1.0;
pub const MAX_TOKENS_RANGE: RangeInclusive<u16> = 50..=500;
pub const PENALTY_RANGE: RangeInclusive<f64> = 0.0..=1.0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySettings {
    pub refusal_style: bool,
    pub guarded_topics: bool,
    pub max_answer_length: u16,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self { refusal_style: true, guarded_topics: true, max_answer_length: 500 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmControls {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u16,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    /// Comma-separated, stored as typed by the editor.
    pub stop_sequences: String,
}

impl LlmControls {
    /// Trimmed, non-empty stop sequences in their stored order.
    pub fn stop_sequence_list(&self) -> Vec<&str> {
        self.stop_sequences.split(',').map(str::trim).filter(|item| !item.is_empty()).collect()
    }
}

impl Default for LlmControls {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            max_tokens: 300,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop_sequences: String::new(),
        }
    }
}

wire_enum! {
    pub enum ResponseLength {
        Concise => "concise",
        Normal => "normal",
        Detailed => "detailed",
    }
    default = Normal;
}

wire_enum! {
    pub enum FormatPreference {
        Bullets => "bullets",
        Paragraphs => "paragraphs",
        Steps => "steps",
    }
    default = Paragraphs;
}

wire_enum! {
    pub enum WhenUnsure {
        Clarify => "clarify",
        Admit => "admit",
        Escalate => "escalate",
    }
    default = Clarify;
}

wire_enum! {
    pub enum EmojiPolicy {
        Never => "never",
        Sparingly => "sparingly",
        Allowed => "allowed",
    }
    default = Sparingly;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    pub response_length: ResponseLength,
    pub format_preference: FormatPreference,
    pub when_unsure: WhenUnsure,
    pub escalation_message: String,
    pub emoji: EmojiPolicy,
    pub booking_intents: BTreeSet<String>,
    pub order_intents: BTreeSet<String>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            response_length: ResponseLength::Normal,
            format_preference: FormatPreference::Paragraphs,
            when_unsure: WhenUnsure::Clarify,
            escalation_message: "Let me connect you with a member of our team.".to_string(),
            emoji: EmojiPolicy::Sparingly,
            booking_intents: keyword_set(&["book", "appointment", "schedule", "reservation"]),
            order_intents: keyword_set(&["order", "tracking", "shipment", "delivery"]),
        }
    }
}

fn keyword_set(keywords: &[&str]) -> BTreeSet<String> {
    keywords.iter().map(|keyword| keyword.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{LlmControls, ResponseLength};

    #[test]
    fn stop_sequence_list_drops_blank_entries() {
        let controls =
            LlmControls { stop_sequences: " a, b ,,c , ".to_string(), ..LlmControls::default() };
        assert_eq!(controls.stop_sequence_list(), vec!["a", "b", "c"]);
    }

    #[test]
    fn response_length_rejects_unknown_values() {
        assert_eq!("Detailed".parse::<ResponseLength>().ok(), Some(ResponseLength::Detailed));
        assert!("verbose".parse::<ResponseLength>().is_err());
    }
}
