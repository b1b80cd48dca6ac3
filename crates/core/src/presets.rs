//! Named visual presets over the colour and radius fields of `appearance`.
//!
//! Applying a preset hands back a snapshot of the fields it replaced. Callers keep exactly one
//! snapshot: applying another preset before reverting replaces it, there is no undo stack.

use serde::{Deserialize, Serialize};

use crate::domain::appearance::Appearance;
use crate::domain::bot::BotConfiguration;
use crate::domain::color::{HexColor, Rgb};
use crate::errors::{DomainError, ValidationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemePreset {
    Dark,
    Minimal,
    HighContrast,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 3] = [Self::Dark, Self::Minimal, Self::HighContrast];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Minimal => "minimal",
            Self::HighContrast => "highContrast",
        }
    }

    pub fn fields(self) -> ThemeFields {
        let hex = |r, g, b| HexColor::from_rgb(Rgb::new(r, g, b));
        match self {
            Self::Dark => ThemeFields {
                background_color: hex(0x11, 0x18, 0x27),
                primary_color: hex(0x4F, 0x46, 0xE5),
                user_bubble_color: hex(0x4F, 0x46, 0xE5),
                user_text_color: hex(0xFF, 0xFF, 0xFF),
                bot_bubble_color: hex(0x1F, 0x29, 0x37),
                bot_text_color: hex(0xF9, 0xFA, 0xFB),
                corner_radius: 16,
            },
            Self::Minimal => ThemeFields {
                background_color: hex(0xFF, 0xFF, 0xFF),
                primary_color: hex(0x11, 0x18, 0x27),
                user_bubble_color: hex(0x11, 0x18, 0x27),
                user_text_color: hex(0xFF, 0xFF, 0xFF),
                bot_bubble_color: hex(0xF9, 0xFA, 0xFB),
                bot_text_color: hex(0x11, 0x18, 0x27),
                corner_radius: 4,
            },
            Self::HighContrast => ThemeFields {
                background_color: hex(0x00, 0x00, 0x00),
                primary_color: hex(0xFF, 0xD7, 0x00),
                user_bubble_color: hex(0xFF, 0xD7, 0x00),
                user_text_color: hex(0x00, 0x00, 0x00),
                bot_bubble_color: hex(0x00, 0x00, 0x00),
                bot_text_color: hex(0xFF, 0xFF, 0xFF),
                corner_radius: 8,
            },
        }
    }
}

impl std::str::FromStr for ThemePreset {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_'))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "dark" => Ok(Self::Dark),
            "minimal" => Ok(Self::Minimal),
            "highcontrast" => Ok(Self::HighContrast),
            _ => Err(DomainError::Validation(ValidationError::UnknownVariant {
                field: "ThemePreset",
                value: value.to_string(),
            })),
        }
    }
}

/// The appearance fields a preset owns; also the shape of the undo snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFields {
    pub background_color: HexColor,
    pub primary_color: HexColor,
    pub user_bubble_color: HexColor,
    pub user_text_color: HexColor,
    pub bot_bubble_color: HexColor,
    pub bot_text_color: HexColor,
    pub corner_radius: u8,
}

impl ThemeFields {
    pub fn capture(appearance: &Appearance) -> Self {
        Self {
            background_color: appearance.background_color.clone(),
            primary_color: appearance.primary_color.clone(),
            user_bubble_color: appearance.user_bubble_color.clone(),
            user_text_color: appearance.user_text_color.clone(),
            bot_bubble_color: appearance.bot_bubble_color.clone(),
            bot_text_color: appearance.bot_text_color.clone(),
            corner_radius: appearance.corner_radius,
        }
    }

    pub fn write_to(&self, appearance: &mut Appearance) {
        appearance.background_color = self.background_color.clone();
        appearance.primary_color = self.primary_color.clone();
        appearance.user_bubble_color = self.user_bubble_color.clone();
        appearance.user_text_color = self.user_text_color.clone();
        appearance.bot_bubble_color = self.bot_bubble_color.clone();
        appearance.bot_text_color = self.bot_text_color.clone();
        appearance.corner_radius = self.corner_radius;
    }
}

/// Returns the themed configuration and the snapshot needed to undo it.
pub fn apply_preset(
    preset: ThemePreset,
    config: &BotConfiguration,
) -> (BotConfiguration, ThemeFields) {
    let snapshot = ThemeFields::capture(&config.appearance);
    let mut themed = config.clone();
    preset.fields().write_to(&mut themed.appearance);
    (themed, snapshot)
}

pub fn revert(config: &BotConfiguration, snapshot: &ThemeFields) -> BotConfiguration {
    let mut restored = config.clone();
    snapshot.write_to(&mut restored.appearance);
    restored
}
