use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::domain::color::{HexColor, Rgb};

pub const CORNER_RADIUS_RANGE: RangeInclusive<u8> = 4..=24;
pub const FONT_SIZE_RANGE: RangeInclusive<u8> = 12..=22;
pub const MESSAGE_SPACING_RANGE: RangeInclusive<u8> = 0..=24;
pub const OFFSET_RANGE: RangeInclusive<u16> = 0..=200;
pub const Z_INDEX_RANGE: RangeInclusive<i32> = 0..=i32::MAX;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub background_color: HexColor,
    pub primary_color: HexColor,
    pub user_bubble_color: HexColor,
    pub user_text_color: HexColor,
    pub bot_bubble_color: HexColor,
    pub bot_text_color: HexColor,
    pub corner_radius: u8,
    pub font_size: u8,
    pub font_stack: String,
    pub message_spacing: u8,
    pub bot_name: String,
    pub chat_avatar: String,
    pub show_typing_indicator: bool,
    pub show_launcher: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            background_color: HexColor::from_rgb(Rgb::new(0xFF, 0xFF, 0xFF)),
            primary_color: HexColor::from_rgb(Rgb::new(0x25, 0x63, 0xEB)),
            user_bubble_color: HexColor::from_rgb(Rgb::new(0x25, 0x63, 0xEB)),
            user_text_color: HexColor::from_rgb(Rgb::new(0xFF, 0xFF, 0xFF)),
            bot_bubble_color: HexColor::from_rgb(Rgb::new(0xF3, 0xF4, 0xF6)),
            bot_text_color: HexColor::from_rgb(Rgb::new(0x11, 0x18, 0x27)),
            corner_radius: 12,
            font_size: 14,
            font_stack: "Inter, system-ui, sans-serif".to_string(),
            message_spacing: 8,
            bot_name: "Assistant".to_string(),
            chat_avatar: String::new(),
            show_typing_indicator: true,
            show_launcher: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub show_branding: bool,
    pub branding_text: String,
    pub branding_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            show_branding: true,
            branding_text: "Powered by Chatdock".to_string(),
            branding_url: "https://chatdock.dev".to_string(),
        }
    }
}

wire_enum! {
    pub enum Corner {
        TopLeft => "top-left",
        TopRight => "top-right",
        BottomLeft => "bottom-left",
        BottomRight => "bottom-right",
    }
    default = BottomRight;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vertical {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Horizontal {
    Left,
    Right,
}

impl Corner {
    pub fn vertical(self) -> Vertical {
        match self {
            Self::TopLeft | Self::TopRight => Vertical::Top,
            Self::BottomLeft | Self::BottomRight => Vertical::Bottom,
        }
    }

    pub fn horizontal(self) -> Horizontal {
        match self {
            Self::TopLeft | Self::BottomLeft => Horizontal::Left,
            Self::TopRight | Self::BottomRight => Horizontal::Right,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub corner: Corner,
    pub offset_x: u16,
    pub offset_y: u16,
    pub z_index: i32,
    pub mobile_override: bool,
    pub mobile_corner: Corner,
    pub mobile_offset_x: u16,
    pub mobile_offset_y: u16,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            corner: Corner::BottomRight,
            offset_x: 20,
            offset_y: 20,
            z_index: 9999,
            mobile_override: false,
            mobile_corner: Corner::BottomRight,
            mobile_offset_x: 12,
            mobile_offset_y: 12,
        }
    }
}
