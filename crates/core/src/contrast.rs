//! WCAG 2.x contrast between two sRGB colours.

use serde::Serialize;

use crate::domain::appearance::Appearance;
use crate::domain::color::{HexColor, Rgb};
use crate::errors::{ContrastPair, DomainError};

/// Minimum ratio for normal-size text at level AA.
pub const AA_THRESHOLD: f64 = 4.5;

pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn contrast_between(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    let ratio = (lighter + 0.05) / (darker + 0.05);
    // Snap float noise so black/white lands on exactly 21.
    (ratio * 1e9).round() / 1e9
}

/// Contrast ratio for two `#RRGGBB` strings, in `[1, 21]`.
pub fn contrast_ratio(a: &str, b: &str) -> Result<f64, DomainError> {
    Ok(contrast_between(Rgb::parse_hex(a)?, Rgb::parse_hex(b)?))
}

pub fn meets_aa(ratio: f64) -> bool {
    ratio >= AA_THRESHOLD
}

impl HexColor {
    pub fn contrast_with(&self, other: &HexColor) -> f64 {
        contrast_between(self.rgb(), other.rgb())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PairContrast {
    #[serde(serialize_with = "serialize_pair")]
    pub pair: ContrastPair,
    pub ratio: f64,
    pub passes: bool,
}

fn serialize_pair<S>(pair: &ContrastPair, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(pair)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ContrastReport {
    pub user: PairContrast,
    pub bot: PairContrast,
}

impl ContrastReport {
    pub fn for_appearance(appearance: &Appearance) -> Self {
        let measure = |pair, bubble: &HexColor, text: &HexColor| {
            let ratio = bubble.contrast_with(text);
            PairContrast { pair, ratio, passes: meets_aa(ratio) }
        };

        Self {
            user: measure(
                ContrastPair::UserBubble,
                &appearance.user_bubble_color,
                &appearance.user_text_color,
            ),
            bot: measure(
                ContrastPair::BotBubble,
                &appearance.bot_bubble_color,
                &appearance.bot_text_color,
            ),
        }
    }

    pub fn passes(&self) -> bool {
        self.user.passes && self.bot.passes
    }

    pub fn first_failure(&self) -> Option<PairContrast> {
        [self.user, self.bot].into_iter().find(|pair| !pair.passes)
    }
}

#[cfg(test)]
mod tests {
    use super::{contrast_ratio, meets_aa, ContrastReport};
    use crate::domain::appearance::Appearance;
    use crate::domain::color::HexColor;
    use crate::errors::{ContrastPair, DomainError};

    #[test]
    fn black_on_white_is_exact_maximum() {
        assert_eq!(contrast_ratio("#000000", "#FFFFFF").expect("valid"), 21.0);
    }

    #[test]
    fn identical_colours_have_unit_ratio() {
        for color in ["#000000", "#FFFFFF", "#2563EB", "#7F7F7F", "#F3F4F6"] {
            assert_eq!(contrast_ratio(color, color).expect("valid"), 1.0, "{color}");
        }
    }

    #[test]
    fn ratio_is_symmetric() {
        let samples = ["#000000", "#FFFFFF", "#2563EB", "#111827", "#FF00FF", "#0A7B3E"];
        for a in samples {
            for b in samples {
                assert_eq!(
                    contrast_ratio(a, b).expect("valid"),
                    contrast_ratio(b, a).expect("valid"),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn known_mid_grey_ratio() {
        // #777777 on white is the classic just-failing AA example (~4.48:1).
        let ratio = contrast_ratio("#777777", "#FFFFFF").expect("valid");
        assert!((ratio - 4.478).abs() < 0.01, "{ratio}");
        assert!(!meets_aa(ratio));
        assert!(meets_aa(contrast_ratio("#767676", "#FFFFFF").expect("valid")));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let error = contrast_ratio("#FFF", "#000000").expect_err("short hex");
        assert_eq!(error, DomainError::InvalidColorFormat { value: "#FFF".to_string() });
    }

    #[test]
    fn report_names_the_failing_pair() {
        let appearance = Appearance {
            bot_bubble_color: HexColor::parse("#FFFFFF").expect("valid"),
            bot_text_color: HexColor::parse("#EEEEEE").expect("valid"),
            ..Appearance::default()
        };
        let report = ContrastReport::for_appearance(&appearance);

        assert!(report.user.passes);
        assert!(!report.passes());
        let failing = report.first_failure().map(|failure| failure.pair);
        assert_eq!(failing, Some(ContrastPair::BotBubble));
    }
}
