/// Declares a closed enumeration with a stable wire name per variant.
///
/// The wire name is used for serde, `Display`, `FromStr` and the embed directive slots, so a
/// value that is not listed is rejected when it is parsed rather than at comparison sites.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::errors::DomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == normalized)
                    .ok_or_else(|| {
                        $crate::errors::DomainError::Validation(
                            $crate::errors::ValidationError::UnknownVariant {
                                field: stringify!($name),
                                value: value.to_string(),
                            },
                        )
                    })
            }
        }
    };
}

pub mod appearance;
pub mod behavior;
pub mod bot;
pub mod color;
pub mod integrations;
pub mod snippet;

pub use appearance::{Appearance, Branding, Corner, Horizontal, Position, Vertical};
pub use behavior::{
    Behavior, EmojiPolicy, FormatPreference, LlmControls, ResponseLength, SafetySettings,
    WhenUnsure,
};
pub use bot::{BotConfiguration, BotId, Plan, Settings, Status, Visibility};
pub use color::{HexColor, Rgb};
pub use integrations::{BookingIntegration, Handoff, Integrations, OrdersIntegration};
pub use snippet::Snippet;
