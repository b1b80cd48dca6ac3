pub mod config;
pub mod contrast;
pub mod domain;
pub mod editor;
pub mod embed;
pub mod errors;
pub mod i18n;
pub mod integrations;
pub mod patch;
pub mod position;
pub mod presets;
pub mod simulator;
pub mod validator;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use contrast::{contrast_ratio, meets_aa, ContrastReport, PairContrast, AA_THRESHOLD};
pub use domain::{BotConfiguration, BotId, HexColor, Plan, Status};
pub use editor::{EditorSession, Preview};
pub use embed::{compile, EmbedArtifact, EmbedOptions};
pub use errors::{ApplicationError, ContrastPair, DomainError, InterfaceError, ValidationError};
pub use i18n::Localizer;
pub use integrations::{
    booking_link, BookingContact, LookupError, OrderLookup, OrderLookupRequest, OrderStatus,
    SimulatedOrderLookup,
};
pub use patch::ConfigPatch;
pub use position::{resolve, PositionDirectives};
pub use presets::{apply_preset, revert, ThemeFields, ThemePreset};
pub use simulator::{
    FixedUncertainty, ReplyBranch, ResponsePolicyEngine, RngUncertainty, SimulatedReply,
    UncertaintySource,
};
