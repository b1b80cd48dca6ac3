pub mod apply;
pub mod compile;
pub mod config;
pub mod contrast;
pub mod list;
pub mod new;
pub mod position;
pub mod preset;
pub mod respond;
pub mod text;

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use chatdock_core::config::{AppConfig, LoadOptions};
use chatdock_core::domain::BotConfiguration;
use chatdock_core::errors::{ApplicationError, DomainError};
use chatdock_core::validator;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_STORE: u8 = 4;
pub const EXIT_INPUT: u8 = 5;
pub const EXIT_REJECTED: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: &impl Serialize,
    ) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self::success_with(command, message, Some(data)),
            Err(error) => Self::failure(command, "serialization", error.to_string(), EXIT_RUNTIME),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Domain rejections carry the editor-facing reason and a correlation id.
    pub fn rejected(command: &str, error: DomainError) -> Self {
        let correlation_id = format!("cli-{}", uuid::Uuid::new_v4());
        let interface = ApplicationError::from(error).into_interface(correlation_id);
        Self::failure(command, "rejected", interface.to_string(), EXIT_REJECTED)
    }

    fn success_with(command: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_app_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

pub(crate) fn runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            EXIT_RUNTIME,
        )
    })
}

/// Reads one bot document and re-establishes its structural invariants.
pub(crate) fn read_bot(command: &str, path: &Path) -> Result<BotConfiguration, CommandResult> {
    let mut bot: BotConfiguration = read_json(path).map_err(|error| input_failure(command, error))?;
    validator::normalize(&mut bot).map_err(|error| CommandResult::rejected(command, error))?;
    Ok(bot)
}

pub(crate) fn read_text(command: &str, path: &Path) -> Result<String, CommandResult> {
    fs::read_to_string(path)
        .with_context(|| format!("could not read `{}`", path.display()))
        .map_err(|error| input_failure(command, error))
}

pub(crate) fn write_bot(
    command: &str,
    path: &Path,
    bot: &BotConfiguration,
) -> Result<(), CommandResult> {
    let write = || -> anyhow::Result<()> {
        let mut encoded = serde_json::to_string_pretty(bot).context("could not encode bot")?;
        encoded.push('\n');
        fs::write(path, encoded).with_context(|| format!("could not write `{}`", path.display()))
    };
    write().map_err(|error| CommandResult::failure(command, "io", format!("{error:#}"), EXIT_STORE))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("could not read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("could not parse `{}`", path.display()))
}

pub(crate) fn input_failure(command: &str, error: anyhow::Error) -> CommandResult {
    CommandResult::failure(command, "invalid_input", format!("{error:#}"), EXIT_INPUT)
}
