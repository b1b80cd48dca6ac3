use std::path::Path;

use serde::Serialize;

use chatdock_core::domain::BotConfiguration;
use chatdock_core::presets::{self, ThemeFields, ThemePreset};
use chatdock_core::validator;

use crate::commands::{read_bot, write_bot, CommandResult, EXIT_INPUT};

#[derive(Debug, Serialize)]
struct PresetOutcome<'a> {
    preset: &'a str,
    previous: ThemeFields,
    config: BotConfiguration,
}

pub fn run(config_path: &Path, name: &str, write: bool) -> CommandResult {
    let preset: ThemePreset = match name.parse() {
        Ok(preset) => preset,
        Err(error) => {
            return CommandResult::failure("preset", "invalid_input", format!("{error}"), EXIT_INPUT)
        }
    };
    let bot = match read_bot("preset", config_path) {
        Ok(bot) => bot,
        Err(failure) => return failure,
    };

    let (themed, previous) = presets::apply_preset(preset, &bot);
    let themed = match validator::accept(&bot, themed) {
        Ok(themed) => themed,
        Err(error) => return CommandResult::rejected("preset", error),
    };

    if write {
        if let Err(failure) = write_bot("preset", config_path, &themed) {
            return failure;
        }
    }

    let outcome = PresetOutcome { preset: preset.name(), previous, config: themed };
    CommandResult::success_with_data(
        "preset",
        format!("applied preset {} to bot {}", preset.name(), outcome.config.id),
        &outcome,
    )
}
