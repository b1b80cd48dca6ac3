use std::path::Path;

use chatdock_core::patch::ConfigPatch;
use chatdock_core::validator;

use crate::commands::{input_failure, read_bot, read_text, write_bot, CommandResult};

pub fn run(config_path: &Path, patch_path: &Path, write: bool) -> CommandResult {
    let bot = match read_bot("apply", config_path) {
        Ok(bot) => bot,
        Err(failure) => return failure,
    };
    let raw_patch = match read_text("apply", patch_path) {
        Ok(raw) => raw,
        Err(failure) => return failure,
    };
    let patch = match ConfigPatch::from_json(&raw_patch) {
        Ok(patch) => patch,
        Err(error) => {
            let error = anyhow::Error::new(error)
                .context(format!("invalid patch `{}`", patch_path.display()));
            return input_failure("apply", error);
        }
    };

    let updated = match validator::apply(&bot, patch) {
        Ok(updated) => updated,
        Err(error) => return CommandResult::rejected("apply", error),
    };

    if write {
        if let Err(failure) = write_bot("apply", config_path, &updated) {
            return failure;
        }
    }

    let verb = if write { "saved" } else { "validated" };
    CommandResult::success_with_data(
        "apply",
        format!("{verb} bot {} ({})", updated.id, updated.settings.status),
        &updated,
    )
}
