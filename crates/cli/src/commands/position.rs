use std::path::Path;

use serde::Serialize;

use chatdock_core::position;

use crate::commands::{read_bot, CommandResult};

#[derive(Debug, Serialize)]
struct ResolvedPosition {
    class: String,
    style: String,
    classes: Vec<String>,
    use_mobile: bool,
}

pub fn run(config_path: &Path) -> CommandResult {
    let bot = match read_bot("position", config_path) {
        Ok(bot) => bot,
        Err(failure) => return failure,
    };

    let directives = position::resolve(&bot.position);
    let resolved = ResolvedPosition {
        class: directives.class_attribute(),
        style: directives.style_attribute(),
        classes: directives.classes(),
        use_mobile: directives.use_mobile(),
    };

    CommandResult::success_with_data(
        "position",
        format!("class=\"{}\" style=\"{}\"", resolved.class, resolved.style),
        &resolved,
    )
}
