use serde::Serialize;

use crate::commands::{load_app_config, CommandResult};

#[derive(Debug, Serialize)]
struct Lookup<'a> {
    requested: &'a str,
    resolved: String,
    key: &'a str,
    text: &'a str,
}

pub fn run(language: &str, key: &str) -> CommandResult {
    let config = match load_app_config("text") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let localizer = config.localizer();
    let lookup = Lookup {
        requested: language,
        resolved: localizer.locale(language),
        key,
        text: localizer.text(language, key),
    };
    CommandResult::success_with_data("text", lookup.text, &lookup)
}
