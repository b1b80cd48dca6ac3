use chatdock_core::domain::BotConfiguration;
use chatdock_core::validator;
use chatdock_store::{ConfigurationStore, JsonFileStore};

use crate::commands::{load_app_config, runtime, CommandResult, EXIT_INPUT, EXIT_STORE};

pub fn run(name: &str, save: bool) -> CommandResult {
    let name = name.trim();
    if name.is_empty() {
        let message = "bot name must not be empty";
        return CommandResult::failure("new", "invalid_input", message, EXIT_INPUT);
    }

    let mut bot = BotConfiguration::new(name);
    if let Err(error) = validator::normalize(&mut bot) {
        return CommandResult::rejected("new", error);
    }

    if !save {
        let message = format!("created draft bot {}", bot.id);
        return CommandResult::success_with_data("new", message, &bot);
    }

    let config = match load_app_config("new") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("new") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let store = JsonFileStore::new(&config.store.path);
    match runtime.block_on(store.upsert(bot.clone())) {
        Ok(()) => CommandResult::success_with_data(
            "new",
            format!("created draft bot {} in {}", bot.id, config.store.path.display()),
            &bot,
        ),
        Err(error) => CommandResult::failure("new", "store", error.to_string(), EXIT_STORE),
    }
}
