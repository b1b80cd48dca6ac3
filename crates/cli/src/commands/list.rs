use serde::Serialize;

use chatdock_store::{ConfigurationStore, JsonFileStore};

use crate::commands::{load_app_config, runtime, CommandResult, EXIT_STORE};

#[derive(Debug, Serialize)]
struct BotSummary {
    id: String,
    name: String,
    status: String,
    plan: String,
    last_updated: String,
}

pub fn run() -> CommandResult {
    let config = match load_app_config("list") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("list") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let store = JsonFileStore::new(&config.store.path);
    let bots = match runtime.block_on(store.load_all()) {
        Ok(bots) => bots,
        Err(error) => return CommandResult::failure("list", "store", error.to_string(), EXIT_STORE),
    };

    let summaries: Vec<BotSummary> = bots
        .iter()
        .map(|bot| BotSummary {
            id: bot.id.to_string(),
            name: bot.name.clone(),
            status: bot.settings.status.to_string(),
            plan: bot.settings.plan.to_string(),
            last_updated: bot.last_updated.to_rfc3339(),
        })
        .collect();

    CommandResult::success_with_data(
        "list",
        format!("{} bot(s) in {}", summaries.len(), config.store.path.display()),
        &summaries,
    )
}
