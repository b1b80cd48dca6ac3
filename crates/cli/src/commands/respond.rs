use std::path::Path;

use chatdock_core::domain::BotConfiguration;
use chatdock_core::simulator::{ResponsePolicyEngine, RngUncertainty, UncertaintySource};

use crate::commands::{load_app_config, read_bot, CommandResult};

pub fn run(config_path: &Path, utterance: &str, seed: Option<u64>) -> CommandResult {
    let config = match load_app_config("respond") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let bot = match read_bot("respond", config_path) {
        Ok(bot) => bot,
        Err(failure) => return failure,
    };

    let probability = config.simulator.uncertainty_probability;
    match seed.or(config.simulator.seed) {
        Some(seed) => simulate(RngUncertainty::seeded(seed), probability, utterance, &bot),
        None => simulate(RngUncertainty::thread(), probability, utterance, &bot),
    }
}

fn simulate<U: UncertaintySource>(
    uncertainty: U,
    probability: f64,
    utterance: &str,
    bot: &BotConfiguration,
) -> CommandResult {
    let mut engine = ResponsePolicyEngine::new(uncertainty).with_probability(probability);
    let reply = engine.simulate(utterance, bot);
    CommandResult::success_with_data("respond", reply.text.clone(), &reply)
}
