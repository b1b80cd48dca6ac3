use std::path::Path;

use serde::Serialize;

use chatdock_core::embed::{self, EmbedArtifact};

use crate::commands::{load_app_config, read_bot, CommandResult};

#[derive(Debug, Serialize)]
struct CompiledEmbed {
    script_html: String,
    iframe_html: String,
    #[serde(flatten)]
    artifact: EmbedArtifact,
}

pub fn run(config_path: &Path) -> CommandResult {
    let config = match load_app_config("compile") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let bot = match read_bot("compile", config_path) {
        Ok(bot) => bot,
        Err(failure) => return failure,
    };

    let artifact = embed::compile(&bot, &config.embed_options());
    let compiled = CompiledEmbed {
        script_html: artifact.script.render(),
        iframe_html: artifact.iframe.render(),
        artifact,
    };

    CommandResult::success_with_data(
        "compile",
        format!("{}\n{}", compiled.script_html, compiled.iframe_html),
        &compiled,
    )
}
