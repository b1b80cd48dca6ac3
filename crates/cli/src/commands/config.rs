use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;

use crate::commands::{load_app_config, CommandResult};

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> CommandResult {
    let config = match load_app_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let embed = config.embed_options();

    let fields = [
        Field {
            key: "embed.base_url",
            env_keys: &["CHATDOCK_EMBED_BASE_URL"],
            value: config.embed.base_url.clone(),
        },
        Field {
            key: "embed.script_src",
            env_keys: &["CHATDOCK_EMBED_SCRIPT_SRC"],
            value: embed.script_src,
        },
        Field {
            key: "localization.default_language",
            env_keys: &["CHATDOCK_LOCALIZATION_DEFAULT_LANGUAGE", "CHATDOCK_DEFAULT_LANGUAGE"],
            value: config.localization.default_language.clone(),
        },
        Field {
            key: "simulator.uncertainty_probability",
            env_keys: &["CHATDOCK_SIMULATOR_UNCERTAINTY_PROBABILITY"],
            value: config.simulator.uncertainty_probability.to_string(),
        },
        Field {
            key: "simulator.seed",
            env_keys: &["CHATDOCK_SIMULATOR_SEED"],
            value: config
                .simulator
                .seed
                .map(|seed| seed.to_string())
                .unwrap_or_else(|| "<random>".to_string()),
        },
        Field {
            key: "store.path",
            env_keys: &["CHATDOCK_STORE_PATH"],
            value: config.store.path.display().to_string(),
        },
        Field {
            key: "logging.level",
            env_keys: &["CHATDOCK_LOGGING_LEVEL", "CHATDOCK_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key: "logging.format",
            env_keys: &["CHATDOCK_LOGGING_FORMAT", "CHATDOCK_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(|field| {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        render_line(field.key, &field.value, source)
    }));

    CommandResult::success_with_data("config", lines.join("\n"), &config)
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("chatdock.toml"), PathBuf::from("config/chatdock.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
