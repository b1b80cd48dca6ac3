use std::process::ExitCode;

use chatdock_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use chatdock_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    // An invalid config is reported by the command payload instead.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }
    chatdock_cli::run()
}
