pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "chatdock",
    about = "Chatdock widget configuration CLI",
    long_about = "Create, validate, theme, and compile chat widget configurations, and preview how a bot would reply.",
    after_help = "Examples:\n  chatdock new \"Support bot\" --save\n  chatdock apply bot.json patch.json --write\n  chatdock compile bot.json\n  chatdock respond bot.json \"How do I install the widget?\" --seed 7"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Create a draft bot with default settings")]
    New {
        name: String,
        #[arg(long, help = "Also save the bot to the configured store")]
        save: bool,
    },
    #[command(about = "List the bots in the configured store")]
    List,
    #[command(about = "Validate a JSON merge-patch against a bot and print the result")]
    Apply {
        config: PathBuf,
        patch: PathBuf,
        #[arg(long, help = "Write the accepted configuration back to the bot file")]
        write: bool,
    },
    #[command(about = "Compile a bot into its embed script and iframe snippets")]
    Compile { config: PathBuf },
    #[command(about = "Resolve a bot's launcher position into classes and CSS variables")]
    Position { config: PathBuf },
    #[command(about = "Compute the WCAG contrast ratio of two #RRGGBB colours")]
    Contrast { foreground: String, background: String },
    #[command(about = "Apply a theme preset (dark, minimal, high-contrast) to a bot")]
    Preset {
        config: PathBuf,
        name: String,
        #[arg(long, help = "Write the themed configuration back to the bot file")]
        write: bool,
    },
    #[command(about = "Simulate the bot's reply to a visitor message")]
    Respond {
        config: PathBuf,
        utterance: String,
        #[arg(long, help = "Seed for the uncertainty roll; overrides simulator.seed")]
        seed: Option<u64>,
    },
    #[command(about = "Look up a localized widget string")]
    Text { language: String, key: String },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::New { name, save } => commands::new::run(&name, save),
        Command::List => commands::list::run(),
        Command::Apply { config, patch, write } => commands::apply::run(&config, &patch, write),
        Command::Compile { config } => commands::compile::run(&config),
        Command::Position { config } => commands::position::run(&config),
        Command::Contrast { foreground, background } => {
            commands::contrast::run(&foreground, &background)
        }
        Command::Preset { config, name, write } => commands::preset::run(&config, &name, write),
        Command::Respond { config, utterance, seed } => {
            commands::respond::run(&config, &utterance, seed)
        }
        Command::Text { language, key } => commands::text::run(&language, &key),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
