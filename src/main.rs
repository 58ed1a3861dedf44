//! Transbot - Chinese/English translation bot for Telegram groups
//!
//! Entry point: loads configuration, sets up logging, and either serves the
//! bot or runs a one-shot translation from the command line.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transbot::bot::{Bot, ConversationRouter};
use transbot::cli::{Args, Commands};
use transbot::config::Config;
use transbot::language::{classify, LanguageCode};
use transbot::telegram::TelegramClient;
use transbot::translate::TranslationResolver;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let args = Args::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let log_guard = setup_logging(args.verbose)?;

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_critical(log_guard, e),
    };

    match args.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let token = match config.require_token() {
                Ok(token) => token.to_string(),
                Err(e) => exit_critical(log_guard, e),
            };
            run_bot(config, token).await?;
        }
        Commands::Translate { text, to, from } => {
            let resolver = TranslationResolver::from_config(&config)?;
            let source = from.map(|code| code.parse::<LanguageCode>()).transpose()?;
            let target = match (to, source) {
                (Some(code), _) => Some(code.parse::<LanguageCode>()?),
                (None, Some(source)) => Some(source.opposite()),
                (None, None) => None,
            };

            let translated = match target {
                Some(target) => resolver.resolve(&text, target, source).await?,
                None => resolver.translate_detected(&text).await?.translated,
            };
            println!("{}", translated);
        }
        Commands::Detect { text } => {
            println!("{}", classify(&text));
        }
    }

    Ok(())
}

/// Logs a fatal startup error and exits with status 1.
///
/// `process::exit` skips destructors, so the log guard is dropped first to
/// flush the file writer.
fn exit_critical(log_guard: WorkerGuard, e: impl std::fmt::Display) -> ! {
    error!("CRITICAL ERROR: {}", e);
    drop(log_guard);
    std::process::exit(1)
}

async fn run_bot(config: Config, token: String) -> Result<()> {
    config.log_summary();

    let resolver = Arc::new(TranslationResolver::from_config(&config)?);
    let transport = Arc::new(TelegramClient::new(&config.telegram, &token)?);

    let mut router = ConversationRouter::new(resolver, &config);
    match transport.get_me().await {
        Ok(me) => match me.username {
            Some(username) => {
                info!("Connected to Telegram as @{}", username);
                router = router.with_bot_username(username);
            }
            None => info!("Connected to Telegram as bot {}", me.id),
        },
        Err(e) => warn!("Could not fetch bot identity, command mentions will not be checked: {}", e),
    }

    Bot::new(transport, router).run().await?;

    info!("Transbot stopped");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".transbot").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation
    let file_appender = rolling::daily(&log_dir, "transbot.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("transbot.log").display());

    Ok(guard)
}
