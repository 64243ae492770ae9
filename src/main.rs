mod commands;
mod gateway;
mod i18n;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gateway::{Gateway, Settings};
use nudge_channels::telegram::TelegramChannel;
use nudge_core::{
    config::{self, Config},
    shellexpand,
    traits::{Channel, UserStore, WeatherLookup},
};
use nudge_memory::Store;
use nudge_weather::OpenMeteo;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "nudge",
    version,
    about = "Nudge — Telegram registration and weather bot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, env = "NUDGE_CONFIG", default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration, storage and the reminder schedule.
    Status,
    /// Print every registered user.
    Users,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = load_cli(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    let cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Start => {
            let _guard = init_logging(&cfg, true)?;
            let settings = settings(&cfg)?;

            // Build channel.
            let tg = cfg
                .channel
                .telegram
                .clone()
                .filter(|tg| tg.enabled)
                .context("Telegram is not enabled. Enable [channel.telegram] in config.toml.")?;
            if tg.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or the TELEGRAM_BOT_TOKEN env var."
                );
            }
            let channel: Arc<dyn Channel> = Arc::new(TelegramChannel::new(tg));

            // Build memory and weather lookup.
            let store: Arc<dyn UserStore> = Arc::new(Store::new(&cfg.memory).await?);
            let weather: Arc<dyn WeatherLookup> = Arc::new(OpenMeteo::new(&cfg.weather)?);

            println!("{} — starting...", cfg.bot.name);
            let gw = Arc::new(Gateway::new(channel, store, weather, settings));
            gw.run().await?;
        }
        Commands::Status => {
            let _guard = init_logging(&cfg, false)?;
            println!("{} — Status Check\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!("Language: {}", cfg.bot.language);
            println!(
                "Reply timeout: {}s",
                cfg.conversation.reply_timeout().as_secs()
            );
            println!();

            match &cfg.channel.telegram {
                Some(tg) => println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                ),
                None => println!("  telegram: not configured"),
            }

            let db_path = shellexpand(&cfg.memory.db_path);
            if Path::new(&db_path).exists() {
                let store = Store::new(&cfg.memory).await?;
                println!("  users: {} registered", store.count_users().await?);
            } else {
                println!("  users: no database yet at {db_path}");
            }

            if cfg.reminder.enabled {
                let at = cfg.reminder.trigger_time()?;
                let wait = gateway::secs_until(chrono::Local::now().time(), at);
                println!(
                    "  daily reminder: {} (in {}h {}m)",
                    at.format("%H:%M"),
                    wait / 3600,
                    (wait % 3600) / 60
                );
            } else {
                println!("  daily reminder: disabled");
            }
        }
        Commands::Users => {
            let _guard = init_logging(&cfg, false)?;
            let store = Store::new(&cfg.memory).await?;
            let users = store.list_users().await?;
            if users.is_empty() {
                println!("No registered users.");
            }
            for u in users {
                println!("{}\t{}\t{}", u.id, u.name, u.age);
            }
        }
    }

    Ok(())
}

/// Load `.env` (searched upwards from the working directory unless
/// `env_file` is given), then parse `args`, so `.env` can set `NUDGE_CONFIG`.
fn load_cli<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let _ = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    Cli::try_parse_from(args)
}

/// Gateway settings from the loaded config; rejects an invalid reminder time.
fn settings(cfg: &Config) -> anyhow::Result<Settings> {
    let daily_reminder_at = if cfg.reminder.enabled {
        Some(cfg.reminder.trigger_time()?)
    } else {
        None
    };
    Ok(Settings {
        language: cfg.bot.language.clone(),
        reply_timeout: cfg.conversation.reply_timeout(),
        daily_reminder_at,
    })
}

/// Install the tracing subscriber: stdout always, `{data_dir}/logs/nudge.log`
/// when `to_file` is set. The returned guard flushes the file writer on drop.
fn init_logging(cfg: &Config, to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.bot.log_level));

    if !to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    }

    let log_dir = PathBuf::from(shellexpand(&cfg.bot.data_dir)).join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&log_dir, "nudge.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    Ok(Some(guard))
}
