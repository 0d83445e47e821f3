use anyhow::{Context, Result};
use sqlx::postgres::PgPool;
use std::env;
use std::sync::Arc;
use teloxide::dispatching::dialogue::ErasedStorage;
use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use matchbooking::bot::{self, BotContext};
use matchbooking::config::BotConfig;
use matchbooking::db::{init_database_schema, PgRegistrantStore};
use matchbooking::dialogue::{in_memory_sessions, RegistrationState};
use matchbooking::localization::init_localization;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Matchbooking registration bot");

    let config = BotConfig::from_env().context("Invalid bot configuration")?;

    init_localization().context("Failed to load localization resources")?;

    let pool = match PgPool::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "Error connecting to the database");
            std::process::exit(1);
        }
    };
    if let Err(e) = init_database_schema(&pool).await {
        error!(error = %e, "Error initializing the database schema");
        std::process::exit(1);
    }
    info!("Database connected");

    let store = Arc::new(PgRegistrantStore::new(pool));
    let ctx = Arc::new(BotContext::from_config(store, &config));
    if !ctx.relay.is_enabled() {
        warn!("TARGET_GROUP_ID is not set; relaying photos to the group is disabled");
    }
    let sessions = in_memory_sessions();

    let bot = Bot::new(config.bot_token.clone());

    if let Err(e) = bot.set_my_commands(bot::command_menu()).await {
        warn!(error = %e, "Failed to register the command menu");
    }

    info!("Bot initialized, starting dispatcher");

    let handler = Update::filter_message()
        .enter_dialogue::<Message, ErasedStorage<RegistrationState>, RegistrationState>()
        .endpoint(bot::message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx, sessions])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
