#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::unreadable_literal)]

use std::{env, sync::Arc};

use serenity::{http::Http, prelude::GatewayIntents, Client};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

use crate::{
    database::{
        postgres::{giveaway::PostgresGiveawayStore, settings::PostgresSettingsStore},
        GiveawayStore, SettingsStore,
    },
    giveaway::{
        lifecycle::LifecycleController, list::Lister, participation::ParticipationManager,
        scheduler::ExpirationScheduler,
    },
    presenter::DiscordPresenter,
};

mod commands;
mod common;
mod database;
mod events;
mod giveaway;
mod models;
mod presenter;

#[tokio::main]
async fn main() {
    let log_level = match env::var("DEBUG").unwrap_or(false.to_string()).as_str() {
        "true" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Getting environment variables");
    let discord_token = env::var("DISCORD_TOKEN").unwrap();
    let main_db_username = env::var("DB_USER").unwrap_or("postgres".to_string());
    let main_db_password = env::var("DB_PASSWORD").unwrap();
    let main_db_host = env::var("DB_HOST").unwrap_or("localhost".to_string());
    let main_db_port = env::var("DB_PORT").unwrap_or("5432".to_string());
    let main_db_name = env::var("DB_NAME").unwrap_or("postgres".to_string());

    // Main database connection
    let connection_url = format!(
        "postgres://{main_db_username}:{main_db_password}@{main_db_host}:{main_db_port}/{main_db_name}"
    );
    info!("Establishing connection to main database");
    let main_database = PgPoolOptions::new().connect(&connection_url).await.unwrap();
    info!("Running outstanding migrations");
    sqlx::migrate!().run(&main_database).await.unwrap();
    info!("Connected to main database");

    let giveaway_store: Arc<dyn GiveawayStore> =
        Arc::new(PostgresGiveawayStore::new(main_database.clone()));
    let settings_store: Arc<dyn SettingsStore> =
        Arc::new(PostgresSettingsStore::new(main_database));

    // The presenter owns its own HTTP client so lifecycle notifications work
    // from background tasks without a gateway context.
    let presenter = Arc::new(DiscordPresenter::new(Arc::new(Http::new(&discord_token))));

    let controller = LifecycleController::new(
        giveaway_store.clone(),
        settings_store.clone(),
        presenter.clone(),
    );
    let participation = ParticipationManager::new(
        giveaway_store.clone(),
        settings_store.clone(),
        presenter.clone(),
    );
    let lister = Lister::new(giveaway_store.clone());

    info!("Starting the giveaway expiration sweep");
    let scheduler = ExpirationScheduler::new(giveaway_store, controller.clone());
    tokio::spawn(scheduler.run());

    // Discord client connection
    let handler = models::handler::Handler {
        settings: settings_store,
        controller,
        participation,
        lister,
        presenter,
    };
    let intents = GatewayIntents::non_privileged() | GatewayIntents::GUILD_MEMBERS;
    let mut client = Client::builder(&discord_token, intents)
        .event_handler(handler)
        .await
        .unwrap();

    if let Err(err) = client.start_autosharded().await {
        error!(
            "Attempted to start the Discord client, but failed with error: {}",
            err
        );
    }
}
