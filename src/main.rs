use epic_free_games_bot::dispatcher::{run_update_loop, start_scheduler};
use epic_free_games_bot::store::{notified_offers_in, subscribers_in};
use epic_free_games_bot::{
    Config,
    DailySchedule,
    Dispatcher,
    EpicStoreAPI,
    Notifier,
    Pacing,
    TelegramAPI,
};
use dotenv::dotenv;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    log::info!("Starting Epic free games bot with {config:?}");

    let catalog = EpicStoreAPI::builder(config.storefront.clone()).build()?;
    let telegram = TelegramAPI::new(config.bot_token.clone())?;
    let bot = telegram.get_me().await?;

    log::info!("Logged in as @{}", bot.username.as_deref().unwrap_or("unknown"));

    let notifier = Notifier::new(
        Arc::new(telegram.clone()),
        config.timezone,
        Pacing::with_offer_delay(config.send_delay),
    );
    let dispatcher = Arc::new(Dispatcher::new(
        &config,
        Arc::new(catalog),
        notifier,
        subscribers_in(&config.data_directory),
        notified_offers_in(&config.data_directory),
    ));
    let schedule = DailySchedule {
        at: config.check_time,
        timezone: config.timezone,
    };
    let _scheduler = start_scheduler(Arc::clone(&dispatcher), schedule, config.startup_check_delay);

    run_update_loop(telegram, dispatcher, bot.username).await;

    Ok(())
}
