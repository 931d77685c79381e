use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use apify_client::ApifyClient;
use instagram_client::InstagramClient;
use reel_responder::{ApifyComments, Config, DedupStore, Responder};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("reel_responder=info".parse()?)
                .add_directive("apify_client=info".parse()?)
                .add_directive("instagram_client=info".parse()?),
        )
        .init();

    info!("Reel Responder starting...");

    // Load config
    let config = Config::from_env()?;
    config.log_keys();

    let store = DedupStore::load(&config.store_file)?;

    // Log into Instagram; a failure here is fatal
    let instagram = InstagramClient::login(&config.insta_username, &config.insta_password)
        .await?
        .with_max_threads(config.inbox_thread_limit);

    let apify = ApifyClient::new(config.apify_key.clone())
        .with_comment_actor(config.apify_comment_actor.clone());
    let openai = OpenAi::new(config.openai_api_key.clone(), config.openai_model.clone());

    let mut responder = Responder::new(
        Arc::new(instagram),
        store,
        Arc::new(ApifyComments::new(apify, config.apify_results_limit)),
        Arc::new(openai),
        config.responder_settings(),
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping after the current cycle");
            on_interrupt.cancel();
        }
    });

    info!(
        poll_interval_secs = config.poll_interval.as_secs(),
        "Checking for new reels. Press Ctrl+C to stop"
    );
    responder.run(cancel).await?;

    info!("Bot stopped by user");
    Ok(())
}
