#[tokio::main]
async fn main() -> notify_bot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("notify_bot=info,teloxide=warn"),
    )
    .init();
    log::info!("Starting notify-bot Telegram bot");

    match notify_bot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
