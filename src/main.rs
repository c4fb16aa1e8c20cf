use anyhow::Result;
use glossy::{
    bot::Bot,
    config::Config,
    dispatch::ConsoleDispatcher,
    runner::{ConsoleRunner, RunnerConfig},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is the console chat
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = Config::from_env()?;
    if config.llm_api_key().is_empty() {
        warn!("LLM_API_KEY is not set, text service calls will be unauthenticated");
    }

    let bot = Bot::from_config(&config)?;
    let dispatcher = ConsoleDispatcher::new(config.bot_id());
    let concurrency = std::env::var("BOT_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(RunnerConfig::default().concurrency);

    info!("Reading messages from stdin, one per line");
    ConsoleRunner::new(bot, dispatcher, RunnerConfig { concurrency })
        .run()
        .await
}
