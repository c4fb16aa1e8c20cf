use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span};

use crate::bot::Bot;
use crate::dispatch::{Dispatcher, InboundEvent};

/// Author id given to lines typed on the console.
pub const CONSOLE_AUTHOR: &str = "console-user";
pub const CONSOLE_CHANNEL: &str = "console";

/// Upper bound on events handled at once.
pub const MAX_CONCURRENCY: usize = 1024;

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Events handled at the same time, clamped to `1..=MAX_CONCURRENCY`.
    pub concurrency: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Feeds console lines to the bot as inbound events, each on its own task.
pub struct ConsoleRunner<D> {
    bot: Arc<Bot>,
    dispatcher: Arc<D>,
    config: RunnerConfig,
    shutdown_token: CancellationToken,
}

impl<D: Dispatcher + 'static> ConsoleRunner<D> {
    pub fn new(bot: Bot, dispatcher: D, mut config: RunnerConfig) -> Self {
        config.concurrency = config.concurrency.clamp(1, MAX_CONCURRENCY);
        Self {
            bot: Arc::new(bot),
            dispatcher: Arc::new(dispatcher),
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Token that stops reading new lines once cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Read stdin until EOF or Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let shutdown_token = self.shutdown_token.clone();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, initiating graceful shutdown...");
            shutdown_token.cancel();
        });

        self.run_with(tokio::io::BufReader::new(tokio::io::stdin()))
            .await
    }

    /// Read events from `input` until EOF or shutdown, then wait for the
    /// in-flight ones to finish.
    pub async fn run_with<R>(self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(
            "Console runner started (concurrency {}, bot id {})",
            self.config.concurrency,
            self.dispatcher.self_id()
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut lines = input.lines();
        let mut seq: u64 = 0;

        while let Some(line) = tokio::select! {
            biased;
            _ = self.shutdown_token.cancelled() => None,
            line = lines.next_line() => line?,
        } {
            if line.trim().is_empty() {
                continue;
            }
            seq += 1;

            let permit = semaphore.clone().acquire_owned().await?;
            let bot = self.bot.clone();
            let dispatcher = self.dispatcher.clone();
            let event = InboundEvent::new(CONSOLE_AUTHOR, CONSOLE_CHANNEL, line);

            tokio::spawn(
                async move {
                    let _permit = permit;
                    if let Err(e) = bot.handle(&event, dispatcher.as_ref()).await {
                        error!("Failed to handle event: {}", e);
                    }
                }
                .instrument(info_span!("event", seq = seq)),
            );
        }

        debug!("Input closed, waiting for in-flight events");
        let _permits = semaphore
            .acquire_many(u32::try_from(self.config.concurrency)?)
            .await?;
        info!("All events handled, shutting down");
        Ok(())
    }
}
