//! Long-polling updates provider.
//!
//! One provider holds one offset strategy; every bot started through it
//! gets its own poll task and its own receiver. The task follows the same
//! cycle for every transport: ask the strategy for the next offset, fetch
//! with it, acknowledge the whole batch, then forward the updates.


use crate::api::BotApi;
use std::sync::Arc;
use tgfeed_core::config::{BotConfig, PlatformConfig};
use tgfeed_core::error::TgfeedError;
use tgfeed_core::offset::{BotId, InMemoryNextOffsetStrategy, NextOffsetStrategy};
use tgfeed_core::traits::UpdateFetcher;
use tgfeed_core::update::Update;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// An update tagged with the bot whose stream produced it.
#[derive(Debug, Clone)]
pub struct BotUpdate {
    pub bot: BotId,
    pub update: Update,
}

/// Polls any number of bots against one shared offset strategy.
pub struct UpdatesProvider {
    platform: PlatformConfig,
    strategy: Arc<dyn NextOffsetStrategy>,
    client: reqwest::Client,
}

impl UpdatesProvider {
    pub fn builder(platform: PlatformConfig) -> UpdatesProviderBuilder {
        UpdatesProviderBuilder {
            platform,
            strategy: None,
            client: None,
        }
    }

    /// The strategy shared by every bot on this provider.
    pub fn strategy(&self) -> Arc<dyn NextOffsetStrategy> {
        self.strategy.clone()
    }

    /// API client for one configured bot, sharing this provider's HTTP
    /// client.
    pub fn bot_api(&self, bot: &BotConfig) -> Result<BotApi, TgfeedError> {
        if bot.token.is_empty() {
            return Err(TgfeedError::Config(format!(
                "bot '{}' has no token",
                bot.name
            )));
        }
        Ok(BotApi::new(self.client.clone(), &self.platform, bot))
    }

    /// Start long polling for one configured bot.
    ///
    /// The receiver yields updates in fetch order. Dropping it stops the
    /// bot's poll task.
    pub fn start(&self, bot: &BotConfig) -> Result<mpsc::Receiver<BotUpdate>, TgfeedError> {
        let api = self.bot_api(bot)?;
        Ok(self.start_with_fetcher(bot.id(), Arc::new(api)))
    }

    /// Run the poll loop over a caller-supplied transport.
    pub fn start_with_fetcher(
        &self,
        bot: BotId,
        fetcher: Arc<dyn UpdateFetcher>,
    ) -> mpsc::Receiver<BotUpdate> {
        // Bounded channels need a capacity of at least one.
        let (tx, rx) = mpsc::channel(self.platform.queue_capacity.max(1));
        let strategy = self.strategy.clone();
        let backoff_base = self.platform.backoff_base();
        let backoff_cap = self.platform.backoff_cap();

        info!("bot {bot}: starting long polling");

        tokio::spawn(async move {
            let mut backoff = backoff_base;

            loop {
                let offset = match strategy.next_offset(&bot).await {
                    Ok(offset) => offset,
                    Err(e) => {
                        // Strategy refusals are registration bugs, not
                        // transient faults; retrying cannot fix them.
                        error!("bot {bot}: offset strategy refused: {e}, stopping poll");
                        return;
                    }
                };

                let updates = match fetcher.fetch_updates(offset).await {
                    Ok(updates) => updates,
                    Err(e) => {
                        error!(
                            "bot {bot}: poll error (retry in {}ms): {e}",
                            backoff.as_millis()
                        );
                        tokio::time::sleep(backoff).await;
                        backoff = (backoff * 2).min(backoff_cap);
                        continue;
                    }
                };

                // The whole batch is acknowledged before any update is
                // handed out; the strategy only ever sees full cycles.
                // On failure the offset is untouched, so the next fetch
                // re-delivers the same batch.
                if let Err(e) = strategy.acknowledge(&bot, &updates).await {
                    warn!(
                        "bot {bot}: dropping batch (refetch in {}ms): {e}",
                        backoff.as_millis()
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(backoff_cap);
                    continue;
                }

                // Full cycle succeeded -- reset backoff.
                backoff = backoff_base;

                for update in updates {
                    let tagged = BotUpdate {
                        bot: bot.clone(),
                        update,
                    };
                    if tx.send(tagged).await.is_err() {
                        info!("bot {bot}: receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        rx
    }
}

/// Builder for [`UpdatesProvider`].
pub struct UpdatesProviderBuilder {
    platform: PlatformConfig,
    strategy: Option<Arc<dyn NextOffsetStrategy>>,
    client: Option<reqwest::Client>,
}

impl UpdatesProviderBuilder {
    /// Substitute an offset strategy, e.g. a store-backed one. Without
    /// this, `build` constructs a fresh in-memory strategy.
    pub fn offset_strategy(mut self, strategy: Arc<dyn NextOffsetStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Share an existing HTTP client instead of constructing one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> UpdatesProvider {
        UpdatesProvider {
            platform: self.platform,
            strategy: self
                .strategy
                .unwrap_or_else(|| Arc::new(InMemoryNextOffsetStrategy::new())),
            client: self.client.unwrap_or_default(),
        }
    }
}
