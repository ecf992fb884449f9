//! Default process-local offset strategy.

use super::{BotId, NextOffsetStrategy};
use crate::error::TgfeedError;
use crate::update::{Update, UpdateId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`NextOffsetStrategy`] keyed by [`BotId`].
///
/// Each bot gets an atomic cell holding the smallest update id not yet
/// acknowledged. The map lock is only taken to locate or create a cell,
/// never across an await, so unrelated bots do not contend: the hot path
/// is a single atomic `fetch_max` on the bot's own cell.
///
/// Entries are created lazily on first acknowledge. A bot that is only
/// ever queried reads the backlog sentinel and never grows the map.
#[derive(Debug, Default)]
pub struct InMemoryNextOffsetStrategy {
    offsets: RwLock<HashMap<BotId, Arc<AtomicI64>>>,
}

impl InMemoryNextOffsetStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bots with materialized offset state.
    pub async fn tracked_bots(&self) -> usize {
        self.offsets.read().await.len()
    }

    async fn cell(&self, bot: &BotId) -> Arc<AtomicI64> {
        if let Some(cell) = self.offsets.read().await.get(bot) {
            return cell.clone();
        }
        let mut offsets = self.offsets.write().await;
        offsets
            .entry(bot.clone())
            .or_insert_with(|| {
                debug!("tracking offsets for new bot {bot}");
                Arc::new(AtomicI64::new(UpdateId::BACKLOG.0))
            })
            .clone()
    }
}

#[async_trait]
impl NextOffsetStrategy for InMemoryNextOffsetStrategy {
    async fn next_offset(&self, bot: &BotId) -> Result<UpdateId, TgfeedError> {
        // Unseen bots read the sentinel without materializing an entry.
        let offsets = self.offsets.read().await;
        match offsets.get(bot) {
            Some(cell) => Ok(UpdateId(cell.load(Ordering::SeqCst))),
            None => Ok(UpdateId::BACKLOG),
        }
    }

    async fn acknowledge(&self, bot: &BotId, updates: &[Update]) -> Result<(), TgfeedError> {
        if updates.is_empty() {
            return Ok(());
        }

        // Validate and scan before touching any state. Batches may arrive
        // in any order, so the max is taken over the whole slice.
        let mut max_id = UpdateId(i64::MIN);
        for (index, update) in updates.iter().enumerate() {
            match update.update_id {
                Some(id) => max_id = max_id.max(id),
                None => return Err(TgfeedError::MalformedBatch { index }),
            }
        }

        // Advance only if the new offset is ahead of the stored one;
        // stale or duplicate acknowledgements must never regress it.
        let cell = self.cell(bot).await;
        cell.fetch_max(max_id.successor().0, Ordering::SeqCst);
        Ok(())
    }

    async fn deregister(&self, bot: &BotId) -> Result<(), TgfeedError> {
        if self.offsets.write().await.remove(bot).is_some() {
            debug!("dropped offset state for bot {bot}");
        }
        Ok(())
    }
}
