//! Per-bot update offset tracking.
//!
//! A process may poll several bots at once; each bot's stream has its own
//! cursor. The strategy here decides, per bot, which offset the next
//! `getUpdates` call should carry, and advances it as fetched batches are
//! acknowledged. It never touches the network itself.

mod memory;


pub use memory::InMemoryNextOffsetStrategy;

use crate::error::TgfeedError;
use crate::update::{Update, UpdateId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque key for one bot's offset sequence.
///
/// Equality and hash only; the strategy never interprets the contents.
/// Callers are responsible for keeping identities unique: two logical
/// bots registered under one `BotId` share a cursor by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(String);

impl BotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BotId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Offset strategy trait -- the bookkeeping seam of the poll loop.
///
/// The loop asks for the next offset, fetches with it, then reports the
/// full batch back before the next cycle. Implementations must be safe
/// under concurrent calls from many bots' workers, including overlapping
/// cycles for the same bot. The default implementation is
/// [`InMemoryNextOffsetStrategy`]; hosts that need offsets to survive a
/// restart can substitute a store-backed one without touching the loop.
#[async_trait]
pub trait NextOffsetStrategy: Send + Sync {
    /// Offset to present on the next fetch for this bot.
    ///
    /// Idempotent read: repeated calls with no acknowledge in between
    /// return the same value. Fails with [`TgfeedError::UnknownBot`] only
    /// in implementations that require registration up front.
    async fn next_offset(&self, bot: &BotId) -> Result<UpdateId, TgfeedError>;

    /// Report the full batch returned by one fetch cycle (possibly empty).
    ///
    /// Advances the stored offset to `max(update_id) + 1`, never backward.
    /// Fails with [`TgfeedError::MalformedBatch`] if a record carries no
    /// update id; the offset is left unchanged in that case.
    async fn acknowledge(&self, bot: &BotId, updates: &[Update]) -> Result<(), TgfeedError>;

    /// Drop any state held for this bot. Optional; the default is a no-op.
    async fn deregister(&self, _bot: &BotId) -> Result<(), TgfeedError> {
        Ok(())
    }
}
