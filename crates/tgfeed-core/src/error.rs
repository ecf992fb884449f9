use crate::offset::BotId;
use thiserror::Error;

/// Top-level error type for tgfeed.
#[derive(Debug, Error)]
pub enum TgfeedError {
    /// The platform answered a call with ok=false.
    #[error("api error: {0}")]
    Api(String),

    /// Failure reaching or reading from the platform.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// A record in an acknowledged batch carries no update id.
    /// The offset for that bot is left untouched.
    #[error("malformed batch: update at index {index} has no update_id")]
    MalformedBatch { index: usize },

    /// Raised by strategies that require explicit registration before use.
    /// The default in-memory strategy never raises this.
    #[error("unknown bot: {0}")]
    UnknownBot(BotId),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
