use crate::error::TgfeedError;
use crate::update::{Update, UpdateId};
use async_trait::async_trait;

/// Transport seam for the polling loop.
///
/// The loop never talks to the wire directly; it hands an offset to a
/// fetcher and gets back whatever batch the platform had queued. The
/// production implementation is the HTTP Bot API client; tests script
/// fetchers by hand, and hosts with exotic transports can bring their own.
#[async_trait]
pub trait UpdateFetcher: Send + Sync {
    /// Fetch the next batch of updates at the given offset.
    ///
    /// Offset 0 means "from the beginning of the backlog". May block
    /// server-side up to the long-poll window before returning an empty
    /// batch.
    async fn fetch_updates(&self, offset: UpdateId) -> Result<Vec<Update>, TgfeedError>;
}
