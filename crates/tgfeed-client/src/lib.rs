//! # tgfeed-client
//!
//! Bot API HTTP client and the long-polling updates provider.
//! Docs for the wire protocol: <https://core.telegram.org/bots/api>

pub mod api;
pub mod media;
pub mod provider;
pub mod util;

#[cfg(test)]
mod tests;
