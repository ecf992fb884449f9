//! # tgfeed-core
//!
//! Core types for the tgfeed update pipeline: the per-bot offset tracking
//! strategy, lean wire types, configuration, and error handling.

pub mod config;
pub mod error;
pub mod offset;
pub mod traits;
pub mod update;
