//! Core domain + application logic for the Instagram profile lookup bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Instagram
//! profile endpoint live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod i18n;
pub mod logging;
pub mod messaging;
pub mod navigation;
pub mod profile;
pub mod session;

pub use errors::{Error, Result};

#[cfg(test)]
mod testing;
