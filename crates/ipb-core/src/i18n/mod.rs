//! Internationalization: supported languages and the translation store.
//!
//! - `language`: the closed set of languages a user can pick
//! - `store`: key → localized string lookup with default-language fallback

mod language;
mod store;

pub use language::Language;
pub use store::{TranslationStore, Translations};
