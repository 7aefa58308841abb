//! Profile lookups: domain types, the provider port and the TTL cache in front of it.

mod cache;
mod provider;
mod types;

pub use cache::{ProfileCache, ProviderUnavailable, DEFAULT_TTL};
pub use provider::{ProfileProvider, ProviderError};
pub use types::{is_valid_username, normalize_username, FailureKind, Profile, ProfileResult};
