use std::sync::OnceLock;

use regex::Regex;

/// Public fields of an Instagram account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub biography: String,
    pub follower_count: u64,
    pub following_count: u64,
    pub is_private: bool,
    pub media_count: u64,
    pub profile_picture_url: Option<String>,
}

/// Why a lookup did not produce a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotFound,
    Private,
    RateLimited,
    ServerError,
    Unreachable,
    MalformedResponse,
}

impl FailureKind {
    /// Whether a failure of this kind may be remembered by the cache.
    ///
    /// Transient and malformed outcomes are retried on the next lookup.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, FailureKind::Unreachable | FailureKind::MalformedResponse)
    }

    /// Translation key of the user-facing message for this failure.
    pub fn message_key(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "error_not_found",
            FailureKind::Private => "error_private",
            FailureKind::RateLimited => "error_429",
            FailureKind::ServerError => "error_500",
            FailureKind::Unreachable => "error_connection",
            FailureKind::MalformedResponse => "error_data",
        }
    }
}

/// Outcome of a lookup as stored in the cache. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileResult {
    Profile(Profile),
    Failure(FailureKind),
}

/// Cache key for a user-typed username: trimmed, leading `@`s removed, lower-cased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_lowercase()
}

/// Instagram usernames: 1-30 of ASCII letters, digits, `.` and `_`.
pub fn is_valid_username(normalized: &str) -> bool {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    USERNAME
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("valid regex"))
        .is_match(normalized)
}
