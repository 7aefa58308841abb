use std::time::Duration;

use async_trait::async_trait;

use crate::profile::{FailureKind, Profile};

/// Typed failure reported by a profile provider.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("profile does not exist")]
    NotFound,

    #[error("profile is private")]
    Private,

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Total classification into the failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::NotFound => FailureKind::NotFound,
            ProviderError::Private => FailureKind::Private,
            ProviderError::Status(429) => FailureKind::RateLimited,
            ProviderError::Status(500) => FailureKind::ServerError,
            ProviderError::Malformed(_) => FailureKind::MalformedResponse,
            ProviderError::Status(_) | ProviderError::Timeout(_) | ProviderError::Transport(_) => {
                FailureKind::Unreachable
            }
        }
    }
}

/// Source of profile data (the Instagram web endpoint in production).
///
/// Reads must be idempotent: the cache may call `fetch` concurrently for the
/// same username.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch(&self, username: &str) -> Result<Profile, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_total() {
        let cases = [
            (ProviderError::NotFound, FailureKind::NotFound),
            (ProviderError::Private, FailureKind::Private),
            (ProviderError::Status(429), FailureKind::RateLimited),
            (ProviderError::Status(500), FailureKind::ServerError),
            (ProviderError::Status(502), FailureKind::Unreachable),
            (ProviderError::Status(403), FailureKind::Unreachable),
            (
                ProviderError::Malformed("missing id".into()),
                FailureKind::MalformedResponse,
            ),
            (
                ProviderError::Timeout(Duration::from_secs(10)),
                FailureKind::Unreachable,
            ),
            (
                ProviderError::Transport("connection reset".into()),
                FailureKind::Unreachable,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }
}
