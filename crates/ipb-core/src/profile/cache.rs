use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::profile::{
    normalize_username, FailureKind, ProfileProvider, ProfileResult, ProviderError,
};

/// How long a lookup result stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Past this many entries, inserting sweeps out everything stale.
const PRUNE_THRESHOLD: usize = 1024;

/// The provider could not be reached (network, timeout, unexpected status).
///
/// Never cached: the next lookup for the same username calls the provider again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("profile provider unavailable: {reason}")]
pub struct ProviderUnavailable {
    pub reason: String,
}

#[derive(Debug)]
struct CacheEntry {
    value: Arc<ProfileResult>,
    inserted_at: Instant,
}

/// Time-bounded memoization in front of a [`ProfileProvider`].
///
/// Expiry is passive: a stale entry is dropped when it is next read, or by the
/// sweep an insert runs once the map has grown large. There is no
/// single-flight; concurrent misses for one username may each hit the
/// provider.
pub struct ProfileCache {
    provider: Arc<dyn ProfileProvider>,
    ttl: Duration,
    timeout: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ProfileCache {
    pub fn new(provider: Arc<dyn ProfileProvider>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            provider,
            ttl,
            timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn lookup(&self, username: &str) -> Result<Arc<ProfileResult>, ProviderUnavailable> {
        self.lookup_at(username, Instant::now()).await
    }

    /// Lookup with an explicit clock reading. Entry age is measured from `now`.
    pub async fn lookup_at(
        &self,
        username: &str,
        now: Instant,
    ) -> Result<Arc<ProfileResult>, ProviderUnavailable> {
        let key = normalize_username(username);

        if let Some(hit) = self.fresh(&key, now).await {
            tracing::debug!(username = %key, "profile cache hit");
            return Ok(hit);
        }
        tracing::debug!(username = %key, "profile cache miss, fetching");

        // The lock is not held here; slow fetches never block other lookups.
        let fetched = match tokio::time::timeout(self.timeout, self.provider.fetch(&key)).await {
            Ok(res) => res,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        let result = match fetched {
            Ok(profile) => ProfileResult::Profile(profile),
            Err(err) => {
                let kind = err.kind();
                if kind == FailureKind::Unreachable {
                    tracing::error!(username = %key, error = %err, "profile provider unavailable");
                    return Err(ProviderUnavailable {
                        reason: err.to_string(),
                    });
                }
                tracing::warn!(username = %key, error = %err, ?kind, "profile lookup failed");
                ProfileResult::Failure(kind)
            }
        };

        let value = Arc::new(result);
        let cacheable = match value.as_ref() {
            ProfileResult::Profile(_) => true,
            ProfileResult::Failure(kind) => kind.is_cacheable(),
        };
        if cacheable {
            let mut entries = self.entries.lock().await;
            if entries.len() >= PRUNE_THRESHOLD {
                let ttl = self.ttl;
                entries.retain(|_, e| now.saturating_duration_since(e.inserted_at) < ttl);
            }
            entries.insert(
                key,
                CacheEntry {
                    value: Arc::clone(&value),
                    inserted_at: now,
                },
            );
        }
        Ok(value)
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored entries, stale ones included until they are swept.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn fresh(&self, key: &str, now: Instant) -> Option<Arc<ProfileResult>> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.inserted_at) < self.ttl {
            return Some(Arc::clone(&entry.value));
        }
        entries.remove(key);
        None
    }
}
