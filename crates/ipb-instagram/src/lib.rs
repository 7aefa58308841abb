//! Instagram adapter: public profile lookups via the web profile endpoint.
//!
//! No login is performed. Private accounts still return their public header
//! (counts, bio, picture), so this adapter never reports `Private` itself.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use ipb_core::{
    config::Config,
    errors::Error,
    profile::{Profile, ProfileProvider, ProviderError},
    Result,
};

const PROFILE_PATH: &str = "/api/v1/users/web_profile_info/";

#[derive(Clone, Debug)]
pub struct InstagramClient {
    base_url: String,
    app_id: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl InstagramClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.provider_timeout)
            .user_agent(cfg.instagram_user_agent.clone())
            .build()
            .map_err(|e| Error::External(format!("instagram http client error: {e}")))?;
        Ok(Self {
            base_url: cfg.instagram_base_url.trim_end_matches('/').to_string(),
            app_id: cfg.instagram_app_id.clone(),
            timeout: cfg.provider_timeout,
            http,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ProfileProvider for InstagramClient {
    async fn fetch(&self, username: &str) -> std::result::Result<Profile, ProviderError> {
        let url = format!("{}{PROFILE_PATH}", self.base_url);
        tracing::debug!(username, "fetching instagram profile");

        let resp = self
            .http
            .get(&url)
            .query(&[("username", username)])
            .header("x-ig-app-id", &self.app_id)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        let envelope: Envelope = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::Malformed(format!("invalid json: {e}")))?;

        let user = envelope
            .data
            .ok_or_else(|| ProviderError::Malformed("missing data".to_string()))?
            .user
            .ok_or(ProviderError::NotFound)?;
        user.into_profile()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Data>,
}

#[derive(Debug, Deserialize)]
struct Data {
    user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct EdgeCount {
    count: u64,
}

/// `data.user` as served by the endpoint. Counts come only from the
/// GraphQL-style edges.
#[derive(Debug, Deserialize)]
struct RawUser {
    id: Option<serde_json::Value>,
    username: Option<String>,
    full_name: Option<String>,
    biography: Option<String>,
    #[serde(default)]
    is_private: bool,
    edge_followed_by: Option<EdgeCount>,
    edge_follow: Option<EdgeCount>,
    edge_owner_to_timeline_media: Option<EdgeCount>,
    profile_pic_url_hd: Option<String>,
    profile_pic_url: Option<String>,
}

impl RawUser {
    fn into_profile(self) -> std::result::Result<Profile, ProviderError> {
        let missing = |field: &str| ProviderError::Malformed(format!("missing data.user.{field}"));
        let count = |edge: Option<EdgeCount>, field: &str| {
            edge.map(|e| e.count).ok_or_else(|| missing(field))
        };

        let id = match self.id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return Err(missing("id")),
        };
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| missing("username"))?;

        Ok(Profile {
            id,
            username,
            full_name: self.full_name.unwrap_or_default(),
            biography: self.biography.unwrap_or_default(),
            follower_count: count(self.edge_followed_by, "edge_followed_by")?,
            following_count: count(self.edge_follow, "edge_follow")?,
            is_private: self.is_private,
            media_count: count(
                self.edge_owner_to_timeline_media,
                "edge_owner_to_timeline_media",
            )?,
            profile_picture_url: self
                .profile_pic_url_hd
                .or(self.profile_pic_url)
                .filter(|u| !u.is_empty()),
        })
    }
}
