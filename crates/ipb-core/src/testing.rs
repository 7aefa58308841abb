//! Hand-written fakes for the ports, shared by the unit tests of this crate.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;

use crate::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, InlineKeyboard, InlineResult, MessagingCapabilities},
    },
    profile::{Profile, ProfileProvider, ProviderError},
    Result,
};

pub(crate) fn sample_profile(username: &str) -> Profile {
    Profile {
        id: "1".to_string(),
        username: username.to_string(),
        full_name: "Alice".to_string(),
        biography: String::new(),
        follower_count: 10,
        following_count: 5,
        is_private: false,
        media_count: 3,
        profile_picture_url: Some("https://x/pic.jpg".to_string()),
    }
}

type Responder = Box<dyn Fn(&str) -> std::result::Result<Profile, ProviderError> + Send + Sync>;

pub(crate) struct FakeProvider {
    respond: Responder,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn with(respond: Responder) -> Self {
        Self {
            respond,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Known profiles by username; anything else is `NotFound`.
    pub(crate) fn profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let known: HashMap<String, Profile> = profiles
            .into_iter()
            .map(|p| (p.username.clone(), p))
            .collect();
        Self::with(Box::new(move |username: &str| {
            known.get(username).cloned().ok_or(ProviderError::NotFound)
        }))
    }

    pub(crate) fn failing(err: ProviderError) -> Self {
        Self::with(Box::new(move |_: &str| Err(err.clone())))
    }

    pub(crate) fn slow(delay: Duration) -> Self {
        let mut provider = Self::profiles(std::iter::empty::<Profile>());
        provider.delay = Some(delay);
        provider
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileProvider for FakeProvider {
    async fn fetch(&self, username: &str) -> std::result::Result<Profile, ProviderError> {
        self.calls.lock().unwrap().push(username.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.respond)(username)
    }
}

/// Everything the navigator asked the messenger to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Photo {
        chat_id: ChatId,
        url: String,
        caption: Option<String>,
        keyboard: Option<InlineKeyboard>,
    },
    Action {
        chat_id: ChatId,
        action: ChatAction,
    },
    CallbackAnswer {
        callback_id: String,
    },
    Inline {
        query_id: String,
        results: Vec<InlineResult>,
        cache_time: Duration,
    },
}

#[derive(Default)]
pub(crate) struct FakeMessenger {
    sent: Mutex<Vec<Sent>>,
    fail_photos: bool,
}

impl FakeMessenger {
    pub(crate) fn rejecting_photos() -> Self {
        Self {
            fail_photos: true,
            ..Self::default()
        }
    }

    /// Drain what was sent so far.
    pub(crate) fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_chat_actions: true,
            supports_photos: true,
            max_caption_len: 1024,
        }
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        self.record(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        if self.fail_photos {
            return Err(Error::External(
                "telegram error: wrong file identifier/HTTP URL specified".to_string(),
            ));
        }
        self.record(Sent::Photo {
            chat_id,
            url: photo_url.to_string(),
            caption: caption.map(str::to_string),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        self.record(Sent::Action { chat_id, action });
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, _text: Option<&str>) -> Result<()> {
        self.record(Sent::CallbackAnswer {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }

    async fn answer_inline_query(
        &self,
        query_id: &str,
        results: Vec<InlineResult>,
        cache_time: Duration,
    ) -> Result<()> {
        self.record(Sent::Inline {
            query_id: query_id.to_string(),
            results,
            cache_time,
        });
        Ok(())
    }
}
