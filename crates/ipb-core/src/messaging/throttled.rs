use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::{
    domain::ChatId,
    messaging::{
        port::MessagingPort,
        types::{
            ChatAction, InlineKeyboard, InlineResult, MessagingCapabilities,
        },
    },
    Result,
};

#[derive(Clone, Copy, Debug)]
pub struct ThrottleConfig {
    /// Minimum spacing between *any* Telegram API calls (global flood control).
    pub global_min_interval: Duration,
    /// Minimum spacing between calls to the same chat.
    pub per_chat_min_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            global_min_interval: Duration::from_millis(40), // ~25/sec
            per_chat_min_interval: Duration::from_millis(350),
        }
    }
}

/// Next free slot per scope. A slot is reserved up front, so concurrent callers
/// queue behind each other instead of all waking at once.
#[derive(Debug)]
struct Slots {
    cfg: ThrottleConfig,
    global_next: Option<Instant>,
    chat_next: HashMap<ChatId, Instant>,
}

impl Slots {
    fn new(cfg: ThrottleConfig) -> Self {
        Self {
            cfg,
            global_next: None,
            chat_next: HashMap::new(),
        }
    }

    /// Reserve a slot at or after `now` and return how long the caller must wait.
    fn reserve_at(&mut self, chat: Option<ChatId>, now: Instant) -> Duration {
        let mut start = self.global_next.map_or(now, |next| next.max(now));
        if let Some(chat) = chat {
            if let Some(next) = self.chat_next.get(&chat) {
                start = start.max(*next);
            }
            self.chat_next
                .insert(chat, start + self.cfg.per_chat_min_interval);
        }
        self.global_next = Some(start + self.cfg.global_min_interval);

        // Chats idle for longer than their interval need no bookkeeping.
        if self.chat_next.len() > 1024 {
            self.chat_next.retain(|_, next| *next > now);
        }

        start.saturating_duration_since(now)
    }
}

/// MessagingPort decorator that rate-limits outbound calls.
///
/// Keeps bursts (a lookup reply plus its chat actions, or many users at once) under
/// Telegram's flood limits. It does not guarantee zero 429s.
pub struct ThrottledMessenger {
    inner: Arc<dyn MessagingPort>,
    slots: Mutex<Slots>,
}

impl ThrottledMessenger {
    pub fn new(inner: Arc<dyn MessagingPort>, cfg: ThrottleConfig) -> Self {
        Self {
            inner,
            slots: Mutex::new(Slots::new(cfg)),
        }
    }

    async fn throttle(&self, chat: Option<ChatId>) {
        let wait = self.slots.lock().await.reserve_at(chat, Instant::now());
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }
}

#[async_trait::async_trait]
impl MessagingPort for ThrottledMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        self.inner.capabilities()
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        self.throttle(Some(chat_id)).await;
        self.inner.send_text(chat_id, text, keyboard).await
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        self.throttle(Some(chat_id)).await;
        self.inner
            .send_photo(chat_id, photo_url, caption, keyboard)
            .await
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        self.throttle(Some(chat_id)).await;
        self.inner.send_chat_action(chat_id, action).await
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        // No chat_id available here; apply global throttling only.
        self.throttle(None).await;
        self.inner.answer_callback_query(callback_id, text).await
    }

    async fn answer_inline_query(
        &self,
        query_id: &str,
        results: Vec<InlineResult>,
        cache_time: Duration,
    ) -> Result<()> {
        self.throttle(None).await;
        self.inner
            .answer_inline_query(query_id, results, cache_time)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ThrottleConfig {
        ThrottleConfig {
            global_min_interval: Duration::from_millis(10),
            per_chat_min_interval: Duration::from_millis(100),
        }
    }

    #[test]
    fn same_chat_waits_for_per_chat_interval() {
        let now = Instant::now();
        let mut slots = Slots::new(cfg());
        let chat = ChatId(1);

        assert_eq!(slots.reserve_at(Some(chat), now), Duration::ZERO);
        assert_eq!(slots.reserve_at(Some(chat), now), Duration::from_millis(100));
        assert_eq!(slots.reserve_at(Some(chat), now), Duration::from_millis(200));
    }

    #[test]
    fn other_chats_only_wait_for_global_interval() {
        let now = Instant::now();
        let mut slots = Slots::new(cfg());

        assert_eq!(slots.reserve_at(Some(ChatId(1)), now), Duration::ZERO);
        assert_eq!(slots.reserve_at(Some(ChatId(2)), now), Duration::from_millis(10));
        assert_eq!(slots.reserve_at(None, now), Duration::from_millis(20));
    }

    #[test]
    fn idle_time_resets_the_wait() {
        let now = Instant::now();
        let mut slots = Slots::new(cfg());
        let chat = ChatId(7);

        slots.reserve_at(Some(chat), now);
        let later = now + Duration::from_secs(1);
        assert_eq!(slots.reserve_at(Some(chat), later), Duration::ZERO);
    }
}
