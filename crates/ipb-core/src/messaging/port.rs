use std::time::Duration;

use async_trait::async_trait;

use crate::{
    domain::ChatId,
    messaging::types::{ChatAction, InlineKeyboard, InlineResult, MessagingCapabilities},
    Result,
};

/// Cross-messenger port.
///
/// Telegram is the only implementation; the navigator talks to it exclusively
/// through this trait so tests can record what would have been sent.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    /// Send MarkdownV2 text.
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()>;

    /// Send a photo by URL. Captions are always MarkdownV2.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;

    async fn answer_inline_query(
        &self,
        query_id: &str,
        results: Vec<InlineResult>,
        cache_time: Duration,
    ) -> Result<()>;
}
