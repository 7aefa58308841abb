//! Telegram adapter (teloxide).
//!
//! Implements the `ipb-core` MessagingPort over the Telegram Bot API and turns
//! teloxide updates into `IncomingUpdate`s for the navigator.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{
        InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
        InlineQueryResultPhoto, InputFile, InputMessageContent, InputMessageContentText, ParseMode,
    },
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use ipb_core::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, InlineKeyboard, InlineResult, MessagingCapabilities},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(teloxide::RequestError::RetryAfter(d)) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    tracing::warn!(retry_after = ?d, "telegram flood control, retrying");
                    sleep(d).await;
                }
                Err(other) => return Err(Self::map_err(other)),
            }
        }
    }
}

fn parse_url(raw: &str) -> Result<url::Url> {
    url::Url::parse(raw).map_err(|e| Error::External(format!("invalid url {raw:?}: {e}")))
}

fn markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone()))
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// Map one inline result to Telegram's representation: a photo when a picture
/// is known, otherwise an article whose message is the card text.
fn inline_result(r: InlineResult) -> Result<InlineQueryResult> {
    if let Some(photo) = r.photo_url.as_deref() {
        let photo = parse_url(photo)?;
        return Ok(InlineQueryResult::Photo(
            InlineQueryResultPhoto::new(r.id, photo.clone(), photo)
                .title(r.title)
                .caption(r.caption)
                .parse_mode(ParseMode::MarkdownV2),
        ));
    }
    let content = InputMessageContent::Text(
        InputMessageContentText::new(r.caption).parse_mode(ParseMode::MarkdownV2),
    );
    Ok(InlineQueryResult::Article(InlineQueryResultArticle::new(
        r.id, r.title, content,
    )))
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
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
        let markup = keyboard.map(markup);
        self.with_retry(|| {
            let mut req = self
                .bot
                .send_message(Self::tg_chat(chat_id), text.to_string())
                .parse_mode(ParseMode::MarkdownV2);
            if let Some(m) = &markup {
                req = req.reply_markup(m.clone());
            }
            req
        })
        .await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        let url = parse_url(photo_url)?;
        let markup = keyboard.map(markup);
        self.with_retry(|| {
            let mut req = self
                .bot
                .send_photo(Self::tg_chat(chat_id), InputFile::url(url.clone()));
            if let Some(c) = caption {
                req = req.caption(c.to_string()).parse_mode(ParseMode::MarkdownV2);
            }
            if let Some(m) = &markup {
                req = req.reply_markup(m.clone());
            }
            req
        })
        .await?;
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        let tg_action = match action {
            ChatAction::Typing => teloxide::types::ChatAction::Typing,
            ChatAction::UploadPhoto => teloxide::types::ChatAction::UploadPhoto,
        };
        self.with_retry(|| self.bot.send_chat_action(Self::tg_chat(chat_id), tg_action))
            .await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.with_retry(|| {
            let mut req = self.bot.answer_callback_query(callback_id.to_string());
            if let Some(t) = text {
                req = req.text(t.to_string());
            }
            req
        })
        .await?;
        Ok(())
    }

    async fn answer_inline_query(
        &self,
        query_id: &str,
        results: Vec<InlineResult>,
        cache_time: Duration,
    ) -> Result<()> {
        let results = results
            .into_iter()
            .map(inline_result)
            .collect::<Result<Vec<_>>>()?;
        let cache_secs = u32::try_from(cache_time.as_secs()).unwrap_or(u32::MAX);

        self.with_retry(|| {
            self.bot
                .answer_inline_query(query_id.to_string(), results.clone())
                .cache_time(cache_secs)
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipb_core::messaging::types::InlineButton;

    #[test]
    fn keyboard_rows_are_preserved() {
        let kb = InlineKeyboard::new(vec![
            vec![
                InlineButton {
                    label: "Help".into(),
                    callback_data: "HELP".into(),
                },
                InlineButton {
                    label: "About".into(),
                    callback_data: "ABOUT".into(),
                },
            ],
            vec![InlineButton {
                label: "Back".into(),
                callback_data: "BACK".into(),
            }],
        ]);
        let m = markup(&kb);
        assert_eq!(m.inline_keyboard.len(), 2);
        assert_eq!(m.inline_keyboard[0].len(), 2);
        assert_eq!(m.inline_keyboard[1][0].text, "Back");
    }

    #[test]
    fn inline_results_pick_photo_or_article() {
        let with_photo = inline_result(InlineResult {
            id: "alice".into(),
            title: "@alice".into(),
            caption: "card".into(),
            photo_url: Some("https://x/pic.jpg".into()),
        })
        .unwrap();
        assert!(matches!(with_photo, InlineQueryResult::Photo(_)));

        let without = inline_result(InlineResult {
            id: "bob".into(),
            title: "@bob".into(),
            caption: "card".into(),
            photo_url: None,
        })
        .unwrap();
        assert!(matches!(without, InlineQueryResult::Article(_)));

        let bad = inline_result(InlineResult {
            id: "eve".into(),
            title: "@eve".into(),
            caption: "card".into(),
            photo_url: Some("not a url".into()),
        });
        assert!(bad.is_err());
    }

    #[test]
    fn capabilities_match_bot_api_limits() {
        let messenger = TelegramMessenger::new(Bot::new("123:abc"));
        assert_eq!(
            messenger.capabilities(),
            MessagingCapabilities {
                supports_chat_actions: true,
                supports_photos: true,
                max_caption_len: 1024,
            }
        );
    }
}
