//! Telegram update handlers.
//!
//! Each handler only decodes the teloxide update into an `IncomingUpdate`;
//! all behavior lives in the navigator.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, InlineQuery, Message},
};

use ipb_core::{
    domain::{ChatId, UserId},
    messaging::types::{self, IncomingUpdate},
};

use crate::router::AppState;

/// Lower-cased command name of `/cmd@botname arg1 ...`. Arguments are ignored.
pub(crate) fn parse_command(text: &str) -> String {
    let first = text.split_whitespace().next().unwrap_or("");
    first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

fn user_id(user: &teloxide::types::User) -> UserId {
    UserId(user.id.0 as i64)
}

/// Decode a text message. Non-text messages have nothing to act on.
pub(crate) fn decode_message(msg: &Message) -> Option<IncomingUpdate> {
    let user = msg.from()?;
    let text = msg.text()?;
    let chat_id = ChatId(msg.chat.id.0);

    if text.starts_with('/') {
        return Some(IncomingUpdate::Command(types::Command {
            chat_id,
            user_id: user_id(user),
            name: parse_command(text),
        }));
    }

    Some(IncomingUpdate::Text(types::TextMessage {
        chat_id,
        user_id: user_id(user),
        text: text.to_string(),
    }))
}

async fn dispatch(update: IncomingUpdate, state: &AppState) {
    if let Err(e) = state
        .navigator
        .dispatch(update, state.messenger.as_ref())
        .await
    {
        tracing::error!(error = %e, "failed to handle update");
    }
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    match decode_message(&msg) {
        Some(update) => dispatch(update, &state).await,
        None => tracing::debug!(chat_id = msg.chat.id.0, "ignoring non-text message"),
    }
    Ok(())
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let update = IncomingUpdate::Callback(types::CallbackQuery {
        chat_id: q.message.as_ref().map(|m| ChatId(m.chat.id.0)),
        user_id: user_id(&q.from),
        callback_id: q.id.clone(),
        data: q.data.clone().unwrap_or_default(),
    });
    dispatch(update, &state).await;
    Ok(())
}

pub async fn handle_inline_query(q: InlineQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let update = IncomingUpdate::InlineQuery(types::InlineQuery {
        user_id: user_id(&q.from),
        query_id: q.id.clone(),
        query: q.query.clone(),
    });
    dispatch(update, &state).await;
    Ok(())
}
