use std::{sync::Arc, time::Duration};

use crate::{
    domain::{ChatId, UserId},
    formatting::escape_markdown_v2,
    i18n::{Language, TranslationStore},
    messaging::{
        port::MessagingPort,
        types::{ChatAction, IncomingUpdate, InlineKeyboard, InlineQuery, InlineResult},
    },
    navigation::{action_for_label, profile_card, ButtonAction, Menu},
    profile::{
        is_valid_username, normalize_username, FailureKind, ProfileCache, ProfileResult,
    },
    session::{SessionState, SessionStore},
    Result,
};

/// A user action after channel decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Slash command name without the leading `/` or bot mention.
    Command(String),
    Button(ButtonAction),
    /// Free text, treated as a username lookup.
    Text(String),
}

/// Text part of a reply.
#[derive(Debug)]
enum Body {
    /// Static text by translation key.
    Key(&'static str),
    /// Already formatted MarkdownV2.
    Markdown(String),
}

/// What a turn sends back. Rendered once the session is final so the reply
/// and its keyboard use the language the turn ended in.
#[derive(Debug)]
enum Reply {
    Text(Body),
    Photo {
        url: String,
        caption: Option<String>,
        /// Sent instead when the photo is rejected.
        fallback: Body,
    },
}

impl Reply {
    fn key(key: &'static str) -> Self {
        Reply::Text(Body::Key(key))
    }
}

/// Menu state machine and lookup orchestration.
pub struct Navigator {
    translations: Arc<dyn TranslationStore>,
    cache: Arc<ProfileCache>,
    sessions: Arc<SessionStore>,
    inline_cache_time: Duration,
}

impl Navigator {
    pub fn new(
        translations: Arc<dyn TranslationStore>,
        cache: Arc<ProfileCache>,
        sessions: Arc<SessionStore>,
        inline_cache_time: Duration,
    ) -> Self {
        Self {
            translations,
            cache,
            sessions,
            inline_cache_time,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Route one incoming update. Errors are messenger failures; lookup
    /// failures are turned into user-facing replies.
    pub async fn dispatch(&self, update: IncomingUpdate, messenger: &dyn MessagingPort) -> Result<()> {
        match update {
            IncomingUpdate::Command(cmd) => {
                self.handle(cmd.chat_id, cmd.user_id, Input::Command(cmd.name), messenger)
                    .await
            }
            IncomingUpdate::Text(msg) => {
                let input = self.classify_text(&msg.text);
                self.handle(msg.chat_id, msg.user_id, input, messenger).await
            }
            IncomingUpdate::Callback(q) => {
                // Stops the client's loading spinner whatever happens next.
                if let Err(e) = messenger.answer_callback_query(&q.callback_id, None).await {
                    tracing::warn!(error = %e, "failed to answer callback query");
                }
                let (Some(chat_id), Some(action)) = (q.chat_id, ButtonAction::from_id(&q.data))
                else {
                    tracing::debug!(user = %q.user_id, data = %q.data, "ignoring callback");
                    return Ok(());
                };
                self.handle(chat_id, q.user_id, Input::Button(action), messenger)
                    .await
            }
            IncomingUpdate::InlineQuery(q) => self.answer_inline(q, messenger).await,
        }
    }

    /// Button labels typed as text count as presses, in any language.
    pub fn classify_text(&self, text: &str) -> Input {
        match action_for_label(text, self.translations.as_ref()) {
            Some(action) => Input::Button(action),
            None => Input::Text(text.to_string()),
        }
    }

    /// Run one turn for a user. The user's session stays locked until the
    /// reply is out, so their turns never interleave.
    pub async fn handle(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        input: Input,
        messenger: &dyn MessagingPort,
    ) -> Result<()> {
        let mut session = self.sessions.lock(user_id).await;
        tracing::debug!(user = %user_id, chat = %chat_id, ?input, menu = ?session.current_menu, "handling input");

        let reply = match input {
            Input::Command(name) => self.command(&mut session, &name),
            Input::Button(action) => self.press(&mut session, action),
            Input::Text(text) => {
                self.lookup(&mut session, chat_id, &text, messenger)
                    .await
            }
        };

        let keyboard = session
            .current_menu
            .keyboard(session.language, self.translations.as_ref());
        self.deliver(chat_id, session.language, reply, &keyboard, messenger)
            .await
    }

    fn command(&self, session: &mut SessionState, name: &str) -> Reply {
        match name.to_lowercase().as_str() {
            "start" => {
                let first = !session.started;
                session.started = true;
                enter(session, Menu::Main);
                Reply::key(if first { "welcome" } else { "start" })
            }
            "help" => self.press(session, ButtonAction::Help),
            "about" => self.press(session, ButtonAction::About),
            "language" => self.press(session, ButtonAction::Language),
            other => {
                tracing::debug!(command = other, "unknown command");
                Reply::key("unknown_command")
            }
        }
    }

    fn press(&self, session: &mut SessionState, action: ButtonAction) -> Reply {
        match action {
            ButtonAction::Help => {
                enter(session, Menu::Main);
                Reply::key("help")
            }
            ButtonAction::About => {
                enter(session, Menu::Main);
                Reply::key("about")
            }
            ButtonAction::Language => {
                if session.current_menu != Menu::Language {
                    session.return_menu = Some(session.current_menu);
                    session.current_menu = Menu::Language;
                }
                Reply::key("language_prompt")
            }
            ButtonAction::SelectLanguage(lang) => {
                session.language = lang;
                // A stale language button from an old message only switches
                // the language.
                if session.current_menu == Menu::Language {
                    session.current_menu = session.return_menu.take().unwrap_or_default();
                }
                Reply::key("language_set")
            }
            ButtonAction::More => {
                enter(session, Menu::Back);
                Reply::key("more_prompt")
            }
            ButtonAction::Back => {
                enter(session, Menu::Main);
                Reply::key("start")
            }
            ButtonAction::ProfilePhoto => match &session.last_profile_picture_url {
                Some(url) => Reply::Photo {
                    url: url.clone(),
                    caption: None,
                    fallback: Body::Key("error_connection"),
                },
                None => Reply::key("photo_prompt"),
            },
            ButtonAction::RecentPosts => Reply::key("feature_pending"),
        }
    }

    async fn lookup(
        &self,
        session: &mut SessionState,
        chat_id: ChatId,
        text: &str,
        messenger: &dyn MessagingPort,
    ) -> Reply {
        let username = normalize_username(text);
        if !is_valid_username(&username) {
            return Reply::key("invalid_username");
        }

        self.hint(chat_id, ChatAction::Typing, messenger).await;

        let result = match self.cache.lookup(&username).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(username = %username, error = %e, "lookup unavailable");
                return Reply::key(FailureKind::Unreachable.message_key());
            }
        };

        let profile = match result.as_ref() {
            ProfileResult::Profile(profile) => profile,
            ProfileResult::Failure(kind) => return Reply::key(kind.message_key()),
        };

        session.last_profile_picture_url = profile.profile_picture_url.clone();
        let card = profile_card(profile, session.language, self.translations.as_ref());

        let caps = messenger.capabilities();
        match &profile.profile_picture_url {
            Some(url) if caps.supports_photos && card.chars().count() <= caps.max_caption_len => {
                Reply::Photo {
                    url: url.clone(),
                    caption: Some(card.clone()),
                    fallback: Body::Markdown(card),
                }
            }
            _ => Reply::Text(Body::Markdown(card)),
        }
    }

    async fn deliver(
        &self,
        chat_id: ChatId,
        lang: Language,
        reply: Reply,
        keyboard: &InlineKeyboard,
        messenger: &dyn MessagingPort,
    ) -> Result<()> {
        let body = match reply {
            Reply::Text(body) => body,
            Reply::Photo {
                url,
                caption,
                fallback,
            } => {
                self.hint(chat_id, ChatAction::UploadPhoto, messenger).await;
                match messenger
                    .send_photo(chat_id, &url, caption.as_deref(), Some(keyboard))
                    .await
                {
                    Ok(()) => return Ok(()),
                    Err(e) => {
                        tracing::warn!(chat = %chat_id, error = %e, url = %url, "photo send failed, falling back to text");
                        fallback
                    }
                }
            }
        };

        let text = match body {
            Body::Key(key) => self.text(key, lang),
            Body::Markdown(text) => text,
        };
        messenger.send_text(chat_id, &text, Some(keyboard)).await
    }

    /// Answer an inline query with at most one profile result.
    pub async fn answer_inline(&self, q: InlineQuery, messenger: &dyn MessagingPort) -> Result<()> {
        let username = normalize_username(&q.query);
        let mut results = Vec::new();

        if is_valid_username(&username) {
            let lang = self.sessions.language_of(q.user_id).await;
            match self.cache.lookup(&username).await {
                Ok(result) => {
                    if let ProfileResult::Profile(profile) = result.as_ref() {
                        results.push(InlineResult {
                            id: profile.username.clone(),
                            title: format!("@{}", profile.username),
                            caption: profile_card(profile, lang, self.translations.as_ref()),
                            photo_url: profile.profile_picture_url.clone(),
                        });
                    }
                }
                Err(e) => {
                    tracing::debug!(username = %username, error = %e, "inline lookup unavailable");
                }
            }
        }

        messenger
            .answer_inline_query(&q.query_id, results, self.inline_cache_time)
            .await
    }

    /// Best-effort chat action.
    async fn hint(&self, chat_id: ChatId, action: ChatAction, messenger: &dyn MessagingPort) {
        if !messenger.capabilities().supports_chat_actions {
            return;
        }
        if let Err(e) = messenger.send_chat_action(chat_id, action).await {
            tracing::debug!(chat = %chat_id, error = %e, ?action, "chat action failed");
        }
    }

    fn text(&self, key: &str, lang: Language) -> String {
        escape_markdown_v2(&self.translations.render(key, lang, &[]))
    }
}

/// Move to a menu other than the language picker.
fn enter(session: &mut SessionState, menu: Menu) {
    session.current_menu = menu;
    session.return_menu = None;
}
