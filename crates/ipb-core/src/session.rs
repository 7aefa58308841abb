use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{domain::UserId, i18n::Language, navigation::Menu};

/// Per-user conversation state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub language: Language,
    pub current_menu: Menu,
    /// Menu to restore after a language is picked. Only meaningful while
    /// `current_menu == Menu::Language`.
    pub return_menu: Option<Menu>,
    pub last_profile_picture_url: Option<String>,
    /// Set by the first `/start`; later starts skip the welcome text.
    pub started: bool,
}

/// In-memory sessions keyed by user id.
///
/// Each user gets their own lock: a handler holds it for a whole turn, so one
/// user's actions are serialized while different users never contend.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<UserId, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a user's session, creating it on first contact.
    pub async fn lock(&self, user_id: UserId) -> OwnedMutexGuard<SessionState> {
        let session = {
            let mut map = self.inner.lock().await;
            map.entry(user_id).or_default().clone()
        };
        session.lock_owned().await
    }

    /// Copy of a user's session, if one exists.
    pub async fn snapshot(&self, user_id: UserId) -> Option<SessionState> {
        let session = self.inner.lock().await.get(&user_id).cloned()?;
        let state = session.lock().await.clone();
        Some(state)
    }

    /// Language for a user without creating a session.
    ///
    /// Never waits on the user's own lock: while a turn holds it, the
    /// default language is returned.
    pub async fn language_of(&self, user_id: UserId) -> Language {
        let Some(session) = self.inner.lock().await.get(&user_id).cloned() else {
            return Language::default();
        };
        session
            .try_lock()
            .map(|state| state.language)
            .unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
