use crate::{
    i18n::{Language, TranslationStore},
    messaging::types::{InlineButton, InlineKeyboard},
};

/// Which set of buttons a user is looking at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Menu {
    #[default]
    Main,
    /// Secondary menu with profile extras and a way back to `Main`.
    Back,
    Language,
}

/// A button press, identified independently of the label's language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Help,
    About,
    Language,
    More,
    Back,
    ProfilePhoto,
    RecentPosts,
    SelectLanguage(Language),
}

impl ButtonAction {
    pub const ALL: [ButtonAction; 9] = [
        ButtonAction::Help,
        ButtonAction::About,
        ButtonAction::Language,
        ButtonAction::More,
        ButtonAction::Back,
        ButtonAction::ProfilePhoto,
        ButtonAction::RecentPosts,
        ButtonAction::SelectLanguage(Language::Fa),
        ButtonAction::SelectLanguage(Language::En),
    ];

    /// Stable id sent as callback data.
    pub fn id(&self) -> &'static str {
        match self {
            ButtonAction::Help => "HELP",
            ButtonAction::About => "ABOUT",
            ButtonAction::Language => "LANGUAGE",
            ButtonAction::More => "MORE",
            ButtonAction::Back => "BACK",
            ButtonAction::ProfilePhoto => "PROFILE_PHOTO",
            ButtonAction::RecentPosts => "RECENT_POSTS",
            ButtonAction::SelectLanguage(Language::Fa) => "LANG_FA",
            ButtonAction::SelectLanguage(Language::En) => "LANG_EN",
        }
    }

    pub fn from_id(id: &str) -> Option<ButtonAction> {
        Self::ALL.into_iter().find(|a| a.id() == id.trim())
    }

    /// Translation key of the button label.
    pub fn label_key(&self) -> &'static str {
        match self {
            ButtonAction::Help => "btn_help",
            ButtonAction::About => "btn_about",
            ButtonAction::Language => "btn_language",
            ButtonAction::More => "btn_more",
            ButtonAction::Back => "btn_back",
            ButtonAction::ProfilePhoto => "btn_profile_photo",
            ButtonAction::RecentPosts => "btn_recent_posts",
            ButtonAction::SelectLanguage(Language::Fa) => "btn_lang_fa",
            ButtonAction::SelectLanguage(Language::En) => "btn_lang_en",
        }
    }
}

const MAIN: &[&[ButtonAction]] = &[
    &[ButtonAction::Help, ButtonAction::About],
    &[ButtonAction::Language, ButtonAction::More],
];

const BACK: &[&[ButtonAction]] = &[
    &[ButtonAction::ProfilePhoto, ButtonAction::RecentPosts],
    &[ButtonAction::Language],
    &[ButtonAction::Back],
];

const LANGUAGE: &[&[ButtonAction]] = &[&[
    ButtonAction::SelectLanguage(Language::Fa),
    ButtonAction::SelectLanguage(Language::En),
]];

impl Menu {
    /// Button rows of this menu.
    pub fn layout(&self) -> &'static [&'static [ButtonAction]] {
        match self {
            Menu::Main => MAIN,
            Menu::Back => BACK,
            Menu::Language => LANGUAGE,
        }
    }

    /// Render the menu's keyboard; a pure function of (menu, language).
    pub fn keyboard(&self, lang: Language, store: &dyn TranslationStore) -> InlineKeyboard {
        let rows = self
            .layout()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|action| InlineButton {
                        label: store.render(action.label_key(), lang, &[]),
                        callback_data: action.id().to_string(),
                    })
                    .collect()
            })
            .collect();
        InlineKeyboard::new(rows)
    }
}

/// Recognize a typed button label in any supported language.
///
/// Clients that echo the label text instead of the callback id (reply
/// keyboards, users typing the label) still reach the right action.
/// Matching is exact, so "English" is a button but "english" stays a username.
pub fn action_for_label(text: &str, store: &dyn TranslationStore) -> Option<ButtonAction> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    ButtonAction::ALL.into_iter().find(|action| {
        Language::ALL
            .iter()
            .any(|lang| store.render(action.label_key(), *lang, &[]) == text)
    })
}
