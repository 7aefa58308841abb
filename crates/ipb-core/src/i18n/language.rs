/// A language a user can select for the bot's replies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    /// Persian (the default for new users).
    #[default]
    Fa,
    En,
}

impl Language {
    /// All supported languages, default first.
    pub const ALL: [Language; 2] = [Language::Fa, Language::En];

    /// ISO 639-1 code, also the file stem of the translation table.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fa => "fa",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }
}
