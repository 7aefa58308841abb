use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::OnceLock,
};

use regex::{Captures, Regex};

use crate::{errors::Error, i18n::Language, Result};

const EMBEDDED: [(Language, &str); 2] = [
    (Language::Fa, include_str!("../../locales/fa.json")),
    (Language::En, include_str!("../../locales/en.json")),
];

/// Key → localized string lookup.
///
/// Implementations must never fail: a missing language or key falls back to the
/// default language, and finally to the key itself.
pub trait TranslationStore: Send + Sync {
    /// Render `key` in `lang`, substituting `{name}` placeholders from `params`.
    fn render(&self, key: &str, lang: Language, params: &[(&str, &str)]) -> String;
}

type Table = HashMap<String, String>;

/// Translation tables keyed by language code.
///
/// The `fa`/`en` tables are compiled in; a translations directory can override
/// or extend them with `<code>.json` files (flat `{"key": "text"}` objects).
#[derive(Clone, Debug)]
pub struct Translations {
    tables: HashMap<String, Table>,
    default: Language,
}

impl Translations {
    /// The compiled-in tables only.
    pub fn embedded() -> Result<Self> {
        let mut tables = HashMap::new();
        for (lang, raw) in EMBEDDED {
            let table: Table = serde_json::from_str(raw)?;
            tables.insert(lang.code().to_string(), table);
        }
        Ok(Self {
            tables,
            default: Language::default(),
        })
    }

    /// Compiled-in tables, overlaid with `*.json` files from `dir` when given.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut out = Self::embedded()?;
        let Some(dir) = dir else {
            return Ok(out);
        };

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let raw = fs::read_to_string(&path)?;
            let table: Table = serde_json::from_str(&raw).map_err(|e| {
                Error::Config(format!("invalid translation file {}: {e}", path.display()))
            })?;
            tracing::debug!(file = %path.display(), keys = table.len(), "loaded translations");
            out.tables
                .entry(code.to_lowercase())
                .or_default()
                .extend(table);
        }

        Ok(out)
    }

    fn lookup(&self, key: &str, lang: Language) -> Option<&str> {
        self.tables
            .get(lang.code())
            .and_then(|t| t.get(key))
            .or_else(|| {
                self.tables
                    .get(self.default.code())
                    .and_then(|t| t.get(key))
            })
            .map(String::as_str)
    }
}

impl TranslationStore for Translations {
    fn render(&self, key: &str, lang: Language, params: &[(&str, &str)]) -> String {
        let Some(template) = self.lookup(key, lang) else {
            tracing::warn!(key, lang = lang.code(), "missing translation");
            return key.to_string();
        };
        fill_placeholders(template, params)
    }
}

/// Replace `{name}` placeholders in a single pass; unknown names are left as-is.
fn fill_placeholders(template: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return template.to_string();
    }
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_][a-z0-9_]*)\}").expect("valid regex"));

    re.replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
