use crate::{
    formatting::escape_markdown_v2,
    i18n::{Language, TranslationStore},
    profile::Profile,
};

const EMPTY_FIELD: &str = "—";

/// Render a profile as a MarkdownV2 card in `lang`.
///
/// The `profile` template carries the markup; every substituted value is
/// escaped so usernames and bios cannot break the formatting.
pub fn profile_card(profile: &Profile, lang: Language, store: &dyn TranslationStore) -> String {
    let field = |value: &str| {
        let value = value.trim();
        escape_markdown_v2(if value.is_empty() { EMPTY_FIELD } else { value })
    };
    let private = store.render(if profile.is_private { "yes" } else { "no" }, lang, &[]);

    let username = field(&profile.username);
    let id = field(&profile.id);
    let full_name = field(&profile.full_name);
    let bio = field(&profile.biography);
    let followers = profile.follower_count.to_string();
    let following = profile.following_count.to_string();
    let media_count = profile.media_count.to_string();
    let is_private = escape_markdown_v2(&private);

    store.render(
        "profile",
        lang,
        &[
            ("username", &username),
            ("id", &id),
            ("full_name", &full_name),
            ("bio", &bio),
            ("followers", &followers),
            ("following", &following),
            ("media_count", &media_count),
            ("is_private", &is_private),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{i18n::Translations, testing::sample_profile};

    #[test]
    fn card_lists_every_field_in_the_requested_language() {
        let t = Translations::embedded().unwrap();
        let card = profile_card(&sample_profile("alice"), Language::En, &t);

        assert!(card.starts_with("👤 *alice*"));
        for expected in [
            "*ID:* 1",
            "*Name:* Alice",
            "*Bio:* —",
            "*Followers:* 10",
            "*Following:* 5",
            "*Posts:* 3",
            "*Private:* No",
        ] {
            assert!(card.contains(expected), "missing {expected:?} in {card}");
        }

        let fa = profile_card(&sample_profile("alice"), Language::Fa, &t);
        assert!(fa.contains("*نام:* Alice"));
        assert!(fa.contains("*خصوصی:* خیر"));
    }

    #[test]
    fn values_are_escaped_but_template_markup_is_kept() {
        let t = Translations::embedded().unwrap();
        let mut profile = sample_profile("a_b.c");
        profile.full_name = "Ann (Official)".into();
        profile.biography = "1+1=2 *bold* {x}".into();
        profile.is_private = true;

        let card = profile_card(&profile, Language::En, &t);
        assert!(card.starts_with("👤 *a\\_b\\.c*"));
        assert!(card.contains("*Name:* Ann \\(Official\\)"));
        assert!(card.contains("*Bio:* 1\\+1\\=2 \\*bold\\* \\{x\\}"));
        assert!(card.contains("*Private:* Yes"));
    }
}
