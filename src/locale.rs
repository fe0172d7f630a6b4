//! Locale resolution for locale-sensitive reads and writes.

use unic_langid::LanguageIdentifier;

use crate::context::Context;

/// Key of the untranslated text in every localized map.
pub const DEFAULT_LOCALE: &str = "C";

/// Context locale that makes every translation acceptable while reading.
pub const ALL_LOCALES: &str = "ALL";

/// Picks the locale a record reads and writes with.
///
/// An explicit override wins, then the ambient locale of the context, then `"C"`.
pub fn resolve_active_locale<'a>(
    locale_override: Option<&'a str>,
    context: Option<&'a Context>,
) -> &'a str {
    locale_override
        .or_else(|| context.and_then(Context::locale))
        .unwrap_or(DEFAULT_LOCALE)
}

/// Reduces a POSIX-ish locale such as `de_DE.UTF-8@euro` to its language, `de`.
pub fn locale_to_language(locale: &str) -> String {
    let bare = locale
        .split(['.', '@'])
        .next()
        .unwrap_or(locale);

    match bare.parse::<LanguageIdentifier>() {
        Ok(langid) => langid.language.to_string(),
        Err(_) => bare
            .split(['_', '-'])
            .next()
            .unwrap_or(bare)
            .to_string(),
    }
}

/// Locales used by translation tooling for testing; never written out.
pub fn is_cruft_locale(locale: &str) -> bool {
    matches!(locale, "x-test" | "xx")
}
