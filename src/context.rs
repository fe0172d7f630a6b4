//! Document context shared by every record loaded or written in one pass.

use std::fmt::{Display, Formatter};

use crate::locale::{ALL_LOCALES, locale_to_language};

/// Layout flavour of the XML or YAML document being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatStyle {
    /// Upstream metainfo file describing a single component.
    #[default]
    Metainfo,
    /// Aggregated catalog data for many components.
    Collection,
}

impl Display for FormatStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatStyle::Metainfo => write!(f, "metainfo"),
            FormatStyle::Collection => write!(f, "collection"),
        }
    }
}

/// Read-mostly settings for a document: its style, the ambient locale and
/// where it came from (for diagnostics).
///
/// Build one with the `with_*` methods, then share it as `Arc<Context>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    style: FormatStyle,
    locale: Option<String>,
    filename: Option<String>,
}

impl Context {
    pub fn new(style: FormatStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Sets the ambient locale. `"ALL"` makes every translation readable.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the source identifier used in diagnostics.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn style(&self) -> FormatStyle {
        self.style
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Name of the source for log messages.
    pub(crate) fn source_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("<unknown>")
    }

    pub fn all_locale_enabled(&self) -> bool {
        self.locale() == Some(ALL_LOCALES)
    }

    /// Whether text tagged with `lang` should be read under this context.
    ///
    /// Matches the ambient locale exactly or by its bare language
    /// (`de_DE` accepts `de`), or anything when the locale is `"ALL"`.
    pub fn accepts_locale(&self, lang: &str) -> bool {
        if self.all_locale_enabled() {
            return true;
        }
        match self.locale() {
            Some(locale) => locale == lang || locale_to_language(locale) == lang,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = Context::default();
        assert_eq!(ctx.style(), FormatStyle::Metainfo);
        assert_eq!(ctx.locale(), None);
        assert_eq!(ctx.source_name(), "<unknown>");
    }

    #[test]
    fn test_builder() {
        let ctx = Context::new(FormatStyle::Collection)
            .with_locale("de_DE")
            .with_filename("catalog.xml");
        assert_eq!(ctx.style(), FormatStyle::Collection);
        assert_eq!(ctx.locale(), Some("de_DE"));
        assert_eq!(ctx.filename(), Some("catalog.xml"));
    }

    #[test]
    fn test_accepts_locale() {
        let ctx = Context::new(FormatStyle::Metainfo).with_locale("de_DE");
        assert!(ctx.accepts_locale("de_DE"));
        assert!(ctx.accepts_locale("de"));
        assert!(!ctx.accepts_locale("fr"));

        let all = Context::new(FormatStyle::Metainfo).with_locale("ALL");
        assert!(all.all_locale_enabled());
        assert!(all.accepts_locale("fr"));

        let none = Context::new(FormatStyle::Metainfo);
        assert!(!none.accepts_locale("fr"));
    }

    #[test]
    fn test_style_display() {
        assert_eq!(FormatStyle::Metainfo.to_string(), "metainfo");
        assert_eq!(FormatStyle::Collection.to_string(), "collection");
    }
}
