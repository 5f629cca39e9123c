//! Locale type: a language tag as it appears in the first path segment.

use serde::Serialize;
use std::fmt;

/// A content locale (e.g. "ka", "en", "ru").
///
/// Locales are passed explicitly to every operation; nothing in this crate
/// keeps a "current locale". Use [`LocaleRegistry::locale`] to validate a
/// code against the configured set.
///
/// [`LocaleRegistry::locale`]: crate::i18n::LocaleRegistry::locale
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale {
    code: String,
}

impl Locale {
    /// Georgian, the base locale of the source deployment.
    pub const GEORGIAN: &'static str = "ka";

    /// English.
    pub const ENGLISH: &'static str = "en";

    /// Russian.
    pub const RUSSIAN: &'static str = "ru";

    /// Wrap a language tag without validating it against a registry.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// The language tag (e.g. "ka").
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.code == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.code == *other
    }
}
