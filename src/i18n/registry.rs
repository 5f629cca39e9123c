//! Locale registry: the configured set of content locales.
//!
//! The set of locales and the base locale are configuration, not constants.
//! A registry is built once (usually from [`Config`](crate::config::Config))
//! and handed to the components that need it.

use crate::i18n::Locale;
use thiserror::Error;

/// Errors raised when building a registry or resolving a locale code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Unknown locale code: '{0}'")]
    Unknown(String),

    #[error("Locale '{0}' is not enabled")]
    Disabled(String),

    #[error("Base locale '{0}' is not in the configured locale set")]
    BaseNotInSet(String),

    #[error("Locale '{0}' is configured more than once")]
    Duplicate(String),

    #[error("No base locale configured")]
    NoBase,

    #[error("More than one base locale configured ('{0}')")]
    MultipleBases(String),

    #[error("The base locale '{0}' cannot be disabled")]
    BaseRequired(String),

    #[error("No locales configured")]
    Empty,
}

/// Configuration for a supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Language tag used in paths (e.g. "ka")
    pub code: String,

    /// English name of the language (e.g. "Georgian")
    pub name: String,

    /// Native name of the language (e.g. "ქართული")
    pub native_name: String,

    /// Whether this is the base locale (exactly one per registry)
    pub is_base: bool,

    /// Whether this locale is offered in the language switcher
    pub enabled: bool,
}

impl LocaleConfig {
    /// Build a config for a code, filling in names for the known languages.
    pub fn for_code(code: &str, is_base: bool) -> Self {
        let (name, native_name) = match code {
            "ka" => ("Georgian", "ქართული"),
            "en" => ("English", "English"),
            "ru" => ("Russian", "Русский"),
            other => (other, other),
        };

        Self {
            code: code.to_string(),
            name: name.to_string(),
            native_name: native_name.to_string(),
            is_base,
            enabled: true,
        }
    }
}

/// The set of locales content may be published in.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    base: usize,
}

impl LocaleRegistry {
    /// Build a registry from explicit configs.
    ///
    /// Exactly one config must be marked `is_base`, and codes must be unique.
    pub fn new(locales: Vec<LocaleConfig>) -> Result<Self, LocaleError> {
        if locales.is_empty() {
            return Err(LocaleError::Empty);
        }

        for (i, locale) in locales.iter().enumerate() {
            if locales[..i].iter().any(|other| other.code == locale.code) {
                return Err(LocaleError::Duplicate(locale.code.clone()));
            }
        }

        let mut bases = locales.iter().enumerate().filter(|(_, l)| l.is_base);
        let base = match (bases.next(), bases.next()) {
            (Some((index, _)), None) => index,
            (Some(_), Some((_, second))) => {
                return Err(LocaleError::MultipleBases(second.code.clone()))
            }
            (None, _) => return Err(LocaleError::NoBase),
        };

        Ok(Self { locales, base })
    }

    /// Build a registry from a list of codes and the base code.
    pub fn from_codes<S: AsRef<str>>(codes: &[S], base: &str) -> Result<Self, LocaleError> {
        if codes.is_empty() {
            return Err(LocaleError::Empty);
        }
        if !codes.iter().any(|code| code.as_ref() == base) {
            return Err(LocaleError::BaseNotInSet(base.to_string()));
        }

        let locales = codes
            .iter()
            .map(|code| LocaleConfig::for_code(code.as_ref(), code.as_ref() == base))
            .collect();

        Self::new(locales)
    }

    /// Get a locale configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Resolve a code to a validated, enabled [`Locale`].
    pub fn locale(&self, code: &str) -> Result<Locale, LocaleError> {
        match self.get_by_code(code) {
            Some(config) if config.enabled => Ok(Locale::new(config.code.as_str())),
            Some(_) => Err(LocaleError::Disabled(code.to_string())),
            None => Err(LocaleError::Unknown(code.to_string())),
        }
    }

    /// Whether `code` names a configured locale (enabled or not).
    pub fn contains(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Check if a locale code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }

    /// All enabled locales, in configuration order.
    pub fn list_enabled(&self) -> Vec<Locale> {
        self.locales
            .iter()
            .filter(|locale| locale.enabled)
            .map(|locale| Locale::new(locale.code.as_str()))
            .collect()
    }

    /// All locale configurations (including disabled ones).
    pub fn list_all(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// The base locale.
    pub fn base(&self) -> Locale {
        Locale::new(self.locales[self.base].code.as_str())
    }

    /// Configuration of the base locale.
    pub fn base_config(&self) -> &LocaleConfig {
        &self.locales[self.base]
    }

    /// Disable a locale so it is no longer offered or resolvable.
    ///
    /// The base locale cannot be disabled.
    pub fn disable(&mut self, code: &str) -> Result<(), LocaleError> {
        let index = self
            .locales
            .iter()
            .position(|locale| locale.code == code)
            .ok_or_else(|| LocaleError::Unknown(code.to_string()))?;

        if index == self.base {
            return Err(LocaleError::BaseRequired(code.to_string()));
        }

        self.locales[index].enabled = false;
        Ok(())
    }
}

impl Default for LocaleRegistry {
    /// Georgian (base), English and Russian.
    fn default() -> Self {
        Self {
            locales: vec![
                LocaleConfig::for_code(Locale::GEORGIAN, true),
                LocaleConfig::for_code(Locale::ENGLISH, false),
                LocaleConfig::for_code(Locale::RUSSIAN, false),
            ],
            base: 0,
        }
    }
}
