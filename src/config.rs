use crate::i18n::LocaleRegistry;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_path: String,

    // Locales
    pub supported_locales: Vec<String>,
    pub base_locale: String,

    // Slug allocation
    pub slug_max_attempts: u32,
    pub slug_conflict_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Storage
            database_path: std::env::var("DATABASE_PATH").context("DATABASE_PATH not set")?,

            // Locales - comma separated, e.g. "ka,en,ru"
            supported_locales: parse_locale_list(
                &std::env::var("SUPPORTED_LOCALES").unwrap_or_else(|_| "ka,en,ru".to_string()),
            ),
            base_locale: std::env::var("BASE_LOCALE").unwrap_or_else(|_| "ka".to_string()),

            // Slug allocation
            slug_max_attempts: std::env::var("SLUG_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            slug_conflict_retries: std::env::var("SLUG_CONFLICT_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        })
    }

    /// Build the locale registry described by this configuration.
    pub fn locale_registry(&self) -> Result<LocaleRegistry> {
        LocaleRegistry::from_codes(&self.supported_locales, &self.base_locale).with_context(|| {
            format!(
                "Invalid locale configuration (SUPPORTED_LOCALES={}, BASE_LOCALE={})",
                self.supported_locales.join(","),
                self.base_locale
            )
        })
    }
}

fn parse_locale_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|code| code.trim().to_lowercase())
        .filter(|code| !code.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(locales: &[&str], base: &str) -> Config {
        Config {
            database_path: ":memory:".to_string(),
            supported_locales: locales.iter().map(|s| s.to_string()).collect(),
            base_locale: base.to_string(),
            slug_max_attempts: 1000,
            slug_conflict_retries: 3,
        }
    }

    #[test]
    fn test_parse_locale_list() {
        assert_eq!(parse_locale_list("ka,en,ru"), vec!["ka", "en", "ru"]);
        assert_eq!(parse_locale_list(" KA , en,, "), vec!["ka", "en"]);
        assert!(parse_locale_list("").is_empty());
    }

    #[test]
    fn test_locale_registry_from_config() {
        let registry = config(&["ka", "en", "ru"], "ka").locale_registry().unwrap();
        assert_eq!(registry.base().code(), "ka");
        assert_eq!(registry.list_enabled().len(), 3);
    }

    #[test]
    fn test_locale_registry_rejects_base_outside_set() {
        let err = config(&["en", "ru"], "ka").locale_registry().unwrap_err();
        assert!(err.to_string().contains("Invalid locale configuration"));
    }
}
