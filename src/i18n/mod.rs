//! Locale handling for the content directory.
//!
//! # Architecture
//!
//! - `registry`: the configured locale set and its base locale
//! - `language`: the `Locale` tag passed explicitly to every operation
//! - `validator`: slug normalisation (`slugify`) and shape checks
//! - `metrics`: per-translator locale-switch counters
//!
//! # Example
//!
//! ```rust
//! use content_directory_paths::i18n::LocaleRegistry;
//!
//! let registry = LocaleRegistry::default();
//! let english = registry.locale("en").unwrap();
//! assert_eq!(english.code(), "en");
//! assert_eq!(registry.base().code(), "ka");
//! ```

mod language;
mod metrics;
mod registry;
mod validator;

pub use language::Locale;
pub use metrics::{MetricsReport, PathMetrics, PathOutcome};
pub use registry::{LocaleConfig, LocaleError, LocaleRegistry};
pub use validator::{is_valid_slug, slugify};
