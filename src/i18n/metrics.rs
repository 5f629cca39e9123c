//! Locale-switch metrics.
//!
//! Each [`Translator`](crate::paths::Translator) owns one `PathMetrics`; the
//! counters only observe outcomes and never influence them.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How a single `translate` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// Home page or static top-level page; no store access.
    Static,
    /// Slug resolved and translated into the target locale.
    Translated,
    /// Identity or target translation missing; landed on the type listing root.
    ListingRoot,
    /// Unknown route; segments passed through unchanged.
    Passthrough,
    /// Store failure; landed on the home page.
    Home,
}

/// Counters for locale-switch outcomes.
#[derive(Debug, Default)]
pub struct PathMetrics {
    static_pages: AtomicUsize,
    translated: AtomicUsize,
    listing_roots: AtomicUsize,
    passthroughs: AtomicUsize,
    home_fallbacks: AtomicUsize,
}

impl PathMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one translation.
    pub fn record(&self, outcome: PathOutcome) {
        let counter = match outcome {
            PathOutcome::Static => &self.static_pages,
            PathOutcome::Translated => &self.translated,
            PathOutcome::ListingRoot => &self.listing_roots,
            PathOutcome::Passthrough => &self.passthroughs,
            PathOutcome::Home => &self.home_fallbacks,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn static_pages(&self) -> usize {
        self.static_pages.load(Ordering::Relaxed)
    }

    pub fn translated(&self) -> usize {
        self.translated.load(Ordering::Relaxed)
    }

    pub fn listing_roots(&self) -> usize {
        self.listing_roots.load(Ordering::Relaxed)
    }

    pub fn passthroughs(&self) -> usize {
        self.passthroughs.load(Ordering::Relaxed)
    }

    pub fn home_fallbacks(&self) -> usize {
        self.home_fallbacks.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let static_pages = self.static_pages();
        let translated = self.translated();
        let listing_roots = self.listing_roots();
        let passthroughs = self.passthroughs();
        let home_fallbacks = self.home_fallbacks();

        let total = static_pages + translated + listing_roots + passthroughs + home_fallbacks;
        let fallback_rate = if total > 0 {
            ((listing_roots + home_fallbacks) as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            total,
            static_pages,
            translated,
            listing_roots,
            passthroughs,
            home_fallbacks,
            fallback_rate,
        }
    }
}

/// Snapshot of the locale-switch counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of `translate` calls
    pub total: usize,

    /// Home and static pages
    pub static_pages: usize,

    /// Fully translated content paths
    pub translated: usize,

    /// Listing-root fallbacks (identity or translation missing)
    pub listing_roots: usize,

    /// Unknown routes passed through
    pub passthroughs: usize,

    /// Home-page fallbacks after store failures
    pub home_fallbacks: usize,

    /// Share of calls that fell back, as a percentage (0-100)
    pub fallback_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = PathMetrics::new();
        let report = metrics.report();
        assert_eq!(report.total, 0);
        assert_eq!(report.fallback_rate, 0.0);
    }

    #[test]
    fn test_record_each_outcome() {
        let metrics = PathMetrics::new();
        metrics.record(PathOutcome::Static);
        metrics.record(PathOutcome::Translated);
        metrics.record(PathOutcome::Translated);
        metrics.record(PathOutcome::ListingRoot);
        metrics.record(PathOutcome::Passthrough);
        metrics.record(PathOutcome::Home);

        assert_eq!(metrics.static_pages(), 1);
        assert_eq!(metrics.translated(), 2);
        assert_eq!(metrics.listing_roots(), 1);
        assert_eq!(metrics.passthroughs(), 1);
        assert_eq!(metrics.home_fallbacks(), 1);
    }

    #[test]
    fn test_report_fallback_rate() {
        let metrics = PathMetrics::new();
        metrics.record(PathOutcome::Translated);
        metrics.record(PathOutcome::Translated);
        metrics.record(PathOutcome::ListingRoot);
        metrics.record(PathOutcome::Home);

        let report = metrics.report();
        assert_eq!(report.total, 4);
        assert!((report.fallback_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = PathMetrics::new();
        metrics.record(PathOutcome::Passthrough);

        let json = serde_json::to_value(metrics.report()).expect("serialize");
        assert_eq!(json["passthroughs"], 1);
        assert_eq!(json["total"], 1);
    }
}
