use crate::content::ContentType;
use crate::i18n::{Locale, LocaleRegistry, PathMetrics, PathOutcome};
use crate::store::{ContentStore, SlugScope, StoreError};
use tracing::{debug, warn};

/// Sub-selector that marks a category listing under `news`.
const CATEGORY_SEGMENT: &str = "category";

/// An application path split into its locale and remaining segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// The leading locale segment, if the path had one
    pub locale: Option<String>,

    /// Non-empty segments after the locale
    pub segments: Vec<String>,
}

impl ParsedPath {
    /// Split `path` into locale and segments.
    ///
    /// Query string and fragment are dropped and empty segments ignored. The
    /// first segment is always the locale tag, whether or not it is still
    /// configured.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let mut segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string);

        let locale = segments.next();
        Self {
            locale,
            segments: segments.collect(),
        }
    }
}

/// What the segments after the locale point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// `news/category/{slug}`
    Category,
    /// `{type route}/{slug}`
    Content(ContentType),
}

impl RouteKind {
    /// Classify segments; `None` for home/static pages and unknown routes.
    ///
    /// The category route shares the `news` prefix with articles and is
    /// checked first.
    pub fn classify(segments: &[String]) -> Option<RouteKind> {
        if segments.len() < 2 {
            return None;
        }

        let content_type = ContentType::from_route(&segments[0])?;
        if content_type == ContentType::Article && segments[1] == CATEGORY_SEGMENT {
            return Some(RouteKind::Category);
        }
        Some(RouteKind::Content(content_type))
    }

    /// The slug segment of a classified path, if present.
    fn slug<'a>(&self, segments: &'a [String]) -> Option<&'a str> {
        let index = match self {
            RouteKind::Category => 2,
            RouteKind::Content(_) => 1,
        };
        segments.get(index).map(String::as_str)
    }

    /// Path prefix (after the locale) that carries the slug.
    fn prefix(&self) -> String {
        match self {
            RouteKind::Category => format!("{}/{}", ContentType::Article.route(), CATEGORY_SEGMENT),
            RouteKind::Content(ty) => ty.route().to_string(),
        }
    }

    /// Route segment of the listing page to fall back to.
    fn listing_root(&self) -> &'static str {
        match self {
            RouteKind::Category => ContentType::Article.route(),
            RouteKind::Content(ty) => ty.route(),
        }
    }
}

/// Resolves a slug in `current` to its slug in `target`; `None` when the
/// identity or its target translation is missing.
type Strategy<S> =
    fn(&Translator<S>, RouteKind, &str, &Locale, &Locale) -> Result<Option<String>, StoreError>;

/// Translates application paths between locales.
pub struct Translator<S> {
    store: S,
    registry: LocaleRegistry,
    metrics: PathMetrics,
}

impl<S: ContentStore> Translator<S> {
    pub fn new(store: S, registry: LocaleRegistry) -> Self {
        Self {
            store,
            registry,
            metrics: PathMetrics::new(),
        }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &PathMetrics {
        &self.metrics
    }

    /// The equivalent of `path` (currently shown in `current`) in `target`.
    pub fn translate(&self, path: &str, target: &Locale, current: &Locale) -> String {
        let parsed = ParsedPath::parse(path);
        let (translated, outcome) = self.resolve(&parsed.segments, target, current);

        self.metrics.record(outcome);
        debug!("{} ({} -> {}) => {} [{:?}]", path, current, target, translated, outcome);
        translated
    }

    /// Like `translate`, taking the current locale from the path itself.
    ///
    /// Paths that do not start with a configured locale are read as
    /// base-locale paths without a locale segment.
    pub fn switch_locale(&self, path: &str, target: &Locale) -> String {
        match ParsedPath::parse(path).locale {
            Some(code) if self.registry.contains(&code) => {
                self.translate(path, target, &Locale::new(code))
            }
            _ => {
                let base = self.registry.base();
                let prefixed = format!("/{}/{}", base, path.trim_start_matches('/'));
                self.translate(&prefixed, target, &base)
            }
        }
    }

    /// Language-switcher links: `path` translated into every other enabled locale.
    pub fn translate_all(&self, path: &str, current: &Locale) -> Vec<(Locale, String)> {
        self.registry
            .list_enabled()
            .into_iter()
            .filter(|locale| locale != current)
            .map(|locale| {
                let translated = self.translate(path, &locale, current);
                (locale, translated)
            })
            .collect()
    }

    fn resolve(&self, segments: &[String], target: &Locale, current: &Locale) -> (String, PathOutcome) {
        let home = format!("/{}", target);

        // Home and static top-level pages have locale-invariant paths
        if segments.len() < 2 {
            return match segments.first() {
                Some(segment) => (format!("{}/{}", home, segment), PathOutcome::Static),
                None => (home, PathOutcome::Static),
            };
        }

        let Some(route) = RouteKind::classify(segments) else {
            return (format!("{}/{}", home, segments.join("/")), PathOutcome::Passthrough);
        };

        let listing_root = format!("{}/{}", home, route.listing_root());
        let Some(slug) = route.slug(segments) else {
            return (listing_root, PathOutcome::ListingRoot);
        };

        let strategy = Self::strategy(route);
        match strategy(self, route, slug, target, current) {
            Ok(Some(target_slug)) => (
                format!("{}/{}/{}", home, route.prefix(), target_slug),
                PathOutcome::Translated,
            ),
            Ok(None) => (listing_root, PathOutcome::ListingRoot),
            Err(e) => {
                warn!(
                    "Locale switch for '{}' ({} -> {}) failed, falling back to home: {}",
                    segments.join("/"),
                    current,
                    target,
                    e
                );
                (home, PathOutcome::Home)
            }
        }
    }

    fn strategy(route: RouteKind) -> Strategy<S> {
        match route {
            RouteKind::Content(ContentType::CompanyProfile) => Self::resolve_company,
            RouteKind::Category | RouteKind::Content(_) => Self::resolve_uniform,
        }
    }

    /// Two-step lookup through one slug scope.
    fn lookup(
        &self,
        id_scope: SlugScope,
        slug_scope: SlugScope,
        slug: &str,
        target: &Locale,
        current: &Locale,
    ) -> Result<Option<String>, StoreError> {
        let Some(id) = self.store.find_id_by_locale_slug(id_scope, current, slug)? else {
            debug!("No {} identity for slug '{}' in {}", id_scope, slug, current);
            return Ok(None);
        };

        let target_slug = self.store.find_slug_by_id(slug_scope, target, &id)?;
        if target_slug.is_none() {
            debug!("{} '{}' has no {} translation", slug_scope, id, target);
        }
        Ok(target_slug)
    }

    /// Category and content routes other than companies keep one scope for
    /// both lookups.
    fn resolve_uniform(
        &self,
        route: RouteKind,
        slug: &str,
        target: &Locale,
        current: &Locale,
    ) -> Result<Option<String>, StoreError> {
        let scope = match route {
            RouteKind::Category => SlugScope::Category,
            RouteKind::Content(ty) => SlugScope::Content(ty),
        };
        self.lookup(scope, scope, slug, target, current)
    }

    /// Company slugs live on the profile record in the base locale and in the
    /// translation table elsewhere; both directions branch on the base locale.
    fn resolve_company(
        &self,
        _route: RouteKind,
        slug: &str,
        target: &Locale,
        current: &Locale,
    ) -> Result<Option<String>, StoreError> {
        let base = self.registry.base();
        let id_scope = SlugScope::for_content(ContentType::CompanyProfile, current, &base);
        let slug_scope = SlugScope::for_content(ContentType::CompanyProfile, target, &base);
        self.lookup(id_scope, slug_scope, slug, target, current)
    }
}
