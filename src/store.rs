use crate::content::{CategoryEdge, CategoryId, ContentId, ContentType};
use crate::i18n::Locale;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Namespace a slug is looked up and kept unique in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlugScope {
    /// Per-type translation records keyed by (content id, locale).
    Content(ContentType),
    /// Category translation records keyed by (category id, locale).
    Category,
    /// The slug column on the company profile record itself.
    ///
    /// Only holds base-locale slugs; the locale argument is ignored.
    CompanyProfile,
}

impl SlugScope {
    /// Where the slug of `content_type` in `locale` is stored.
    ///
    /// Company profiles keep their base-locale slug on the profile record and
    /// every other locale in the translation table. The two locations are
    /// not kept in lockstep, so they must not be merged.
    pub fn for_content(content_type: ContentType, locale: &Locale, base: &Locale) -> SlugScope {
        if content_type == ContentType::CompanyProfile && locale == base {
            SlugScope::CompanyProfile
        } else {
            SlugScope::Content(content_type)
        }
    }
}

impl fmt::Display for SlugScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugScope::Content(ty) => write!(f, "{}", ty),
            SlugScope::Category => f.write_str("category"),
            SlugScope::CompanyProfile => f.write_str("companyProfile(base)"),
        }
    }
}

/// Failures reported by a content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("Malformed content data: {0}")]
    Malformed(String),

    #[error("Slug '{slug}' already exists in {scope} for locale '{locale}'")]
    SlugConflict {
        scope: SlugScope,
        locale: Locale,
        slug: String,
    },

    #[error("Content store unavailable: {0}")]
    Unavailable(String),

    #[error("Content store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Whether this error is a uniqueness violation on a slug.
    pub fn is_slug_conflict(&self) -> bool {
        matches!(self, StoreError::SlugConflict { .. })
    }
}

/// Read and probe operations against the persistent content store.
pub trait ContentStore: Send + Sync {
    /// Resolve a slug in `locale` to its language-independent identity.
    fn find_id_by_locale_slug(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<Option<ContentId>, StoreError>;

    /// The slug of `id` in `locale`, if that translation exists.
    fn find_slug_by_id(
        &self,
        scope: SlugScope,
        locale: &Locale,
        id: &ContentId,
    ) -> Result<Option<String>, StoreError>;

    /// Every (id, parent id) pair of the category table, ordered by id.
    fn list_all_category_edges(&self) -> Result<Vec<CategoryEdge>, StoreError>;

    /// Whether `slug` is taken in `scope` and `locale`.
    fn slug_exists(&self, scope: SlugScope, locale: &Locale, slug: &str)
        -> Result<bool, StoreError>;

    /// Items of `content_type` whose category is one of `categories`.
    ///
    /// Types without categories yield an empty list.
    fn list_content_in_categories(
        &self,
        content_type: ContentType,
        categories: &[CategoryId],
    ) -> Result<Vec<ContentId>, StoreError>;
}

impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn find_id_by_locale_slug(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<Option<ContentId>, StoreError> {
        (**self).find_id_by_locale_slug(scope, locale, slug)
    }

    fn find_slug_by_id(
        &self,
        scope: SlugScope,
        locale: &Locale,
        id: &ContentId,
    ) -> Result<Option<String>, StoreError> {
        (**self).find_slug_by_id(scope, locale, id)
    }

    fn list_all_category_edges(&self) -> Result<Vec<CategoryEdge>, StoreError> {
        (**self).list_all_category_edges()
    }

    fn slug_exists(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<bool, StoreError> {
        (**self).slug_exists(scope, locale, slug)
    }

    fn list_content_in_categories(
        &self,
        content_type: ContentType,
        categories: &[CategoryId],
    ) -> Result<Vec<ContentId>, StoreError> {
        (**self).list_content_in_categories(content_type, categories)
    }
}

impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    fn find_id_by_locale_slug(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<Option<ContentId>, StoreError> {
        (**self).find_id_by_locale_slug(scope, locale, slug)
    }

    fn find_slug_by_id(
        &self,
        scope: SlugScope,
        locale: &Locale,
        id: &ContentId,
    ) -> Result<Option<String>, StoreError> {
        (**self).find_slug_by_id(scope, locale, id)
    }

    fn list_all_category_edges(&self) -> Result<Vec<CategoryEdge>, StoreError> {
        (**self).list_all_category_edges()
    }

    fn slug_exists(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<bool, StoreError> {
        (**self).slug_exists(scope, locale, slug)
    }

    fn list_content_in_categories(
        &self,
        content_type: ContentType,
        categories: &[CategoryId],
    ) -> Result<Vec<ContentId>, StoreError> {
        (**self).list_content_in_categories(content_type, categories)
    }
}
