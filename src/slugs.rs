use crate::content::ContentType;
use crate::i18n::Locale;
use crate::retry::{with_retry_if, RetryConfig};
use crate::store::{ContentStore, SlugScope, StoreError};
use thiserror::Error;
use tracing::{debug, info};

/// Default upper bound on suffix probes for one allocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Base slug is empty")]
    EmptySlug,

    #[error("No free slug for '{base}' after {attempts} attempts")]
    Exhausted { base: String, attempts: u32 },
}

impl AllocationError {
    fn is_slug_conflict(&self) -> bool {
        matches!(self, AllocationError::Store(e) if e.is_slug_conflict())
    }
}

/// Mints slugs that are unique per (content type, locale).
pub struct SlugAllocator<S> {
    store: S,
    base_locale: Locale,
    max_attempts: u32,
    retry: RetryConfig,
}

impl<S: ContentStore> SlugAllocator<S> {
    /// `base_locale` decides where company-profile slugs are checked.
    pub fn new(store: S, base_locale: Locale) -> Self {
        Self {
            store,
            base_locale,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry: RetryConfig::slug_conflict(),
        }
    }

    /// Set the upper bound on candidates probed per allocation.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the retry policy used by `allocate_and_persist`.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// A slug free in the (content type, locale) scope at check time.
    ///
    /// Tries `base_slug`, then `base_slug-1`, `base_slug-2`, ... and returns
    /// the first candidate the store reports as unused.
    pub fn allocate(
        &self,
        base_slug: &str,
        content_type: ContentType,
        locale: &Locale,
    ) -> Result<String, AllocationError> {
        let scope = SlugScope::for_content(content_type, locale, &self.base_locale);
        self.allocate_in(base_slug, scope, locale)
    }

    /// Like `allocate`, for a category translation slug.
    pub fn allocate_category(&self, base_slug: &str, locale: &Locale) -> Result<String, AllocationError> {
        self.allocate_in(base_slug, SlugScope::Category, locale)
    }

    /// Probe candidates in an explicit scope.
    pub fn allocate_in(
        &self,
        base_slug: &str,
        scope: SlugScope,
        locale: &Locale,
    ) -> Result<String, AllocationError> {
        if base_slug.is_empty() {
            return Err(AllocationError::EmptySlug);
        }

        for attempt in 0..self.max_attempts {
            let candidate = if attempt == 0 {
                base_slug.to_string()
            } else {
                format!("{}-{}", base_slug, attempt)
            };

            if !self.store.slug_exists(scope, locale, &candidate)? {
                debug!(
                    "Allocated slug '{}' in {} ({}) after {} probes",
                    candidate,
                    scope,
                    locale,
                    attempt + 1
                );
                return Ok(candidate);
            }
        }

        Err(AllocationError::Exhausted {
            base: base_slug.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Allocate a slug and hand it to `persist`, retrying on slug conflicts.
    ///
    /// When `persist` reports `StoreError::SlugConflict` (another writer took
    /// the slug between the check and the write), a fresh slug is allocated
    /// and persisted again, up to the configured retry attempts. Any other
    /// error is returned immediately.
    pub fn allocate_and_persist<F>(
        &self,
        base_slug: &str,
        content_type: ContentType,
        locale: &Locale,
        mut persist: F,
    ) -> Result<String, AllocationError>
    where
        F: FnMut(&str) -> Result<(), StoreError>,
    {
        let operation_name = format!("Slug allocation for {} ({})", content_type, locale);

        let slug = with_retry_if(
            &self.retry,
            &operation_name,
            |_| -> Result<String, AllocationError> {
                let slug = self.allocate(base_slug, content_type, locale)?;
                persist(&slug)?;
                Ok(slug)
            },
            AllocationError::is_slug_conflict,
        )?;

        info!("Persisted {} slug '{}' ({})", content_type, slug, locale);
        Ok(slug)
    }
}
