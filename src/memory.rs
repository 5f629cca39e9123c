use crate::content::{CategoryEdge, CategoryId, ContentId, ContentType};
use crate::i18n::Locale;
use crate::store::{ContentStore, SlugScope, StoreError};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key of a slug row: (scope, locale code, id). Company-profile rows use an
/// empty locale code since they are not locale-keyed.
type SlugKey = (SlugScope, String, ContentId);

#[derive(Debug, Default)]
struct Tables {
    slugs: BTreeMap<SlugKey, String>,
    categories: BTreeMap<CategoryId, Option<CategoryId>>,
    assignments: Vec<(ContentType, ContentId, CategoryId)>,
}

/// A `ContentStore` backed by in-memory tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    reads: AtomicUsize,
}

fn locale_key(scope: SlugScope, locale: &Locale) -> String {
    match scope {
        SlugScope::CompanyProfile => String::new(),
        _ => locale.code().to_string(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }

    /// Make every following operation fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Number of read operations served so far (including failed ones).
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Insert or replace the slug of `id` in `scope` and `locale`.
    ///
    /// Fails with `SlugConflict` when another id already holds the slug.
    pub fn insert_slug(
        &self,
        scope: SlugScope,
        locale: &Locale,
        id: impl Into<ContentId>,
        slug: &str,
    ) -> Result<(), StoreError> {
        let id = id.into();
        let locale_code = locale_key(scope, locale);
        let mut tables = self.write()?;

        let taken = tables.slugs.iter().any(|((s, l, other), existing)| {
            *s == scope && *l == locale_code && *other != id && existing == slug
        });
        if taken {
            return Err(StoreError::SlugConflict {
                scope,
                locale: locale.clone(),
                slug: slug.to_string(),
            });
        }

        tables
            .slugs
            .insert((scope, locale_code, id), slug.to_string());
        Ok(())
    }

    /// Add a translation row for a content item.
    pub fn insert_translation(
        &self,
        content_type: ContentType,
        id: &str,
        locale: &str,
        slug: &str,
    ) -> Result<(), StoreError> {
        self.insert_slug(SlugScope::Content(content_type), &Locale::new(locale), id, slug)
    }

    /// Set the base-locale slug stored on a company profile record.
    pub fn insert_company_profile(&self, id: &str, slug: &str) -> Result<(), StoreError> {
        self.insert_slug(SlugScope::CompanyProfile, &Locale::new(""), id, slug)
    }

    /// Add (or re-parent) a category node.
    pub fn insert_category(&self, id: &str, parent_id: Option<&str>) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables
            .categories
            .insert(CategoryId::new(id), parent_id.map(CategoryId::new));
        Ok(())
    }

    /// Add a category translation row.
    pub fn insert_category_translation(
        &self,
        id: &str,
        locale: &str,
        slug: &str,
    ) -> Result<(), StoreError> {
        self.insert_slug(SlugScope::Category, &Locale::new(locale), CategoryId::new(id), slug)
    }

    /// Attach a content item to a category.
    pub fn assign_category(
        &self,
        content_type: ContentType,
        id: &str,
        category: &str,
    ) -> Result<(), StoreError> {
        if !content_type.is_categorized() {
            return Err(StoreError::Malformed(format!(
                "{} items do not carry a category",
                content_type
            )));
        }

        let mut tables = self.write()?;
        let id = ContentId::new(id);
        tables
            .assignments
            .retain(|(ty, existing, _)| !(*ty == content_type && *existing == id));
        tables
            .assignments
            .push((content_type, id, CategoryId::new(category)));
        Ok(())
    }
}

impl ContentStore for MemoryStore {
    fn find_id_by_locale_slug(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<Option<ContentId>, StoreError> {
        let locale_code = locale_key(scope, locale);
        let tables = self.read()?;

        Ok(tables
            .slugs
            .iter()
            .find(|((s, l, _), existing)| *s == scope && *l == locale_code && *existing == slug)
            .map(|((_, _, id), _)| id.clone()))
    }

    fn find_slug_by_id(
        &self,
        scope: SlugScope,
        locale: &Locale,
        id: &ContentId,
    ) -> Result<Option<String>, StoreError> {
        let key = (scope, locale_key(scope, locale), id.clone());
        let tables = self.read()?;
        Ok(tables.slugs.get(&key).cloned())
    }

    fn list_all_category_edges(&self) -> Result<Vec<CategoryEdge>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .categories
            .iter()
            .map(|(id, parent_id)| CategoryEdge {
                id: id.clone(),
                parent_id: parent_id.clone(),
            })
            .collect())
    }

    fn slug_exists(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.find_id_by_locale_slug(scope, locale, slug)?.is_some())
    }

    fn list_content_in_categories(
        &self,
        content_type: ContentType,
        categories: &[CategoryId],
    ) -> Result<Vec<ContentId>, StoreError> {
        let wanted: HashSet<&CategoryId> = categories.iter().collect();
        let tables = self.read()?;

        Ok(tables
            .assignments
            .iter()
            .filter(|(ty, _, category)| *ty == content_type && wanted.contains(category))
            .map(|(_, id, _)| id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> SlugScope {
        SlugScope::Content(ContentType::Article)
    }

    // ==================== Slug Table Tests ====================

    #[test]
    fn test_translation_lookup_both_directions() {
        let store = MemoryStore::new();
        store
            .insert_translation(ContentType::Article, "a1", "ka", "ტენდერი")
            .expect("insert");

        let id = store
            .find_id_by_locale_slug(article(), &Locale::new("ka"), "ტენდერი")
            .expect("find id");
        assert_eq!(id, Some(ContentId::new("a1")));

        let slug = store
            .find_slug_by_id(article(), &Locale::new("ka"), &ContentId::new("a1"))
            .expect("find slug");
        assert_eq!(slug.as_deref(), Some("ტენდერი"));
    }

    #[test]
    fn test_missing_translation_is_none() {
        let store = MemoryStore::new();
        store
            .insert_translation(ContentType::Article, "a1", "ka", "post")
            .expect("insert");

        let slug = store
            .find_slug_by_id(article(), &Locale::new("en"), &ContentId::new("a1"))
            .expect("find slug");
        assert!(slug.is_none());
    }

    #[test]
    fn test_slug_conflict_within_scope() {
        let store = MemoryStore::new();
        store
            .insert_translation(ContentType::Article, "a1", "ka", "post")
            .expect("insert");

        let err = store
            .insert_translation(ContentType::Article, "a2", "ka", "post")
            .unwrap_err();
        assert!(err.is_slug_conflict());
    }

    #[test]
    fn test_same_slug_allowed_across_types_and_locales() {
        let store = MemoryStore::new();
        store
            .insert_translation(ContentType::Article, "a1", "ka", "post")
            .expect("insert");
        store
            .insert_translation(ContentType::Service, "s1", "ka", "post")
            .expect("other type");
        store
            .insert_translation(ContentType::Article, "a2", "en", "post")
            .expect("other locale");
    }

    #[test]
    fn test_reinsert_replaces_slug() {
        let store = MemoryStore::new();
        store
            .insert_translation(ContentType::Team, "t1", "en", "old")
            .expect("insert");
        store
            .insert_translation(ContentType::Team, "t1", "en", "new")
            .expect("replace");

        let scope = SlugScope::Content(ContentType::Team);
        let en = Locale::new("en");
        assert!(!store.slug_exists(scope, &en, "old").expect("exists"));
        assert!(store.slug_exists(scope, &en, "new").expect("exists"));
    }

    #[test]
    fn test_company_profile_slug_ignores_locale() {
        let store = MemoryStore::new();
        store.insert_company_profile("c1", "შპს-ალფა").expect("insert");

        let id = store
            .find_id_by_locale_slug(SlugScope::CompanyProfile, &Locale::new("ka"), "შპს-ალფა")
            .expect("find");
        assert_eq!(id, Some(ContentId::new("c1")));
    }

    // ==================== Category Tests ====================

    #[test]
    fn test_category_edges_ordered_by_id() {
        let store = MemoryStore::new();
        store.insert_category("mediation", Some("litigation")).expect("insert");
        store.insert_category("litigation", None).expect("insert");
        store.insert_category("arbitration", Some("litigation")).expect("insert");

        let edges = store.list_all_category_edges().expect("edges");
        let ids: Vec<_> = edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["arbitration", "litigation", "mediation"]);
        assert_eq!(edges[1].parent_id, None);
    }

    #[test]
    fn test_list_content_in_categories() {
        let store = MemoryStore::new();
        store.assign_category(ContentType::Article, "a1", "litigation").expect("assign");
        store.assign_category(ContentType::Article, "a2", "mediation").expect("assign");
        store.assign_category(ContentType::Service, "s1", "litigation").expect("assign");

        let ids = store
            .list_content_in_categories(ContentType::Article, &[CategoryId::new("litigation")])
            .expect("list");
        assert_eq!(ids, vec![ContentId::new("a1")]);
    }

    #[test]
    fn test_assign_category_rejects_uncategorized_type() {
        let store = MemoryStore::new();
        let err = store
            .assign_category(ContentType::Team, "t1", "litigation")
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    // ==================== Failure Injection Tests ====================

    #[test]
    fn test_unavailable_store_fails_reads() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let result = store.list_all_category_edges();
        assert!(matches!(result, Err(StoreError::Unavailable(_))));

        store.set_unavailable(false);
        assert!(store.list_all_category_edges().is_ok());
    }

    #[test]
    fn test_read_count() {
        let store = MemoryStore::new();
        assert_eq!(store.read_count(), 0);
        store.list_all_category_edges().expect("edges");
        store
            .slug_exists(article(), &Locale::new("ka"), "x")
            .expect("exists");
        assert_eq!(store.read_count(), 2);
    }
}
