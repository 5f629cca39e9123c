use crate::content::{CategoryEdge, CategoryId, ContentId, ContentType};
use crate::i18n::Locale;
use crate::store::{ContentStore, SlugScope, StoreError};
use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Translation table for each content type.
fn translation_table(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Article => "post_translations",
        ContentType::PracticeArea => "practice_translations",
        ContentType::Service => "service_translations",
        ContentType::SpecialistProfile => "specialist_translations",
        ContentType::CompanyProfile => "company_translations",
        ContentType::Team => "team_translations",
    }
}

/// Item table holding the category reference, for categorized types only.
fn item_table(content_type: ContentType) -> Option<&'static str> {
    match content_type {
        ContentType::Article => Some("posts"),
        ContentType::Service => Some("services"),
        _ => None,
    }
}

/// (table, id column) of a locale-keyed slug scope.
fn slug_table(scope: SlugScope) -> Option<(&'static str, &'static str)> {
    match scope {
        SlugScope::Content(ty) => Some((translation_table(ty), "content_id")),
        SlugScope::Category => Some(("category_translations", "category_id")),
        SlugScope::CompanyProfile => None,
    }
}

/// Turn a unique-constraint failure on a slug write into `SlugConflict`.
fn map_write_error(err: rusqlite::Error, scope: SlugScope, locale: &Locale, slug: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::SlugConflict {
                scope,
                locale: locale.clone(),
                slug: slug.to_string(),
            }
        }
        _ => StoreError::Backend(err),
    }
}

/// SQLite-backed content store.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database and make sure every table exists
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        Self::create_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        for ty in ContentType::ALL {
            let table = translation_table(ty);
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        content_id TEXT NOT NULL,
                        locale TEXT NOT NULL,
                        slug TEXT NOT NULL,
                        PRIMARY KEY (content_id, locale),
                        UNIQUE (locale, slug)
                    )"
                ),
                [],
            )
            .context(format!("Failed to create {} table", table))?;
        }

        for table in ["posts", "services"] {
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        id TEXT PRIMARY KEY,
                        category_id TEXT
                    )"
                ),
                [],
            )
            .context(format!("Failed to create {} table", table))?;
        }

        // Base-locale company slugs live on the profile record itself
        conn.execute(
            "CREATE TABLE IF NOT EXISTS company_profiles (
                id TEXT PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE
            )",
            [],
        )
        .context("Failed to create company_profiles table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                parent_id TEXT
            )",
            [],
        )
        .context("Failed to create categories table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS category_translations (
                category_id TEXT NOT NULL,
                locale TEXT NOT NULL,
                slug TEXT NOT NULL,
                name TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (category_id, locale),
                UNIQUE (locale, slug)
            )",
            [],
        )
        .context("Failed to create category_translations table")?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Add or replace the slug of a content item in one locale
    pub fn insert_translation(
        &self,
        content_type: ContentType,
        id: &str,
        locale: &str,
        slug: &str,
    ) -> Result<(), StoreError> {
        let scope = SlugScope::Content(content_type);
        let table = translation_table(content_type);
        let conn = self.lock()?;

        conn.execute(
            &format!(
                "INSERT INTO {table} (content_id, locale, slug) VALUES (?1, ?2, ?3)
                 ON CONFLICT(content_id, locale) DO UPDATE SET slug = excluded.slug"
            ),
            params![id, locale, slug],
        )
        .map_err(|e| map_write_error(e, scope, &Locale::new(locale), slug))?;

        Ok(())
    }

    /// Add a company profile or replace its base-locale slug
    pub fn insert_company_profile(&self, id: &str, slug: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO company_profiles (id, slug) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET slug = excluded.slug",
            params![id, slug],
        )
        .map_err(|e| map_write_error(e, SlugScope::CompanyProfile, &Locale::new(""), slug))?;

        Ok(())
    }

    /// Add a category node or re-parent an existing one
    pub fn insert_category(&self, id: &str, parent_id: Option<&str>) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO categories (id, parent_id) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET parent_id = excluded.parent_id",
            params![id, parent_id],
        )?;

        Ok(())
    }

    /// Add or replace a category's slug and display name in one locale
    pub fn insert_category_translation(
        &self,
        id: &str,
        locale: &str,
        slug: &str,
        name: &str,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO category_translations (category_id, locale, slug, name)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(category_id, locale) DO UPDATE SET slug = excluded.slug, name = excluded.name",
            params![id, locale, slug, name],
        )
        .map_err(|e| map_write_error(e, SlugScope::Category, &Locale::new(locale), slug))?;

        Ok(())
    }

    /// Display name of a category in one locale
    pub fn category_name(&self, id: &CategoryId, locale: &Locale) -> Result<Option<String>, StoreError> {
        let conn = self.lock()?;
        let name = conn
            .query_row(
                "SELECT name FROM category_translations WHERE category_id = ?1 AND locale = ?2",
                params![id.as_str(), locale.code()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    /// Attach an article or service to a category (creating the item row)
    pub fn assign_category(
        &self,
        content_type: ContentType,
        id: &str,
        category: &str,
    ) -> Result<(), StoreError> {
        let table = item_table(content_type).ok_or_else(|| {
            StoreError::Malformed(format!("{} items do not carry a category", content_type))
        })?;
        let conn = self.lock()?;

        conn.execute(
            &format!(
                "INSERT INTO {table} (id, category_id) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET category_id = excluded.category_id"
            ),
            params![id, category],
        )?;

        Ok(())
    }
}

impl ContentStore for Database {
    fn find_id_by_locale_slug(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<Option<ContentId>, StoreError> {
        let conn = self.lock()?;

        let id: Option<String> = match slug_table(scope) {
            Some((table, id_column)) => conn
                .query_row(
                    &format!("SELECT {id_column} FROM {table} WHERE locale = ?1 AND slug = ?2"),
                    params![locale.code(), slug],
                    |row| row.get(0),
                )
                .optional()?,
            None => conn
                .query_row(
                    "SELECT id FROM company_profiles WHERE slug = ?1",
                    params![slug],
                    |row| row.get(0),
                )
                .optional()?,
        };

        debug!("find_id_by_locale_slug({}, {}, {}) -> {:?}", scope, locale, slug, id);
        Ok(id.map(ContentId::new))
    }

    fn find_slug_by_id(
        &self,
        scope: SlugScope,
        locale: &Locale,
        id: &ContentId,
    ) -> Result<Option<String>, StoreError> {
        let conn = self.lock()?;

        let slug: Option<String> = match slug_table(scope) {
            Some((table, id_column)) => conn
                .query_row(
                    &format!("SELECT slug FROM {table} WHERE locale = ?1 AND {id_column} = ?2"),
                    params![locale.code(), id.as_str()],
                    |row| row.get(0),
                )
                .optional()?,
            None => conn
                .query_row(
                    "SELECT slug FROM company_profiles WHERE id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()?,
        };

        Ok(slug)
    }

    fn list_all_category_edges(&self) -> Result<Vec<CategoryEdge>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, parent_id FROM categories ORDER BY id")?;

        let edges = stmt
            .query_map([], |row| {
                Ok(CategoryEdge {
                    id: CategoryId::new(row.get::<_, String>(0)?),
                    parent_id: row.get::<_, Option<String>>(1)?.map(CategoryId::new),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(edges)
    }

    fn slug_exists(
        &self,
        scope: SlugScope,
        locale: &Locale,
        slug: &str,
    ) -> Result<bool, StoreError> {
        let conn = self.lock()?;

        let count: i64 = match slug_table(scope) {
            Some((table, _)) => conn.query_row(
                &format!("SELECT COUNT(*) FROM {table} WHERE locale = ?1 AND slug = ?2"),
                params![locale.code(), slug],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM company_profiles WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )?,
        };

        Ok(count > 0)
    }

    fn list_content_in_categories(
        &self,
        content_type: ContentType,
        categories: &[CategoryId],
    ) -> Result<Vec<ContentId>, StoreError> {
        let Some(table) = item_table(content_type) else {
            return Ok(Vec::new());
        };
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; categories.len()].join(", ");
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM {table} WHERE category_id IN ({placeholders}) ORDER BY id"
        ))?;

        let ids = stmt
            .query_map(params_from_iter(categories.iter().map(|c| c.as_str())), |row| {
                row.get::<_, String>(0)
            })?
            .map(|row| row.map(ContentId::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}
