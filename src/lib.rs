//! URL and slug machinery for a multilingual content directory.
//!
//! - `paths`: translate an application path from one locale to another
//! - `categories`: resolve the descendants of a category, cycle-safe
//! - `slugs`: allocate per-locale unique slugs
//! - `store`: the `ContentStore` trait the above read through, with
//!   `memory::MemoryStore` and `db::Database` as implementations

pub mod categories;
pub mod config;
pub mod content;
pub mod db;
pub mod i18n;
pub mod memory;
pub mod paths;
pub mod retry;
pub mod slugs;
pub mod store;

pub use categories::{CategoryResolver, CategoryTree};
pub use content::{CategoryEdge, CategoryId, ContentId, ContentType};
pub use i18n::{Locale, LocaleRegistry};
pub use paths::Translator;
pub use slugs::{AllocationError, SlugAllocator};
pub use store::{ContentStore, SlugScope, StoreError};
