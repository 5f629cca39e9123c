use anyhow::{bail, Context, Result};
use content_directory_paths::config::Config;
use content_directory_paths::db::Database;
use content_directory_paths::i18n::{is_valid_slug, slugify};
use content_directory_paths::retry::RetryConfig;
use content_directory_paths::{
    CategoryId, CategoryResolver, ContentType, SlugAllocator, SlugScope, Translator,
};
use std::time::Duration;
use tracing::info;

/// Normalise a CLI base-slug argument ("Draft Post" -> "draft-post").
fn base_slug(input: &str) -> Result<String> {
    if is_valid_slug(input) {
        return Ok(input.to_string());
    }

    let slug = slugify(input);
    if slug.is_empty() {
        bail!("Base slug '{}' has no letters or digits", input);
    }
    info!("Normalised base slug '{}' to '{}'", input, slug);
    Ok(slug)
}

const USAGE: &str = "Usage:
  directory-paths translate <path> <target-locale> [current-locale]
  directory-paths descendants <category-id>
  directory-paths allocate <base-slug> <content-type> <locale> [content-id]";

fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("content_directory_paths=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{}", USAGE);
    };

    // Load configuration from environment
    let config = Config::from_env()?;
    let registry = config.locale_registry()?;
    let db = Database::new(&config.database_path)?;

    match (command.as_str(), &args[1..]) {
        ("translate", [path, target, rest @ ..]) => {
            let target = registry.locale(target)?;
            let translator = Translator::new(db, registry.clone());

            let translated = match rest.first() {
                Some(current) => translator.translate(path, &target, &registry.locale(current)?),
                None => translator.switch_locale(path, &target),
            };
            println!("{}", translated);
            println!("{}", serde_json::to_string_pretty(&translator.metrics().report())?);
        }
        ("descendants", [category]) => {
            let resolver = CategoryResolver::new(db);
            let mut descendants: Vec<CategoryId> =
                resolver.descendants(&CategoryId::new(category.as_str()))?.into_iter().collect();
            descendants.sort();

            info!("Category {} has {} descendants", category, descendants.len());
            println!("{}", serde_json::to_string_pretty(&descendants)?);
        }
        ("allocate", [base, content_type, locale, rest @ ..]) => {
            let content_type = ContentType::parse(content_type)
                .with_context(|| format!("Unknown content type: {}", content_type))?;
            let locale = registry.locale(locale)?;
            let base = base_slug(base)?;
            let base_locale = registry.base();

            let allocator = SlugAllocator::new(&db, base_locale.clone())
                .with_max_attempts(config.slug_max_attempts)
                .with_retry(RetryConfig::new(
                    config.slug_conflict_retries,
                    Duration::from_millis(10),
                ));

            let slug = match rest.first() {
                // With an id, write the slug and retry if another writer wins the race
                Some(id) => allocator.allocate_and_persist(&base, content_type, &locale, |slug| {
                    match SlugScope::for_content(content_type, &locale, &base_locale) {
                        SlugScope::CompanyProfile => db.insert_company_profile(id, slug),
                        _ => db.insert_translation(content_type, id, locale.code(), slug),
                    }
                })?,
                None => allocator.allocate(&base, content_type, &locale)?,
            };
            println!("{}", slug);
        }
        _ => bail!("{}", USAGE),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== base_slug Tests ====================

    #[test]
    fn test_base_slug_keeps_valid_slug() {
        assert_eq!(base_slug("draft-post").unwrap(), "draft-post");
        assert_eq!(base_slug("ახალი-კანონი").unwrap(), "ახალი-კანონი");
    }

    #[test]
    fn test_base_slug_normalises_title() {
        assert_eq!(base_slug("Draft Post").unwrap(), "draft-post");
        assert_eq!(base_slug("  Tax & VAT!  ").unwrap(), "tax-vat");
    }

    #[test]
    fn test_base_slug_rejects_punctuation_only() {
        let err = base_slug("?!").unwrap_err();
        assert!(err.to_string().contains("no letters or digits"));
    }
}
