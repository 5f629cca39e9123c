//! Slug normalisation and validation.
//!
//! Slugs are per-locale, so they keep the script of their locale: a Georgian
//! title yields a Georgian slug, a Russian title a Cyrillic one.

use regex::Regex;
use std::sync::OnceLock;

static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();
static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Turn a display title into a base slug.
///
/// Lowercases, keeps Unicode letters and digits, and collapses every other
/// run of characters into a single `-`. Leading and trailing dashes are
/// removed. Returns an empty string when the title has no letters or digits.
pub fn slugify(title: &str) -> String {
    let regex = SEPARATOR_REGEX
        .get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("separator pattern is valid"));

    let lowered = title.to_lowercase();
    regex
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Check that a slug is already in normalised form.
pub fn is_valid_slug(slug: &str) -> bool {
    let regex = SLUG_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}]+(?:-[\p{L}\p{N}]+)*$").expect("slug pattern is valid")
    });

    regex.is_match(slug) && slug.to_lowercase() == slug
}
