//! URL-derived slugs used to address latest-view artifacts.

use std::collections::HashSet;

const MAX_SLUG_LEN: usize = 100;

/// Derive the base slug for a URL: scheme stripped, lowercased,
/// non-alphanumeric runs collapsed to a single hyphen, hyphens trimmed at
/// both ends, capped at 100 characters.
pub fn slugify_url(url: &str) -> String {
    let lower = url.to_lowercase();
    let stripped = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);

    let mut slug = String::with_capacity(stripped.len());
    let mut pending_hyphen = false;
    for ch in stripped.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Make `base` unique within one index run.
///
/// Collisions append `-2`, `-3`, ... while keeping the candidate within the
/// slug cap; the base is trimmed to make room for the suffix so the loop
/// always makes progress even when the base is already at the cap. An empty
/// base falls back to `snapshot`.
pub fn ensure_unique_slug(base: &str, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { "snapshot" } else { base };
    let mut candidate = base.to_string();
    let mut counter = 2u32;
    while used.contains(&candidate) {
        let suffix = format!("-{counter}");
        let mut trimmed = base.to_string();
        trimmed.truncate(MAX_SLUG_LEN.saturating_sub(suffix.len()));
        candidate = format!("{trimmed}{suffix}");
        counter += 1;
    }
    used.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_collapses_separators() {
        assert_eq!(
            slugify_url("https://Example.com/Some/Path?q=1"),
            "example-com-some-path-q-1"
        );
        assert_eq!(slugify_url("http://example.com"), "example-com");
    }

    #[test]
    fn trims_leading_and_trailing_hyphens() {
        assert_eq!(slugify_url("https://example.com/"), "example-com");
        assert_eq!(slugify_url("https://///weird"), "weird");
    }

    #[test]
    fn caps_length_at_100() {
        let url = format!("https://example.com/{}", "a".repeat(200));
        assert_eq!(slugify_url(&url).len(), 100);
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(ensure_unique_slug("example-com", &mut used), "example-com");
        assert_eq!(
            ensure_unique_slug("example-com", &mut used),
            "example-com-2"
        );
        assert_eq!(
            ensure_unique_slug("example-com", &mut used),
            "example-com-3"
        );
    }

    #[test]
    fn empty_base_falls_back_to_snapshot() {
        let mut used = HashSet::new();
        assert_eq!(ensure_unique_slug("", &mut used), "snapshot");
        assert_eq!(ensure_unique_slug("", &mut used), "snapshot-2");
    }

    #[test]
    fn suffixed_candidates_stay_within_cap() {
        let long = "a".repeat(100);
        let mut used = HashSet::new();
        let first = ensure_unique_slug(&long, &mut used);
        let second = ensure_unique_slug(&long, &mut used);
        assert_eq!(first.len(), 100);
        assert_eq!(second.len(), 100);
        assert_ne!(first, second);
    }
}
