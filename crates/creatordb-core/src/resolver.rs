//! Profile URL resolution: mapping a free-form profile URL (or bare handle)
//! to a `(platform, username)` pair.
//!
//! Resolution failure is an expected user-input outcome and is reported as
//! `None`, never as an error.

use regex::Regex;

use crate::platform::Platform;

/// Normalizes a username for use as a join key: trimmed, trailing slash
/// stripped, lowercased. Applied before every comparison and before any
/// record is persisted.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_lowercase()
}

/// Attempts to resolve a full profile URL into `(platform, username)`.
///
/// Patterns are tried in order; the first match wins. Returns `None` when no
/// platform pattern matches; callers must treat this as a user-input
/// validation outcome, not a system fault.
#[must_use]
pub fn resolve(input: &str) -> Option<(Platform, String)> {
    let input = input.trim();

    // Anchored to each platform's canonical path segment. LinkedIn first
    // would also work; order only matters if a URL could match both, which
    // these hostname anchors rule out.
    let instagram =
        Regex::new(r"instagram\.com/([A-Za-z0-9._]+)/?(?:[?#].*)?$").expect("valid instagram regex");
    let linkedin =
        Regex::new(r"linkedin\.com/in/([^/?#]+)").expect("valid linkedin regex");

    if let Some(caps) = instagram.captures(input) {
        return Some((Platform::Instagram, normalize_username(&caps[1])));
    }
    if let Some(caps) = linkedin.captures(input) {
        return Some((Platform::Linkedin, normalize_username(&caps[1])));
    }
    None
}

/// Extracts a username for a known platform from either a full profile URL
/// or a bare handle.
///
/// URLs must match the platform's own pattern (a URL for the *other*
/// platform is rejected). Bare handles are validated against the platform's
/// handle character set.
#[must_use]
pub fn username_for(platform: Platform, input: &str) -> Option<String> {
    let input = input.trim();

    if let Some((resolved_platform, username)) = resolve(input) {
        return (resolved_platform == platform).then_some(username);
    }

    // Anything that still looks like a URL path but didn't resolve is invalid.
    if input.contains('/') {
        return None;
    }

    let handle = normalize_username(input.trim_start_matches('@'));
    if handle.is_empty() {
        return None;
    }
    let valid = match platform {
        Platform::Instagram => handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_'),
        Platform::Linkedin => handle.chars().all(|c| c != '/' && c != '?' && c != '#' && !c.is_whitespace()),
    };
    valid.then_some(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_instagram_profile_url() {
        assert_eq!(
            resolve("https://www.instagram.com/jdoe/"),
            Some((Platform::Instagram, "jdoe".to_string()))
        );
    }

    #[test]
    fn resolves_linkedin_profile_url() {
        assert_eq!(
            resolve("https://www.linkedin.com/in/jdoe-99/"),
            Some((Platform::Linkedin, "jdoe-99".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_host() {
        assert_eq!(resolve("https://example.com/jdoe"), None);
    }

    #[test]
    fn strips_trailing_slash_and_lowercases() {
        assert_eq!(
            resolve("https://instagram.com/JDoe.Official/"),
            Some((Platform::Instagram, "jdoe.official".to_string()))
        );
    }

    #[test]
    fn resolves_linkedin_url_with_query_suffix() {
        assert_eq!(
            resolve("https://www.linkedin.com/in/jdoe-99?utm=x"),
            Some((Platform::Linkedin, "jdoe-99".to_string()))
        );
    }

    #[test]
    fn username_for_accepts_bare_handle() {
        assert_eq!(
            username_for(Platform::Instagram, "jdoe.official"),
            Some("jdoe.official".to_string())
        );
        assert_eq!(
            username_for(Platform::Linkedin, "@jdoe-99"),
            Some("jdoe-99".to_string())
        );
    }

    #[test]
    fn username_for_rejects_cross_platform_url() {
        assert_eq!(
            username_for(Platform::Instagram, "https://www.linkedin.com/in/jdoe-99/"),
            None
        );
    }

    #[test]
    fn username_for_rejects_invalid_handle_charset() {
        assert_eq!(username_for(Platform::Instagram, "not a handle!"), None);
        assert_eq!(username_for(Platform::Instagram, ""), None);
    }

    #[test]
    fn normalize_username_is_a_stable_join_key() {
        assert_eq!(normalize_username(" JDoe/ "), "jdoe");
        assert_eq!(normalize_username("jdoe"), "jdoe");
    }
}
