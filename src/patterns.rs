//! Lexical URL predicates. Tracked URLs are recognised by shape alone,
//! never by where they sit in a document.

use std::sync::OnceLock;

use regex::Regex;

/// `t.co` short links: fixed host, single path segment.
static TRACKED_URL: OnceLock<Regex> = OnceLock::new();

/// Anything that looks like the start of an http(s) URL.
static EXPANDED_URL: OnceLock<Regex> = OnceLock::new();

/// Compile a hardcoded pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid (compile-time invariant).
#[allow(clippy::expect_used, reason = "patterns are string literals")]
fn compile(pattern: &str) -> Regex {
    return Regex::new(pattern).expect("valid regex");
}

/// True if `value` is a `t.co` tracking link.
pub fn is_tracked_url(value: &str) -> bool {
    return TRACKED_URL
        .get_or_init(|| return compile(r"^https?://t\.co/\w+$"))
        .is_match(value);
}

/// True if `value` can stand in for a tracked URL: an http(s) URL that is not
/// itself a tracking link. Mapping a tracked URL onto another tracked URL
/// would make every later run "replace" it again.
pub fn is_expanded_url(value: &str) -> bool {
    let looks_like_url = EXPANDED_URL
        .get_or_init(|| return compile(r"(?i)^https?://\w"))
        .is_match(value);
    return looks_like_url && !is_tracked_url(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_urls() {
        assert!(is_tracked_url("https://t.co/abc123"));
        assert!(is_tracked_url("http://t.co/A_b"));
        assert!(!is_tracked_url("https://t.co/"));
        assert!(!is_tracked_url("https://t.co/abc/def"));
        assert!(!is_tracked_url("https://t.com/abc"));
        assert!(!is_tracked_url("see https://t.co/abc"));
    }

    #[test]
    fn expanded_urls() {
        assert!(is_expanded_url("https://example.com/page?q=1"));
        assert!(is_expanded_url("HTTP://Example.com"));
        assert!(!is_expanded_url("ftp://example.com"));
        assert!(!is_expanded_url("example.com"));
        assert!(!is_expanded_url("https://t.co/abc"));
    }
}
