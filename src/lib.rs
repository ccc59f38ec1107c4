//! Expand `t.co` tracking links in Twitter API responses.
//!
//! The [`Replacer`] walks a parsed JSON response, finds every `t.co` link
//! whose destination is given anywhere in the same document, and rewrites it
//! in place. [`intercept::Interceptor`] wraps it with what a host around the
//! page's HTTP client needs: request classification, a blacklist, and
//! pass-through for bodies it cannot parse.

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod intercept;
pub mod patterns;
mod prescan;
pub mod profile;
pub mod replacer;
pub mod tally;
pub mod types;

pub use replacer::Replacer;

/// Transform `document` with the default profile and return the number of
/// links rewritten.
pub fn transform(document: &mut serde_json::Value, label: &str) -> usize {
    return Replacer::new(profile::Profile::default()).transform(document, label).count;
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, reason = "test assertions")]
mod tests {
    use serde_json::json;

    #[test]
    fn transform_returns_replacement_count() {
        let mut document = json!({ "data": {
            "legacy": { "retweeted_status": { "url": "https://t.co/xyz" } },
            "extended_entities": { "media": [{
                "expanded_url": "https://example.com/photo",
                "url": "https://t.co/xyz"
            }] }
        } });
        assert_eq!(crate::transform(&mut document, "/graphql/TweetDetail"), 2);
        assert_eq!(document["data"]["legacy"]["retweeted_status"]["url"], "https://example.com/photo");
        assert_eq!(crate::transform(&mut document, "/graphql/TweetDetail"), 0);
    }
}
