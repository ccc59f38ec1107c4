//! The host side: decide whether an intercepted response is worth
//! transforming, run the replacer over it, and hand back the body the page
//! should see.

use std::collections::HashSet;

use serde_json::Value;

use crate::classify;
use crate::replacer::Replacer;
use crate::tally::ReplacementTally;

/// Document types that never carry tweets or users.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "/badge_count/badge_count",
    "/graphql/articleNudgeDomains",
    "/graphql/TopicToFollowSidebar",
    "/hashflags",
    "/live_pipeline/update_subscriptions",
];

/// Why a response was passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The document type is blacklisted.
    Blacklisted,
    /// The response body is not valid JSON.
    InvalidJson,
    /// The response is not JSON at all.
    NotJson,
}

/// Result of intercepting one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// The response was not transformed.
    Skipped {
        /// Classified document type.
        document_type: String,
        /// Why it was skipped.
        reason: SkipReason,
    },
    /// Transformed, but nothing was replaced; the original body stands.
    Unchanged {
        /// Classified document type.
        document_type: String,
    },
    /// Transformed with at least one replacement.
    Rewritten {
        /// Re-serialized document.
        body: String,
        /// Number of replacements.
        count: usize,
        /// Classified document type.
        document_type: String,
    },
}

impl Interception {
    /// The body the page should read in place of `original`.
    pub fn body<'a>(&'a self, original: &'a str) -> &'a str {
        return match self {
            Self::Rewritten { body, .. } => body.as_str(),
            Self::Skipped { .. } | Self::Unchanged { .. } => original,
        };
    }
}

/// Wraps a replacer with the checks and bookkeeping a host does around it.
pub struct Interceptor {
    /// Document types to pass through untouched.
    blacklist: HashSet<String>,
    /// Engine run on every eligible response.
    replacer: Replacer,
    /// Per-type replacement totals.
    tally: ReplacementTally,
}

impl Interceptor {
    /// Build an interceptor with `DEFAULT_BLACKLIST` plus `extra_blacklist`.
    pub fn new(replacer: Replacer, extra_blacklist: &[String]) -> Self {
        let mut blacklist: HashSet<String> =
            DEFAULT_BLACKLIST.iter().map(|t| return (*t).to_owned()).collect();
        blacklist.extend(extra_blacklist.iter().cloned());
        return Self { blacklist, replacer, tally: ReplacementTally::default() };
    }

    /// True if responses of this type are never transformed.
    pub fn is_blacklisted(&self, document_type: &str) -> bool {
        return self.blacklist.contains(document_type);
    }

    /// The wrapped replacer, for callers that already hold a parsed document.
    pub const fn replacer(&self) -> &Replacer {
        return &self.replacer;
    }

    /// Totals recorded so far.
    pub const fn tally(&self) -> &ReplacementTally {
        return &self.tally;
    }

    /// Handle one intercepted response.
    ///
    /// A body that fails to parse is logged and passed through: the page
    /// gets exactly what the server sent.
    pub fn intercept(&self, request_url: &str, content_type: Option<&str>, body: &str) -> Interception {
        let document_type = classify::document_type(request_url);

        if self.is_blacklisted(&document_type) {
            return Interception::Skipped { document_type, reason: SkipReason::Blacklisted };
        }
        if !content_type.is_some_and(is_json_content_type) {
            return Interception::Skipped { document_type, reason: SkipReason::NotJson };
        }

        let mut document: Value = match serde_json::from_str(body) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(document_type = %document_type, error = %e, "response body is not valid JSON, passing it through");
                return Interception::Skipped { document_type, reason: SkipReason::InvalidJson };
            },
        };

        let outcome = self.replacer.transform(&mut document, &document_type);
        let total = self.tally.record(&document_type, outcome.count);
        tracing::info!(
            document_type = %document_type,
            bytes = body.len(),
            count = outcome.count,
            total,
            "transformed response"
        );

        if outcome.count == 0 {
            return Interception::Unchanged { document_type };
        }
        return match serde_json::to_string(&document) {
            Ok(body) => Interception::Rewritten { body, count: outcome.count, document_type },
            Err(e) => {
                tracing::warn!(document_type = %document_type, error = %e, "could not re-serialize response");
                Interception::Unchanged { document_type }
            },
        };
    }
}

/// `application/json`, with or without parameters, plus `+json` suffixes.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    return essence == "application/json" || essence.ends_with("+json");
}
