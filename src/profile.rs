//! Replacement profiles: which parts of a document the replacer visits and
//! which extra evidence it looks for.
//!
//! The Twitter API has changed shape several times, and each client
//! (twitter.com, TweetDeck, the old XHR endpoints) sees a slightly different
//! document. Rather than forking the engine per client, each variant is a
//! `Profile` value.

use std::collections::HashSet;

use crate::error::Error;

/// Envelope keys that hold embedded tweet/user data. `timeline` is
/// deliberately absent: it is large and only holds references to records.
const DOCUMENT_ROOTS: &[&str] = &[
    "data",
    "globalObjects",
    "inbox_initial_state",
    "inbox_timeline",
    "response",
    "conversation_timeline",
    "twitter_objects",
];

/// Keys that mark a top-level object as a single tweet or user record.
const RECORD_MARKERS: &[&str] = &["id_str"];

/// Subtrees that never lead to tracked URLs or their expansions.
const PRUNED_KEYS: &[&str] = &[
    "advertiser_account_service_levels",
    "advertiser_account_type",
    "card_platform",
    "client_event_info",
    "edit_control",
    "ext",
    "ext_media_availability",
    "ext_media_color",
    "feature_switches",
    "features",
    "feedbackInfo",
    "focus_rects",
    "hashtags",
    "impression_id",
    "indices",
    "media_color",
    "media_features",
    "original_info",
    "player_image_color",
    "profile_banner_extensions",
    "profile_banner_extensions_media_color",
    "profile_image_extensions",
    "profile_image_extensions_media_color",
    "promoted_metadata",
    "responseObjects",
    "sizes",
    "symbols",
    "tracking",
    "user_mentions",
    "video_info",
];

/// `legacy` keys that can hold tracked URLs or their expansions.
const LEGACY_KEYS: &[&str] = &[
    "binding_values",
    "entities",
    "extended_entities",
    "quoted_status_permalink",
    "retweeted_status",
    "retweeted_status_result",
    "user_refs",
];

/// Extra `legacy` keys the standalone twitter.com profile keeps for its
/// full-text pre-scan and user profile links.
const LEGACY_TEXT_KEYS: &[&str] = &["full_text", "lang", "url"];

/// Fields that get rewritten when they hold a tracked URL.
const URL_KEYS: &[&str] = &["url", "string_value"];

/// Name of the profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "graphql";

/// Names of all built-in profiles.
pub const PROFILE_NAMES: &[&str] = &["graphql", "twitter", "tweetdeck", "xhr"];

/// Allow-lists and pre-scan switches for one API variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Envelope keys visited when the document is not a bare record.
    pub document_roots: Vec<String>,
    /// Sibling fields whose http(s) value expands a tracked URL.
    pub expansion_keys: Vec<String>,
    /// Register tracked URLs found inline in `full_text`.
    pub full_text_prescan: bool,
    /// Keys of a `legacy` object that are visited; `None` visits them all.
    pub legacy_keys: Option<HashSet<String>>,
    /// Profile identifier.
    pub name: String,
    /// Keys whose subtrees are never visited.
    pub pruned_keys: HashSet<String>,
    /// Keys whose presence marks a top-level object as a record.
    pub record_markers: Vec<String>,
    /// Visit only the `card_url` entry of `binding_values`.
    pub reduce_binding_values: bool,
    /// Register expansions found in community-note `summary` entities.
    pub summary_prescan: bool,
    /// Fields rewritten when they hold a tracked URL.
    pub url_keys: HashSet<String>,
}

impl Default for Profile {
    fn default() -> Self {
        return Self::graphql();
    }
}

impl Profile {
    /// Look up a built-in profile by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProfile` if no built-in profile has that name.
    pub fn builtin(name: &str) -> Result<Self, Error> {
        return match name {
            "graphql" => Ok(Self::graphql()),
            "twitter" => Ok(Self::twitter()),
            "tweetdeck" => Ok(Self::tweetdeck()),
            "xhr" => Ok(Self::xhr()),
            _ => Err(Error::UnknownProfile { name: name.to_owned() }),
        };
    }

    /// GraphQL-era twitter.com documents.
    pub fn graphql() -> Self {
        return Self {
            document_roots: strings(DOCUMENT_ROOTS),
            expansion_keys: vec!["expanded_url".to_owned()],
            full_text_prescan: false,
            legacy_keys: Some(string_set(LEGACY_KEYS)),
            name: "graphql".to_owned(),
            pruned_keys: string_set(PRUNED_KEYS),
            record_markers: strings(RECORD_MARKERS),
            reduce_binding_values: true,
            summary_prescan: false,
            url_keys: string_set(URL_KEYS),
        };
    }

    /// The standalone twitter.com script: also mines `full_text` for links
    /// the API has already expanded in `entities`.
    pub fn twitter() -> Self {
        let mut profile = Self::graphql();
        profile.name = "twitter".to_owned();
        profile.full_text_prescan = true;
        if let Some(keys) = &mut profile.legacy_keys {
            keys.extend(LEGACY_TEXT_KEYS.iter().map(|k| return (*k).to_owned()));
        }
        return profile;
    }

    /// TweetDeck, where community notes carry their links in `summary`.
    pub fn tweetdeck() -> Self {
        let mut profile = Self::graphql();
        profile.name = "tweetdeck".to_owned();
        profile.summary_prescan = true;
        return profile;
    }

    /// Pre-GraphQL XHR responses: entities may use `expanded`, and records
    /// have no `legacy` wrapper to reduce.
    pub fn xhr() -> Self {
        let mut profile = Self::graphql();
        profile.name = "xhr".to_owned();
        profile.expansion_keys.push("expanded".to_owned());
        profile.legacy_keys = None;
        profile.document_roots.push("user_events".to_owned());
        return profile;
    }

    /// True if a top-level object is a record rather than an envelope.
    pub fn is_record(&self, map: &serde_json::Map<String, serde_json::Value>) -> bool {
        return self.record_markers.iter().any(|marker| return map.contains_key(marker));
    }
}

/// Owned copies of a static key list.
fn strings(keys: &[&str]) -> Vec<String> {
    return keys.iter().map(|k| return (*k).to_owned()).collect();
}

/// Owned set of a static key list.
fn string_set(keys: &[&str]) -> HashSet<String> {
    return keys.iter().map(|k| return (*k).to_owned()).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_profile_is_builtin() {
        for name in PROFILE_NAMES {
            let profile = Profile::builtin(name);
            assert!(profile.is_ok(), "missing builtin {name}");
        }
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let result = Profile::builtin("mastodon");
        assert!(matches!(result, Err(Error::UnknownProfile { name }) if name == "mastodon"));
    }

    #[test]
    fn timeline_is_never_a_document_root() {
        for name in PROFILE_NAMES {
            let Ok(profile) = Profile::builtin(name) else { continue };
            assert!(!profile.document_roots.iter().any(|r| r == "timeline"), "{name}");
        }
    }

    #[test]
    fn twitter_keeps_message_text() {
        let Some(keys) = Profile::twitter().legacy_keys else {
            panic!("twitter reduces legacy");
        };
        assert!(keys.contains("full_text"));
        assert!(keys.contains("lang"));
        assert!(!Profile::graphql().legacy_keys.unwrap_or_default().contains("full_text"));
    }

    #[test]
    fn xhr_accepts_expanded() {
        let profile = Profile::xhr();
        assert!(profile.expansion_keys.iter().any(|k| k == "expanded"));
        assert_eq!(profile.legacy_keys, None);
    }
}
