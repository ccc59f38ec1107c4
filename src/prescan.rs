//! Pre-scans that find tracked→expanded pairs in message text rather than
//! in sibling fields.

use serde_json::{Map, Value};

use crate::patterns::{is_expanded_url, is_tracked_url};

/// `lang` value for tweets with no linguistic content, e.g. a bare link.
const NO_LINGUISTIC_CONTENT: &str = "zxx";

/// Find tracked URLs hidden in a record's `full_text`.
///
/// When the API has already expanded an entity (`url == expanded_url`), the
/// only remaining trace of the `t.co` link is the slice of `full_text` the
/// entity's `indices` point at. Offsets count Unicode code points.
pub fn full_text_pairs(record: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let Some(text) = record.get("full_text").and_then(Value::as_str) else {
        return pairs;
    };
    let Some(urls) = record
        .get("entities")
        .and_then(|entities| return entities.get("urls"))
        .and_then(Value::as_array)
    else {
        return pairs;
    };
    let text_is_link =
        record.get("lang").and_then(Value::as_str) == Some(NO_LINGUISTIC_CONTENT);

    for entity in urls {
        let url = entity.get("url").and_then(Value::as_str);
        let expanded = entity.get("expanded_url").and_then(Value::as_str);
        let (Some(url), Some(expanded)) = (url, expanded) else {
            continue;
        };
        if is_tracked_url(url) || url != expanded || !is_expanded_url(expanded) {
            continue;
        }

        let candidate = if text_is_link {
            Some(text.trim().to_owned())
        } else {
            entity.get("indices").and_then(|indices| return slice_by_indices(text, indices))
        };

        if let Some(tracked) = candidate.filter(|c| return is_tracked_url(c)) {
            pairs.push((tracked, expanded.to_owned()));
        }
    }

    return pairs;
}

/// Find expansions in a community-note `summary` of shape
/// `{ text, entities: [{ fromIndex, toIndex, ref: { url } }] }`.
///
/// Offsets are UTF-16 code units, the way the host page indexes strings.
pub fn summary_pairs(summary: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let Some(text) = summary.get("text").and_then(Value::as_str) else {
        return pairs;
    };
    let Some(entities) = summary.get("entities").and_then(Value::as_array) else {
        return pairs;
    };

    for entity in entities {
        let Some(url) = entity.pointer("/ref/url").and_then(Value::as_str) else {
            continue;
        };
        if !is_tracked_url(url) {
            continue;
        }
        let from = entity.get("fromIndex").and_then(Value::as_u64);
        let to = entity.get("toIndex").and_then(Value::as_u64);
        let (Some(from), Some(to)) = (from, to) else {
            continue;
        };
        if let Some(expanded) = slice_utf16(text, from, to).filter(|s| return is_expanded_url(s)) {
            pairs.push((url.to_owned(), expanded));
        }
    }

    return pairs;
}

/// Slice `text` by an entity's `[start, end]` code-point pair.
fn slice_by_indices(text: &str, indices: &Value) -> Option<String> {
    let start = usize::try_from(indices.get(0)?.as_u64()?).ok()?;
    let end = usize::try_from(indices.get(1)?.as_u64()?).ok()?;
    let len = end.checked_sub(start).filter(|len| return *len > 0)?;
    if text.chars().count() < end {
        return None;
    }
    return Some(text.chars().skip(start).take(len).collect());
}

/// Slice `text` by UTF-16 code-unit offsets. `None` if out of range or if the
/// range splits a surrogate pair.
fn slice_utf16(text: &str, from: u64, to: u64) -> Option<String> {
    let from = usize::try_from(from).ok()?;
    let to = usize::try_from(to).ok()?;
    let units: Vec<u16> = text.encode_utf16().collect();
    return String::from_utf16(units.get(from..to)?).ok();
}
