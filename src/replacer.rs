//! The tracked-URL replacer: walk a JSON document, rewrite every `t.co` link
//! whose expansion can be found anywhere in it, and report the rest.
//!
//! A run is two passes. The walk rewrites what it can immediately and parks
//! the rest as pending targets; the sweep then patches targets whose
//! expansion only turned up later in the walk.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::diagnostics;
use crate::patterns::{is_expanded_url, is_tracked_url};
use crate::prescan;
use crate::profile::Profile;
use crate::types::{Outcome, Segment, Target, Unresolved};

/// Predicate consulted before each write, given `(tracked, expanded)`.
/// Returning `false` leaves the field alone, e.g. when the host UI expands
/// that link itself.
pub type WriteFilter = Box<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// A configured replacer. Holds no per-document state, so one instance can
/// transform any number of documents, concurrently if need be.
pub struct Replacer {
    /// Which parts of a document to visit and which evidence to use.
    profile: Profile,
    /// Optional veto on individual writes.
    write_filter: Option<WriteFilter>,
}

impl Replacer {
    /// Create a replacer for the given profile.
    pub const fn new(profile: Profile) -> Self {
        return Self { profile, write_filter: None };
    }

    /// Install a predicate that can veto individual writes.
    #[must_use]
    pub fn with_write_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        self.write_filter = Some(Box::new(filter));
        return self;
    }

    /// The profile this replacer was built with.
    pub const fn profile(&self) -> &Profile {
        return &self.profile;
    }

    /// Rewrite tracked URLs in `document` in place.
    ///
    /// `label` only identifies the document in log output. Unresolved URLs
    /// are logged as a warning and returned in the outcome; they are never
    /// an error.
    pub fn transform(&self, document: &mut Value, label: &str) -> Outcome {
        let mut run = Run::new(&self.profile, self.write_filter.as_ref());
        run.visit_document(document);
        run.sweep(document);

        let outcome = Outcome { count: run.count, unresolved: run.unresolved };
        if !outcome.unresolved.is_empty() {
            tracing::warn!(
                label,
                unresolved = outcome.unresolved.len(),
                "unresolved tracked URLs:\n{}",
                diagnostics::render_unresolved(&outcome.unresolved)
            );
        }
        tracing::debug!(label, count = outcome.count, "transform complete");
        return outcome;
    }
}

/// Where a node sits, as a chain of borrowed segments on the call stack.
/// Only turned into a pointer when a target is parked.
struct Path<'a> {
    /// Enclosing node; `None` at the document root.
    parent: Option<&'a Path<'a>>,
    /// Step from the parent to this node.
    segment: Segment<'a>,
}

impl<'a> Path<'a> {
    /// Extend `parent` by one segment.
    const fn child(parent: Option<&'a Path<'a>>, segment: Segment<'a>) -> Self {
        return Self { parent, segment };
    }

    /// The pointer for a field under `path`.
    fn target(path: Option<&Path<'_>>) -> Target {
        let mut segments = Vec::new();
        let mut node = path;
        while let Some(current) = node {
            segments.push(current.segment);
            node = current.parent;
        }
        segments.reverse();
        return Target::from_segments(&segments);
    }
}

/// State for one `transform` call.
struct Run<'p> {
    /// Replacements made so far.
    count: usize,
    /// Veto on writes, if the caller installed one.
    filter: Option<&'p WriteFilter>,
    /// Profile driving this run.
    profile: &'p Profile,
    /// Tracked URL → expansion. The first expansion recorded wins.
    seen: HashMap<String, String>,
    /// Tracked URLs met before their expansion was known.
    unresolved: Unresolved,
}

impl<'p> Run<'p> {
    /// Fresh state for one document.
    fn new(profile: &'p Profile, filter: Option<&'p WriteFilter>) -> Self {
        return Self {
            count: 0,
            filter,
            profile,
            seen: HashMap::new(),
            unresolved: Unresolved::new(),
        };
    }

    /// Pick the entry point. Arrays and bare records are walked whole;
    /// envelopes only under their allow-listed roots.
    fn visit_document(&mut self, document: &mut Value) {
        if document.is_array() {
            self.visit_value(document, None);
            return;
        }
        let Value::Object(map) = document else {
            return;
        };
        if self.profile.is_record(map) {
            self.visit_fields(map, None, None);
            return;
        }

        let profile = self.profile;
        for (key, value) in map.iter_mut() {
            if !profile.document_roots.iter().any(|root| return root == key) {
                continue;
            }
            let path = Path::child(None, Segment::Key(key));
            self.visit_value(value, Some(&path));
        }
    }

    /// Descend into composites. Scalars outside a keyed field are inert.
    fn visit_value(&mut self, value: &mut Value, path: Option<&Path<'_>>) {
        match value {
            Value::Object(map) => self.visit_fields(map, None, path),
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let path = Path::child(path, Segment::Index(index));
                    self.visit_value(item, Some(&path));
                }
            },
            _ => {},
        }
    }

    /// Visit an object's fields in document order, optionally restricted to
    /// an allow-list. Evidence that needs the whole object (sibling
    /// expansions, pre-scans) is gathered on entry, before any field is
    /// borrowed mutably.
    fn visit_fields(
        &mut self,
        map: &mut Map<String, Value>,
        keep: Option<&HashSet<String>>,
        path: Option<&Path<'_>>,
    ) {
        let profile = self.profile;
        let visible = |key: &str| {
            return keep.is_none_or(|allowed| return allowed.contains(key))
                && !profile.pruned_keys.contains(key);
        };

        if profile.full_text_prescan && visible("full_text") {
            for (tracked, expanded) in prescan::full_text_pairs(map) {
                self.remember(tracked, expanded);
            }
        }
        if profile.summary_prescan
            && visible("summary")
            && let Some(summary) = map.get("summary")
        {
            for (tracked, expanded) in prescan::summary_pairs(summary) {
                self.remember(tracked, expanded);
            }
        }
        let sibling = self.sibling_expansion(map);

        for (key, value) in map.iter_mut() {
            if !visible(key) {
                continue;
            }
            let path = Path::child(path, Segment::Key(key));
            self.visit_field(key, value, sibling.as_deref(), &path);
        }
    }

    /// Dispatch on a field name. `sibling` is the expansion carried by the
    /// enclosing object, if any.
    fn visit_field(&mut self, key: &str, value: &mut Value, sibling: Option<&str>, path: &Path<'_>) {
        let profile = self.profile;

        if key == "binding_values" && profile.reduce_binding_values {
            self.visit_card_url(value, path);
            return;
        }
        if key == "legacy"
            && let Some(allowed) = &profile.legacy_keys
            && let Value::Object(legacy) = value
        {
            self.visit_fields(legacy, Some(allowed), Some(path));
            return;
        }
        if profile.url_keys.contains(key)
            && let Some(tracked) = value.as_str().filter(|v| return is_tracked_url(v))
        {
            let tracked = tracked.to_owned();
            self.resolve_field(value, tracked, sibling, path);
            return;
        }

        self.visit_value(value, Some(path));
    }

    /// Visit only the `card_url` binding. Cards carry dozens of bindings,
    /// either as `[{ key, value }]` or as an object keyed by name.
    fn visit_card_url(&mut self, bindings: &mut Value, path: &Path<'_>) {
        match bindings {
            Value::Array(entries) => {
                for (index, entry) in entries.iter_mut().enumerate() {
                    if entry.get("key").and_then(Value::as_str) != Some("card_url") {
                        continue;
                    }
                    let path = Path::child(Some(path), Segment::Index(index));
                    self.visit_value(entry, Some(&path));
                }
            },
            Value::Object(map) => {
                if let Some(card_url) = map.get_mut("card_url") {
                    let path = Path::child(Some(path), Segment::Key("card_url"));
                    self.visit_value(card_url, Some(&path));
                }
            },
            _ => {},
        }
    }

    /// Rewrite a field holding a tracked URL, or park it for the sweep.
    fn resolve_field(&mut self, slot: &mut Value, tracked: String, sibling: Option<&str>, path: &Path<'_>) {
        if let Some(expanded) = self.seen.get(&tracked).cloned() {
            self.write(slot, &tracked, expanded);
            return;
        }

        if let Some(expanded) = sibling {
            self.remember(tracked.clone(), expanded.to_owned());
            self.write(slot, &tracked, expanded.to_owned());
            return;
        }

        let target = Path::target(Some(path));
        self.unresolved.entry(tracked).or_default().push(target);
    }

    /// An expansion carried by a sibling field (`expanded_url` etc.).
    fn sibling_expansion(&self, map: &Map<String, Value>) -> Option<String> {
        return self.profile.expansion_keys.iter().find_map(|key| {
            return map
                .get(key)
                .and_then(Value::as_str)
                .filter(|value| return is_expanded_url(value))
                .map(str::to_owned);
        });
    }

    /// Record an expansion unless one is already known.
    fn remember(&mut self, tracked: String, expanded: String) {
        self.seen.entry(tracked).or_insert(expanded);
    }

    /// True if the caller's filter (if any) allows this write.
    fn allows(&self, tracked: &str, expanded: &str) -> bool {
        return self.filter.is_none_or(|filter| return filter(tracked, expanded));
    }

    /// Overwrite `slot` with the expansion and count it.
    fn write(&mut self, slot: &mut Value, tracked: &str, expanded: String) {
        if !self.allows(tracked, &expanded) {
            return;
        }
        *slot = Value::String(expanded);
        self.count = self.count.saturating_add(1);
    }

    /// Patch pending targets whose expansion turned up later in the walk.
    /// Whatever is left afterwards has no expansion in this document.
    fn sweep(&mut self, document: &mut Value) {
        let pending = std::mem::take(&mut self.unresolved);

        for (tracked, targets) in pending {
            let Some(expanded) = self.seen.get(&tracked).cloned() else {
                self.unresolved.insert(tracked, targets);
                continue;
            };
            if !self.allows(&tracked, &expanded) {
                continue;
            }
            for target in &targets {
                let Some(slot) = document.pointer_mut(&target.pointer) else {
                    continue;
                };
                if slot.as_str() != Some(tracked.as_str()) {
                    continue;
                }
                *slot = Value::String(expanded.clone());
                self.count = self.count.saturating_add(1);
            }
        }
    }
}
