/// Core domain types for a replacement run: pending targets and outcomes.
use std::fmt;

use indexmap::IndexMap;

/// One step from a node to its child: an object key or an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Object member, borrowed from the document.
    Key(&'a str),
    /// Array element.
    Index(usize),
}

/// A field still holding an unresolved tracked URL, addressed by its
/// RFC 6901 JSON Pointer from the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Pointer to the field, e.g. `/data/legacy/retweeted_status/url`.
    pub pointer: String,
}

impl Target {
    /// Build a target from the path segments leading to the field.
    pub fn from_segments(segments: &[Segment<'_>]) -> Self {
        let mut pointer = String::new();
        for segment in segments {
            pointer.push('/');
            match *segment {
                Segment::Key(key) => {
                    for c in key.chars() {
                        match c {
                            '~' => pointer.push_str("~0"),
                            '/' => pointer.push_str("~1"),
                            _ => pointer.push(c),
                        }
                    }
                },
                Segment::Index(index) => pointer.push_str(&index.to_string()),
            }
        }
        return Self { pointer };
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.pointer);
    }
}

/// Tracked URL → every target still holding it, in the order first seen.
pub type Unresolved = IndexMap<String, Vec<Target>>;

/// What a single `transform` call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Number of fields rewritten to their expanded URL.
    pub count: usize,
    /// Tracked URLs whose expansion appears nowhere in the document.
    pub unresolved: Unresolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_from_segments() {
        let segments = [Segment::Key("data"), Segment::Index(0), Segment::Key("url")];
        assert_eq!(Target::from_segments(&segments).pointer, "/data/0/url");
    }

    #[test]
    fn pointer_escapes_tilde_and_slash() {
        let segments = [Segment::Key("a/b"), Segment::Key("c~d")];
        assert_eq!(Target::from_segments(&segments).pointer, "/a~1b/c~0d");
    }

    #[test]
    fn numeric_keys_and_indices_look_alike() {
        let segments = [Segment::Key("0"), Segment::Index(0)];
        assert_eq!(Target::from_segments(&segments).pointer, "/0/0");
    }

    #[test]
    fn empty_path_is_document_root() {
        assert_eq!(Target::from_segments(&[]).pointer, "");
    }
}
