use std::fmt::Write as _;

use crate::error::Error;
use crate::profile::PROFILE_NAMES;
use crate::types::Unresolved;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic: what happened and,
/// where there is one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::InvalidJson { path, source } => format!("\
# Error: Invalid JSON

`{}` is not a JSON document: {source}

## Fix

Pass the raw response body of an API request, e.g. saved from the
browser's network panel.
", path.display()),

        Error::UnknownProfile { name } => render_unknown_profile(name),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`.twitter-direct.toml` could not be parsed: {e}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::Serialize(e) => format!("\
# Error: JSON Serialization

{e}
"),
    };
}

fn render_unknown_profile(name: &str) -> String {
    let mut out = format!("\
# Error: Unknown Profile

No profile named `{name}`.

## Available profiles

");
    for profile in PROFILE_NAMES {
        let _ = writeln!(out, "- `{profile}`");
    }
    return out;
}

/// One line per unresolved tracked URL, listing the fields still holding it.
pub fn render_unresolved(unresolved: &Unresolved) -> String {
    let mut out = String::new();
    for (tracked, targets) in unresolved {
        let pointers = targets
            .iter()
            .map(|t| return t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "{tracked} -> {pointers}");
    }
    return out;
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::types::Target;

    #[test]
    fn unresolved_lists_every_target() {
        let mut unresolved = Unresolved::new();
        unresolved.insert(
            "https://t.co/a".to_owned(),
            vec![
                Target { pointer: "/data/url".to_owned() },
                Target { pointer: "/data/card/url".to_owned() },
            ],
        );
        unresolved.insert("https://t.co/b".to_owned(), vec![Target { pointer: "/0/url".to_owned() }]);
        assert_eq!(
            render_unresolved(&unresolved),
            "https://t.co/a -> /data/url, /data/card/url\nhttps://t.co/b -> /0/url\n"
        );
    }

    #[test]
    fn unknown_profile_lists_alternatives() {
        let md = render_error(&Error::UnknownProfile { name: "bluesky".to_owned() });
        assert!(md.starts_with("# Error: Unknown Profile"));
        assert!(md.contains("- `tweetdeck`"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let md = render_error(&Error::FileNotFound { path: PathBuf::from("dump.json") });
        assert!(md.contains("`dump.json` does not exist."));
    }
}
