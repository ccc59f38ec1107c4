use std::path::Path;

use crate::error::Error;
use crate::profile::{DEFAULT_PROFILE, Profile};

/// Name of the optional config file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".twitter-direct.toml";

/// Settings loaded from `.twitter-direct.toml`: a built-in profile plus
/// local adjustments to its key lists.
#[derive(Debug)]
pub struct Config {
    /// Extra document types the interceptor passes through untouched.
    pub blacklist: Vec<String>,
    /// Profile with the file's adjustments applied.
    pub profile: Profile,
}

/// Raw TOML structure for `.twitter-direct.toml`.
#[derive(serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TwitterDirectTomlConfig {
    #[serde(default)]
    blacklist: Vec<String>,
    #[serde(default)]
    document_roots: Option<Vec<String>>,
    #[serde(default)]
    legacy_keys: Vec<String>,
    #[serde(default)]
    profile: Option<String>,
    #[serde(default)]
    prune: Vec<String>,
}

impl Config {
    /// Load config from `.twitter-direct.toml` in the given root directory.
    /// A missing file means the default profile, unadjusted. A file that
    /// exists but is malformed is an error: never silently fall back to
    /// defaults when the user wrote a config file.
    ///
    /// `profile_override` (the `--profile` flag) wins over the file's
    /// `profile` key.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::UnknownProfile` if the profile name is not built in.
    pub fn load(root: &Path, profile_override: Option<&str>) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TwitterDirectTomlConfig::default(),
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::from_raw(raw, profile_override);
    }

    /// Apply the raw file contents to the selected built-in profile.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProfile` if the profile name is not built in.
    fn from_raw(raw: TwitterDirectTomlConfig, profile_override: Option<&str>) -> Result<Self, Error> {
        let name = profile_override.or(raw.profile.as_deref()).unwrap_or(DEFAULT_PROFILE);
        let mut profile = Profile::builtin(name)?;

        if let Some(roots) = raw.document_roots {
            profile.document_roots = roots;
        }
        profile.pruned_keys.extend(raw.prune);
        match &mut profile.legacy_keys {
            Some(keys) => keys.extend(raw.legacy_keys),
            None if !raw.legacy_keys.is_empty() => {
                tracing::warn!(
                    profile = %profile.name,
                    keys = ?raw.legacy_keys,
                    "legacy_keys ignored: this profile visits legacy objects whole"
                );
            },
            None => {},
        }

        return Ok(Self { blacklist: raw.blacklist, profile });
    }
}
