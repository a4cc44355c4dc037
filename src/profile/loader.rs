//! Profile loading from JSON strings, files and directories.
//!
//! Profiles use the JSON layout `{"freq": {...}, "n_words": [n1, n2, n3], "name": "xx"}`,
//! one language per file. Loaders only parse and validate; building the
//! shared index is left to [`ProfileIndex::build`](super::ProfileIndex::build).

use std::path::Path;

use crate::error::{ProfileError, ProfileResult};

use super::LanguageProfile;

/// Parse one profile from a JSON string.
pub fn profile_from_json(json: &str) -> ProfileResult<LanguageProfile> {
    parse_named(json, "<string>")
}

/// Parse a list of JSON-encoded profiles, keeping their order.
pub fn load_profiles_json<S: AsRef<str>>(profiles: &[S]) -> ProfileResult<Vec<LanguageProfile>> {
    profiles
        .iter()
        .enumerate()
        .map(|(i, json)| parse_named(json.as_ref(), &format!("<string #{i}>")))
        .collect()
}

/// Load one profile file.
pub fn load_profile(path: &Path) -> ProfileResult<LanguageProfile> {
    let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_named(&content, &path.display().to_string())
}

/// Load every profile file in a directory.
///
/// Hidden entries and non-files are skipped. Files are read in file-name
/// order so the resulting language order is stable across platforms.
pub fn load_profile_dir(dir: &Path) -> ProfileResult<Vec<LanguageProfile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ProfileError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ProfileError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !path.is_file() {
            tracing::warn!(path = %path.display(), "skipping non-profile entry");
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    if paths.is_empty() {
        return Err(ProfileError::EmptyDirectory {
            path: dir.display().to_string(),
        });
    }

    let profiles = paths
        .iter()
        .map(|p| load_profile(p))
        .collect::<ProfileResult<Vec<_>>>()?;
    tracing::info!(
        dir = %dir.display(),
        profiles = profiles.len(),
        "loaded language profiles"
    );
    Ok(profiles)
}

fn parse_named(json: &str, source_name: &str) -> ProfileResult<LanguageProfile> {
    let profile: LanguageProfile =
        serde_json::from_str(json).map_err(|e| ProfileError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
    profile.validate()?;
    Ok(profile)
}
