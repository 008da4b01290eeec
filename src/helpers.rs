//! File-name helpers shared by the classifier, the tree compiler and the
//! watcher.

use std::path::Path;

use crate::config;

/// The last dot-separated segment, lowercased. `None` for names with no dot,
/// a trailing dot, or only a leading dot (`.git` has no extension).
pub fn extension(file_name: &str) -> Option<String> {
    match file_name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

/// The segment between the last two dots, lowercased: `x.server.lua` →
/// `server`.
pub fn secondary_extension(file_name: &str) -> Option<String> {
    let (base, _) = file_name.rsplit_once('.')?;
    let (_, secondary) = base.rsplit_once('.')?;
    if secondary.is_empty() {
        None
    } else {
        Some(secondary.to_ascii_lowercase())
    }
}

/// Everything before the last dot; the whole name when there is none.
pub fn base_name(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => file_name,
    }
}

/// Node name for a marked script file: the name with both the secondary and
/// the final extension stripped (`script.server.lua` → `script`).
pub fn script_name(file_name: &str) -> &str {
    base_name(base_name(file_name))
}

/// The name up to the first dot, used for reserved entry detection.
pub fn entry_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

pub fn is_source_extension(extension: &str) -> bool {
    config::SOURCE_EXTENSIONS.contains(&extension)
}

pub fn is_ignored_entry(file_name: &str) -> bool {
    config::IGNORED_ENTRIES.contains(&file_name)
}

/// Name for a directory's container node. Callers canonicalize the tree root
/// first, so a bare `.` never reaches this.
pub fn directory_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
