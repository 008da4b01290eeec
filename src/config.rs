//! Build constants and the optional per-project configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Longest literal text a single string property may carry. Longer content is
/// split into chunk children, which keeps every emitted value under the host
/// format's field-size ceiling.
pub const MAX_VALUE_LENGTH: usize = 199_999;

/// `version` attribute of the document envelope.
pub const MODEL_FORMAT_VERSION: u32 = 4;

/// Referent ids are emitted as this prefix plus the numeric id.
pub const REFERENT_PREFIX: &str = "RBX";

/// Class used for directory container nodes.
pub const CONTAINER_CLASS: &str = "Folder";

/// Marker property set on a node whose string content was split into chunks.
pub const CHUNK_MARKER_PROPERTY: &str = "Chunked";

/// Top-level entry stem always compiled as the server entry script.
pub const SERVER_ENTRY_NAME: &str = "Server";

/// Top-level entry stem always compiled as the client entry script.
pub const CLIENT_ENTRY_NAME: &str = "Client";

/// Extensions treated as inline source: scripts or plain values, dispatched
/// on the secondary extension.
pub const SOURCE_EXTENSIONS: &[&str] = &["lua", "txt"];

/// Extension holding a numeric asset id.
pub const ASSET_EXTENSION: &str = "asset";

/// Directory entries never compiled.
pub const IGNORED_ENTRIES: &[&str] = &[".git"];

/// Name of the optional per-project configuration file.
pub const CONFIG_FILENAME: &str = "rbxbuild.json";

/// Destination used when neither the CLI nor the project file names one.
pub const DEFAULT_OUTPUT: &str = "model.rbxmx";

fn default_check_syntax() -> bool {
    true
}

/// Optional project file next to the source tree. Command-line arguments win
/// over anything configured here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Source directory to compile, relative to the project folder.
    pub source: Option<String>,
    /// Destinations the assembled document is written to, relative to the
    /// project folder.
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
    /// Class of the root container node.
    pub root_class: Option<String>,
    /// `Name` property of the root container node.
    pub root_name: Option<String>,
    /// Whether script sources pass the best-effort syntax scan.
    #[serde(default = "default_check_syntax")]
    pub check_syntax: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            source: None,
            outputs: Vec::new(),
            root_class: None,
            root_name: None,
            check_syntax: true,
        }
    }
}

impl ProjectConfig {
    /// Load `rbxbuild.json` from `folder`. A missing file yields the default
    /// configuration; an unparsable one is fatal.
    pub fn load(folder: &Path) -> Result<ProjectConfig> {
        let path = folder.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(ProjectConfig::default());
        }
        let raw = fs::read_to_string(&path).with_context(|| format!("Could not read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Could not parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_a_full_project_file() {
        let config: ProjectConfig = serde_json::from_str(
            r#"{
                "source": "src",
                "outputs": ["out/game.rbxmx", "backup/game.rbxmx"],
                "rootClass": "Workspace",
                "rootName": "Game",
                "checkSyntax": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.source.as_deref(), Some("src"));
        assert_eq!(config.outputs.len(), 2);
        assert_eq!(config.root_class.as_deref(), Some("Workspace"));
        assert_eq!(config.root_name.as_deref(), Some("Game"));
        assert!(!config.check_syntax);
    }

    #[test]
    fn an_empty_object_means_defaults() {
        let config: ProjectConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert!(config.check_syntax);
    }

    #[test]
    fn a_missing_file_loads_as_defaults() {
        let dir = tempdir().unwrap();
        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn a_malformed_file_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        let error = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(error.to_string().contains(CONFIG_FILENAME));
    }
}
