//! Server configuration file.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use meditree_core::{BuildConfig, Classifier, PatternError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "meditree.json";

/// Contents of `meditree.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Display name served in the listing.
    pub name: String,

    /// Directory to index.
    pub root: PathBuf,

    /// Port to listen on.
    pub port: u16,

    /// Glob pattern to type tag, evaluated in document order.
    pub file_type: IndexMap<String, String>,

    /// Follow symbolic links while indexing.
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Index hidden entries.
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum directory depth to index.
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Parse a configuration document.
    pub fn from_json(path: impl Into<PathBuf>, json: &str) -> Result<Self, ConfigError> {
        let path = path.into();
        if json.trim().is_empty() {
            return Err(ConfigError::Empty { path });
        }
        serde_json::from_str(json).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Load the configuration at `path`.
    ///
    /// A missing file is replaced by an empty placeholder and reported as
    /// [`ConfigError::Created`] so the operator can fill it in.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(path, &json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "configuration not found, creating placeholder");
                std::fs::File::create(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Err(ConfigError::Created {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Find and load `meditree.json`, searching `start` and its ancestors.
    ///
    /// Falls back to `start/meditree.json`, which creates the placeholder.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        let path = locate(start, CONFIG_FILE_NAME).unwrap_or_else(|| start.join(CONFIG_FILE_NAME));
        debug!(path = %path.display(), "loading configuration");
        Self::load(&path)
    }

    /// Compile the `fileType` rules.
    pub fn classifier(&self) -> Result<Classifier, PatternError> {
        Classifier::new(self.file_type.iter().map(|(pattern, tag)| (pattern, tag.as_str())))
    }

    /// Tree build settings derived from this configuration.
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            root: self.root.clone(),
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth,
            include_hidden: self.include_hidden,
        }
    }
}

/// Search `dir` and each of its ancestors for `file_name`.
pub(crate) fn locate(dir: &Path, file_name: &str) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(file_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "name": "home",
        "root": "/srv/media",
        "port": 8080,
        "fileType": { "*.mp4": "video", "*.png": "image" }
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = AppConfig::from_json("meditree.json", SAMPLE).unwrap();
        assert_eq!(config.name, "home");
        assert_eq!(config.port, 8080);
        assert_eq!(config.file_type.len(), 2);
        assert!(config.include_hidden);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_file_type_keeps_document_order() {
        let json = r#"{"name":"n","root":"/","port":1,
            "fileType":{"z*":"last","a*":"first","m*":"middle"}}"#;
        let config = AppConfig::from_json("meditree.json", json).unwrap();
        let patterns: Vec<&str> = config.file_type.keys().map(String::as_str).collect();
        assert_eq!(patterns, vec!["z*", "a*", "m*"]);
    }

    #[test]
    fn test_missing_field_is_named() {
        let json = r#"{"name":"n","port":1,"fileType":{}}"#;
        let err = AppConfig::from_json("meditree.json", json).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn test_empty_document() {
        let err = AppConfig::from_json("meditree.json", "  \n").unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }));
    }

    #[test]
    fn test_load_missing_creates_placeholder() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Created { .. }));
        assert!(path.is_file());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        // The placeholder then fails as empty
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }));
    }

    #[test]
    fn test_discover_in_ancestor() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), SAMPLE).unwrap();
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = AppConfig::discover(&nested).unwrap();
        assert_eq!(config.name, "home");
        assert!(!nested.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_classifier_and_build_config() {
        let config = AppConfig::from_json("meditree.json", SAMPLE).unwrap();
        let classifier = config.classifier().unwrap();
        assert_eq!(classifier.classify("a.mp4"), Some("video"));
        assert_eq!(config.build_config().root, PathBuf::from("/srv/media"));
    }

    #[test]
    fn test_invalid_pattern() {
        let json = r#"{"name":"n","root":"/","port":1,"fileType":{"[bad":"video"}}"#;
        let config = AppConfig::from_json("meditree.json", json).unwrap();
        assert!(config.classifier().is_err());
    }
}
