//! Project configuration loaded from YAML files
//!
//! A project config controls how generated TypeScript refers to imported
//! `.proto` files and how it is laid out, so builds do not have to repeat
//! the same command-line flags.
//!
//! ```yaml
//! indent_size: 4
//! strip_proto_extension: true
//! import_prefix: "./"
//! import_mappings:
//!   - from: "google/protobuf/"
//!     to: "@protobuf-ts/runtime/google/protobuf/"
//! ```

use crate::{Proto2TsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root structure for project config YAML files
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Spaces per indentation level in generated code
    #[serde(default)]
    pub indent_size: Option<usize>,
    /// Drop the `.proto` suffix from import paths
    #[serde(default = "default_strip_proto_extension")]
    pub strip_proto_extension: bool,
    /// Prefix for import paths that no mapping matched (e.g. "./")
    #[serde(default)]
    pub import_prefix: Option<String>,
    /// Prefix rewrites applied to import paths, first match wins
    #[serde(default)]
    pub import_mappings: Vec<ImportMapping>,
}

/// Rewrites import paths starting with `from` to start with `to`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImportMapping {
    pub from: String,
    pub to: String,
}

fn default_strip_proto_extension() -> bool {
    true
}

impl Default for ProjectConfig {
    /// The identity configuration: import paths are emitted verbatim
    fn default() -> Self {
        Self {
            indent_size: None,
            strip_proto_extension: false,
            import_prefix: None,
            import_mappings: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;

        log::debug!(
            "loaded config from {:?} ({} import mappings)",
            path,
            config.import_mappings.len()
        );
        Ok(config)
    }

    /// Parse config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ProjectConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.indent_size == Some(0) {
            return Err(Proto2TsError::Config(
                "indent_size must be at least 1".to_string(),
            ));
        }
        if let Some(mapping) = self.import_mappings.iter().find(|m| m.from.is_empty()) {
            return Err(Proto2TsError::Config(format!(
                "import mapping to {:?} has an empty 'from' prefix",
                mapping.to
            )));
        }
        Ok(())
    }

    /// Map an import path as written in the source to the path generated
    /// code should reference
    pub fn resolve_import(&self, path: &str) -> String {
        let mapped = self
            .import_mappings
            .iter()
            .find_map(|m| path.strip_prefix(m.from.as_str()).map(|rest| format!("{}{}", m.to, rest)));
        let matched = mapped.is_some();
        let mut resolved = mapped.unwrap_or_else(|| path.to_string());

        if self.strip_proto_extension {
            if let Some(stem) = resolved.strip_suffix(".proto") {
                resolved = stem.to_string();
            }
        }

        if !matched && !resolved.starts_with('.') && !resolved.starts_with('/') {
            if let Some(prefix) = &self.import_prefix {
                resolved = format!("{}{}", prefix, resolved);
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
indent_size: 4
import_prefix: "./"
import_mappings:
  - from: "google/protobuf/"
    to: "@protobuf-ts/runtime/google/protobuf/"
"#;

    #[test]
    fn test_from_yaml_defaults() {
        let config = ProjectConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.indent_size, Some(4));
        assert!(config.strip_proto_extension);
        assert_eq!(config.import_mappings.len(), 1);
    }

    #[test]
    fn test_resolve_import() {
        let config = ProjectConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(
            config.resolve_import("google/protobuf/timestamp.proto"),
            "@protobuf-ts/runtime/google/protobuf/timestamp"
        );
        assert_eq!(config.resolve_import("common/types.proto"), "./common/types");
        assert_eq!(config.resolve_import("../shared.proto"), "../shared");
    }

    #[test]
    fn test_default_is_identity() {
        let config = ProjectConfig::default();
        assert_eq!(config.resolve_import("a/b.proto"), "a/b.proto");
    }

    #[test]
    fn test_rejects_zero_indent() {
        let err = ProjectConfig::from_yaml("indent_size: 0").unwrap_err();
        assert!(err.to_string().contains("indent_size"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ProjectConfig::load(file.path()).unwrap();
        assert_eq!(config.import_prefix.as_deref(), Some("./"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProjectConfig::load(Path::new("/nonexistent/proto2ts.yaml"));
        assert!(matches!(result, Err(Proto2TsError::Io(_))));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"import_mappings: [unclosed").unwrap();

        let result = ProjectConfig::load(file.path());
        assert!(matches!(result, Err(Proto2TsError::Yaml(_))));
    }
}
