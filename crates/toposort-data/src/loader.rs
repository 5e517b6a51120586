//! Format detection, file discovery, and (de)serialization helpers.
//!
//! Graph files may be written as RON, JSON, or TOML; the format is chosen by
//! file extension.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use toposort_core::GraphError;
use tracing::debug;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading or saving graph files.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required graph file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A serialization error occurred.
    #[error("serialize error for {file}: {detail}")]
    Serialize { file: PathBuf, detail: String },

    /// The file parsed but describes an invalid graph.
    #[error("invalid graph in {file}: {source}")]
    Graph {
        file: PathBuf,
        #[source]
        source: GraphError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported graph file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a graph file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!(file = %path.display(), ?format, bytes = content.len(), "reading graph file");
    deserialize_str(&content, format, path)
}

/// Deserialize text in the given format. `file` only labels errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

// ===========================================================================
// Serialization
// ===========================================================================

/// Serialize a value in the given format. `file` only labels errors.
pub fn serialize_str<T: Serialize>(
    value: &T,
    format: Format,
    file: &Path,
) -> Result<String, DataLoadError> {
    let serialize_error = |detail: String| DataLoadError::Serialize {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map_err(|e| serialize_error(e.to_string())),
        Format::Json => {
            serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))
        }
        Format::Toml => toml::to_string_pretty(value).map_err(|e| serialize_error(e.to_string())),
    }
}

/// Serialize a value and write it to `path` in the format its extension names.
pub fn serialize_file<T: Serialize>(path: &Path, value: &T) -> Result<(), DataLoadError> {
    let format = detect_format(path)?;
    let content = serialize_str(value, format, path)?;
    debug!(file = %path.display(), ?format, bytes = content.len(), "writing graph file");
    std::fs::write(path, content)?;
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "toposort_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("g.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("g.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("g.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["g.yaml", "graph"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found() {
        let dir = make_test_dir("find");
        fs::write(dir.join("tasks.toml"), "").unwrap();

        let result = find_data_file(&dir, "tasks").unwrap();
        assert_eq!(result, Some(dir.join("tasks.toml")));
        assert_eq!(find_data_file(&dir, "other").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("tasks.ron"), "").unwrap();
        fs::write(dir.join("tasks.json"), "").unwrap();

        let result = find_data_file(&dir, "tasks");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");
        let err = require_data_file(&dir, "tasks").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingRequired { .. }));
        assert!(err.to_string().contains("tasks"));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize / serialize
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_each_format() {
        let file = Path::new("list");
        let from_json: Vec<u32> = deserialize_str("[1, 2]", Format::Json, file).unwrap();
        let from_ron: Vec<u32> = deserialize_str("[1, 2]", Format::Ron, file).unwrap();
        let from_toml: std::collections::BTreeMap<String, Vec<u32>> =
            deserialize_str("items = [1, 2]", Format::Toml, file).unwrap();
        assert_eq!(from_json, [1, 2]);
        assert_eq!(from_ron, [1, 2]);
        assert_eq!(from_toml["items"], [1, 2]);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("bad.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<Vec<u32>, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn serialize_file_round_trip() {
        let dir = make_test_dir("ser_round_trip");
        let mut value = std::collections::BTreeMap::new();
        value.insert("items".to_string(), vec![3u32, 4]);

        for ext in ["ron", "json", "toml"] {
            let path = dir.join(format!("out.{ext}"));
            serialize_file(&path, &value).unwrap();
            let back: std::collections::BTreeMap<String, Vec<u32>> =
                deserialize_file(&path).unwrap();
            assert_eq!(back, value, "round trip through {ext}");
        }

        cleanup(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = make_test_dir("missing_file");
        let result: Result<Vec<u32>, _> = deserialize_file(&dir.join("absent.json"));
        assert!(matches!(result, Err(DataLoadError::Io(_))));
        cleanup(&dir);
    }

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::Parse {
            file: PathBuf::from("bad.ron"),
            detail: "syntax error".to_string(),
        };
        assert!(format!("{e}").contains("bad.ron"));
        assert!(format!("{e}").contains("syntax error"));

        let e = DataLoadError::Graph {
            file: PathBuf::from("g.json"),
            source: GraphError::MissingRequiredPath("name".to_string()),
        };
        let msg = format!("{e}");
        assert!(msg.contains("g.json"));
        assert!(msg.contains("Node is missing required path 'name'"));
    }
}
