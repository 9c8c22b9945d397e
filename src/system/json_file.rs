// src/system/json_file.rs

//! Reading and atomically writing JSON files.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::PrettyFormatter;
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while reading or writing a JSON file.
#[derive(Error, Debug)]
pub enum JsonFileError {
    /// The file does not exist.
    #[error("File '{path}' does not exist.")]
    NotFound { path: PathBuf },
    /// The file could not be read or written.
    #[error("Could not access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file content is not valid JSON for the requested type.
    #[error("'{path}' is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The value could not be serialized.
    #[error("Could not serialize data for '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The temporary file could not replace the target.
    #[error("Could not move temporary file into place at '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl JsonFileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and deserializes a JSON file.
///
/// A missing file is reported as `JsonFileError::NotFound` so that callers can
/// decide whether absence is an error for them.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            JsonFileError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            JsonFileError::io(path, e)
        }
    })?;

    serde_json::from_str(&content).map_err(|source| JsonFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `value` as tab-indented JSON.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `value` as tab-indented JSON to `path`.
///
/// The data is written to a temporary file in the same directory and then
/// renamed over the target, so readers never observe a half-written file.
/// The parent directory must exist.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), JsonFileError> {
    let content = to_pretty_string(value).map_err(|source| JsonFileError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| JsonFileError::io(path, e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| JsonFileError::io(path, e))?;
    temp.flush().map_err(|e| JsonFileError::io(path, e))?;
    if let Some(perms) = target_permissions(path) {
        temp.as_file()
            .set_permissions(perms)
            .map_err(|e| JsonFileError::io(path, e))?;
    }
    temp.persist(path).map_err(|source| JsonFileError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Wrote '{}'", path.display());
    Ok(())
}

/// Permissions the written file should end up with: those of the file being
/// replaced, or `0644` for a new file on Unix. Temp files start out as `0600`.
fn target_permissions(path: &Path) -> Option<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_write_uses_tab_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");

        write_json(&path, &json!({ "endpoint": "a" })).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\n\t\"endpoint\": \"a\"\n}");
    }

    #[test]
    fn test_rewrite_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        fs::write(&path, r#"{ "zeta": 1, "alpha": { "y": 2, "b": 3 } }"#).unwrap();

        let doc: Value = read_json(&path).unwrap();
        write_json(&path, &doc).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            "{\n\t\"zeta\": 1,\n\t\"alpha\": {\n\t\t\"y\": 2,\n\t\t\"b\": 3\n\t}\n}"
        );
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let doc = json!({ "invocation": "my app", "intents": [] });

        write_json(&path, &doc).unwrap();
        let back: Value = read_json(&path).unwrap();

        assert_eq!(back, doc);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_json::<Value>(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(JsonFileError::NotFound { .. })));
    }

    #[test]
    fn test_read_malformed_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result = read_json::<Value>(&path);
        assert!(matches!(result, Err(JsonFileError::Parse { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en-US.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o664)).unwrap();

        write_json(&path, &json!({ "invocation": "hello there" })).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_not_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        write_json(&path, &json!({})).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
