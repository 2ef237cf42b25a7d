// src/loader/json_loader.rs
//! Reading map documents from disk.

use crate::error::MapError;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Read one JSON document into a generic tree.
pub fn read_json(path: &Path) -> Result<JsonValue, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::InvalidMap(format!(
            "Map file must be a JSON file: {}",
            path.display()
        )));
    }

    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Every `*.json` document in `dir`, keyed by path.
///
/// Files that fail to read or parse are logged and left out. The result is
/// sorted by path so placement is repeatable; callers must not rely on any
/// particular order beyond that.
pub fn load_map_dir(dir: &Path) -> Result<Vec<(PathBuf, JsonValue)>, MapError> {
    let entries = std::fs::read_dir(dir).map_err(|source| MapError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        match read_json(&path) {
            Ok(doc) => docs.push((path, doc)),
            Err(error) => warn!(error = %error, "map_document_skipped"),
        }
    }
    info!(dir = %dir.display(), documents = docs.len(), "map_documents_read");
    Ok(docs)
}
