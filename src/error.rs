use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a map document into tile data or world objects.
///
/// None of these are fatal: the loader logs them and leaves the offending map
/// out of the running world.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON
    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// No layer of type `tilelayer` was found
    #[error("no tile layer found in map")]
    NoTileLayer,
    /// The tile layer's `data` field is missing, not text, or not decodable
    #[error("tile layer data is not decodable: {0}")]
    InvalidTileData(String),
    /// Top-level map dimensions are missing or not positive integers
    #[error("map field '{0}' is missing or not a positive integer")]
    InvalidDimension(&'static str),
    /// The document does not have the shape of a map
    #[error("invalid map document: {0}")]
    InvalidMap(String),
}

/// Base64 tile payload failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input length (after trimming whitespace) is not a multiple of four
    #[error("base64 input length {0} is not a multiple of 4")]
    Length(usize),
    /// Input contains characters outside the standard alphabet or bad padding
    #[error("malformed base64: {0}")]
    Malformed(String),
    /// Decoded byte count is not a whole number of 32-bit cells
    #[error("decoded tile buffer of {0} bytes is not a multiple of 4")]
    Truncated(usize),
}

/// A fixed-capacity collection in the world refused an entry.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind} capacity of {limit} reached; entry dropped")]
pub struct CapacityError {
    /// Which collection overflowed
    pub kind: &'static str,
    /// Configured ceiling
    pub limit: usize,
}

/// Dialogue documents that do not describe a usable node table.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// The document does not deserialize into a node table
    #[error("malformed dialogue document for event {event_id}: {source}")]
    Malformed {
        /// Event the document belongs to
        event_id: i64,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// Two nodes share an id
    #[error("dialogue node id {0} is defined more than once")]
    DuplicateNode(i64),
}

/// Asset acquisition failures. These are fatal: gameplay cannot continue
/// without the sprites and fonts it asked for.
#[derive(Debug, Error)]
pub enum AssetError {
    /// A file could not be read
    #[error("failed to read asset {path}: {source}")]
    Io {
        /// Asset path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// An asset was read but could not be decoded
    #[error("failed to decode asset {path}: {reason}")]
    Decode {
        /// Asset path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}
