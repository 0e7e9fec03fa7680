//! Error types for save/load operations.
//!
//! Only genuinely exceptional conditions live here: a backend that cannot be
//! reached, or persisted bytes that cannot be decoded. Recoverable situations
//! (an unregistered role at capture time, a resume request with no save) are
//! ordinary control flow and never produce an error.

use std::fmt;
use std::io;

/// Errors that can occur while persisting or restoring a snapshot.
#[derive(Debug)]
pub enum SaveError {
    /// The persistence backend failed (file missing permissions, disk full,
    /// LocalStorage unavailable, ...).
    Store(io::Error),
    /// Snapshot could not be serialized.
    Encode(String),
    /// Persisted blob is corrupt or in an incompatible format.
    Decode(String),
    /// The extras key and value lists in the persisted blob have different
    /// lengths.
    ExtrasMismatch { keys: usize, values: usize },
    /// An extras key appears more than once in the persisted blob.
    DuplicateExtraKey(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Store(e) => write!(f, "save store unavailable: {e}"),
            SaveError::Encode(msg) => write!(f, "encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "decoding error: {msg}"),
            SaveError::ExtrasMismatch { keys, values } => write!(
                f,
                "extras lists out of sync: {keys} keys but {values} values"
            ),
            SaveError::DuplicateExtraKey(key) => {
                write!(f, "duplicate extras key: {key:?}")
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        SaveError::Store(e)
    }
}
