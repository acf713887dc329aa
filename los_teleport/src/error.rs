use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while loading or saving configuration and scene files.
///
/// Resolving a teleport never fails; only the files around it can.
#[derive(Debug)]
pub enum TeleportError {
    /// Reading or writing a file failed
    Io { path: PathBuf, source: io::Error },

    /// A file was read but its JSON did not match the expected shape
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// JSON without a file behind it could not be read or written
    Json { source: serde_json::Error },

    /// A setting is outside the range the resolver accepts
    Validation { field: String, reason: String },
}

impl fmt::Display for TeleportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeleportError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path.display(), source)
            }
            TeleportError::Parse { path, source } => {
                write!(f, "Invalid JSON in '{}': {}", path.display(), source)
            }
            TeleportError::Json { source } => {
                write!(f, "JSON error: {}", source)
            }
            TeleportError::Validation { field, reason } => {
                write!(f, "Invalid setting '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TeleportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TeleportError::Io { source, .. } => Some(source),
            TeleportError::Parse { source, .. } => Some(source),
            TeleportError::Json { source } => Some(source),
            TeleportError::Validation { .. } => None,
        }
    }
}

impl TeleportError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        TeleportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, source: serde_json::Error) -> Self {
        TeleportError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        TeleportError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the file simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, TeleportError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl From<serde_json::Error> for TeleportError {
    fn from(source: serde_json::Error) -> Self {
        TeleportError::Json { source }
    }
}

/// Result type for configuration and scene operations
pub type TeleportResult<T> = Result<T, TeleportError>;
