use std::{
    io,
    path::{
        Path,
        PathBuf,
    },
};

use thiserror::Error;

/// Failures of the local keypair and config stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the expected file {} was not found", path.display())]
    NotFound { path: PathBuf },

    #[error("the file {} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("stored keypair decodes to {actual}, expected {expected}")]
    Integrity { expected: String, actual: String },

    #[error("invalid keypair file: {0}")]
    InvalidKeypair(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Maps an i/o error on `path`, surfacing a missing file as [`StoreError::NotFound`].
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = StoreError::io(
            Path::new("store/missing.json"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "the expected file store/missing.json was not found"
        );
    }

    #[test]
    fn other_io_errors_keep_their_source() {
        let err = StoreError::io(
            Path::new("keypair.json"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn display_integrity() {
        let err = StoreError::Integrity {
            expected: "A".into(),
            actual: "B".into(),
        };
        assert_eq!(err.to_string(), "stored keypair decodes to B, expected A");
    }
}
