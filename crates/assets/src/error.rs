/// Échec du montage d'une source. Jamais fatal pour la résolution.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[source] std::io::Error),

    #[error("invalid format: {0}")]
    FormatInvalid(String),

    #[error("invalid mount point {0:?}")]
    InvalidMountPoint(String),
}

/// Échec d'une recherche dans le VFS.
/// `NotFound` est un résultat normal pour un asset optionnel.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{0:?} not found")]
    NotFound(String),

    #[error("invalid path {0:?}")]
    InvalidPath(String),

    #[error("failed to read {path:?}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound(_))
    }
}
