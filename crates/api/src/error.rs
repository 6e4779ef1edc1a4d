use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid archive {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },
    #[error("Unable to create resolver for {name}")]
    CreateResolver {
        name: String,
        #[source]
        source: Box<ResolverError>,
    },
    #[error("Composite resolver {label} has no children")]
    EmptyComposite { label: String },
    #[error("No archives found under {}", root.display())]
    NoArchives { root: PathBuf },
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },
    #[error("Failed to release {label}: {message}")]
    Release { label: String, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResolverError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolverError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn archive(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        ResolverError::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
