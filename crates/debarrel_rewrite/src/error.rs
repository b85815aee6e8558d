use std::path::PathBuf;
use thiserror::Error;

/// Why a single import statement was left untouched.
///
/// Apart from [`RewriteError::Unreadable`] these only affect the one statement,
/// which keeps its original text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("something is fishy with the import statement: {statement}")]
    MalformedStatement { statement: String },

    #[error("neither the file nor the barrel file exists for '{destination}'")]
    UnresolvedDestination { destination: String },

    #[error("couldn't find [{}] in the barrel file {}", .symbols.join(", "), .barrel.display())]
    SymbolNotFound { symbols: Vec<String>, barrel: PathBuf },

    #[error("barrel {} re-exports itself through a cycle", .barrel.display())]
    CyclicBarrel { barrel: PathBuf },

    /// A file on the resolution path could not be read. Fails the whole file.
    #[error("failed to read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

impl RewriteError {
    /// Malformed statements are errors, everything else is a warning.
    pub fn is_error(&self) -> bool {
        matches!(self, RewriteError::MalformedStatement { .. })
    }
}

pub type RewriteResult<T> = std::result::Result<T, RewriteError>;
