/// Error type shared by every fallible operation in the core crate.
///
/// Listing failures during a build, unreadable reload sources and malformed
/// persisted records are *not* errors: they are logged and treated as empty
/// results. Only conditions the caller has to act on surface here.
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A file could not be opened, created or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry arena or the id index could not grow.
    #[error("out of memory while growing the entry table to {requested} slots")]
    ResourceExhausted { requested: usize },

    /// An entry was created with an id another live entry already owns.
    #[error("entry id {id} is already in use")]
    DuplicateId { id: u32 },

    /// A name holding a field or record separator cannot be persisted.
    #[error("entry {id} has a name that cannot be persisted: {name:?}")]
    UnrepresentableName { id: u32, name: String },

    /// The persisted-format writer failed.
    #[error("failed to write tree record: {0}")]
    Record(#[from] csv::Error),

    /// The configuration file is not valid JSON for [`crate::config::LibraryConfig`].
    #[error("invalid configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TreeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
