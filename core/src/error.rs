use std::path::PathBuf;

/// Fatal problems with the persisted model artifact. Startup stops on any of
/// these; there is no fallback to an empty index.
#[derive(thiserror::Error, Debug)]
pub enum ModelLoadError {
    #[error("model artifact file missing: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported model format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("model contains no documents")]
    Empty,

    #[error("dimension mismatch: {0}")]
    Dimensions(String),
}
