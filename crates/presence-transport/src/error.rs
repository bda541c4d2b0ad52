use std::path::PathBuf;

/// Errors that can occur while opening a local channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open or connect to a specific candidate endpoint.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No candidate endpoint could be opened.
    #[error("no local channel available after {attempts} attempts (is the peer running?)")]
    Unavailable { attempts: usize },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
