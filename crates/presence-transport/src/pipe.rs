use std::fs::OpenOptions;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::IpcStream;

/// Windows named pipe transport (client side only).
///
/// The pipe is opened like a file for simultaneous read and write; the
/// server end is created by the peer.
pub struct NamedPipe;

impl NamedPipe {
    /// Open an existing named pipe (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<IpcStream> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| TransportError::Connect {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!(?path, "opened named pipe");
        Ok(IpcStream::from_pipe(file, path.to_path_buf()))
    }
}
