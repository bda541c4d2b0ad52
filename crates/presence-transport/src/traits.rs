use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// A bidirectional byte stream to the peer that can be released explicitly.
///
/// Owners call [`LocalChannel::release`] exactly once; taking `self` by value
/// makes a second release unrepresentable.
pub trait LocalChannel: Read + Write {
    /// Shut down and close the underlying handle.
    fn release(self) -> std::io::Result<()>
    where
        Self: Sized;
}

/// A connected IPC stream.
///
/// On Unix, this wraps a Unix domain socket stream.
/// On Windows, this wraps a named pipe file handle.
pub struct IpcStream {
    inner: IpcStreamInner,
    path: PathBuf,
}

enum IpcStreamInner {
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
    #[cfg(windows)]
    Pipe(std::fs::File),
}

impl Read for IpcStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            IpcStreamInner::Unix(stream) => stream.read(buf),
            #[cfg(windows)]
            IpcStreamInner::Pipe(file) => file.read(buf),
        }
    }
}

impl Write for IpcStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            IpcStreamInner::Unix(stream) => stream.write(buf),
            #[cfg(windows)]
            IpcStreamInner::Pipe(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            IpcStreamInner::Unix(stream) => stream.flush(),
            #[cfg(windows)]
            IpcStreamInner::Pipe(file) => file.flush(),
        }
    }
}

impl LocalChannel for IpcStream {
    fn release(self) -> std::io::Result<()> {
        debug!(path = ?self.path, "releasing local channel");
        match self.inner {
            #[cfg(unix)]
            IpcStreamInner::Unix(stream) => {
                match stream.shutdown(std::net::Shutdown::Both) {
                    Ok(()) => Ok(()),
                    // Peer hung up first; the descriptor is still closed on drop.
                    Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
                    Err(err) => Err(err),
                }
            }
            #[cfg(windows)]
            IpcStreamInner::Pipe(file) => {
                drop(file);
                Ok(())
            }
        }
    }
}

impl IpcStream {
    /// Create an IpcStream from a connected Unix domain socket stream.
    #[cfg(unix)]
    pub(crate) fn from_unix(stream: std::os::unix::net::UnixStream, path: PathBuf) -> Self {
        Self {
            inner: IpcStreamInner::Unix(stream),
            path,
        }
    }

    /// Create an IpcStream from an opened named pipe handle.
    #[cfg(windows)]
    pub(crate) fn from_pipe(file: std::fs::File, path: PathBuf) -> Self {
        Self {
            inner: IpcStreamInner::Pipe(file),
            path,
        }
    }

    /// The endpoint this stream was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            #[cfg(unix)]
            IpcStreamInner::Unix(_) => "unix-domain-socket",
            #[cfg(windows)]
            IpcStreamInner::Pipe(_) => "named-pipe",
        }
    }
}

impl std::fmt::Debug for IpcStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcStream")
            .field("type", &self.transport_name())
            .field("path", &self.path)
            .finish()
    }
}
