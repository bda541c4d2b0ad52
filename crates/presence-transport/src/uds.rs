use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::IpcStream;

/// Unix domain socket transport (client side only).
///
/// The peer owns the socket file; this side never binds or unlinks it.
pub struct UnixDomainSocket;

impl UnixDomainSocket {
    /// Connect to a listening Unix domain socket (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<IpcStream> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|e| TransportError::Connect {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(?path, "connected to unix domain socket");
        Ok(IpcStream::from_unix(stream, path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::os::unix::net::UnixListener;

    use super::*;
    use crate::traits::LocalChannel;

    #[test]
    fn test_connect_and_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let sock_path = dir.path().join("discord-ipc-0");
        let listener = UnixListener::bind(&sock_path).unwrap();

        let handle = std::thread::spawn(move || {
            let (mut server, _) = listener.accept().unwrap();
            let mut buf = [0u8; 5];
            server.read_exact(&mut buf).unwrap();
            server.write_all(&buf).unwrap();
        });

        let mut client = UnixDomainSocket::connect(&sock_path).unwrap();
        assert_eq!(client.path(), sock_path.as_path());
        assert_eq!(client.transport_name(), "unix-domain-socket");

        client.write_all(b"hello").unwrap();
        let mut echoed = [0u8; 5];
        client.read_exact(&mut echoed).unwrap();
        assert_eq!(&echoed, b"hello");

        handle.join().unwrap();
        client.release().unwrap();
    }

    #[test]
    fn test_connect_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = UnixDomainSocket::connect(dir.path().join("absent"));
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[test]
    fn test_release_after_peer_hangup() {
        let dir = tempfile::tempdir().unwrap();
        let sock_path = dir.path().join("hangup.sock");
        let listener = UnixListener::bind(&sock_path).unwrap();

        let client = UnixDomainSocket::connect(&sock_path).unwrap();
        let (server, _) = listener.accept().unwrap();
        drop(server);

        assert!(client.release().is_ok());
    }
}
