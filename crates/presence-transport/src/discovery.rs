//! Bounded search for the peer's listening endpoint.
//!
//! The peer binds the first free slot of `discord-ipc-0` .. `discord-ipc-9`,
//! so clients probe the slots in order and keep the first one that opens.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::traits::IpcStream;

/// Number of numbered endpoints probed during discovery.
pub const DEFAULT_SLOT_COUNT: u8 = 10;

/// Default endpoint name prefix; the slot number is appended as `-<slot>`.
pub const DEFAULT_PREFIX: &str = "discord-ipc";

/// Environment variables consulted, in order, for the socket base directory.
pub const DEFAULT_ENV_KEYS: [&str; 4] = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"];

/// Base directory used when none of the environment variables is set.
pub const DEFAULT_FALLBACK_DIR: &str = "/tmp";

#[cfg(windows)]
const PIPE_NAMESPACE: &str = r"\\?\pipe\";

/// Discovery configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Number of slots to probe, starting at zero. Default: 10.
    pub slot_count: u8,
    /// Endpoint name prefix. Default: `discord-ipc`.
    pub prefix: String,
    /// Explicit socket directory, bypassing the environment lookup.
    ///
    /// Unix only: Windows pipes always live in the `\\?\pipe\` namespace,
    /// so this is ignored there (with a warning).
    pub base_dir: Option<PathBuf>,
    /// Environment variables consulted for the socket directory (Unix only).
    pub env_keys: Vec<String>,
    /// Directory used when no environment variable is populated (Unix only).
    pub fallback_dir: PathBuf,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            prefix: DEFAULT_PREFIX.to_string(),
            base_dir: None,
            env_keys: DEFAULT_ENV_KEYS.iter().map(|k| k.to_string()).collect(),
            fallback_dir: PathBuf::from(DEFAULT_FALLBACK_DIR),
        }
    }
}

/// One endpoint probed during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub slot: u8,
    pub path: PathBuf,
}

impl DiscoveryConfig {
    /// Candidate endpoints in probe order, resolved against the process environment.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.candidates_with_env(|key| std::env::var_os(key))
    }

    /// Candidate endpoints in probe order, resolved against `lookup`.
    pub fn candidates_with_env<F>(&self, lookup: F) -> Vec<Candidate>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let base = self.base_dir_with_env(lookup);
        (0..self.slot_count)
            .map(|slot| Candidate {
                slot,
                path: endpoint_path(&base, &self.prefix, slot),
            })
            .collect()
    }

    /// Resolve the directory holding the endpoints.
    ///
    /// Order: explicit `base_dir`, then the first non-empty env key, then the
    /// fallback directory. On Windows this is the pipe namespace.
    pub fn base_dir_with_env<F>(&self, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<OsString>,
    {
        #[cfg(windows)]
        {
            let _ = lookup;
            if let Some(dir) = &self.base_dir {
                warn!(base_dir = ?dir, "base_dir is ignored for named pipes");
            }
            PathBuf::from(PIPE_NAMESPACE)
        }

        #[cfg(not(windows))]
        {
            if let Some(dir) = &self.base_dir {
                return dir.clone();
            }
            self.env_keys
                .iter()
                .find_map(|key| lookup(key).filter(|value| !value.is_empty()))
                .map(PathBuf::from)
                .unwrap_or_else(|| self.fallback_dir.clone())
        }
    }
}

fn endpoint_path(base: &Path, prefix: &str, slot: u8) -> PathBuf {
    base.join(format!("{prefix}-{slot}"))
}

/// Open the first available endpoint using the platform transport.
pub fn discover(config: &DiscoveryConfig) -> Result<IpcStream> {
    discover_with(config, open_endpoint).map(|(stream, _)| stream)
}

/// Open a single endpoint with the transport compiled in for this platform.
#[cfg(unix)]
pub fn open_endpoint(path: &Path) -> Result<IpcStream> {
    crate::uds::UnixDomainSocket::connect(path)
}

/// Open a single endpoint with the transport compiled in for this platform.
#[cfg(windows)]
pub fn open_endpoint(path: &Path) -> Result<IpcStream> {
    crate::pipe::NamedPipe::connect(path)
}

/// Probe every candidate in order with `open`, returning the first success.
///
/// Each failed attempt is logged and skipped. After the last candidate fails
/// the search ends with [`TransportError::Unavailable`].
pub fn discover_with<C, F>(config: &DiscoveryConfig, mut open: F) -> Result<(C, Candidate)>
where
    F: FnMut(&Path) -> Result<C>,
{
    let candidates = config.candidates();
    let mut attempts = 0usize;

    for candidate in candidates {
        attempts += 1;
        match open(&candidate.path) {
            Ok(channel) => {
                info!(slot = candidate.slot, path = ?candidate.path, "opened local channel");
                return Ok((channel, candidate));
            }
            Err(err) if is_absent(&err) => {
                debug!(slot = candidate.slot, path = ?candidate.path, "no endpoint at candidate");
            }
            Err(err) => {
                warn!(slot = candidate.slot, path = ?candidate.path, error = %err, "couldn't open candidate");
            }
        }
    }

    Err(TransportError::Unavailable { attempts })
}

fn is_absent(err: &TransportError) -> bool {
    match err {
        TransportError::Connect { source, .. } | TransportError::Io(source) => {
            source.kind() == std::io::ErrorKind::NotFound
        }
        TransportError::Unavailable { .. } => false,
    }
}
