use std::path::PathBuf;

use clap::{Args, Subcommand};
use presence_session::{Session, SessionConfig};
use presence_transport::DiscoveryConfig;

use crate::exit::{session_error, CliResult};
use crate::output::OutputFormat;

pub mod clear;
pub mod discover;
pub mod publish;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish a single activity and exit.
    Publish(PublishArgs),
    /// Publish activities read as JSON lines from stdin.
    Watch(WatchArgs),
    /// Clear the current activity.
    Clear(ClearArgs),
    /// List candidate endpoints and whether they accept connections.
    Discover(DiscoverArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Publish(args) => publish::run(args, format),
        Command::Watch(args) => watch::run(args, format),
        Command::Clear(args) => clear::run(args, format),
        Command::Discover(args) => discover::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where to find the peer.
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    /// Directory holding the peer's sockets (overrides XDG_RUNTIME_DIR/TMPDIR/TMP/TEMP).
    /// Ignored on Windows, where the peer listens on named pipes.
    #[arg(long, env = "PRESENCE_IPC_DIR", value_name = "DIR")]
    pub ipc_dir: Option<PathBuf>,
}

impl EndpointArgs {
    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            base_dir: self.ipc_dir.clone(),
            ..DiscoveryConfig::default()
        }
    }
}

/// Who we are and where to find the peer.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Application id sent in the handshake.
    #[arg(long, env = "PRESENCE_CLIENT_ID")]
    pub client_id: String,
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

impl SessionArgs {
    pub fn connect(&self) -> CliResult<Session> {
        let config = SessionConfig {
            discovery: self.endpoint.discovery_config(),
            ..SessionConfig::default()
        };
        Session::initialize_with_config(self.client_id.as_str(), &config)
            .map_err(|err| session_error("connect failed", err))
    }
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Activity as inline JSON.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the activity JSON from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Minimum time between published updates (e.g. 4s, 500ms).
    #[arg(long, default_value = "4s")]
    pub min_interval: String,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
