use presence_frame::FrameConfig;
use presence_transport::DiscoveryConfig;

/// Configuration for establishing a [`Session`](crate::Session).
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Where and how to look for the peer's endpoint.
    pub discovery: DiscoveryConfig,
    /// Frame size limits.
    pub frame: FrameConfig,
}
