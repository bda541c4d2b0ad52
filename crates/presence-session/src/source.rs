use serde_json::Value;

/// Supplies activity values to publish, one per update tick.
///
/// The session never inspects the values; it forwards them verbatim.
pub trait StatusSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Block until the next activity is available.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_activity(&mut self) -> Result<Option<Value>, Self::Error>;
}
