//! Provider trait for telemetry sources

use crate::Result;
use crate::types::TelemetrySample;

/// Trait for telemetry sources
///
/// Providers abstract over where samples come from (shared memory, a recorded
/// stint, a test fixture) and handle their own pacing internally.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next telemetry sample
    ///
    /// Returns:
    /// - `Ok(Some(sample))` - New sample available
    /// - `Ok(None)` - Source exhausted (normal termination)
    /// - `Err(e)` - Error occurred; the driver retries with backoff
    async fn next_sample(&mut self) -> Result<Option<TelemetrySample>>;

    /// Native sample rate in Hz
    fn tick_rate(&self) -> f64;
}
