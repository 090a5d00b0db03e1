//! Replay provider for recorded stints

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::time::{Duration, Interval, interval};
use tracing::{debug, info, trace};

use crate::provider::Provider;
use crate::types::TelemetrySample;
use crate::{EngineerError, Result};

/// A recorded sequence of samples and the rate it was captured at.
///
/// ```rust
/// use race_engineer::providers::Recording;
///
/// let recording = Recording::from_yaml_str("tick_rate: 10\nsamples:\n  - speed: 42.0\n  - speed: 43.5\n")?;
/// assert_eq!(recording.samples.len(), 2);
/// assert_eq!(recording.samples[1].speed, 43.5);
/// # Ok::<(), race_engineer::EngineerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub tick_rate: f64,
    pub samples: Vec<TelemetrySample>,
}

impl Recording {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let recording: Recording = serde_yaml_ng::from_str(yaml).map_err(|e| EngineerError::Parse {
            context: "Telemetry recording".to_string(),
            details: e.to_string(),
        })?;
        if !(recording.tick_rate.is_finite() && recording.tick_rate > 0.0) {
            return Err(EngineerError::Parse {
                context: "Telemetry recording".to_string(),
                details: format!("tick rate {} must be positive", recording.tick_rate),
            });
        }
        Ok(recording)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// Replay provider that paces recorded samples at their native rate
pub struct ReplayProvider {
    samples: Vec<TelemetrySample>,

    /// Index of the next sample to emit
    position: usize,

    /// Playback speed multiplier (1.0 = normal, 2.0 = double speed)
    speed: f64,

    /// Pacing interval, created on first use inside the runtime
    interval: Option<Interval>,

    tick_rate: f64,
}

impl ReplayProvider {
    /// Create a replay over in-memory samples
    pub fn new(samples: Vec<TelemetrySample>, tick_rate: f64) -> Result<Self> {
        if !(tick_rate.is_finite() && tick_rate > 0.0) {
            return Err(EngineerError::config_error(format!("replay tick rate {tick_rate} must be positive")));
        }
        Ok(Self { samples, position: 0, speed: 1.0, interval: None, tick_rate })
    }

    pub fn from_recording(recording: Recording) -> Result<Self> {
        Self::new(recording.samples, recording.tick_rate)
    }

    /// Open a YAML recording from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml =
            std::fs::read_to_string(path).map_err(|e| EngineerError::file_error(path.to_path_buf(), e))?;
        let recording = Recording::from_yaml_str(&yaml)?;

        info!(
            path = %path.display(),
            samples = recording.samples.len(),
            tick_rate = recording.tick_rate,
            "Opened telemetry recording"
        );
        Self::from_recording(recording)
    }

    /// Set playback speed
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.1, 10.0);
        // Rebuilt with the new period on the next read
        self.interval = None;
        debug!(speed = self.speed, "Playback speed set");
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Jump to a sample index
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position >= self.samples.len() {
            return Err(EngineerError::provider_failed(format!(
                "Cannot seek to sample {} (recording has {} samples)",
                position,
                self.samples.len()
            )));
        }
        self.position = position;
        debug!(position, "Seeked replay");
        Ok(())
    }

    /// Current playback time in seconds
    pub fn current_time(&self) -> f64 {
        self.position as f64 / self.tick_rate
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.tick_rate
    }

    fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / (self.tick_rate * self.speed))
    }
}

#[async_trait::async_trait]
impl Provider for ReplayProvider {
    async fn next_sample(&mut self) -> Result<Option<TelemetrySample>> {
        let total = self.samples.len();
        if self.position >= total {
            debug!("Reached end of replay");
            return Ok(None);
        }

        let period = self.frame_period();
        self.interval.get_or_insert_with(|| interval(period)).tick().await;

        let sample = self.samples[self.position].clone();
        self.position += 1;
        trace!(position = self.position, total, "Replayed sample");
        Ok(Some(sample))
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, stint};

    #[tokio::test(start_paused = true)]
    async fn replays_every_sample_then_ends() {
        let samples = stint(SampleBuilder::driving(), 10.0, 1.0);
        let mut provider = ReplayProvider::new(samples.clone(), 10.0).expect("valid replay");

        let start = tokio::time::Instant::now();
        let mut replayed = Vec::new();
        while let Some(sample) = provider.next_sample().await.expect("replay never fails") {
            replayed.push(sample);
        }

        assert_eq!(replayed, samples);
        // First tick is immediate, the remaining nine are paced at 100ms
        assert!(start.elapsed() >= Duration::from_millis(900));
        assert_eq!(provider.current_time(), 1.0);
        assert!(provider.next_sample().await.expect("still ended").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn speed_is_clamped_and_shortens_pacing() {
        let samples = stint(SampleBuilder::driving(), 10.0, 1.0);
        let mut provider = ReplayProvider::new(samples, 10.0).expect("valid replay");
        provider.set_speed(50.0);
        assert_eq!(provider.speed(), 10.0);

        let start = tokio::time::Instant::now();
        while provider.next_sample().await.expect("replay").is_some() {}
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn seek_past_end_fails() {
        let mut provider = ReplayProvider::new(vec![TelemetrySample::default(); 3], 10.0).expect("valid");
        assert!(provider.seek(2).is_ok());
        assert!(matches!(provider.seek(3), Err(EngineerError::Provider { .. })));
        assert_eq!(provider.duration(), 0.3);
    }

    #[test]
    fn rejects_non_positive_tick_rate() {
        assert!(ReplayProvider::new(Vec::new(), 0.0).is_err());
        let err = Recording::from_yaml_str("tick_rate: -1\nsamples: []\n").unwrap_err();
        assert!(matches!(err, EngineerError::Parse { .. }));
    }

    #[test]
    fn recording_yaml_round_trip_keeps_states() {
        let recording = Recording {
            tick_rate: 10.0,
            samples: vec![SampleBuilder::driving().lap(4).fuel(0.4, 100.0).build()],
        };
        let yaml = recording.to_yaml_string().expect("serializable");
        assert_eq!(Recording::from_yaml_str(&yaml).expect("parses"), recording);
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let err = ReplayProvider::open("/no/such/recording.yaml").err().expect("missing file");
        assert!(matches!(err, EngineerError::File { .. }));
    }
}
