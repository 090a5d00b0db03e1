//! Steering lock usage per lap

use serde::Serialize;

use crate::config::SteeringConfig;
use crate::types::TelemetrySample;

/// Steering lock advice from the peak input of the last completed lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SteeringAdvice {
    /// Driver hits the stops: more lock makes the steering quicker
    IncreaseLock,
    /// Driver never uses most of the range: less lock calms the steering
    DecreaseLock,
    Ok,
}

impl SteeringAdvice {
    pub fn as_str(self) -> &'static str {
        match self {
            SteeringAdvice::IncreaseLock => "Increase steering lock (more angle, more responsive)",
            SteeringAdvice::DecreaseLock => "Decrease steering lock (less angle, calmer)",
            SteeringAdvice::Ok => "Steering lock OK",
        }
    }
}

/// Tracks the peak absolute steering input of each lap.
#[derive(Debug, Clone, Default)]
pub struct SteeringLockAnalyzer {
    config: SteeringConfig,
    lap: Option<u32>,
    max_usage: f32,
    last_lap_usage: Option<f32>,
    recommendation: Option<SteeringAdvice>,
}

impl SteeringLockAnalyzer {
    pub fn new(config: SteeringConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Feed one sample; a lap number change closes the previous lap.
    pub fn update(&mut self, sample: &TelemetrySample, lap: u32) {
        if self.lap != Some(lap) {
            if self.lap.is_some() {
                self.close_lap();
            }
            self.lap = Some(lap);
            self.max_usage = 0.0;
        }
        self.max_usage = self.max_usage.max(sample.steering.abs());
    }

    fn close_lap(&mut self) {
        let usage = self.max_usage;
        let advice = if usage > self.config.high_usage {
            SteeringAdvice::IncreaseLock
        } else if usage < self.config.low_usage {
            SteeringAdvice::DecreaseLock
        } else {
            SteeringAdvice::Ok
        };
        self.last_lap_usage = Some(usage);
        self.recommendation = Some(advice);
    }

    /// Advice for the last completed lap, `None` until one completes.
    pub fn recommendation(&self) -> Option<SteeringAdvice> {
        self.recommendation
    }

    /// Peak steering usage of the last completed lap.
    pub fn last_lap_usage(&self) -> Option<f32> {
        self.last_lap_usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SampleBuilder;

    fn drive_lap(analyzer: &mut SteeringLockAnalyzer, lap: u32, inputs: &[f32]) {
        for &steering in inputs {
            analyzer.update(&SampleBuilder::driving().steering(steering).build(), lap);
        }
    }

    #[test]
    fn no_advice_before_first_lap_completes() {
        let mut analyzer = SteeringLockAnalyzer::default();
        drive_lap(&mut analyzer, 1, &[0.2, -1.0, 0.4]);
        assert_eq!(analyzer.recommendation(), None);
    }

    #[test]
    fn advice_follows_peak_usage() {
        let mut analyzer = SteeringLockAnalyzer::default();
        drive_lap(&mut analyzer, 1, &[0.2, -0.99, 0.4]);
        drive_lap(&mut analyzer, 2, &[0.1]);
        assert_eq!(analyzer.recommendation(), Some(SteeringAdvice::IncreaseLock));
        assert_eq!(analyzer.last_lap_usage(), Some(0.99));

        drive_lap(&mut analyzer, 3, &[0.1]);
        assert_eq!(analyzer.recommendation(), Some(SteeringAdvice::DecreaseLock));

        drive_lap(&mut analyzer, 2, &[0.75]);
        drive_lap(&mut analyzer, 4, &[0.0]);
        assert_eq!(analyzer.recommendation(), Some(SteeringAdvice::Ok));
    }
}
