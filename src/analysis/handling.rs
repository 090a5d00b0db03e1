//! Instantaneous under/oversteer balance

use serde::Serialize;
use std::fmt;

use crate::config::HandlingConfig;
use crate::types::TelemetrySample;

/// Balance of the car on the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum HandlingStatus {
    #[default]
    Neutral,
    Understeer,
    Oversteer,
}

impl HandlingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HandlingStatus::Neutral => "NEUTRAL",
            HandlingStatus::Understeer => "UNDERSTEER",
            HandlingStatus::Oversteer => "OVERSTEER",
        }
    }
}

impl fmt::Display for HandlingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares rear and front axle slip speeds.
///
/// A positive value means the rear slides more than the front (oversteer),
/// a negative value the opposite.
#[derive(Debug, Clone, Default)]
pub struct HandlingClassifier {
    config: HandlingConfig,
    status: HandlingStatus,
    value: f32,
}

impl HandlingClassifier {
    pub fn new(config: HandlingConfig) -> Self {
        Self { config, status: HandlingStatus::Neutral, value: 0.0 }
    }

    pub fn classify(&mut self, sample: &TelemetrySample) -> (HandlingStatus, f32) {
        if sample.speed < self.config.min_speed {
            self.status = HandlingStatus::Neutral;
            self.value = 0.0;
            return (self.status, self.value);
        }

        let (front, rear) = sample.axle_slip_speeds();
        let value = rear - front;
        self.status = if value > self.config.threshold {
            HandlingStatus::Oversteer
        } else if value < -self.config.threshold {
            HandlingStatus::Understeer
        } else {
            HandlingStatus::Neutral
        };
        self.value = value;
        (self.status, self.value)
    }

    /// Status of the most recent classification.
    pub fn status(&self) -> HandlingStatus {
        self.status
    }

    /// Balance value of the most recent classification.
    pub fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SampleBuilder;

    #[test]
    fn slow_car_is_neutral() {
        let mut classifier = HandlingClassifier::default();
        let sample = SampleBuilder::driving().speed(8.0).slip_speeds([0.0, 0.0, 3.0, 3.0]).build();
        assert_eq!(classifier.classify(&sample), (HandlingStatus::Neutral, 0.0));
    }

    #[test]
    fn rear_slip_is_oversteer() {
        let mut classifier = HandlingClassifier::default();
        let sample = SampleBuilder::driving().slip_speeds([0.2, -0.2, 1.0, -1.0]).build();
        let (status, value) = classifier.classify(&sample);
        assert_eq!(status, HandlingStatus::Oversteer);
        assert!((value - 0.8).abs() < 1e-6);
        assert_eq!(classifier.status(), HandlingStatus::Oversteer);
    }

    #[test]
    fn front_slip_is_understeer() {
        let mut classifier = HandlingClassifier::default();
        let sample = SampleBuilder::driving().slip_speeds([1.5, 1.5, 0.5, 0.5]).build();
        assert_eq!(classifier.classify(&sample).0, HandlingStatus::Understeer);
        assert_eq!(classifier.value(), -1.0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut classifier = HandlingClassifier::default();
        let sample = SampleBuilder::driving().slip_speeds([0.0, 0.0, 0.5, 0.5]).build();
        assert_eq!(classifier.classify(&sample).0, HandlingStatus::Neutral);
    }
}
