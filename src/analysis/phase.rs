//! Driving phase detection

use tracing::trace;

use crate::config::PhaseConfig;
use crate::types::{Phase, TelemetrySample};

/// Classifies the current driving phase from pedal and lateral-G input.
///
/// The detector has no window: each call is a function of the current sample
/// and the phase of the previous call.
#[derive(Debug, Clone)]
pub struct PhaseDetector {
    config: PhaseConfig,
    current: Phase,
    last: Phase,
}

impl Default for PhaseDetector {
    fn default() -> Self {
        Self::new(PhaseConfig::default())
    }
}

impl PhaseDetector {
    pub fn new(config: PhaseConfig) -> Self {
        Self { config, current: Phase::Straight, last: Phase::Straight }
    }

    /// Advance the detector by one tick and return the new phase.
    pub fn update(&mut self, sample: &TelemetrySample) -> Phase {
        let next = self.classify(sample);
        if next != self.current {
            trace!(from = %self.current, to = %next, "Phase transition");
        }
        self.last = self.current;
        self.current = next;
        next
    }

    fn classify(&self, sample: &TelemetrySample) -> Phase {
        let c = &self.config;
        let brake = sample.unfiltered_brake;
        let throttle = sample.unfiltered_throttle;
        let lat_g = sample.lateral_g();

        // Brake input dominates every other rule
        if brake > c.brake_threshold {
            return Phase::Braking;
        }

        match self.current {
            Phase::Braking => {
                if lat_g > c.cornering_lat_g {
                    Phase::TurnIn
                } else {
                    Phase::Straight
                }
            }
            Phase::TurnIn => {
                if throttle > c.throttle_threshold {
                    if lat_g > c.cornering_lat_g { Phase::Exit } else { Phase::Straight }
                } else if lat_g > c.cornering_lat_g
                    && brake < c.pedal_released
                    && throttle < c.pedal_released
                {
                    Phase::MidCorner
                } else {
                    Phase::TurnIn
                }
            }
            Phase::MidCorner => {
                if throttle > c.throttle_threshold {
                    Phase::Exit
                } else if lat_g < c.straight_lat_g {
                    Phase::Straight
                } else {
                    Phase::MidCorner
                }
            }
            Phase::Exit => {
                if lat_g < c.straight_lat_g && throttle > c.full_throttle {
                    Phase::Straight
                } else if brake > c.brake_threshold {
                    // Shadowed by the priority rule while it stays first
                    Phase::Braking
                } else {
                    Phase::Exit
                }
            }
            Phase::Straight => {
                if lat_g > c.cornering_lat_g {
                    Phase::MidCorner
                } else {
                    Phase::Straight
                }
            }
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    /// Phase before the most recent update.
    pub fn last(&self) -> Phase {
        self.last
    }

    pub fn reset(&mut self) {
        self.current = Phase::Straight;
        self.last = Phase::Straight;
    }
}
