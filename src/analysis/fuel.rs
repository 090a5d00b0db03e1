//! Fuel consumption per lap

use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

use crate::config::MonitorConfig;
use crate::types::TelemetrySample;

/// Fuel level in litres.
///
/// The simulator reports the level as a ratio of capacity on most builds and
/// as litres on some; values above 1.0 can only be litres.
pub fn fuel_litres(level: f32, capacity: f32) -> f32 {
    if capacity > 0.0 && level <= 1.0 { level * capacity } else { level }
}

/// Current fuel state and consumption projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FuelStatus {
    pub litres: f32,
    /// Average litres used per lap over the recorded history
    pub per_lap: f32,
    /// Laps left at the average rate, 0 without history
    pub remaining_laps: f32,
}

/// Records litres used on each completed lap.
#[derive(Debug, Clone, Default)]
pub struct FuelMonitor {
    config: MonitorConfig,
    history: VecDeque<f32>,
    lap: Option<u32>,
    lap_start_litres: f32,
    litres: f32,
}

impl FuelMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn update(&mut self, sample: &TelemetrySample) {
        if !sample.is_playing() {
            return;
        }
        let litres = fuel_litres(sample.fuel_level, sample.fuel_capacity);
        self.litres = litres;

        let Some(participant) = sample.viewed_participant() else {
            return;
        };
        let lap = participant.current_lap;

        match self.lap {
            Some(current) if lap > current => {
                let used = self.lap_start_litres - litres;
                if used > 0.0 {
                    self.history.push_back(used);
                    while self.history.len() > self.config.history_laps {
                        self.history.pop_front();
                    }
                }
                self.lap = Some(lap);
                self.lap_start_litres = litres;
            }
            Some(current) if lap == current => {
                if litres > self.lap_start_litres + self.config.refuel_tolerance {
                    debug!(litres, previous = self.lap_start_litres, "Refuel detected");
                    self.lap_start_litres = litres;
                }
            }
            // First sight, or the lap counter went backwards after a restart
            _ => {
                self.lap = Some(lap);
                self.lap_start_litres = litres;
            }
        }
    }

    pub fn status(&self) -> FuelStatus {
        let per_lap = if self.history.is_empty() {
            0.0
        } else {
            self.history.iter().sum::<f32>() / self.history.len() as f32
        };
        let remaining_laps = if per_lap > 0.0 { self.litres / per_lap } else { 0.0 };
        FuelStatus { litres: self.litres, per_lap, remaining_laps }
    }

    /// Litres used on each of the recorded laps, oldest first.
    pub fn history(&self) -> &VecDeque<f32> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SampleBuilder;
    use crate::types::GameState;

    fn at(lap: u32, litres: f32) -> TelemetrySample {
        SampleBuilder::driving().lap(lap).fuel(litres, 100.0).build()
    }

    #[test]
    fn level_units() {
        assert_eq!(fuel_litres(0.5, 100.0), 50.0);
        assert_eq!(fuel_litres(42.0, 100.0), 42.0);
        assert_eq!(fuel_litres(0.5, 0.0), 0.5);
    }

    #[test]
    fn consumption_over_completed_laps() {
        let mut monitor = FuelMonitor::default();
        monitor.update(&at(1, 60.0));
        monitor.update(&at(1, 58.0));
        monitor.update(&at(2, 57.0));
        monitor.update(&at(3, 54.0));

        let status = monitor.status();
        assert_eq!(monitor.history().len(), 2);
        assert_eq!(status.per_lap, 3.0);
        assert_eq!(status.remaining_laps, 18.0);
    }

    #[test]
    fn no_history_means_zero_remaining() {
        let mut monitor = FuelMonitor::default();
        monitor.update(&at(1, 0.5));
        let status = monitor.status();
        assert_eq!(status.litres, 50.0);
        assert_eq!(status.remaining_laps, 0.0);
    }

    #[test]
    fn refuel_re_anchors_the_lap() {
        let mut monitor = FuelMonitor::default();
        monitor.update(&at(1, 10.0));
        monitor.update(&at(1, 80.0));
        monitor.update(&at(2, 77.0));
        assert_eq!(monitor.history().iter().copied().collect::<Vec<_>>(), vec![3.0]);
    }

    #[test]
    fn history_keeps_last_laps_only() {
        let mut monitor = FuelMonitor::default();
        for lap in 1..=8 {
            monitor.update(&at(lap, 80.0 - lap as f32 * 2.0));
        }
        assert_eq!(monitor.history().len(), 5);
    }

    #[test]
    fn ignores_non_playing_samples() {
        let mut monitor = FuelMonitor::default();
        monitor.update(&SampleBuilder::driving().game_state(GameState::Paused).fuel(30.0, 100.0).build());
        assert_eq!(monitor.status(), FuelStatus::default());
    }
}
