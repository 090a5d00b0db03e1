//! Tyre wear rate per lap

use serde::Serialize;
use std::collections::VecDeque;

use crate::config::MonitorConfig;
use crate::types::{Corner, PerCorner, TelemetrySample};

/// Rates below this are treated as no wear at all.
const MIN_WEAR_RATE: f32 = 1e-4;

/// Projection shown when a tyre is not wearing measurably.
pub const UNLIMITED_LAPS: f32 = 999.0;

/// Wear state of one corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CornerWear {
    pub corner: Corner,
    pub wear_percent: f32,
    pub per_lap_percent: f32,
    pub remaining_laps: f32,
}

#[derive(Debug, Clone, Default)]
pub struct WearMonitor {
    config: MonitorConfig,
    history: [VecDeque<f32>; 4],
    lap: Option<u32>,
    lap_start_wear: PerCorner<f32>,
    current: PerCorner<f32>,
}

impl WearMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn update(&mut self, sample: &TelemetrySample) {
        if !sample.is_playing() {
            return;
        }
        self.current = sample.tyre_wear;

        let Some(participant) = sample.viewed_participant() else {
            return;
        };
        let lap = participant.current_lap;

        match self.lap {
            Some(current) if lap > current => {
                for corner in Corner::ALL {
                    let i = corner.index();
                    // A fresh tyre reads lower than the old one; that lap is skipped
                    let delta = sample.tyre_wear[i] - self.lap_start_wear[i];
                    if delta > 0.0 {
                        let history = &mut self.history[i];
                        history.push_back(delta);
                        while history.len() > self.config.history_laps {
                            history.pop_front();
                        }
                    }
                }
                self.lap = Some(lap);
                self.lap_start_wear = sample.tyre_wear;
            }
            Some(current) if lap == current => {}
            _ => {
                self.lap = Some(lap);
                self.lap_start_wear = sample.tyre_wear;
            }
        }
    }

    pub fn status(&self) -> [CornerWear; 4] {
        Corner::ALL.map(|corner| {
            let i = corner.index();
            let history = &self.history[i];
            let rate = if history.is_empty() {
                0.0
            } else {
                history.iter().sum::<f32>() / history.len() as f32
            };
            let remaining_laps =
                if rate > MIN_WEAR_RATE { (1.0 - self.current[i]) / rate } else { UNLIMITED_LAPS };

            CornerWear {
                corner,
                wear_percent: self.current[i] * 100.0,
                per_lap_percent: rate * 100.0,
                remaining_laps,
            }
        })
    }
}
