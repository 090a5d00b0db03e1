//! Tyre temperature window, stability and setup advice
//!
//! The analyzer keeps a bounded FIFO of cross-section temperatures per corner
//! and turns the window averages into pressure and camber recommendations.
//!
//! Time inside the analyzer is *driving time*: it advances with the session
//! clock only while the car is being driven on track above a minimum speed.
//! Sitting in the pits or in a menu freezes the window instead of letting the
//! history age out, and session clock resets never move time backwards.

use serde::Serialize;
use std::collections::VecDeque;
use tracing::trace;

use crate::config::TyreConfig;
use crate::types::{Corner, TelemetrySample};

/// Slack when comparing accumulated f32 clock deltas against the sample interval.
const CLOCK_EPSILON: f64 = 1e-3;

/// One accepted temperature reading for a single corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TyreSample {
    /// Internal driving clock in seconds
    pub timestamp: f64,
    pub average: f32,
    pub left: f32,
    pub center: f32,
    pub right: f32,
}

impl TyreSample {
    fn from_telemetry(sample: &TelemetrySample, corner: Corner, timestamp: f64) -> Self {
        let i = corner.index();
        Self {
            timestamp,
            average: sample.tyre_temp[i],
            left: sample.tyre_temp_left[i],
            center: sample.tyre_temp_center[i],
            right: sample.tyre_temp_right[i],
        }
    }
}

/// Window-average temperature verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PressureStatus {
    TooCold,
    Ok,
    TooHot,
}

/// What to do with the cold pressure of a tyre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PressureAction {
    Decrease,
    Ok,
    Increase,
}

impl PressureAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PressureAction::Decrease => "Decrease pressure (-)",
            PressureAction::Ok => "Pressure OK",
            PressureAction::Increase => "Increase pressure (+)",
        }
    }
}

/// Center versus edge temperature hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SpreadNote {
    None,
    /// Center running hot: the tyre is probably overinflated
    Overpressure,
    /// Center running cold: the tyre is probably underinflated
    Underpressure,
}

impl SpreadNote {
    pub fn as_str(self) -> &'static str {
        match self {
            SpreadNote::None => "",
            SpreadNote::Overpressure => "Center hot -> overpressure?",
            SpreadNote::Underpressure => "Center cold -> underpressure?",
        }
    }
}

/// Camber recommendation derived from the inner/outer temperature delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum CamberAction {
    /// Inner shoulder not hot enough: run more negative camber
    Decrease,
    Ok,
    /// Inner shoulder too hot: run less negative camber
    Increase,
}

impl CamberAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CamberAction::Decrease => "Decrease camber (more negative)",
            CamberAction::Ok => "Camber OK",
            CamberAction::Increase => "Increase camber (more positive)",
        }
    }
}

/// Display color hint for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum ColorHint {
    Blue,
    Green,
    Red,
}

/// Full diagnosis of one corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CornerDiagnosis {
    pub corner: Corner,
    /// Window average of the tyre's average temperature
    pub temp: f32,
    pub pressure_status: PressureStatus,
    pub pressure_action: PressureAction,
    pub pressure_reason: String,
    pub spread: SpreadNote,
    pub camber_action: CamberAction,
    pub camber_reason: String,
    pub temp_inner: f32,
    pub temp_outer: f32,
    pub color: ColorHint,
    pub stable: bool,
    /// Samples behind this diagnosis; 0 means the live reading was used
    pub samples: usize,
}

impl CornerDiagnosis {
    pub fn needs_change(&self) -> bool {
        self.pressure_action != PressureAction::Ok || self.camber_action != CamberAction::Ok
    }

    /// Number of non-OK actions (pressure and camber) on this corner.
    pub fn problem_count(&self) -> usize {
        usize::from(self.pressure_action != PressureAction::Ok)
            + usize::from(self.camber_action != CamberAction::Ok)
    }
}

/// Averages used for a diagnosis.
#[derive(Debug, Clone, Copy, Default)]
struct Averages {
    average: f32,
    left: f32,
    center: f32,
    right: f32,
}

/// Rolling per-corner tyre temperature analyzer.
#[derive(Debug, Clone)]
pub struct TyreThermalAnalyzer {
    config: TyreConfig,
    capacity: usize,
    history: [VecDeque<TyreSample>; 4],
    live: Option<[Averages; 4]>,
    clock: f64,
    last_session_time: Option<f32>,
    last_accepted: Option<f64>,
}

impl Default for TyreThermalAnalyzer {
    fn default() -> Self {
        Self::new(TyreConfig::default())
    }
}

impl TyreThermalAnalyzer {
    pub fn new(config: TyreConfig) -> Self {
        let capacity = config.capacity();
        Self {
            config,
            capacity,
            history: std::array::from_fn(|_| VecDeque::with_capacity(capacity)),
            live: None,
            clock: 0.0,
            last_session_time: None,
            last_accepted: None,
        }
    }

    /// Feed one telemetry sample.
    pub fn update(&mut self, sample: &TelemetrySample) {
        self.live = Some(Corner::ALL.map(|corner| {
            let i = corner.index();
            Averages {
                average: sample.tyre_temp[i],
                left: sample.tyre_temp_left[i],
                center: sample.tyre_temp_center[i],
                right: sample.tyre_temp_right[i],
            }
        }));

        // The session clock is always tracked so pauses never turn into a jump later
        let delta = match self.last_session_time {
            Some(previous) => f64::from(sample.current_time - previous).max(0.0),
            None => 0.0,
        };
        self.last_session_time = Some(sample.current_time);

        let driving =
            sample.is_playing() && !sample.in_pit() && sample.speed >= self.config.min_speed;
        if !driving {
            return;
        }
        self.clock += delta;

        let due = match self.last_accepted {
            Some(at) => self.clock - at + CLOCK_EPSILON >= self.config.sample_interval(),
            None => true,
        };
        if !due {
            return;
        }
        self.last_accepted = Some(self.clock);

        for corner in Corner::ALL {
            let buffer = &mut self.history[corner.index()];
            buffer.push_back(TyreSample::from_telemetry(sample, corner, self.clock));
            while buffer.len() > self.capacity {
                buffer.pop_front();
            }
        }
        trace!(clock = self.clock, samples = self.history[0].len(), "Tyre sample accepted");
    }

    /// Best-effort diagnosis for every corner.
    pub fn analysis(&self) -> [CornerDiagnosis; 4] {
        Corner::ALL.map(|corner| self.diagnose(corner))
    }

    /// Whether a corner's window is full enough and its temperature flat enough.
    pub fn is_stable(&self, corner: Corner) -> bool {
        let history = &self.history[corner.index()];
        let required = self.capacity as f32 * self.config.stability_fill;
        if (history.len() as f32) < required || history.is_empty() {
            return false;
        }

        let (min, max) = history.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.average), hi.max(s.average))
        });
        max - min < self.config.stability_range
    }

    pub fn all_stable(&self) -> bool {
        Corner::ALL.iter().all(|&corner| self.is_stable(corner))
    }

    /// Accepted samples currently held for a corner.
    pub fn history(&self, corner: Corner) -> &VecDeque<TyreSample> {
        &self.history[corner.index()]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Internal driving clock in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Clear the window and live cache; configuration and the clock survive.
    pub fn reset(&mut self) {
        for buffer in &mut self.history {
            buffer.clear();
        }
        self.live = None;
        self.last_accepted = None;
    }

    fn averages(&self, corner: Corner) -> (Averages, usize) {
        let history = &self.history[corner.index()];
        if history.is_empty() {
            let live = self.live.map(|l| l[corner.index()]).unwrap_or_default();
            return (live, 0);
        }

        let n = history.len() as f32;
        let sum = history.iter().fold(Averages::default(), |acc, s| Averages {
            average: acc.average + s.average,
            left: acc.left + s.left,
            center: acc.center + s.center,
            right: acc.right + s.right,
        });
        let mean = Averages {
            average: sum.average / n,
            left: sum.left / n,
            center: sum.center / n,
            right: sum.right / n,
        };
        (mean, history.len())
    }

    fn diagnose(&self, corner: Corner) -> CornerDiagnosis {
        let c = &self.config;
        let (avg, samples) = self.averages(corner);

        let (pressure_status, pressure_action, color, pressure_reason) = if avg.average < c.target_min {
            (
                PressureStatus::TooCold,
                PressureAction::Decrease,
                ColorHint::Blue,
                format!("{:.1}°C below target {:.0}-{:.0}°C", avg.average, c.target_min, c.target_max),
            )
        } else if avg.average > c.target_max {
            (
                PressureStatus::TooHot,
                PressureAction::Increase,
                ColorHint::Red,
                format!("{:.1}°C above target {:.0}-{:.0}°C", avg.average, c.target_min, c.target_max),
            )
        } else {
            (
                PressureStatus::Ok,
                PressureAction::Ok,
                ColorHint::Green,
                format!("{:.1}°C within target", avg.average),
            )
        };

        let edges = (avg.left + avg.right) / 2.0;
        let spread = if avg.center > edges + c.spread_threshold {
            SpreadNote::Overpressure
        } else if avg.center < edges - c.spread_threshold {
            SpreadNote::Underpressure
        } else {
            SpreadNote::None
        };

        let (temp_inner, temp_outer) =
            if corner.is_left() { (avg.right, avg.left) } else { (avg.left, avg.right) };
        let delta = temp_inner - temp_outer;

        let (low, high) = if corner.is_front() {
            (c.front_camber_delta - c.front_camber_tolerance, c.front_camber_delta + c.front_camber_tolerance)
        } else {
            (c.rear_camber_delta_min, c.rear_camber_delta_max)
        };
        let camber_action = if delta < low {
            CamberAction::Decrease
        } else if delta > high {
            CamberAction::Increase
        } else {
            CamberAction::Ok
        };
        let camber_reason = format!("inner-outer {delta:+.1}°C, target {low:.1}..{high:.1}°C");

        CornerDiagnosis {
            corner,
            temp: avg.average,
            pressure_status,
            pressure_action,
            pressure_reason,
            spread,
            camber_action,
            camber_reason,
            temp_inner,
            temp_outer,
            color,
            stable: self.is_stable(corner),
            samples,
        }
    }
}
