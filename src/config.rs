//! Engineer configuration.
//!
//! Every threshold the pipeline uses lives here, so per-class tuning (a GT3 car
//! wants a different tyre window than a formula car) is a configuration change
//! rather than a code change. Missing keys fall back to the defaults below.
//!
//! ```rust
//! use race_engineer::EngineerConfig;
//!
//! let config = EngineerConfig::from_yaml_str("tyres:\n  target_min: 80.0\n  target_max: 92.0\n")?;
//! assert_eq!(config.tyres.target_min, 80.0);
//! assert_eq!(config.stint.analysis_distance_km, 10.0);
//! # Ok::<(), race_engineer::EngineerError>(())
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::{EngineerError, Result};

/// Upper bound on the per-corner tyre window (10 minutes at 60 Hz).
pub const MAX_WINDOW_SAMPLES: usize = 36_000;

/// Longest per-kind event cooldown accepted, in seconds.
pub const MAX_COOLDOWN_SECS: f32 = 3600.0;

/// Top-level configuration for a [`StintEngineer`](crate::StintEngineer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineerConfig {
    pub phase: PhaseConfig,
    pub tyres: TyreConfig,
    pub handling: HandlingConfig,
    pub events: EventConfig,
    pub stint: StintConfig,
    pub steering: SteeringConfig,
    pub monitors: MonitorConfig,
}

/// Pedal and lateral-G thresholds for phase detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    pub brake_threshold: f32,
    pub throttle_threshold: f32,
    /// Lateral G above which the car counts as cornering
    pub cornering_lat_g: f32,
    /// Lateral G below which a corner counts as finished
    pub straight_lat_g: f32,
    /// Throttle above which an exit is complete
    pub full_throttle: f32,
    /// Pedal value treated as "released"
    pub pedal_released: f32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            brake_threshold: 0.1,
            throttle_threshold: 0.1,
            cornering_lat_g: 0.5,
            straight_lat_g: 0.2,
            full_throttle: 0.8,
            pedal_released: 0.01,
        }
    }
}

/// Tyre temperature window and setup targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TyreConfig {
    pub window_secs: f32,
    pub sample_rate_hz: f32,
    pub target_min: f32,
    pub target_max: f32,
    /// Center vs edge difference that hints at over/under pressure
    pub spread_threshold: f32,
    pub front_camber_delta: f32,
    pub front_camber_tolerance: f32,
    pub rear_camber_delta_min: f32,
    pub rear_camber_delta_max: f32,
    /// Maximum temperature range over the window for a stable corner
    pub stability_range: f32,
    /// Fraction of the window that must be filled before stability is judged
    pub stability_fill: f32,
    /// Below this speed (m/s) the window is paused
    pub min_speed: f32,
}

impl Default for TyreConfig {
    fn default() -> Self {
        Self {
            window_secs: 90.0,
            sample_rate_hz: 1.0,
            target_min: 75.0,
            target_max: 85.0,
            spread_threshold: 3.0,
            front_camber_delta: 7.0,
            front_camber_tolerance: 1.5,
            rear_camber_delta_min: 3.0,
            rear_camber_delta_max: 5.0,
            stability_range: 3.0,
            stability_fill: 0.8,
            min_speed: 5.0,
        }
    }
}

impl TyreConfig {
    /// Number of samples the per-corner window holds.
    pub fn capacity(&self) -> usize {
        (self.window_secs * self.sample_rate_hz).round().clamp(1.0, MAX_WINDOW_SAMPLES as f32) as usize
    }

    /// Internal-clock spacing between accepted samples.
    pub fn sample_interval(&self) -> f64 {
        1.0 / f64::from(self.sample_rate_hz)
    }
}

/// Under/oversteer balance classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlingConfig {
    pub min_speed: f32,
    pub threshold: f32,
}

impl Default for HandlingConfig {
    fn default() -> Self {
        Self { min_speed: 10.0, threshold: 0.5 }
    }
}

/// Anomaly detection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub min_speed_kmh: f32,
    /// Below this speed (m/s) lockup checks are skipped
    pub lockup_min_speed: f32,
    pub lockup_slip_ratio: f32,
    pub entry_slip_delta: f32,
    pub exit_slip_delta: f32,
    pub exit_min_throttle: f32,
    /// Per-kind cooldown in seconds
    pub cooldown_secs: f32,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            min_speed_kmh: 20.0,
            lockup_min_speed: 5.0,
            lockup_slip_ratio: 0.4,
            entry_slip_delta: 1.0,
            exit_slip_delta: 1.5,
            exit_min_throttle: 0.5,
            cooldown_secs: 5.0,
        }
    }
}

impl EventConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f32(self.cooldown_secs.max(0.0)).unwrap_or(Duration::MAX)
    }
}

/// Stint workflow thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StintConfig {
    pub analysis_distance_km: f32,
    /// Laps after which gathering moves on to checking
    pub min_laps: u32,
    /// Speed (m/s) that confirms a new stint after a pit visit
    pub restart_speed: f32,
}

impl Default for StintConfig {
    fn default() -> Self {
        Self { analysis_distance_km: 10.0, min_laps: 2, restart_speed: 10.0 }
    }
}

/// Steering lock usage per lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub high_usage: f32,
    pub low_usage: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self { high_usage: 0.98, low_usage: 0.60 }
    }
}

/// Fuel and wear monitor history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub history_laps: usize,
    /// Litres gained within a lap that count as a refuel
    pub refuel_tolerance: f32,
    /// Minimum spacing (m) between recorded track points
    pub track_point_spacing: f32,
    /// Radii above this (m) are treated as straights
    pub max_corner_radius: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            history_laps: 5,
            refuel_tolerance: 1.0,
            track_point_spacing: 2.0,
            max_corner_radius: 200.0,
        }
    }
}

impl EngineerConfig {
    /// Parse and validate a YAML configuration string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineerConfig = serde_yaml_ng::from_str(yaml).map_err(|e| EngineerError::Parse {
            context: "Engineer configuration".to_string(),
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load, parse and validate a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| EngineerError::file_error(path.to_path_buf(), e))
            .with_context(|| format!("reading engineer config {}", path.display()))?;

        let config = Self::from_yaml_str(&yaml)
            .with_context(|| format!("loading engineer config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded engineer configuration");
        Ok(config)
    }

    fn thresholds(&self) -> [(&'static str, f32); 29] {
        let (p, t, h, e) = (&self.phase, &self.tyres, &self.handling, &self.events);
        [
            ("phase.brake_threshold", p.brake_threshold),
            ("phase.throttle_threshold", p.throttle_threshold),
            ("phase.cornering_lat_g", p.cornering_lat_g),
            ("phase.straight_lat_g", p.straight_lat_g),
            ("phase.full_throttle", p.full_throttle),
            ("phase.pedal_released", p.pedal_released),
            ("tyres.window_secs", t.window_secs),
            ("tyres.sample_rate_hz", t.sample_rate_hz),
            ("tyres.target_min", t.target_min),
            ("tyres.target_max", t.target_max),
            ("tyres.spread_threshold", t.spread_threshold),
            ("tyres.front_camber_delta", t.front_camber_delta),
            ("tyres.front_camber_tolerance", t.front_camber_tolerance),
            ("tyres.rear_camber_delta_min", t.rear_camber_delta_min),
            ("tyres.rear_camber_delta_max", t.rear_camber_delta_max),
            ("tyres.stability_range", t.stability_range),
            ("tyres.stability_fill", t.stability_fill),
            ("tyres.min_speed", t.min_speed),
            ("handling.min_speed", h.min_speed),
            ("handling.threshold", h.threshold),
            ("events.min_speed_kmh", e.min_speed_kmh),
            ("events.lockup_min_speed", e.lockup_min_speed),
            ("events.lockup_slip_ratio", e.lockup_slip_ratio),
            ("events.entry_slip_delta", e.entry_slip_delta),
            ("events.exit_slip_delta", e.exit_slip_delta),
            ("events.exit_min_throttle", e.exit_min_throttle),
            ("events.cooldown_secs", e.cooldown_secs),
            ("stint.analysis_distance_km", self.stint.analysis_distance_km),
            ("stint.restart_speed", self.stint.restart_speed),
        ]
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let finite_checks = self.thresholds().into_iter().chain([
            ("steering.high_usage", self.steering.high_usage),
            ("steering.low_usage", self.steering.low_usage),
            ("monitors.refuel_tolerance", self.monitors.refuel_tolerance),
            ("monitors.track_point_spacing", self.monitors.track_point_spacing),
            ("monitors.max_corner_radius", self.monitors.max_corner_radius),
        ]);
        for (name, value) in finite_checks {
            if !value.is_finite() {
                return Err(EngineerError::config_error(format!("{name} must be finite, got {value}")));
            }
        }

        let t = &self.tyres;
        if t.window_secs <= 0.0 || t.sample_rate_hz <= 0.0 {
            return Err(EngineerError::config_error(format!(
                "tyre window {}s at {}Hz must be positive",
                t.window_secs, t.sample_rate_hz
            )));
        }
        let samples = f64::from(t.window_secs) * f64::from(t.sample_rate_hz);
        if samples > MAX_WINDOW_SAMPLES as f64 {
            return Err(EngineerError::config_error(format!(
                "tyre window of {samples:.0} samples exceeds the limit of {MAX_WINDOW_SAMPLES}"
            )));
        }
        if t.target_min > t.target_max {
            return Err(EngineerError::config_error(format!(
                "tyre target_min {} exceeds target_max {}",
                t.target_min, t.target_max
            )));
        }
        if t.rear_camber_delta_min > t.rear_camber_delta_max {
            return Err(EngineerError::config_error(format!(
                "rear camber delta range {}..{} is inverted",
                t.rear_camber_delta_min, t.rear_camber_delta_max
            )));
        }
        if t.front_camber_tolerance < 0.0 {
            return Err(EngineerError::config_error("front camber tolerance must not be negative"));
        }
        if !(0.0..=1.0).contains(&t.stability_fill) {
            return Err(EngineerError::config_error(format!(
                "stability fill {} must be within 0..=1",
                t.stability_fill
            )));
        }
        if !(0.0..=MAX_COOLDOWN_SECS).contains(&self.events.cooldown_secs) {
            return Err(EngineerError::config_error(format!(
                "event cooldown {}s must be within 0..={MAX_COOLDOWN_SECS}",
                self.events.cooldown_secs
            )));
        }
        if self.steering.low_usage > self.steering.high_usage {
            return Err(EngineerError::config_error(format!(
                "steering low usage {} exceeds high usage {}",
                self.steering.low_usage, self.steering.high_usage
            )));
        }
        if self.stint.analysis_distance_km <= 0.0 {
            return Err(EngineerError::config_error("analysis distance must be positive"));
        }
        if self.monitors.history_laps == 0 {
            return Err(EngineerError::config_error("monitor history must keep at least one lap"));
        }
        Ok(())
    }
}
