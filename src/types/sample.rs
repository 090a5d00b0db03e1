//! Telemetry sample: one immutable snapshot of vehicle state

use serde::{Deserialize, Serialize};

use super::{Corner, GameState, PitMode, SessionState};
use crate::{EngineerError, Result};

/// Per-corner values in FL, FR, RL, RR order.
pub type PerCorner<T> = [T; 4];

/// A participant entry from the simulator's participant table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Participant {
    /// Lap currently being driven (the simulator starts counting at 1)
    pub current_lap: u32,
    /// World position `[x, y, z]` in metres
    pub world_position: [f32; 3],
}

/// One frame of vehicle telemetry, refreshed by the provider at roughly 10Hz.
///
/// Field units follow the simulator's shared-memory layout: speeds in m/s,
/// distances in km for the odometer, temperatures in °C, pedals `0.0..=1.0`
/// and steering `-1.0..=1.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySample {
    pub game_state: GameState,
    pub session_state: SessionState,
    pub pit_mode: PitMode,

    /// Index into `participants` of the car being viewed (may be out of range)
    pub viewed_participant_index: i32,
    pub participants: Vec<Participant>,

    pub unfiltered_throttle: f32,
    pub unfiltered_brake: f32,
    pub unfiltered_steering: f32,
    pub unfiltered_clutch: f32,
    pub throttle: f32,
    pub brake: f32,
    pub clutch: f32,
    pub steering: f32,

    /// Vehicle speed in m/s
    pub speed: f32,
    pub odometer_km: f32,
    /// Either litres or a `0.0..=1.0` ratio of `fuel_capacity`, depending on the build
    pub fuel_level: f32,
    pub fuel_capacity: f32,
    /// Local acceleration `[lateral, vertical, longitudinal]` in g
    pub local_acceleration: [f32; 3],

    /// Session clock in seconds
    pub current_time: f32,
    pub lap_invalidated: bool,

    /// Wheel rotational speed in rad/s
    pub tyre_rps: PerCorner<f32>,
    /// Rolling radius in metres
    pub tyre_radius: PerCorner<f32>,
    /// Contact patch slip speed in m/s
    pub tyre_slip_speed: PerCorner<f32>,
    pub tyre_temp: PerCorner<f32>,
    pub tyre_temp_left: PerCorner<f32>,
    pub tyre_temp_center: PerCorner<f32>,
    pub tyre_temp_right: PerCorner<f32>,
    /// Wear ratio, 0.0 fresh to 1.0 worn out
    pub tyre_wear: PerCorner<f32>,
    pub brake_temp_celsius: PerCorner<f32>,
}

impl TelemetrySample {
    /// Validate the sample once at the ingestion boundary.
    ///
    /// Only rejects values the analysis cannot absorb (non-finite numbers).
    /// Out-of-range participant indices are tolerated and handled downstream.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("speed", self.speed),
            ("odometer_km", self.odometer_km),
            ("current_time", self.current_time),
            ("unfiltered_throttle", self.unfiltered_throttle),
            ("unfiltered_brake", self.unfiltered_brake),
            ("unfiltered_steering", self.unfiltered_steering),
            ("steering", self.steering),
            ("fuel_level", self.fuel_level),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(EngineerError::invalid_sample(field, format!("non-finite value {value}")));
            }
        }

        if self.local_acceleration.iter().any(|v| !v.is_finite()) {
            return Err(EngineerError::invalid_sample("local_acceleration", "non-finite component"));
        }

        let corners = [
            ("tyre_temp", &self.tyre_temp),
            ("tyre_temp_left", &self.tyre_temp_left),
            ("tyre_temp_center", &self.tyre_temp_center),
            ("tyre_temp_right", &self.tyre_temp_right),
            ("tyre_slip_speed", &self.tyre_slip_speed),
            ("tyre_rps", &self.tyre_rps),
            ("tyre_radius", &self.tyre_radius),
        ];
        for (field, values) in corners {
            if let Some(corner) = Corner::ALL.iter().find(|c| !values[c.index()].is_finite()) {
                return Err(EngineerError::invalid_sample(
                    field,
                    format!("non-finite value at {}", corner.label()),
                ));
            }
        }

        Ok(())
    }

    /// Whether the simulator reports the car as actively being driven.
    pub fn is_playing(&self) -> bool {
        self.game_state == GameState::Playing
    }

    /// Whether the car is anywhere in the pit lane or garage.
    pub fn in_pit(&self) -> bool {
        self.pit_mode != PitMode::None
    }

    pub fn speed_kmh(&self) -> f32 {
        self.speed * 3.6
    }

    /// Absolute lateral acceleration in g.
    pub fn lateral_g(&self) -> f32 {
        self.local_acceleration[0].abs()
    }

    /// The viewed participant, if the index points into the table.
    pub fn viewed_participant(&self) -> Option<&Participant> {
        usize::try_from(self.viewed_participant_index)
            .ok()
            .and_then(|index| self.participants.get(index))
    }

    /// Lap currently driven by the viewed participant, 0 when unknown.
    pub fn current_lap(&self) -> u32 {
        self.viewed_participant().map(|p| p.current_lap).unwrap_or(0)
    }

    /// Laps completed by the viewed participant (current lap minus one).
    pub fn laps_completed(&self) -> u32 {
        self.current_lap().saturating_sub(1)
    }

    /// Planar world position `(x, z)` of the viewed participant.
    pub fn world_position_xz(&self) -> Option<(f32, f32)> {
        self.viewed_participant().map(|p| (p.world_position[0], p.world_position[2]))
    }

    /// Surface speed of a wheel in m/s, derived from rotation and radius.
    pub fn wheel_surface_speed(&self, corner: Corner) -> f32 {
        let i = corner.index();
        (self.tyre_rps[i] * self.tyre_radius[i]).abs()
    }

    /// Mean absolute slip speed of the front and rear axle.
    pub fn axle_slip_speeds(&self) -> (f32, f32) {
        let slip = |c: Corner| self.tyre_slip_speed[c.index()].abs();
        let front = (slip(Corner::FrontLeft) + slip(Corner::FrontRight)) / 2.0;
        let rear = (slip(Corner::RearLeft) + slip(Corner::RearRight)) / 2.0;
        (front, rear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_with_participants(index: i32, count: usize) -> TelemetrySample {
        TelemetrySample {
            viewed_participant_index: index,
            participants: (0..count)
                .map(|i| Participant {
                    current_lap: i as u32 + 3,
                    world_position: [i as f32, 1.0, -(i as f32)],
                })
                .collect(),
            ..TelemetrySample::default()
        }
    }

    #[test]
    fn invalid_participant_index_means_lap_zero() {
        assert_eq!(sample_with_participants(-1, 2).current_lap(), 0);
        assert_eq!(sample_with_participants(2, 2).current_lap(), 0);
        assert_eq!(sample_with_participants(0, 0).laps_completed(), 0);
        assert!(sample_with_participants(5, 2).world_position_xz().is_none());
    }

    #[test]
    fn viewed_participant_resolves_position_and_lap() {
        let sample = sample_with_participants(1, 3);
        assert_eq!(sample.current_lap(), 4);
        assert_eq!(sample.laps_completed(), 3);
        assert_eq!(sample.world_position_xz(), Some((1.0, -1.0)));
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let mut sample = TelemetrySample::default();
        assert!(sample.validate().is_ok());

        sample.speed = f32::NAN;
        assert!(matches!(sample.validate(), Err(EngineerError::InvalidSample { ref field, .. }) if field == "speed"));

        sample.speed = 10.0;
        sample.tyre_temp_center[2] = f32::INFINITY;
        let err = sample.validate().unwrap_err();
        assert!(err.to_string().contains("RL"));
    }

    #[test]
    fn wheel_surface_speed_uses_magnitude() {
        let sample = TelemetrySample {
            tyre_rps: [-100.0, 100.0, 0.0, 50.0],
            tyre_radius: [0.3; 4],
            ..TelemetrySample::default()
        };
        assert!((sample.wheel_surface_speed(Corner::FrontLeft) - 30.0).abs() < 1e-4);
        assert!((sample.wheel_surface_speed(Corner::FrontRight) - 30.0).abs() < 1e-4);
        assert_eq!(sample.wheel_surface_speed(Corner::RearLeft), 0.0);
    }

    #[test]
    fn yaml_round_trip_uses_raw_state_codes() {
        let yaml = "game_state: 2\nsession_state: 5\npit_mode: 2\nspeed: 40.0\n";
        let sample: TelemetrySample = serde_yaml_ng::from_str(yaml).expect("valid sample yaml");
        assert!(sample.is_playing());
        assert_eq!(sample.session_state, SessionState::Race);
        assert!(sample.in_pit());
        assert_eq!(sample.speed, 40.0);
    }
}
