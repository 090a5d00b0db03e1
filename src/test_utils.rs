//! Test utilities for building telemetry samples
//!
//! Unit tests, integration tests and benches all need realistic samples that
//! differ from a baseline in one or two channels. [`SampleBuilder`] starts from
//! a car driving cleanly in a practice session and lets each test override
//! only what it is about.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::{
    Corner, GameState, Participant, PerCorner, PitMode, SessionState, TelemetrySample,
};

/// Rolling radius used by the builder's baseline car.
pub const TYRE_RADIUS: f32 = 0.33;

/// Fluent builder for [`TelemetrySample`] values.
#[derive(Debug, Clone)]
pub struct SampleBuilder {
    sample: TelemetrySample,
}

impl SampleBuilder {
    /// A car driving at 40 m/s on lap 1 of a practice session, wheels rolling
    /// without slip and all tyres at 80°C with a flat profile.
    pub fn driving() -> Self {
        let speed = 40.0;
        let sample = TelemetrySample {
            game_state: GameState::Playing,
            session_state: SessionState::Practice,
            pit_mode: PitMode::None,
            viewed_participant_index: 0,
            participants: vec![Participant { current_lap: 1, world_position: [0.0; 3] }],
            unfiltered_throttle: 1.0,
            throttle: 1.0,
            speed,
            fuel_capacity: 100.0,
            fuel_level: 1.0,
            tyre_rps: [speed / TYRE_RADIUS; 4],
            tyre_radius: [TYRE_RADIUS; 4],
            tyre_temp: [80.0; 4],
            tyre_temp_left: [80.0; 4],
            tyre_temp_center: [80.0; 4],
            tyre_temp_right: [80.0; 4],
            brake_temp_celsius: [400.0; 4],
            ..TelemetrySample::default()
        };
        Self { sample }
    }

    /// Vehicle speed in m/s; wheels follow without slip.
    pub fn speed(mut self, speed: f32) -> Self {
        self.sample.speed = speed;
        self.sample.tyre_rps = [speed / TYRE_RADIUS; 4];
        self
    }

    /// Wheel surface speeds in m/s, independent of vehicle speed.
    pub fn wheel_speeds(mut self, speeds: PerCorner<f32>) -> Self {
        self.sample.tyre_rps = speeds.map(|s| s / TYRE_RADIUS);
        self
    }

    pub fn slip_speeds(mut self, slips: PerCorner<f32>) -> Self {
        self.sample.tyre_slip_speed = slips;
        self
    }

    pub fn time(mut self, seconds: f32) -> Self {
        self.sample.current_time = seconds;
        self
    }

    pub fn odometer(mut self, km: f32) -> Self {
        self.sample.odometer_km = km;
        self
    }

    /// Throttle and brake on both the filtered and unfiltered channels.
    pub fn pedals(mut self, throttle: f32, brake: f32) -> Self {
        self.sample.unfiltered_throttle = throttle;
        self.sample.throttle = throttle;
        self.sample.unfiltered_brake = brake;
        self.sample.brake = brake;
        self
    }

    pub fn lateral_g(mut self, g: f32) -> Self {
        self.sample.local_acceleration[0] = g;
        self
    }

    pub fn steering(mut self, steering: f32) -> Self {
        self.sample.unfiltered_steering = steering;
        self.sample.steering = steering;
        self
    }

    /// Flat temperature profile on every corner.
    pub fn tyre_temps(mut self, temp: f32) -> Self {
        self.sample.tyre_temp = [temp; 4];
        self.sample.tyre_temp_left = [temp; 4];
        self.sample.tyre_temp_center = [temp; 4];
        self.sample.tyre_temp_right = [temp; 4];
        self
    }

    /// Cross-section readings for one corner; the average follows the three.
    pub fn tyre_profile(mut self, corner: Corner, left: f32, center: f32, right: f32) -> Self {
        let i = corner.index();
        self.sample.tyre_temp_left[i] = left;
        self.sample.tyre_temp_center[i] = center;
        self.sample.tyre_temp_right[i] = right;
        self.sample.tyre_temp[i] = (left + center + right) / 3.0;
        self
    }

    /// Profiles that satisfy the default camber targets at `temp`: fronts
    /// 7°C hotter inside than outside, rears 4°C.
    pub fn ideal_tyres(self, temp: f32) -> Self {
        self.tyre_profile(Corner::FrontLeft, temp - 3.5, temp, temp + 3.5)
            .tyre_profile(Corner::FrontRight, temp + 3.5, temp, temp - 3.5)
            .tyre_profile(Corner::RearLeft, temp - 2.0, temp, temp + 2.0)
            .tyre_profile(Corner::RearRight, temp + 2.0, temp, temp - 2.0)
    }

    pub fn wear(mut self, wear: PerCorner<f32>) -> Self {
        self.sample.tyre_wear = wear;
        self
    }

    pub fn fuel(mut self, level: f32, capacity: f32) -> Self {
        self.sample.fuel_level = level;
        self.sample.fuel_capacity = capacity;
        self
    }

    pub fn game_state(mut self, state: GameState) -> Self {
        self.sample.game_state = state;
        self
    }

    pub fn session(mut self, state: SessionState) -> Self {
        self.sample.session_state = state;
        self
    }

    pub fn pit_mode(mut self, mode: PitMode) -> Self {
        self.sample.pit_mode = mode;
        self
    }

    pub fn lap(mut self, lap: u32) -> Self {
        if let Some(participant) = self.sample.participants.first_mut() {
            participant.current_lap = lap;
        }
        self
    }

    pub fn position(mut self, x: f32, z: f32) -> Self {
        if let Some(participant) = self.sample.participants.first_mut() {
            participant.world_position = [x, 0.0, z];
        }
        self
    }

    pub fn viewed_index(mut self, index: i32) -> Self {
        self.sample.viewed_participant_index = index;
        self
    }

    pub fn lap_invalidated(mut self, invalid: bool) -> Self {
        self.sample.lap_invalidated = invalid;
        self
    }

    pub fn build(self) -> TelemetrySample {
        self.sample
    }
}

/// A stint of evenly spaced samples at `hz`, with the session clock and the
/// odometer advancing together at the builder's speed.
pub fn stint(base: SampleBuilder, hz: f32, seconds: f32) -> Vec<TelemetrySample> {
    let template = base.build();
    let ticks = (seconds * hz).round() as usize;
    let dt = 1.0 / hz;
    (0..ticks)
        .map(|i| {
            let t = i as f32 * dt;
            TelemetrySample {
                current_time: template.current_time + t,
                odometer_km: template.odometer_km + template.speed * t / 1000.0,
                ..template.clone()
            }
        })
        .collect()
}
