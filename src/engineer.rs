//! Stint-level race engineer
//!
//! [`StintEngineer`] owns every analysis component, feeds them one sample at a
//! time and sequences their output into a stint workflow:
//!
//! ```text
//! WAITING ──first playing tick──▶ GATHERING ──min laps──▶ CHECKING
//!                                     │                       │
//!                                     └──── distance reached, change needed ───▶ BOX
//!                                                                                │
//!            GATHERING ◀──── pit visit, then back on track above restart speed ──┘
//! ```
//!
//! Race sessions never leave GATHERING/CHECKING: setup analysis is suspended
//! and the message only reports distance and handling.
//!
//! ## Usage Example
//!
//! ```rust
//! use race_engineer::{EngineerConfig, StintEngineer, StintState};
//! use race_engineer::types::{GameState, TelemetrySample};
//!
//! let mut engineer = StintEngineer::new(EngineerConfig::default());
//! engineer.update(&TelemetrySample { game_state: GameState::Playing, ..TelemetrySample::default() });
//!
//! let report = engineer.report();
//! assert_eq!(report.state, StintState::Gathering);
//! assert!(!report.ready);
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::analysis::{
    CamberAction, CornerDiagnosis, CornerWear, EventDetector, EventKind, EventSummary, FuelMonitor,
    FuelStatus, HandlingClassifier, HandlingStatus, PhaseDetector, PressureAction, SteeringAdvice,
    SteeringLockAnalyzer, TightestCorner, TrackRecorder, TyreThermalAnalyzer, WearMonitor,
};
use crate::config::EngineerConfig;
use crate::types::{Phase, TelemetrySample};

/// Stint workflow state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum StintState {
    #[default]
    Waiting,
    Gathering,
    Checking,
    Box,
}

impl StintState {
    pub fn as_str(self) -> &'static str {
        match self {
            StintState::Waiting => "WAITING",
            StintState::Gathering => "GATHERING",
            StintState::Checking => "CHECKING",
            StintState::Box => "BOX",
        }
    }
}

impl fmt::Display for StintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the current stint compares to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SetupFeedback {
    Improved,
    Worsened,
    Neutral,
}

/// Setup verdict of one stint, kept as the baseline for the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SetupSnapshot {
    pub pressure: [PressureAction; 4],
    pub camber: [CamberAction; 4],
    pub events: BTreeMap<EventKind, u32>,
}

impl SetupSnapshot {
    pub fn capture(tyres: &[CornerDiagnosis; 4], events: &EventSummary) -> Self {
        Self {
            pressure: tyres.each_ref().map(|t| t.pressure_action),
            camber: tyres.each_ref().map(|t| t.camber_action),
            events: events.summary.iter().map(|(kind, c)| (*kind, c.count)).collect(),
        }
    }

    /// Non-OK tyre actions plus every recorded event.
    pub fn problem_count(&self) -> u32 {
        let pressure = self.pressure.iter().filter(|a| **a != PressureAction::Ok).count() as u32;
        let camber = self.camber.iter().filter(|a| **a != CamberAction::Ok).count() as u32;
        pressure + camber + self.events.values().sum::<u32>()
    }

    /// Feedback for `self` measured against an earlier baseline.
    pub fn compare(&self, baseline: &SetupSnapshot) -> SetupFeedback {
        let (current, previous) = (self.problem_count(), baseline.problem_count());
        match current.cmp(&previous) {
            std::cmp::Ordering::Less => SetupFeedback::Improved,
            std::cmp::Ordering::Greater => SetupFeedback::Worsened,
            std::cmp::Ordering::Equal => SetupFeedback::Neutral,
        }
    }
}

/// Everything the presentation layer shows for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct EngineerReport {
    pub message: String,
    /// Analysis finished and the car should come in
    pub ready: bool,
    pub state: StintState,
    pub tyres: [CornerDiagnosis; 4],
    /// Stability of all four corners, only surfaced while checking
    pub tyres_stable: Option<bool>,
    pub steering: Option<SteeringAdvice>,
    pub events: EventSummary,
    pub phase: Phase,
    pub handling: HandlingStatus,
    pub handling_value: f32,
    pub stint_distance_km: f32,
    pub laps_completed: u32,
    pub feedback: Option<SetupFeedback>,
    pub fuel: FuelStatus,
    pub wear: [CornerWear; 4],
    pub tightest_corner: Option<TightestCorner>,
}

/// Top-level stint state machine.
#[derive(Debug, Clone)]
pub struct StintEngineer {
    config: EngineerConfig,
    phase: PhaseDetector,
    tyres: TyreThermalAnalyzer,
    handling: HandlingClassifier,
    events: EventDetector,
    steering: SteeringLockAnalyzer,
    fuel: FuelMonitor,
    wear: WearMonitor,
    track: TrackRecorder,

    state: StintState,
    message: String,
    stint_start_odometer: Option<f32>,
    stint_distance: f32,
    stint_start_lap: u32,
    laps_completed: u32,
    participant_missing: bool,
    has_visited_pit: bool,

    previous: Option<SetupSnapshot>,
    snapshot_at_box: bool,
    compared_this_stint: bool,
    feedback: Option<SetupFeedback>,
}

impl Default for StintEngineer {
    fn default() -> Self {
        Self::new(EngineerConfig::default())
    }
}

impl StintEngineer {
    pub fn new(config: EngineerConfig) -> Self {
        Self {
            phase: PhaseDetector::new(config.phase.clone()),
            tyres: TyreThermalAnalyzer::new(config.tyres.clone()),
            handling: HandlingClassifier::new(config.handling.clone()),
            events: EventDetector::new(config.events.clone()),
            steering: SteeringLockAnalyzer::new(config.steering.clone()),
            fuel: FuelMonitor::new(config.monitors.clone()),
            wear: WearMonitor::new(config.monitors.clone()),
            track: TrackRecorder::new(config.monitors.clone()),
            config,
            state: StintState::Waiting,
            message: "Waiting for session...".to_string(),
            stint_start_odometer: None,
            stint_distance: 0.0,
            stint_start_lap: 0,
            laps_completed: 0,
            participant_missing: false,
            has_visited_pit: false,
            previous: None,
            snapshot_at_box: false,
            compared_this_stint: false,
            feedback: None,
        }
    }

    /// Advance the engineer by one sample using the wall clock for debounce.
    pub fn update(&mut self, sample: &TelemetrySample) {
        self.update_at(sample, Instant::now());
    }

    /// Advance the engineer by one sample at an explicit instant.
    pub fn update_at(&mut self, sample: &TelemetrySample, now: Instant) {
        self.track_distance(sample);
        self.track_participant(sample);

        let lap = sample.current_lap();
        let phase = self.phase.update(sample);
        self.tyres.update(sample);
        self.steering.update(sample, lap);
        self.handling.classify(sample);
        self.events.update(sample, phase, now);
        self.fuel.update(sample);
        self.wear.update(sample);
        self.track.update(sample);

        // Pauses and menus leave the workflow untouched, BOX included
        if !sample.is_playing() {
            return;
        }

        match self.state {
            StintState::Box => self.await_new_stint(sample),
            StintState::Waiting => {
                self.start_stint(sample);
                info!(odometer_km = sample.odometer_km, "Session detected, gathering data");
                self.analyse(sample);
            }
            StintState::Gathering | StintState::Checking => self.analyse(sample),
        }
    }

    fn track_distance(&mut self, sample: &TelemetrySample) {
        let odometer = sample.odometer_km;
        let start = match self.stint_start_odometer {
            Some(start) if odometer < start => {
                warn!(odometer_km = odometer, previous_km = start, "Odometer went backwards, re-anchoring stint");
                self.track.reset();
                odometer
            }
            Some(start) => start,
            None => odometer,
        };
        self.stint_start_odometer = Some(start);
        self.stint_distance = odometer - start;
    }

    fn track_participant(&mut self, sample: &TelemetrySample) {
        let missing = sample.viewed_participant().is_none();
        if missing && !self.participant_missing {
            warn!(
                index = sample.viewed_participant_index,
                participants = sample.participants.len(),
                "Viewed participant index out of range, assuming lap 0"
            );
        }
        self.participant_missing = missing;
        self.laps_completed = sample.laps_completed();
    }

    fn start_stint(&mut self, sample: &TelemetrySample) {
        self.state = StintState::Gathering;
        self.stint_start_odometer = Some(sample.odometer_km);
        self.stint_distance = 0.0;
        self.stint_start_lap = self.laps_completed;
        self.tyres.reset();
        self.events.reset();
    }

    fn await_new_stint(&mut self, sample: &TelemetrySample) {
        self.has_visited_pit |= sample.in_pit();

        let new_stint =
            self.has_visited_pit && sample.speed > self.config.stint.restart_speed && !sample.in_pit();
        if !new_stint {
            if self.has_visited_pit {
                self.message = "Ready for a new stint...".to_string();
            }
            return;
        }

        if !self.snapshot_at_box {
            self.previous = Some(SetupSnapshot::capture(&self.tyres.analysis(), &self.events.summary()));
        }
        self.start_stint(sample);
        self.has_visited_pit = false;
        self.snapshot_at_box = false;
        self.compared_this_stint = false;
        self.feedback = None;
        self.message = "New stint started. Gathering data...".to_string();
        info!(odometer_km = sample.odometer_km, lap = self.stint_start_lap, "New stint after pit visit");
    }

    fn analyse(&mut self, sample: &TelemetrySample) {
        let stint = &self.config.stint;
        if self.state == StintState::Gathering
            && self.laps_completed.saturating_sub(self.stint_start_lap) >= stint.min_laps
        {
            self.state = StintState::Checking;
            info!(laps = self.laps_completed - self.stint_start_lap, "Reference laps complete, checking stability");
        }

        if sample.session_state.is_race() {
            self.message = format!(
                "RACE - {:.1} km - {} - {}",
                self.stint_distance,
                self.phase.current(),
                self.handling.status()
            );
            return;
        }

        if self.stint_distance < stint.analysis_distance_km {
            self.message = format!(
                "Analysing... ({:.1}/{:.0} km) - {}",
                self.stint_distance,
                stint.analysis_distance_km,
                self.handling.status()
            );
            return;
        }

        let tyres = self.tyres.analysis();
        let events = self.events.summary();
        let needs_change = tyres.iter().any(CornerDiagnosis::needs_change) || !events.is_empty();
        let snapshot = SetupSnapshot::capture(&tyres, &events);
        trace!(needs_change, problems = snapshot.problem_count(), "Setup evaluated");

        if needs_change {
            if let Some(previous) = &self.previous {
                self.feedback = Some(snapshot.compare(previous));
            }
            info!(
                distance_km = self.stint_distance,
                problems = snapshot.problem_count(),
                feedback = ?self.feedback,
                "Setup change needed, calling driver in"
            );
            self.previous = Some(snapshot);
            self.snapshot_at_box = true;
            self.has_visited_pit = false;
            self.state = StintState::Box;
            self.message = "BOX - setup change needed!".to_string();
        } else {
            if !self.compared_this_stint {
                if let Some(previous) = &self.previous {
                    self.feedback = Some(snapshot.compare(previous));
                    self.compared_this_stint = true;
                    debug!(feedback = ?self.feedback, "Setup compared with previous stint");
                }
            }
            self.message = format!("Setup OK. ({:.1} km)", self.stint_distance);
        }
    }

    /// Snapshot of the current analysis for display.
    pub fn report(&self) -> EngineerReport {
        EngineerReport {
            message: self.message.clone(),
            ready: self.state == StintState::Box,
            state: self.state,
            tyres: self.tyres.analysis(),
            tyres_stable: (self.state == StintState::Checking).then(|| self.tyres.all_stable()),
            steering: self.steering.recommendation(),
            events: self.events.summary(),
            phase: self.phase.current(),
            handling: self.handling.status(),
            handling_value: self.handling.value(),
            stint_distance_km: self.stint_distance,
            laps_completed: self.laps_completed,
            feedback: self.feedback,
            fuel: self.fuel.status(),
            wear: self.wear.status(),
            tightest_corner: self.track.tightest_corner(),
        }
    }

    pub fn state(&self) -> StintState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Distance driven in the current stint in km.
    pub fn stint_distance(&self) -> f32 {
        self.stint_distance
    }

    pub fn feedback(&self) -> Option<SetupFeedback> {
        self.feedback
    }

    /// Baseline the next stint is compared against.
    pub fn previous_snapshot(&self) -> Option<&SetupSnapshot> {
        self.previous.as_ref()
    }

    pub fn config(&self) -> &EngineerConfig {
        &self.config
    }

    /// Path recorded since the session (re)started.
    pub fn track(&self) -> &TrackRecorder {
        &self.track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, stint};
    use crate::types::{GameState, PitMode, SessionState};
    use std::time::Duration;

    fn run(engineer: &mut StintEngineer, samples: &[TelemetrySample]) {
        let t0 = Instant::now();
        for sample in samples {
            engineer.update_at(sample, t0 + Duration::from_secs_f32(sample.current_time.max(0.0)));
        }
    }

    /// Drive into BOX with hot tyres.
    fn boxed_engineer() -> StintEngineer {
        let mut engineer = StintEngineer::default();
        run(&mut engineer, &stint(SampleBuilder::driving().tyre_temps(95.0), 10.0, 275.0));
        assert_eq!(engineer.state(), StintState::Box);
        engineer
    }

    #[test]
    fn first_playing_tick_starts_gathering() {
        let mut engineer = StintEngineer::default();
        engineer.update(&SampleBuilder::driving().game_state(GameState::FrontEnd).build());
        assert_eq!(engineer.state(), StintState::Waiting);

        engineer.update(&SampleBuilder::driving().odometer(120.0).build());
        assert_eq!(engineer.state(), StintState::Gathering);
        assert_eq!(engineer.stint_distance(), 0.0);
        assert!(engineer.message().starts_with("Analysing..."));
    }

    #[test]
    fn gathering_moves_to_checking_after_reference_laps() {
        let mut engineer = StintEngineer::default();
        engineer.update(&SampleBuilder::driving().lap(1).build());
        engineer.update(&SampleBuilder::driving().lap(2).build());
        assert_eq!(engineer.state(), StintState::Gathering);
        assert_eq!(engineer.report().tyres_stable, None);

        engineer.update(&SampleBuilder::driving().lap(3).build());
        assert_eq!(engineer.state(), StintState::Checking);
        assert_eq!(engineer.report().tyres_stable, Some(false));
    }

    #[test]
    fn hot_tyres_call_the_car_in() {
        let engineer = boxed_engineer();
        let report = engineer.report();
        assert!(report.ready);
        assert!(report.message.contains("BOX"));
        assert_eq!(report.feedback, None);
        assert!(engineer.previous_snapshot().is_some());
    }

    #[test]
    fn box_persists_through_pause_and_requires_pit_visit() {
        let mut engineer = boxed_engineer();

        engineer.update(&SampleBuilder::driving().game_state(GameState::Paused).build());
        assert_eq!(engineer.state(), StintState::Box);

        // Fast but never pitted
        engineer.update(&SampleBuilder::driving().speed(50.0).build());
        assert_eq!(engineer.state(), StintState::Box);

        // Pitted, but rolling out slowly
        engineer.update(&SampleBuilder::driving().speed(3.0).pit_mode(PitMode::InPit).build());
        engineer.update(&SampleBuilder::driving().speed(8.0).build());
        assert_eq!(engineer.state(), StintState::Box);
        assert_eq!(engineer.message(), "Ready for a new stint...");

        // Fast while still in the pit lane
        engineer.update(&SampleBuilder::driving().speed(20.0).pit_mode(PitMode::DrivingOutOfPits).build());
        assert_eq!(engineer.state(), StintState::Box);

        engineer.update(&SampleBuilder::driving().speed(20.0).odometer(11.5).build());
        assert_eq!(engineer.state(), StintState::Gathering);
        assert_eq!(engineer.stint_distance(), 0.0);
        assert_eq!(engineer.feedback(), None);
    }

    #[test]
    fn cooler_second_stint_is_an_improvement() {
        let mut engineer = boxed_engineer();
        engineer.update(&SampleBuilder::driving().speed(0.0).pit_mode(PitMode::InPit).odometer(11.0).time(300.0).build());

        let second = SampleBuilder::driving().odometer(11.0).time(301.0).ideal_tyres(80.0);
        run(&mut engineer, &stint(second, 10.0, 275.0));

        assert_eq!(engineer.state(), StintState::Gathering);
        assert!(engineer.message().starts_with("Setup OK."));
        assert_eq!(engineer.feedback(), Some(SetupFeedback::Improved));
    }

    #[test]
    fn race_session_suspends_setup_analysis() {
        let mut engineer = StintEngineer::default();
        let race = SampleBuilder::driving().session(SessionState::Race).tyre_temps(95.0);
        run(&mut engineer, &stint(race.clone(), 10.0, 275.0));

        assert_ne!(engineer.state(), StintState::Box);
        assert_eq!(engineer.message(), "RACE - 11.0 km - STRAIGHT - NEUTRAL");

        let braking = race.odometer(11.0).time(276.0).pedals(0.0, 0.8).build();
        engineer.update_at(&braking, Instant::now());
        assert_eq!(engineer.report().phase, Phase::Braking);
        assert_eq!(engineer.message(), "RACE - 11.0 km - BRAKING - NEUTRAL");
    }

    #[test]
    fn odometer_reset_re_anchors_distance() {
        let mut engineer = StintEngineer::default();
        engineer.update(&SampleBuilder::driving().odometer(50.0).build());
        engineer.update(&SampleBuilder::driving().odometer(52.0).build());
        assert_eq!(engineer.stint_distance(), 2.0);

        engineer.update(&SampleBuilder::driving().odometer(1.0).build());
        assert_eq!(engineer.stint_distance(), 0.0);
    }

    #[test]
    fn session_restart_clears_recorded_path() {
        let mut engineer = StintEngineer::default();
        for i in 0..20 {
            let x = i as f32 * 10.0;
            engineer.update(&SampleBuilder::driving().odometer(50.0 + x / 1000.0).position(x, 0.0).build());
        }
        assert_eq!(engineer.track().path().len(), 20);

        engineer.update(&SampleBuilder::driving().odometer(0.5).position(-300.0, 40.0).build());
        let path = engineer.track().path();
        assert_eq!(path.len(), 1);
        assert_eq!((path[0].x, path[0].z), (-300.0, 40.0));
        assert_eq!(engineer.track().distance(), 0.0);
    }

    #[test]
    fn snapshot_problem_counts() {
        let mut engineer = StintEngineer::default();
        run(&mut engineer, &stint(SampleBuilder::driving().tyre_temps(70.0), 10.0, 100.0));
        let report = engineer.report();
        let snapshot = SetupSnapshot::capture(&report.tyres, &report.events);
        assert_eq!(snapshot.problem_count(), 4 + 4);

        let clean = SetupSnapshot {
            pressure: [PressureAction::Ok; 4],
            camber: [CamberAction::Ok; 4],
            events: BTreeMap::new(),
        };
        assert_eq!(clean.compare(&snapshot), SetupFeedback::Improved);
        assert_eq!(snapshot.compare(&clean), SetupFeedback::Worsened);
        assert_eq!(clean.compare(&clean), SetupFeedback::Neutral);
    }
}
