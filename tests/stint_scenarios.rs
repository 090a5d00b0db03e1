//! End-to-end stint scenarios
//!
//! Drives a [`StintEngineer`] through whole practice and race stints and checks
//! the workflow state, messages and feedback the driver would see.

use std::time::{Duration, Instant};

use race_engineer::analysis::{CamberAction, PressureAction, PressureStatus};
use race_engineer::types::{Corner, GameState, Participant, PitMode, SessionState, TelemetrySample};
use race_engineer::{EngineerConfig, SetupFeedback, StintEngineer, StintState};

const HZ: f32 = 10.0;
const SPEED: f32 = 40.0;
const RADIUS: f32 = 0.33;

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// A car at a steady 40 m/s with flat tyre profiles at `temp`.
fn cruising(session: SessionState, temp: f32) -> TelemetrySample {
    TelemetrySample {
        game_state: GameState::Playing,
        session_state: session,
        pit_mode: PitMode::None,
        viewed_participant_index: 0,
        participants: vec![Participant { current_lap: 1, world_position: [0.0; 3] }],
        unfiltered_throttle: 1.0,
        throttle: 1.0,
        speed: SPEED,
        fuel_level: 0.8,
        fuel_capacity: 100.0,
        tyre_rps: [SPEED / RADIUS; 4],
        tyre_radius: [RADIUS; 4],
        tyre_temp: [temp; 4],
        tyre_temp_left: [temp; 4],
        tyre_temp_center: [temp; 4],
        tyre_temp_right: [temp; 4],
        ..TelemetrySample::default()
    }
}

/// Set cross-section profiles that meet the default camber targets.
fn with_ideal_camber(mut sample: TelemetrySample) -> TelemetrySample {
    let profiles = [
        (Corner::FrontLeft, -3.5, 3.5),
        (Corner::FrontRight, 3.5, -3.5),
        (Corner::RearLeft, -2.0, 2.0),
        (Corner::RearRight, 2.0, -2.0),
    ];
    for (corner, left, right) in profiles {
        let i = corner.index();
        let base = sample.tyre_temp[i];
        sample.tyre_temp_left[i] = base + left;
        sample.tyre_temp_right[i] = base + right;
    }
    sample
}

/// Drive `seconds` of samples from `template`, advancing clock and odometer.
fn drive(engineer: &mut StintEngineer, template: &TelemetrySample, seconds: f32) -> TelemetrySample {
    let t0 = Instant::now();
    let ticks = (seconds * HZ) as usize;
    let mut last = template.clone();
    for i in 0..ticks {
        let t = i as f32 / HZ;
        last = TelemetrySample {
            current_time: template.current_time + t,
            odometer_km: template.odometer_km + SPEED * t / 1000.0,
            ..template.clone()
        };
        engineer.update_at(&last, t0 + Duration::from_secs_f32(t));
    }
    last
}

#[test]
fn practice_stint_with_hot_tyres_calls_box() {
    init_tracing();
    let mut engineer = StintEngineer::new(EngineerConfig::default());
    assert_eq!(engineer.state(), StintState::Waiting);

    // 11 km at 95°C
    drive(&mut engineer, &cruising(SessionState::Practice, 95.0), 275.0);

    let report = engineer.report();
    assert_eq!(report.state, StintState::Box);
    assert!(report.ready);
    assert!(report.message.contains("BOX"), "{}", report.message);
    for tyre in &report.tyres {
        assert_eq!(tyre.pressure_status, PressureStatus::TooHot);
        assert_eq!(tyre.pressure_action, PressureAction::Increase);
    }
}

#[test]
fn practice_stint_reports_progress_before_threshold() {
    init_tracing();
    let mut engineer = StintEngineer::default();
    drive(&mut engineer, &cruising(SessionState::Practice, 95.0), 100.0);

    assert_eq!(engineer.state(), StintState::Gathering);
    assert_eq!(engineer.message(), "Analysing... (4.0/10 km) - NEUTRAL");
}

#[test]
fn race_stint_never_boxes() {
    init_tracing();
    let mut engineer = StintEngineer::default();
    drive(&mut engineer, &cruising(SessionState::Race, 95.0), 400.0);

    let report = engineer.report();
    assert!(matches!(report.state, StintState::Gathering | StintState::Checking));
    assert!(!report.ready);
    assert!(report.message.starts_with("RACE - "), "{}", report.message);
    assert!(report.message.contains(&format!("km - {} - NEUTRAL", report.phase)), "{}", report.message);
    assert!(report.message.ends_with("STRAIGHT - NEUTRAL"));
}

#[test]
fn new_stint_requires_pit_visit_and_speed_on_the_same_tick() {
    init_tracing();
    let mut engineer = StintEngineer::default();
    let last = drive(&mut engineer, &cruising(SessionState::Practice, 95.0), 275.0);
    assert_eq!(engineer.state(), StintState::Box);

    let at = |speed: f32, pit_mode: PitMode| TelemetrySample { speed, pit_mode, ..last.clone() };

    // Menus and pauses keep the verdict on screen
    engineer.update(&TelemetrySample { game_state: GameState::Paused, ..last.clone() });
    engineer.update(&TelemetrySample { game_state: GameState::InMenuTimeTicking, ..last.clone() });
    assert_eq!(engineer.state(), StintState::Box);

    engineer.update(&at(30.0, PitMode::None));
    assert_eq!(engineer.state(), StintState::Box, "no pit visit yet");

    engineer.update(&at(15.0, PitMode::DrivingIntoPits));
    engineer.update(&at(0.0, PitMode::InPit));
    engineer.update(&at(12.0, PitMode::DrivingOutOfPits));
    assert_eq!(engineer.state(), StintState::Box, "still in the pit lane");

    engineer.update(&at(9.0, PitMode::None));
    assert_eq!(engineer.state(), StintState::Box, "not yet above restart speed");

    engineer.update(&at(10.5, PitMode::None));
    assert_eq!(engineer.state(), StintState::Gathering);
    assert_eq!(engineer.stint_distance(), 0.0);
}

#[test]
fn fixed_setup_is_reported_as_improvement() {
    init_tracing();
    let mut engineer = StintEngineer::default();
    let last = drive(&mut engineer, &cruising(SessionState::Practice, 95.0), 275.0);
    assert_eq!(engineer.feedback(), None);

    engineer.update(&TelemetrySample { speed: 0.0, pit_mode: PitMode::InPit, ..last.clone() });

    let fixed = with_ideal_camber(TelemetrySample {
        odometer_km: last.odometer_km,
        current_time: last.current_time + 1.0,
        ..cruising(SessionState::Practice, 80.0)
    });
    drive(&mut engineer, &fixed, 275.0);

    let report = engineer.report();
    assert_eq!(report.state, StintState::Gathering);
    assert!(report.message.starts_with("Setup OK."), "{}", report.message);
    assert_eq!(report.feedback, Some(SetupFeedback::Improved));
    assert!(report.tyres.iter().all(|t| t.camber_action == CamberAction::Ok));
}

#[test]
fn second_bad_stint_compares_against_the_first() {
    init_tracing();
    let mut engineer = StintEngineer::default();
    let last = drive(&mut engineer, &cruising(SessionState::Practice, 95.0), 275.0);
    engineer.update(&TelemetrySample { speed: 0.0, pit_mode: PitMode::InPit, ..last.clone() });

    // Only the pressures were fixed: camber problems remain
    let half_fixed = TelemetrySample {
        odometer_km: last.odometer_km,
        current_time: last.current_time + 1.0,
        ..cruising(SessionState::Practice, 80.0)
    };
    drive(&mut engineer, &half_fixed, 275.0);

    assert_eq!(engineer.state(), StintState::Box);
    assert_eq!(engineer.feedback(), Some(SetupFeedback::Improved));
    let baseline = engineer.previous_snapshot().expect("baseline stored at box");
    assert_eq!(baseline.problem_count(), 4);
}

#[test]
fn invalid_participant_index_means_lap_zero() {
    init_tracing();
    let mut engineer = StintEngineer::default();
    let sample = TelemetrySample { viewed_participant_index: 12, ..cruising(SessionState::Practice, 80.0) };
    engineer.update(&sample);

    let report = engineer.report();
    assert_eq!(report.laps_completed, 0);
    assert_eq!(report.state, StintState::Gathering);
}
