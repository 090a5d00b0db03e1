//! Phase-gated handling anomaly detection
//!
//! Each tick the detector runs the checks that belong to the current driving
//! phase. Anomalies of the same kind are debounced against wall-clock time so
//! a single long lockup produces one event, not one per tick.
//!
//! | Phase     | Check                                   | Event kinds                        |
//! |-----------|-----------------------------------------|------------------------------------|
//! | Braking   | wheel vs vehicle speed (slip ratio)     | Front Lockup, Rear Lockup          |
//! | Turn-in   | front vs rear slip speed                | Understeer Entry, Oversteer Entry  |
//! | Exit      | front vs rear slip speed, on throttle   | Power Oversteer, Understeer Exit   |

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::config::EventConfig;
use crate::types::{Corner, Phase, TelemetrySample};

/// Kind of detected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum EventKind {
    #[serde(rename = "Front Lockup")]
    FrontLockup,
    #[serde(rename = "Rear Lockup")]
    RearLockup,
    #[serde(rename = "Understeer Entry")]
    UndersteerEntry,
    #[serde(rename = "Oversteer Entry")]
    OversteerEntry,
    #[serde(rename = "Power Oversteer")]
    PowerOversteer,
    #[serde(rename = "Understeer Exit")]
    UndersteerExit,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::FrontLockup => "Front Lockup",
            EventKind::RearLockup => "Rear Lockup",
            EventKind::UndersteerEntry => "Understeer Entry",
            EventKind::OversteerEntry => "Oversteer Entry",
            EventKind::PowerOversteer => "Power Oversteer",
            EventKind::UndersteerExit => "Understeer Exit",
        }
    }

    /// Setup change that addresses this anomaly.
    pub fn suggestion(self) -> &'static str {
        match self {
            EventKind::FrontLockup => "Move brake bias rearward",
            EventKind::RearLockup => "Move brake bias forward",
            EventKind::UndersteerEntry => "Soften front anti-roll bar",
            EventKind::OversteerEntry => "Increase coast differential lock",
            EventKind::PowerOversteer => "Reduce power differential lock",
            EventKind::UndersteerExit => "Increase power differential lock",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A detected anomaly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Event {
    /// Seconds since the detector first ran
    pub timestamp: f64,
    pub kind: EventKind,
    pub phase: Phase,
    pub suggestion: String,
    /// World position of the viewed car, `0.0` when unavailable
    pub x: f32,
    pub z: f32,
}

/// Aggregate for one event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct EventCount {
    pub count: u32,
    pub suggestion: String,
}

/// Events grouped by kind, plus the raw list in detection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct EventSummary {
    pub summary: BTreeMap<EventKind, EventCount>,
    pub events: Vec<Event>,
}

impl EventSummary {
    /// Sum of all per-kind counts.
    pub fn total(&self) -> u32 {
        self.summary.values().map(|c| c.count).sum()
    }

    pub fn count(&self, kind: EventKind) -> u32 {
        self.summary.get(&kind).map(|c| c.count).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Phase-gated anomaly detector with per-kind debounce.
#[derive(Debug, Clone, Default)]
pub struct EventDetector {
    config: EventConfig,
    events: Vec<Event>,
    last_emitted: HashMap<EventKind, Instant>,
    origin: Option<Instant>,
}

impl EventDetector {
    pub fn new(config: EventConfig) -> Self {
        Self { config, events: Vec::new(), last_emitted: HashMap::new(), origin: None }
    }

    /// Run the checks for `phase` and return the events emitted on this tick.
    pub fn update(&mut self, sample: &TelemetrySample, phase: Phase, now: Instant) -> &[Event] {
        let start = self.events.len();
        let origin = *self.origin.get_or_insert(now);

        if !sample.is_playing() || sample.speed_kmh() < self.config.min_speed_kmh {
            return &self.events[start..];
        }

        let detected = match phase {
            Phase::Braking => self.check_braking(sample),
            Phase::TurnIn => self.check_turn_in(sample),
            Phase::Exit => self.check_exit(sample),
            Phase::Straight | Phase::MidCorner => Vec::new(),
        };

        for kind in detected {
            self.emit(kind, phase, sample, now, origin);
        }
        &self.events[start..]
    }

    fn check_braking(&self, sample: &TelemetrySample) -> Vec<EventKind> {
        let speed = sample.speed;
        if speed < self.config.lockup_min_speed {
            return Vec::new();
        }

        let locked = |corners: [Corner; 2]| {
            corners.iter().any(|&corner| {
                let ratio = (speed - sample.wheel_surface_speed(corner)) / speed.max(0.1);
                ratio > self.config.lockup_slip_ratio
            })
        };

        let mut kinds = Vec::new();
        if locked([Corner::FrontLeft, Corner::FrontRight]) {
            kinds.push(EventKind::FrontLockup);
        }
        if locked([Corner::RearLeft, Corner::RearRight]) {
            kinds.push(EventKind::RearLockup);
        }
        kinds
    }

    fn check_turn_in(&self, sample: &TelemetrySample) -> Vec<EventKind> {
        let (front, rear) = sample.axle_slip_speeds();
        let delta = self.config.entry_slip_delta;

        let mut kinds = Vec::new();
        if front > rear + delta {
            kinds.push(EventKind::UndersteerEntry);
        }
        if rear > front + delta {
            kinds.push(EventKind::OversteerEntry);
        }
        kinds
    }

    fn check_exit(&self, sample: &TelemetrySample) -> Vec<EventKind> {
        if sample.unfiltered_throttle < self.config.exit_min_throttle {
            return Vec::new();
        }

        let (front, rear) = sample.axle_slip_speeds();
        let delta = self.config.exit_slip_delta;

        let mut kinds = Vec::new();
        if rear > front + delta {
            kinds.push(EventKind::PowerOversteer);
        }
        if front > rear + delta {
            kinds.push(EventKind::UndersteerExit);
        }
        kinds
    }

    fn emit(&mut self, kind: EventKind, phase: Phase, sample: &TelemetrySample, now: Instant, origin: Instant) {
        if let Some(last) = self.last_emitted.get(&kind) {
            if now.saturating_duration_since(*last) < self.config.cooldown() {
                return;
            }
        }
        self.last_emitted.insert(kind, now);

        let (x, z) = sample.world_position_xz().unwrap_or((0.0, 0.0));
        let event = Event {
            timestamp: now.saturating_duration_since(origin).as_secs_f64(),
            kind,
            phase,
            suggestion: kind.suggestion().to_string(),
            x,
            z,
        };
        debug!(kind = %kind, phase = %phase, x, z, suggestion = kind.suggestion(), "Event detected");
        self.events.push(event);
    }

    /// Events grouped by kind with their counts.
    pub fn summary(&self) -> EventSummary {
        let mut summary = BTreeMap::new();
        for event in &self.events {
            summary
                .entry(event.kind)
                .or_insert_with(|| EventCount { count: 0, suggestion: event.suggestion.clone() })
                .count += 1;
        }
        EventSummary { summary, events: self.events.clone() }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drop all events and debounce state.
    pub fn reset(&mut self) {
        self.events.clear();
        self.last_emitted.clear();
    }
}
