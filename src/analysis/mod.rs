//! Per-tick analysis components.
//!
//! Each component owns its state exclusively and is advanced by its own
//! update call, one sample at a time. None of them can fail: missing data
//! degrades to neutral values instead.
//!
//! - [`PhaseDetector`]: driving phase from pedals and lateral G
//! - [`TyreThermalAnalyzer`]: rolling tyre temperature window with pressure and camber advice
//! - [`HandlingClassifier`]: instantaneous under/oversteer balance
//! - [`EventDetector`]: phase-gated, debounced anomaly log
//! - [`SteeringLockAnalyzer`], [`FuelMonitor`], [`WearMonitor`], [`TrackRecorder`]: per-lap monitors

mod events;
mod fuel;
mod handling;
mod phase;
mod steering;
mod track;
mod tyre;
mod wear;

pub use events::{Event, EventCount, EventDetector, EventKind, EventSummary};
pub use fuel::{FuelMonitor, FuelStatus, fuel_litres};
pub use handling::{HandlingClassifier, HandlingStatus};
pub use phase::PhaseDetector;
pub use steering::{SteeringAdvice, SteeringLockAnalyzer};
pub use track::{TightestCorner, TrackPoint, TrackRecorder};
pub use tyre::{
    CamberAction, ColorHint, CornerDiagnosis, PressureAction, PressureStatus, SpreadNote,
    TyreSample, TyreThermalAnalyzer,
};
pub use wear::{CornerWear, UNLIMITED_LAPS, WearMonitor};
