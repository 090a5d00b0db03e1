//! Core types for telemetry data representation.
//!
//! This module provides the typed contract between a telemetry source and the
//! analysis pipeline. Everything the engineer reads arrives through a single
//! [`TelemetrySample`]; nothing downstream looks fields up by name.
//!
//! ## Architecture
//!
//! The types map directly to the simulator's shared-memory layout:
//! - [`TelemetrySample`] is one immutable snapshot of vehicle state
//! - [`GameState`], [`SessionState`] and [`PitMode`] decode the raw state codes,
//!   keeping unrecognised codes as `Unknown(code)` rather than failing
//! - [`Corner`] fixes the FL, FR, RL, RR ordering of every per-corner array
//! - [`Phase`] is the driving phase derived each tick
//!
//! ## Usage Example
//!
//! ```rust
//! use race_engineer::types::{Corner, GameState, Participant, TelemetrySample};
//!
//! let sample = TelemetrySample {
//!     game_state: GameState::Playing,
//!     speed: 42.0,
//!     viewed_participant_index: 0,
//!     participants: vec![Participant { current_lap: 3, world_position: [10.0, 0.0, -5.0] }],
//!     tyre_temp: [80.0, 81.0, 78.0, 79.0],
//!     ..TelemetrySample::default()
//! };
//!
//! assert!(sample.is_playing());
//! assert_eq!(sample.laps_completed(), 2);
//! assert_eq!(sample.tyre_temp[Corner::RearLeft.index()], 78.0);
//! ```

mod phase;
mod sample;
mod state;

pub use phase::Phase;
pub use sample::{Participant, PerCorner, TelemetrySample};
pub use state::{Corner, GameState, PitMode, SessionState};
