//! Telemetry provider implementations

mod replay;

pub use replay::{Recording, ReplayProvider};
