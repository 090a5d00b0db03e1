//! Stint-level race engineer for Automobilista 2 telemetry.
//!
//! The crate turns a stream of shared-memory telemetry samples into setup
//! advice: tyre pressures and camber from a rolling temperature window,
//! brake bias and differential hints from phase-gated handling events, and a
//! stint workflow that tells the driver when to box.
//!
//! # Features
//!
//! - **Phase detection**: braking, turn-in, mid-corner, exit and straight from pedals and lateral G
//! - **Tyre analysis**: driving-time window with stability, pressure and camber advice
//! - **Event log**: lockups and entry/exit balance problems, debounced per kind
//! - **Stint workflow**: WAITING, GATHERING, CHECKING and BOX with stint-to-stint feedback
//! - **Monitors**: steering lock usage, fuel and wear projections, tightest corner radius
//! - **Async host**: a [`Driver`] that runs the engineer against any [`Provider`]
//!
//! # Quick Start
//!
//! ```rust
//! use race_engineer::{EngineerConfig, StintEngineer};
//! use race_engineer::types::{GameState, TelemetrySample};
//!
//! let mut engineer = StintEngineer::new(EngineerConfig::default());
//! let sample = TelemetrySample { game_state: GameState::Playing, speed: 40.0, ..TelemetrySample::default() };
//! engineer.update(&sample);
//!
//! let report = engineer.report();
//! println!("{} ({})", report.message, report.state);
//! ```
//!
//! ## Example (recorded stint)
//!
//! ```rust,no_run
//! use race_engineer::{Driver, StintEngineer};
//! use race_engineer::providers::ReplayProvider;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ReplayProvider::open("stint.yaml")?;
//!     let channels = Driver::spawn(provider, StintEngineer::default());
//!
//!     let mut reports = Box::pin(channels.report_stream());
//!     while let Some(report) = reports.next().await {
//!         if report.ready {
//!             println!("{}", report.message);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod analysis;
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Stint workflow
pub mod engineer;

// Host pipeline
pub mod driver;
pub mod provider;
pub mod providers;

// Core exports
pub use config::EngineerConfig;
pub use error::*;

// Main API exports
pub use driver::{Driver, DriverChannels};
pub use engineer::{EngineerReport, SetupFeedback, SetupSnapshot, StintEngineer, StintState};
pub use provider::Provider;
