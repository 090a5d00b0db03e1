//! Simulator state codes and wheel positions

use serde::{Deserialize, Serialize};

/// Game state as published by the simulator (`mGameState`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum GameState {
    #[default]
    Exited,
    FrontEnd,
    Playing,
    Paused,
    InMenuTimeTicking,
    Restarting,
    Replay,
    FrontEndReplay,
    Unknown(u32),
}

impl From<u32> for GameState {
    fn from(code: u32) -> Self {
        match code {
            0 => GameState::Exited,
            1 => GameState::FrontEnd,
            2 => GameState::Playing,
            3 => GameState::Paused,
            4 => GameState::InMenuTimeTicking,
            5 => GameState::Restarting,
            6 => GameState::Replay,
            7 => GameState::FrontEndReplay,
            other => GameState::Unknown(other),
        }
    }
}

impl From<GameState> for u32 {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Exited => 0,
            GameState::FrontEnd => 1,
            GameState::Playing => 2,
            GameState::Paused => 3,
            GameState::InMenuTimeTicking => 4,
            GameState::Restarting => 5,
            GameState::Replay => 6,
            GameState::FrontEndReplay => 7,
            GameState::Unknown(code) => code,
        }
    }
}

/// Session type (`mSessionState`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SessionState {
    #[default]
    Invalid,
    Practice,
    Test,
    Qualify,
    FormationLap,
    Race,
    TimeAttack,
    Unknown(u32),
}

impl SessionState {
    /// Race sessions suspend setup analysis; only the racing itself matters there.
    pub fn is_race(self) -> bool {
        self == SessionState::Race
    }
}

impl From<u32> for SessionState {
    fn from(code: u32) -> Self {
        match code {
            0 => SessionState::Invalid,
            1 => SessionState::Practice,
            2 => SessionState::Test,
            3 => SessionState::Qualify,
            4 => SessionState::FormationLap,
            5 => SessionState::Race,
            6 => SessionState::TimeAttack,
            other => SessionState::Unknown(other),
        }
    }
}

impl From<SessionState> for u32 {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Invalid => 0,
            SessionState::Practice => 1,
            SessionState::Test => 2,
            SessionState::Qualify => 3,
            SessionState::FormationLap => 4,
            SessionState::Race => 5,
            SessionState::TimeAttack => 6,
            SessionState::Unknown(code) => code,
        }
    }
}

/// Pit lane status (`mPitMode`). Anything but `None` counts as "in the pit area".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PitMode {
    #[default]
    None,
    DrivingIntoPits,
    InPit,
    DrivingOutOfPits,
    InGarage,
    DrivingOutOfGarage,
    Unknown(u32),
}

impl From<u32> for PitMode {
    fn from(code: u32) -> Self {
        match code {
            0 => PitMode::None,
            1 => PitMode::DrivingIntoPits,
            2 => PitMode::InPit,
            3 => PitMode::DrivingOutOfPits,
            4 => PitMode::InGarage,
            5 => PitMode::DrivingOutOfGarage,
            other => PitMode::Unknown(other),
        }
    }
}

impl From<PitMode> for u32 {
    fn from(mode: PitMode) -> Self {
        match mode {
            PitMode::None => 0,
            PitMode::DrivingIntoPits => 1,
            PitMode::InPit => 2,
            PitMode::DrivingOutOfPits => 3,
            PitMode::InGarage => 4,
            PitMode::DrivingOutOfGarage => 5,
            PitMode::Unknown(code) => code,
        }
    }
}

/// Wheel position. Per-corner arrays are always indexed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Corner {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl Corner {
    pub const ALL: [Corner; 4] =
        [Corner::FrontLeft, Corner::FrontRight, Corner::RearLeft, Corner::RearRight];

    pub fn index(self) -> usize {
        match self {
            Corner::FrontLeft => 0,
            Corner::FrontRight => 1,
            Corner::RearLeft => 2,
            Corner::RearRight => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Corner::FrontLeft => "FL",
            Corner::FrontRight => "FR",
            Corner::RearLeft => "RL",
            Corner::RearRight => "RR",
        }
    }

    pub fn is_front(self) -> bool {
        matches!(self, Corner::FrontLeft | Corner::FrontRight)
    }

    /// Left side of the car. The inner shoulder of a left tyre is its right-hand reading.
    pub fn is_left(self) -> bool {
        matches!(self, Corner::FrontLeft | Corner::RearLeft)
    }
}
