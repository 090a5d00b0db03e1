//! Driving phase classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// The part of a corner the car is currently in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Phase {
    #[default]
    Straight,
    Braking,
    TurnIn,
    MidCorner,
    Exit,
}

impl Phase {
    /// Decode a raw phase code; anything unrecognised falls back to `Straight`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Phase::Braking,
            2 => Phase::TurnIn,
            3 => Phase::MidCorner,
            4 => Phase::Exit,
            _ => Phase::Straight,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Phase::Straight => 0,
            Phase::Braking => 1,
            Phase::TurnIn => 2,
            Phase::MidCorner => 3,
            Phase::Exit => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Straight => "STRAIGHT",
            Phase::Braking => "BRAKING",
            Phase::TurnIn => "TURN_IN",
            Phase::MidCorner => "MID_CORNER",
            Phase::Exit => "EXIT",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_reset_to_straight() {
        assert_eq!(Phase::from_code(7), Phase::Straight);
        assert_eq!(Phase::from_code(255), Phase::Straight);
        for phase in [Phase::Straight, Phase::Braking, Phase::TurnIn, Phase::MidCorner, Phase::Exit] {
            assert_eq!(Phase::from_code(phase.code()), phase);
        }
    }

    #[test]
    fn serializes_in_screaming_case() {
        let yaml = serde_yaml_ng::to_string(&Phase::MidCorner).expect("serialize phase");
        assert_eq!(yaml.trim(), "MID_CORNER");
        assert_eq!(Phase::TurnIn.to_string(), "TURN_IN");
    }
}
