//! # Actuator Command Model
//!
//! Value types shared by the compiler and anything consuming its output.
//!
//! ## Key Types
//! - [`Hand`] - Which of the two actuator assemblies a command drives
//! - [`Lane`] - One of 17 arm positions: two edges plus 5 lanes x 3 sub-positions
//! - [`Command`] - A solenoid state change or an arm move, stamped in milliseconds
//!
//! ## Wire Message
//! `Display` renders the exact text consumed by the hardware side, and `FromStr`
//! parses it back:
//! ```text
//! S <time_ms> <L|R> <ON|OF>
//! M <time_ms> <L|R> <lane> <end_time_ms>
//! ```
//!
//! ```rust
//! use autostage::{Command, Hand, Lane};
//!
//! let cmd = Command::Move { time_ms: -300, hand: Hand::Left, lane: Lane::Lane2, end_time_ms: 0 };
//! assert_eq!(cmd.to_string(), "M -300 L 2C 0");
//! assert_eq!("M -300 L 2C 0".parse::<Command>().unwrap(), cmd);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StageError;

/// Actuator assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Hand {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Hand {
    pub fn code(self) -> &'static str {
        match self {
            Hand::Left => "L",
            Hand::Right => "R",
        }
    }

    /// The rest position on this hand's own side of the track.
    pub fn edge(self) -> Lane {
        match self {
            Hand::Left => Lane::LeftEdge,
            Hand::Right => Lane::RightEdge,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Hand {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Hand::Left),
            "R" => Ok(Hand::Right),
            _ => Err(StageError::Message(format!("unknown hand '{}'", s))),
        }
    }
}

/// Arm position, ordered left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Lane {
    #[serde(rename = "LL")]
    LeftEdge,
    #[serde(rename = "1L")]
    Lane1Left,
    #[serde(rename = "1C")]
    Lane1,
    #[serde(rename = "1R")]
    Lane1Right,
    #[serde(rename = "2L")]
    Lane2Left,
    #[serde(rename = "2C")]
    Lane2,
    #[serde(rename = "2R")]
    Lane2Right,
    #[serde(rename = "3L")]
    Lane3Left,
    #[serde(rename = "3C")]
    Lane3,
    #[serde(rename = "3R")]
    Lane3Right,
    #[serde(rename = "4L")]
    Lane4Left,
    #[serde(rename = "4C")]
    Lane4,
    #[serde(rename = "4R")]
    Lane4Right,
    #[serde(rename = "5L")]
    Lane5Left,
    #[serde(rename = "5C")]
    Lane5,
    #[serde(rename = "5R")]
    Lane5Right,
    #[serde(rename = "RR")]
    RightEdge,
}

impl Lane {
    pub const ALL: [Lane; 17] = [
        Lane::LeftEdge,
        Lane::Lane1Left,
        Lane::Lane1,
        Lane::Lane1Right,
        Lane::Lane2Left,
        Lane::Lane2,
        Lane::Lane2Right,
        Lane::Lane3Left,
        Lane::Lane3,
        Lane::Lane3Right,
        Lane::Lane4Left,
        Lane::Lane4,
        Lane::Lane4Right,
        Lane::Lane5Left,
        Lane::Lane5,
        Lane::Lane5Right,
        Lane::RightEdge,
    ];

    /// Map a chart target code to a lane centre.
    ///
    /// Codes at or below 0 clamp to [`Lane::LeftEdge`], codes at or above 6 to
    /// [`Lane::RightEdge`].
    pub fn from_target(code: i32) -> Self {
        match code {
            i32::MIN..=0 => Lane::LeftEdge,
            1 => Lane::Lane1,
            2 => Lane::Lane2,
            3 => Lane::Lane3,
            4 => Lane::Lane4,
            5 => Lane::Lane5,
            _ => Lane::RightEdge,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// One position toward the left edge, or `None` past it.
    pub fn checked_left(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Lane::ALL[i])
    }

    /// One position toward the right edge, or `None` past it.
    pub fn checked_right(self) -> Option<Self> {
        Lane::ALL.get(self.index() + 1).copied()
    }

    /// One position toward the left edge; stays put at the edge.
    pub fn left(self) -> Self {
        self.checked_left().unwrap_or(self)
    }

    /// One position toward the right edge; stays put at the edge.
    pub fn right(self) -> Self {
        self.checked_right().unwrap_or(self)
    }

    pub fn code(self) -> &'static str {
        match self {
            Lane::LeftEdge => "LL",
            Lane::Lane1Left => "1L",
            Lane::Lane1 => "1C",
            Lane::Lane1Right => "1R",
            Lane::Lane2Left => "2L",
            Lane::Lane2 => "2C",
            Lane::Lane2Right => "2R",
            Lane::Lane3Left => "3L",
            Lane::Lane3 => "3C",
            Lane::Lane3Right => "3R",
            Lane::Lane4Left => "4L",
            Lane::Lane4 => "4C",
            Lane::Lane4Right => "4R",
            Lane::Lane5Left => "5L",
            Lane::Lane5 => "5C",
            Lane::Lane5Right => "5R",
            Lane::RightEdge => "RR",
        }
    }

    /// Horizontal arm position in lane units: lane 1 centre is 0.0, lane 5 centre is
    /// 4.0, side positions sit 0.2 off centre and the edges half a lane outside.
    pub fn position(self) -> f64 {
        match self {
            Lane::LeftEdge => -0.5,
            Lane::RightEdge => 4.5,
            lane => {
                let slot = lane.index() - 1;
                let centre = (slot / 3) as f64;
                match slot % 3 {
                    0 => centre - 0.2,
                    1 => centre,
                    _ => centre + 0.2,
                }
            }
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lane {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lane::ALL
            .into_iter()
            .find(|lane| lane.code() == s)
            .ok_or_else(|| StageError::Message(format!("unknown lane '{}'", s)))
    }
}

/// A time-stamped actuator instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    /// Press (`pressed == true`) or release the hand's solenoid.
    Solenoid { time_ms: i64, hand: Hand, pressed: bool },
    /// Move the arm to `lane`. A non-zero `end_time_ms` marks a timed glide that must
    /// arrive by that time.
    Move {
        time_ms: i64,
        hand: Hand,
        lane: Lane,
        end_time_ms: i64,
    },
}

impl Command {
    pub fn time_ms(&self) -> i64 {
        match *self {
            Command::Solenoid { time_ms, .. } | Command::Move { time_ms, .. } => time_ms,
        }
    }

    pub fn hand(&self) -> Hand {
        match *self {
            Command::Solenoid { hand, .. } | Command::Move { hand, .. } => hand,
        }
    }

    /// The wire message for this command.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Solenoid {
                time_ms,
                hand,
                pressed,
            } => {
                let state = if *pressed { "ON" } else { "OF" };
                write!(f, "S {} {} {}", time_ms, hand, state)
            }
            Command::Move {
                time_ms,
                hand,
                lane,
                end_time_ms,
            } => write!(f, "M {} {} {} {}", time_ms, hand, lane, end_time_ms),
        }
    }
}

impl FromStr for Command {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(' ').collect();
        let time = |field: &str| {
            field
                .parse::<i64>()
                .map_err(|_| StageError::Message(format!("invalid time '{}' in '{}'", field, s)))
        };

        match fields.as_slice() {
            &["S", time_ms, hand, state] => {
                let pressed = match state {
                    "ON" => true,
                    "OF" => false,
                    other => {
                        return Err(StageError::Message(format!(
                            "unknown solenoid state '{}'",
                            other
                        )))
                    }
                };
                Ok(Command::Solenoid {
                    time_ms: time(time_ms)?,
                    hand: hand.parse()?,
                    pressed,
                })
            }
            &["M", time_ms, hand, lane, end_time_ms] => Ok(Command::Move {
                time_ms: time(time_ms)?,
                hand: hand.parse()?,
                lane: lane.parse()?,
                end_time_ms: time(end_time_ms)?,
            }),
            _ => Err(StageError::Message(format!("unrecognized command '{}'", s))),
        }
    }
}
