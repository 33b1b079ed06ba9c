//! # Command Dispatch
//!
//! A clock-agnostic cursor over one hand's compiled commands.
//!
//! The real-time side owns the clock (usually the audio playback position) and calls
//! [`Dispatcher::poll`] with the current time; the dispatcher hands back every command
//! that has become due since the last poll and tracks where the arm is and whether the
//! solenoid is pressed. Commands are walked strictly forward: seeking rewinds the
//! cursor to the start and replays state silently, so nothing is ever fired twice or
//! skipped across a seek.
//!
//! ```rust
//! use autostage::{Command, Dispatcher, Hand, Lane};
//!
//! let commands: Vec<Command> = ["M -300 L 2C 0", "S 0 L ON", "M 10 L LL 0", "S 10 L OF"]
//!     .iter()
//!     .map(|m| m.parse().unwrap())
//!     .collect();
//! let mut dispatcher = Dispatcher::new(Hand::Left, &commands);
//!
//! assert_eq!(dispatcher.poll(0).len(), 2);
//! assert!(dispatcher.arm().pressed);
//! assert_eq!(dispatcher.arm().lane, Lane::Lane2);
//! assert_eq!(dispatcher.poll(5).len(), 0);
//! assert_eq!(dispatcher.poll(10).len(), 2);
//! assert!(dispatcher.is_finished());
//! ```

use tracing::trace;

use crate::command::{Command, Hand, Lane};

/// Physical state of one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmState {
    pub lane: Lane,
    pub pressed: bool,
}

impl ArmState {
    /// Released, parked on the hand's own edge.
    pub fn at_rest(hand: Hand) -> Self {
        ArmState {
            lane: hand.edge(),
            pressed: false,
        }
    }

    /// Horizontal arm position in lane units, for whatever draws or drives the arm.
    pub fn position(&self) -> f64 {
        self.lane.position()
    }

    pub fn apply(&mut self, command: &Command) {
        match *command {
            Command::Solenoid { pressed, .. } => self.pressed = pressed,
            Command::Move { lane, .. } => self.lane = lane,
        }
    }
}

pub struct Dispatcher<'a> {
    hand: Hand,
    commands: &'a [Command],
    cursor: usize,
    arm: ArmState,
}

impl<'a> Dispatcher<'a> {
    pub fn new(hand: Hand, commands: &'a [Command]) -> Self {
        Dispatcher {
            hand,
            commands,
            cursor: 0,
            arm: ArmState::at_rest(hand),
        }
    }

    /// Fire every pending command whose time is at or before `now_ms`.
    ///
    /// The walk stops at the first command that is not yet due, so a list in
    /// generation order is dispatched in that order.
    pub fn poll(&mut self, now_ms: i64) -> &'a [Command] {
        self.advance_while(|time| time <= now_ms)
    }

    /// Jump to `position_ms`: state reflects every command strictly before it, and
    /// the next poll fires the rest.
    pub fn seek(&mut self, position_ms: i64) {
        self.cursor = 0;
        self.arm = ArmState::at_rest(self.hand);
        let replayed = self.advance_while(|time| time < position_ms).len();
        trace!(
            hand = %self.hand,
            position_ms,
            replayed,
            arm = self.arm.position(),
            "seek"
        );
    }

    fn advance_while(&mut self, due: impl Fn(i64) -> bool) -> &'a [Command] {
        let commands = self.commands;
        let start = self.cursor;
        while let Some(command) = commands.get(self.cursor) {
            if !due(command.time_ms()) {
                break;
            }
            self.arm.apply(command);
            self.cursor += 1;
        }
        &commands[start..self.cursor]
    }

    pub fn arm(&self) -> ArmState {
        self.arm
    }

    /// Commands not yet dispatched.
    pub fn remaining(&self) -> &'a [Command] {
        &self.commands[self.cursor..]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.commands.len()
    }
}
