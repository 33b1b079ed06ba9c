//! # Command Compiler
//!
//! Turns one hand's note timeline into a time-stamped actuator command stream.
//!
//! ## Sub-modules
//! - `rules` - Pure transition table over (previous, current, next) note kinds
//! - `engine` - Timing arithmetic and command emission
//!
//! ## Timing
//! Every subdivision lasts `60000 / bpm` milliseconds. A note at `measure`, `beat` in
//! a line with `beat_set` subdivisions fires at
//! `trunc((measure * beat_set + beat) * 60000 / bpm) + offset_ms`.
//!
//! ## Emission Order (per note)
//! 1. **Approach** - first note of a run: `Move(time - 300, target, end = time)`
//! 2. **Contact** - press, release (closing a hold), or flick move at `time`
//! 3. **Follow-through** - `Tap` and flicks move on at `time + 10`, to the next
//!    note's lane or to the hand's own edge after the last note, and release unless
//!    the next note is a flick or the note already closed a hold. When the next note
//!    starts a hold the release comes before the move.
//!
//! Commands are returned in this generation order by default; see
//! [`CommandOrder`](crate::CommandOrder) for sorting by timestamp instead.
//!
//! ## Example
//! ```rust
//! use autostage::{compile, Hand, HandNote, NoteKind};
//!
//! let tap = |beat, target| HandNote { measure: 0, beat_set: 4, beat, kind: NoteKind::Tap, target };
//! let commands = compile(&[tap(0, 2), tap(1, 2), tap(2, 5)], Hand::Left, 120.0, 0)?;
//!
//! assert_eq!(commands.len(), 10);
//! assert_eq!(commands[0].message(), "M -300 L 2C 0");
//! assert_eq!(commands[9].message(), "S 1010 L OF");
//! # Ok::<(), autostage::StageError>(())
//! ```

mod engine;
pub mod rules;


pub(crate) use engine::check_tempo;
pub use engine::{beat_ms, compile, compile_ordered, note_time_ms, APPROACH_MS, FOLLOW_THROUGH_MS};
