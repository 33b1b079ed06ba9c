//! Command generation engine
//!
//! Walks one hand's note timeline and emits commands in a fixed order per note:
//! approach glide, contact, then follow-through move and release.

use tracing::debug;

use super::rules::{self, Contact, MoveTarget, Release};
use crate::command::{Command, Hand, Lane};
use crate::config::CommandOrder;
use crate::error::StageError;
use crate::hand::HandNote;

/// How early the approach glide starts before the first note of a run.
pub const APPROACH_MS: i64 = 300;

/// Delay between a note and its follow-through move/release.
pub const FOLLOW_THROUGH_MS: i64 = 10;

/// Reject tempos that would divide by zero or produce meaningless times.
pub(crate) fn check_tempo(bpm: f64) -> Result<(), StageError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(())
    } else {
        Err(StageError::InvalidTempo(bpm))
    }
}

/// Milliseconds per subdivision at `bpm`.
pub fn beat_ms(bpm: f64) -> f64 {
    60000.0 / bpm
}

/// Absolute time of a note, truncated toward zero, plus `offset_ms`.
///
/// # Errors
/// [`StageError::TimeOutOfRange`] if the result does not fit in an `i64`.
pub fn note_time_ms(note: &HandNote, beat_ms: f64, offset_ms: i64) -> Result<i64, StageError> {
    let elapsed = note.total_beats() as f64 * beat_ms;
    // `as` saturates, so anything from 2^63 up (or NaN) has no exact millisecond
    if elapsed.is_nan() || elapsed >= i64::MAX as f64 {
        return Err(out_of_range(note));
    }
    (elapsed as i64)
        .checked_add(offset_ms)
        .ok_or_else(|| out_of_range(note))
}

fn out_of_range(note: &HandNote) -> StageError {
    StageError::TimeOutOfRange {
        measure: note.measure,
        beat: note.beat,
    }
}

struct Emitter {
    hand: Hand,
    commands: Vec<Command>,
}

impl Emitter {
    fn solenoid(&mut self, time_ms: i64, pressed: bool) {
        self.commands.push(Command::Solenoid {
            time_ms,
            hand: self.hand,
            pressed,
        });
    }

    fn move_to(&mut self, time_ms: i64, lane: Lane, end_time_ms: i64) {
        self.commands.push(Command::Move {
            time_ms,
            hand: self.hand,
            lane,
            end_time_ms,
        });
    }
}

/// Compile one hand's notes into commands, in generation order.
///
/// # Errors
/// [`StageError::InvalidTempo`] if `bpm` is not a finite positive number, and
/// [`StageError::TimeOutOfRange`] if a command time overflows `i64`.
///
/// # Example
/// ```rust
/// use autostage::{compile, Hand, HandNote, NoteKind};
///
/// let notes = [HandNote { measure: 0, beat_set: 4, beat: 1, kind: NoteKind::Tap, target: 3 }];
/// let commands = compile(&notes, Hand::Left, 120.0, 0)?;
/// let messages: Vec<String> = commands.iter().map(|c| c.message()).collect();
/// assert_eq!(messages, ["M 200 L 3C 500", "S 500 L ON", "M 510 L LL 0", "S 510 L OF"]);
/// # Ok::<(), autostage::StageError>(())
/// ```
pub fn compile(
    notes: &[HandNote],
    hand: Hand,
    bpm: f64,
    offset_ms: i64,
) -> Result<Vec<Command>, StageError> {
    compile_ordered(notes, hand, bpm, offset_ms, CommandOrder::Generation)
}

/// Compile one hand's notes, then apply `order` to the result.
///
/// [`CommandOrder::Timestamp`] is a stable sort, so commands sharing a timestamp keep
/// their generation order.
pub fn compile_ordered(
    notes: &[HandNote],
    hand: Hand,
    bpm: f64,
    offset_ms: i64,
    order: CommandOrder,
) -> Result<Vec<Command>, StageError> {
    check_tempo(bpm)?;
    let beat_ms = beat_ms(bpm);
    let mut out = Emitter {
        hand,
        commands: Vec::with_capacity(notes.len() * 4),
    };

    for (i, note) in notes.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| notes[p].kind);
        let next = notes.get(i + 1);
        let time = note_time_ms(note, beat_ms, offset_ms)?;
        let lane = Lane::from_target(note.target);

        if rules::needs_approach(prev) {
            let start = time
                .checked_sub(APPROACH_MS)
                .ok_or_else(|| out_of_range(note))?;
            out.move_to(start, lane, time);
        }

        match rules::contact(prev, note.kind) {
            Contact::Press => out.solenoid(time, true),
            Contact::Release => out.solenoid(time, false),
            Contact::FlickLeft => out.move_to(time, lane.left(), 0),
            Contact::FlickRight => out.move_to(time, lane.right(), 0),
            Contact::Keep => {}
        }

        let Some(follow) = rules::follow_through(prev, note.kind, next.map(|n| n.kind)) else {
            continue;
        };
        let after = time
            .checked_add(FOLLOW_THROUGH_MS)
            .ok_or_else(|| out_of_range(note))?;
        let destination = match (follow.target, next) {
            (MoveTarget::Next, Some(next)) => Lane::from_target(next.target),
            _ => hand.edge(),
        };

        match follow.release {
            Release::AfterMove => {
                out.move_to(after, destination, 0);
                out.solenoid(after, false);
            }
            Release::BeforeMove => {
                out.solenoid(after, false);
                out.move_to(after, destination, 0);
            }
            Release::Suppressed => out.move_to(after, destination, 0),
        }
    }

    let mut commands = out.commands;
    if order == CommandOrder::Timestamp {
        commands.sort_by_key(Command::time_ms);
    }

    debug!(
        hand = %hand,
        notes = notes.len(),
        commands = commands.len(),
        ?order,
        "compiled hand"
    );
    Ok(commands)
}
