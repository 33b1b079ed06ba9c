//! # Hand Splitter
//!
//! Splits a parsed [`Score`] into two monophonic note timelines, one per hand.
//!
//! Channel parity picks the hand: odd channels go to the first list (left hand), even
//! channels to the second (right hand). Subdivisions without an event are dropped, and
//! each remaining event takes the next unconsumed target code from its source line, so
//! target digits written only under real events pair up correctly.
//!
//! Output order is the input order of the note-grid lines, then subdivision order
//! within each line. The compiler relies on this being time-monotonic, which holds for
//! charts that list measures in order.

use serde::Serialize;
use tracing::{debug, warn};

use crate::chart::{NoteKind, Score};

/// A single event on one hand's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HandNote {
    pub measure: u32,
    /// Subdivisions per measure in the source line
    pub beat_set: u32,
    /// Subdivision index within the measure
    pub beat: u32,
    pub kind: NoteKind,
    /// Target lane code (0 and 6 are the edges, 1-5 the lanes)
    pub target: i32,
}

impl HandNote {
    /// Absolute position in subdivisions from the start of the chart.
    pub fn total_beats(&self) -> u64 {
        u64::from(self.measure) * u64::from(self.beat_set) + u64::from(self.beat)
    }
}

/// Split a score into `(left, right)` hand timelines.
pub fn split_by_hand(score: &Score) -> (Vec<HandNote>, Vec<HandNote>) {
    let mut left = Vec::new();
    let mut right = Vec::new();

    for raw in &score.notes {
        let beat_set = raw.beat_set();
        let destination = if raw.channel % 2 == 1 {
            &mut left
        } else {
            &mut right
        };

        let mut targets = raw.targets.iter().copied();
        for (beat, kind) in raw.kinds.iter().copied().enumerate() {
            if kind == NoteKind::None {
                continue;
            }
            let target = targets.next().unwrap_or_else(|| {
                warn!(
                    channel = raw.channel,
                    measure = raw.measure,
                    beat,
                    "note has no target position, using left edge"
                );
                0
            });
            destination.push(HandNote {
                measure: raw.measure,
                beat_set,
                beat: beat as u32,
                kind,
                target,
            });
        }
    }

    debug!(left = left.len(), right = right.len(), "split notes by hand");
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::parse_chart;

    #[test]
    fn test_split_pairs_targets_with_events() {
        let score = parse_chart("#1,2:0204003:0000000:354").unwrap();
        let (left, right) = split_by_hand(&score);

        assert!(right.is_empty());
        assert_eq!(
            left,
            vec![
                HandNote { measure: 2, beat_set: 7, beat: 1, kind: NoteKind::Tap, target: 3 },
                HandNote { measure: 2, beat_set: 7, beat: 3, kind: NoteKind::LongStart, target: 5 },
                HandNote { measure: 2, beat_set: 7, beat: 6, kind: NoteKind::RightFlick, target: 4 },
            ]
        );
    }

    #[test]
    fn test_split_by_channel_parity() {
        let source = "#1,0:2000:0000:1000\n\
                      #2,0:0200:0000:2000\n\
                      #3,1:20:00:30\n\
                      #4,1:02:00:40\n";
        let (left, right) = split_by_hand(&parse_chart(source).unwrap());

        assert_eq!(left.len(), 2);
        assert_eq!(right.len(), 2);
        assert_eq!(left[0].target, 1);
        assert_eq!(left[1].target, 3);
        assert_eq!(left[1].beat_set, 2);
        assert_eq!(right[0].beat, 1);
        assert_eq!(right[1].target, 4);
    }

    #[test]
    fn test_split_preserves_line_order() {
        let source = "#1,0:0002:0000:5000\n#1,0:2000:0000:1000\n";
        let (left, _) = split_by_hand(&parse_chart(source).unwrap());
        assert_eq!(left[0].beat, 3);
        assert_eq!(left[1].beat, 0);
    }

    #[test]
    fn test_split_missing_target_defaults_to_edge() {
        let (left, _) = split_by_hand(&parse_chart("#1,0:22:00:4").unwrap());
        assert_eq!(left[0].target, 4);
        assert_eq!(left[1].target, 0);
    }

    #[test]
    fn test_total_beats() {
        let note = HandNote { measure: 3, beat_set: 8, beat: 5, kind: NoteKind::Tap, target: 2 };
        assert_eq!(note.total_beats(), 29);
    }
}
