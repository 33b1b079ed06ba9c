//! Note transition rules
//!
//! Pure decisions over neighbouring note kinds, kept apart from timing so the table
//! can be tested on its own. The engine turns each decision into commands.

use crate::chart::NoteKind;

/// What the solenoid or arm does at a note's own timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Press,
    /// End of a sustained hold
    Release,
    /// Flick toward the left: move one position left of the target lane
    FlickLeft,
    /// Flick toward the right: move one position right of the target lane
    FlickRight,
    /// Nothing to do; contact stays as it is
    Keep,
}

/// Where the arm heads after a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// The hand's own edge lane
    Edge,
    /// The next note's target lane
    Next,
}

/// When the solenoid is released relative to the follow-through move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    AfterMove,
    BeforeMove,
    /// No release: contact continues, or the note already released
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowThrough {
    pub target: MoveTarget,
    pub release: Release,
}

fn is_terminator(kind: Option<NoteKind>) -> bool {
    matches!(kind, None | Some(NoteKind::None))
}

/// Whether the arm glides into position ahead of this note: true for the first note
/// of a run.
pub fn needs_approach(prev: Option<NoteKind>) -> bool {
    is_terminator(prev)
}

/// The action at the note's own timestamp.
///
/// After a `LongStart` the hand is still pressed, so a `Tap` ends the hold instead
/// of pressing again and a further `LongStart` or `Slide` changes nothing.
pub fn contact(prev: Option<NoteKind>, current: NoteKind) -> Contact {
    let holding = prev == Some(NoteKind::LongStart);

    match current {
        NoteKind::LeftFlick => Contact::FlickLeft,
        NoteKind::RightFlick => Contact::FlickRight,
        NoteKind::Tap if holding => Contact::Release,
        NoteKind::Tap | NoteKind::LongStart if !holding => Contact::Press,
        NoteKind::Tap | NoteKind::LongStart | NoteKind::Slide | NoteKind::None => Contact::Keep,
    }
}

/// The move and release that follow a note, if any.
///
/// Only `Tap` and flicks let go of the lane; `LongStart` and `Slide` keep contact open
/// and return `None`.
pub fn follow_through(
    prev: Option<NoteKind>,
    current: NoteKind,
    next: Option<NoteKind>,
) -> Option<FollowThrough> {
    if !matches!(
        current,
        NoteKind::Tap | NoteKind::LeftFlick | NoteKind::RightFlick
    ) {
        return None;
    }

    let target = if is_terminator(next) {
        MoveTarget::Edge
    } else {
        MoveTarget::Next
    };

    let closes_hold = prev == Some(NoteKind::LongStart) && current == NoteKind::Tap;
    let release = match next {
        Some(kind) if kind.is_flick() => Release::Suppressed,
        _ if closes_hold => Release::Suppressed,
        Some(NoteKind::LongStart) => Release::BeforeMove,
        _ => Release::AfterMove,
    };

    Some(FollowThrough { target, release })
}

#[cfg(test)]
mod tests {
    use super::*;
    use NoteKind::*;

    #[test]
    fn test_approach_only_at_start_of_run() {
        assert!(needs_approach(Option::None));
        assert!(needs_approach(Some(None)));
        assert!(!needs_approach(Some(Tap)));
        assert!(!needs_approach(Some(LongStart)));
    }

    #[test]
    fn test_contact_fresh() {
        for prev in [Option::None, Some(Tap), Some(LeftFlick), Some(RightFlick), Some(Slide)] {
            assert_eq!(contact(prev, Tap), Contact::Press);
            assert_eq!(contact(prev, LongStart), Contact::Press);
            assert_eq!(contact(prev, LeftFlick), Contact::FlickLeft);
            assert_eq!(contact(prev, RightFlick), Contact::FlickRight);
            assert_eq!(contact(prev, Slide), Contact::Keep);
        }
    }

    #[test]
    fn test_contact_while_holding() {
        let prev = Some(LongStart);
        assert_eq!(contact(prev, Tap), Contact::Release);
        assert_eq!(contact(prev, LeftFlick), Contact::FlickLeft);
        assert_eq!(contact(prev, RightFlick), Contact::FlickRight);
        assert_eq!(contact(prev, LongStart), Contact::Keep);
        assert_eq!(contact(prev, Slide), Contact::Keep);
    }

    #[test]
    fn test_follow_through_only_for_releasing_kinds() {
        assert_eq!(follow_through(Option::None, LongStart, Some(Tap)), Option::None);
        assert_eq!(follow_through(Option::None, Slide, Some(Tap)), Option::None);
        assert!(follow_through(Option::None, Tap, Some(Tap)).is_some());
        assert!(follow_through(Option::None, LeftFlick, Option::None).is_some());
    }

    #[test]
    fn test_follow_through_target() {
        let last = follow_through(Some(Tap), Tap, Option::None).unwrap();
        assert_eq!(last.target, MoveTarget::Edge);
        let terminated = follow_through(Some(Tap), Tap, Some(None)).unwrap();
        assert_eq!(terminated.target, MoveTarget::Edge);
        let more = follow_through(Some(Tap), RightFlick, Some(Tap)).unwrap();
        assert_eq!(more.target, MoveTarget::Next);
    }

    #[test]
    fn test_follow_through_release() {
        let release = |prev, current, next| follow_through(prev, current, next).unwrap().release;

        assert_eq!(release(Option::None, Tap, Some(Tap)), Release::AfterMove);
        assert_eq!(release(Option::None, Tap, Option::None), Release::AfterMove);
        assert_eq!(release(Option::None, Tap, Some(LeftFlick)), Release::Suppressed);
        assert_eq!(release(Option::None, LeftFlick, Some(RightFlick)), Release::Suppressed);
        assert_eq!(release(Option::None, Tap, Some(LongStart)), Release::BeforeMove);
        assert_eq!(release(Some(LongStart), Tap, Option::None), Release::Suppressed);
        assert_eq!(release(Some(LongStart), LeftFlick, Option::None), Release::AfterMove);
    }
}
