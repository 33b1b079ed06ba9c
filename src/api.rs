//! # Public API
//!
//! Pipeline entry points chaining the parser, the hand splitter and the compiler.
//!
//! ## Compilation Functions
//!
//! - [`compile_chart()`] - Chart text to both hands' command lists
//! - [`compile_chart_file()`] - Same, reading the chart from disk
//! - [`compile_score()`] - Start from an already parsed [`Score`]
//! - [`compile_hands()`] - Compile two note timelines concurrently
//!
//! ## Typical Usage
//!
//! ```rust
//! use autostage::{compile_chart, CompileOptions};
//!
//! let source = "#Title Demo\n#BPM 120\n#1,0:2020:0000:25\n";
//!
//! let compiled = compile_chart(source, &CompileOptions::default())?;
//! assert_eq!(compiled.header.title, "Demo");
//! assert_eq!(compiled.left[0].message(), "M -300 L 2C 0");
//! assert!(compiled.right.is_empty());
//! # Ok::<(), autostage::StageError>(())
//! ```

use std::path::Path;
use std::thread;

use serde::Serialize;
use tracing::info;

use crate::chart::{parse_chart, parse_chart_file, Header, Score};
use crate::command::{Command, Hand};
use crate::compiler::{check_tempo, compile_ordered};
use crate::config::{CommandOrder, CompileOptions};
use crate::error::StageError;
use crate::hand::{split_by_hand, HandNote};

/// Both hands' command streams for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompiledChart {
    pub header: Header,
    /// Tempo the commands were timed with
    pub bpm: f64,
    pub offset_ms: i64,
    pub left: Vec<Command>,
    pub right: Vec<Command>,
}

/// Compile both hands' timelines, the left one on a scoped worker thread.
///
/// # Errors
/// [`StageError::InvalidTempo`] if `bpm` is not a finite positive number; no
/// commands are produced for either hand.
pub fn compile_hands(
    left: &[HandNote],
    right: &[HandNote],
    bpm: f64,
    offset_ms: i64,
    order: CommandOrder,
) -> Result<(Vec<Command>, Vec<Command>), StageError> {
    check_tempo(bpm)?;

    thread::scope(|scope| -> Result<(Vec<Command>, Vec<Command>), StageError> {
        let left_worker = scope.spawn(|| compile_ordered(left, Hand::Left, bpm, offset_ms, order));
        let right = compile_ordered(right, Hand::Right, bpm, offset_ms, order)?;
        let left = left_worker
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        Ok((left, right))
    })
}

/// Split and compile a parsed score.
///
/// Tempo and offset come from `options` when set, otherwise from the score header.
pub fn compile_score(score: &Score, options: &CompileOptions) -> Result<CompiledChart, StageError> {
    let bpm = options.resolve_bpm(&score.header);
    let offset_ms = options.resolve_offset_ms(&score.header);
    let (left_notes, right_notes) = split_by_hand(score);
    let (left, right) = compile_hands(&left_notes, &right_notes, bpm, offset_ms, options.order)?;

    info!(
        title = %score.header.title,
        bpm,
        offset_ms,
        left = left.len(),
        right = right.len(),
        "compiled chart"
    );

    Ok(CompiledChart {
        header: score.header.clone(),
        bpm,
        offset_ms,
        left,
        right,
    })
}

/// Parse chart text and compile both hands.
pub fn compile_chart(source: &str, options: &CompileOptions) -> Result<CompiledChart, StageError> {
    let score = parse_chart(source)?;
    compile_score(&score, options)
}

/// Read a chart file and compile both hands.
pub fn compile_chart_file(
    path: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<CompiledChart, StageError> {
    let score = parse_chart_file(path)?;
    compile_score(&score, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NoteKind;

    #[test]
    fn test_compile_hands_matches_single_hand_compiles() {
        let tap = |beat, target| HandNote {
            measure: 0,
            beat_set: 4,
            beat,
            kind: NoteKind::Tap,
            target,
        };
        let left = [tap(0, 1), tap(2, 3)];
        let right = [tap(1, 5)];

        let (l, r) = compile_hands(&left, &right, 120.0, 0, CommandOrder::Generation).unwrap();
        assert_eq!(l, crate::compile(&left, Hand::Left, 120.0, 0).unwrap());
        assert_eq!(r, crate::compile(&right, Hand::Right, 120.0, 0).unwrap());
    }

    #[test]
    fn test_compile_hands_rejects_tempo() {
        let result = compile_hands(&[], &[], -1.0, 0, CommandOrder::Generation);
        assert!(matches!(result, Err(StageError::InvalidTempo(_))));
    }

    #[test]
    fn test_header_bpm_zero_is_invalid_tempo() {
        let result = compile_chart("#Title NoTempo\n#1,0:2:0:1\n", &CompileOptions::default());
        assert!(matches!(result, Err(StageError::InvalidTempo(_))));
    }

    #[test]
    fn test_options_override_header() {
        let options = CompileOptions {
            bpm: Some(60.0),
            offset_ms: Some(100),
            ..CompileOptions::default()
        };
        let compiled = compile_chart("#BPM 120\n#Offset 7\n#2,0:02:00:4\n", &options).unwrap();
        assert_eq!(compiled.bpm, 60.0);
        assert_eq!(compiled.offset_ms, 100);
        assert_eq!(compiled.right[0].message(), "M 800 R 4C 1100");
    }
}
