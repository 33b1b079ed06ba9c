//! # Chart Module
//!
//! Types and parser for the line-oriented chart text format.
//!
//! ## Format
//! ```text
//! #Title Star
//! #BPM 178
//! #1,0:20020000:00000000:30050000
//! ```
//!
//! Only lines starting with `#` are considered. When the character after `#` is an
//! ASCII digit the line is a **note-grid line**:
//!
//! `#<channel>,<measure>:<timing-digits>:<appear-digits>:<target-digits>`
//!
//! Every digit string has exactly one character per subdivision of the measure, so the
//! length of the timing field is the measure's beat-set size. Any other `#` line is a
//! **header line** of the form `#<Key> <value>`.
//!
//! ## Error Policy
//! - Note-grid lines are strict about their channel/measure header: a missing or
//!   non-numeric header is a [`StageError::Format`].
//! - Header lines are best-effort: unknown keys are ignored and numeric values that
//!   fail to parse keep the previous value.
//! - Digit characters that are not valid codes are read as `0` (no event / edge lane).
//!
//! ## Example
//! ```rust
//! use autostage::{parse_chart, NoteKind};
//!
//! let score = parse_chart("#BPM 120\n#1,0:2020:0000:3040\n")?;
//! assert_eq!(score.header.bpm, 120.0);
//! assert_eq!(score.notes[0].kinds[0], NoteKind::Tap);
//! assert_eq!(score.notes[0].targets, vec![3, 0, 4, 0]);
//! # Ok::<(), autostage::StageError>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::StageError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Chart difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    #[default]
    Unspecified,
    Debug,
    Regular,
    Pro,
    Master,
    MasterPlus,
}

impl Difficulty {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Difficulty::Unspecified),
            1 => Some(Difficulty::Debug),
            2 => Some(Difficulty::Regular),
            3 => Some(Difficulty::Pro),
            4 => Some(Difficulty::Master),
            5 => Some(Difficulty::MasterPlus),
            _ => None,
        }
    }
}

/// Song attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Attribute {
    #[default]
    Unspecified,
    Cute,
    Cool,
    Passion,
    All,
}

impl Attribute {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Attribute::Unspecified),
            1 => Some(Attribute::Cute),
            2 => Some(Attribute::Cool),
            3 => Some(Attribute::Passion),
            4 => Some(Attribute::All),
            _ => None,
        }
    }
}

/// Song and chart metadata from the header lines.
///
/// Every field starts at its zero value; a later line for the same key overwrites
/// an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Header {
    pub title: String,
    pub lyricist: String,
    pub composer: String,
    /// Background image path
    pub background: String,
    /// Music file path
    pub song: String,
    /// Lyrics file path
    pub lyrics: String,
    pub bpm: f64,
    /// Chart offset (ms)
    pub offset: i64,
    /// Song offset (ms)
    pub song_offset: i64,
    /// Movie offset (ms)
    pub movie_offset: i64,
    pub difficulty: Difficulty,
    /// Song level (1-30)
    pub level: i32,
    /// Music volume (0-100)
    pub bgm_volume: i32,
    /// Sound effect volume (0-100)
    pub se_volume: i32,
    pub attribute: Attribute,
    /// Background brightness (0-255)
    pub brightness: i32,
}

impl Header {
    /// Apply one header line (without the leading `#`).
    fn apply(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(' ') else {
            return;
        };
        let value = value.trim();

        match key {
            "Title" => self.title = value.to_string(),
            "Lyricist" => self.lyricist = value.to_string(),
            "Composer" => self.composer = value.to_string(),
            "Background" => self.background = value.to_string(),
            "Song" => self.song = value.to_string(),
            "Lyrics" => self.lyrics = value.to_string(),
            "BPM" => set_parsed(&mut self.bpm, value),
            "Offset" => set_parsed(&mut self.offset, value),
            "SongOffset" => set_parsed(&mut self.song_offset, value),
            "MovieOffset" => set_parsed(&mut self.movie_offset, value),
            "Level" => set_parsed(&mut self.level, value),
            "BGMVolume" => set_parsed(&mut self.bgm_volume, value),
            "SEVolume" => set_parsed(&mut self.se_volume, value),
            "Brightness" => set_parsed(&mut self.brightness, value),
            "Difficulty" => {
                if let Some(difficulty) = value.parse().ok().and_then(Difficulty::from_code) {
                    self.difficulty = difficulty;
                }
            }
            "Attribute" => {
                if let Some(attribute) = value.parse().ok().and_then(Attribute::from_code) {
                    self.attribute = attribute;
                }
            }
            _ => {}
        }
    }
}

fn set_parsed<T: std::str::FromStr>(field: &mut T, value: &str) {
    if let Ok(parsed) = value.parse() {
        *field = parsed;
    }
}

/// Gameplay meaning of one subdivision of a measure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum NoteKind {
    /// No event at this subdivision
    #[default]
    None,
    LeftFlick,
    Tap,
    RightFlick,
    LongStart,
    Slide,
}

impl NoteKind {
    /// Decode a timing digit. Characters outside `0`-`5` read as `None`.
    pub fn from_digit(c: char) -> Self {
        match c {
            '1' => NoteKind::LeftFlick,
            '2' => NoteKind::Tap,
            '3' => NoteKind::RightFlick,
            '4' => NoteKind::LongStart,
            '5' => NoteKind::Slide,
            _ => NoteKind::None,
        }
    }

    pub fn is_flick(self) -> bool {
        matches!(self, NoteKind::LeftFlick | NoteKind::RightFlick)
    }
}

/// One note-grid line: a single channel's events within one measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawNote {
    /// Channel number; parity selects the hand
    pub channel: u32,
    pub measure: u32,
    /// One entry per subdivision
    pub kinds: Vec<NoteKind>,
    /// Lane each note appears at
    pub appears: Vec<i32>,
    /// Lane each note must be hit at
    pub targets: Vec<i32>,
}

impl RawNote {
    /// Number of subdivisions this measure is written with.
    pub fn beat_set(&self) -> u32 {
        self.kinds.len() as u32
    }
}

/// A parsed chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Score {
    pub header: Header,
    /// Note-grid lines in file order
    pub notes: Vec<RawNote>,
}

/// Parse chart text into a [`Score`].
///
/// A leading byte-order mark is ignored.
///
/// # Errors
/// Returns [`StageError::Format`] for a note-grid line whose channel/measure header is
/// missing or not numeric.
pub fn parse_chart(source: &str) -> Result<Score, StageError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut score = Score::default();

    for (index, line) in source.lines().enumerate() {
        let Some(body) = line.strip_prefix('#') else {
            continue;
        };

        if body.as_bytes().first().is_some_and(u8::is_ascii_digit) {
            let note = parse_note_line(body).map_err(|message| StageError::Format {
                line: index + 1,
                message,
            })?;
            score.notes.push(note);
        } else {
            score.header.apply(body);
        }
    }

    debug!(
        title = %score.header.title,
        bpm = score.header.bpm,
        lines = score.notes.len(),
        "parsed chart"
    );
    Ok(score)
}

/// Read a chart from any reader.
///
/// The reader is consumed to the end. Bytes that are not valid UTF-8 are replaced
/// rather than rejected.
pub fn parse_chart_reader<R: Read>(mut reader: R) -> Result<Score, StageError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    parse_chart(&String::from_utf8_lossy(body))
}

/// Open and parse a chart file.
pub fn parse_chart_file(path: impl AsRef<Path>) -> Result<Score, StageError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading chart");
    let file = File::open(path)?;
    parse_chart_reader(file)
}

/// Parse `<channel>,<measure>:<timing>:<appear>:<target>` (leading `#` stripped).
fn parse_note_line(line: &str) -> Result<RawNote, String> {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() < 2 {
        return Err("invalid note format: expected <channel>,<measure>:<timing>".to_string());
    }

    let (channel, measure) = parts[0]
        .split_once(',')
        .filter(|(_, measure)| !measure.contains(','))
        .ok_or_else(|| "invalid note header format: expected <channel>,<measure>".to_string())?;

    let channel = channel
        .parse()
        .map_err(|_| format!("invalid channel number '{}'", channel))?;
    let measure = measure
        .parse()
        .map_err(|_| format!("invalid measure number '{}'", measure))?;

    Ok(RawNote {
        channel,
        measure,
        kinds: parts[1].chars().map(NoteKind::from_digit).collect(),
        appears: parts.get(2).map(|s| parse_positions(s)).unwrap_or_default(),
        targets: parts.get(3).map(|s| parse_positions(s)).unwrap_or_default(),
    })
}

fn parse_positions(digits: &str) -> Vec<i32> {
    digits
        .chars()
        .map(|c| c.to_digit(10).map_or(0, |d| d as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_beyond_i32() {
        let score = parse_chart("#Offset 3000000000
#SongOffset -3000000000
#MovieOffset 12
").unwrap();
        assert_eq!(score.header.offset, 3_000_000_000);
        assert_eq!(score.header.song_offset, -3_000_000_000);
        assert_eq!(score.header.movie_offset, 12);
    }

    #[test]
    fn test_parse_header_fields() {
        let source = "#Title Star\n\
                      #Composer Someone Else\n\
                      #BPM 178.5\n\
                      #Offset -120\n\
                      #Level 26\n\
                      #BGMVolume 80\n\
                      #SEVolume 60\n\
                      #Attribute 3\n\
                      #Difficulty 4\n\
                      #Brightness 200\n";
        let score = parse_chart(source).unwrap();

        assert_eq!(score.header.title, "Star");
        assert_eq!(score.header.composer, "Someone Else");
        assert_eq!(score.header.bpm, 178.5);
        assert_eq!(score.header.offset, -120);
        assert_eq!(score.header.level, 26);
        assert_eq!(score.header.bgm_volume, 80);
        assert_eq!(score.header.se_volume, 60);
        assert_eq!(score.header.attribute, Attribute::Passion);
        assert_eq!(score.header.difficulty, Difficulty::Master);
        assert_eq!(score.header.brightness, 200);
        assert!(score.notes.is_empty());
    }

    #[test]
    fn test_header_bad_number_keeps_previous_value() {
        let score = parse_chart("#BPM 150\n#BPM fast\n#Level ??\n").unwrap();
        assert_eq!(score.header.bpm, 150.0);
        assert_eq!(score.header.level, 0);
    }

    #[test]
    fn test_header_last_writer_wins() {
        let score = parse_chart("#Title First\n#Title Second\n").unwrap();
        assert_eq!(score.header.title, "Second");
    }

    #[test]
    fn test_header_unknown_key_and_missing_value_ignored() {
        let score = parse_chart("#Mystery 42\n#Title\n#Attribute 9\n").unwrap();
        assert_eq!(score.header, Header::default());
    }

    #[test]
    fn test_lines_without_hash_are_ignored() {
        let score = parse_chart("Title Star\n1,0:2000:0000:2000\n\n  #BPM 90\n").unwrap();
        assert_eq!(score.header, Header::default());
        assert!(score.notes.is_empty());
    }

    #[test]
    fn test_parse_note_line() {
        let score = parse_chart("#3,12:20400100:30050000:20040010\n").unwrap();
        let note = &score.notes[0];

        assert_eq!(note.channel, 3);
        assert_eq!(note.measure, 12);
        assert_eq!(note.beat_set(), 8);
        assert_eq!(
            note.kinds,
            vec![
                NoteKind::Tap,
                NoteKind::None,
                NoteKind::LongStart,
                NoteKind::None,
                NoteKind::None,
                NoteKind::LeftFlick,
                NoteKind::None,
                NoteKind::None,
            ]
        );
        assert_eq!(note.appears, vec![3, 0, 0, 5, 0, 0, 0, 0]);
        assert_eq!(note.targets, vec![2, 0, 0, 4, 0, 0, 1, 0]);
    }

    #[test]
    fn test_note_line_missing_trailing_fields() {
        let score = parse_chart("#1,0:2020\n#2,0:2020:1010\n").unwrap();
        assert_eq!(score.notes[0].kinds.len(), 4);
        assert!(score.notes[0].appears.is_empty());
        assert!(score.notes[0].targets.is_empty());
        assert_eq!(score.notes[1].appears, vec![1, 0, 1, 0]);
        assert!(score.notes[1].targets.is_empty());
    }

    #[test]
    fn test_note_line_without_colon_is_format_error() {
        let err = parse_chart("#BPM 120\n#1,0\n").unwrap_err();
        match err {
            StageError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_note_line_bad_header_is_format_error() {
        assert!(matches!(
            parse_chart("#1:2000:0000:2000"),
            Err(StageError::Format { line: 1, .. })
        ));
        assert!(matches!(
            parse_chart("#1,2,3:2000:0000:2000"),
            Err(StageError::Format { .. })
        ));
        assert!(matches!(
            parse_chart("#1,x:2000:0000:2000"),
            Err(StageError::Format { .. })
        ));
    }

    #[test]
    fn test_unknown_digits_are_permissive() {
        let score = parse_chart("#1,0:2920:a0b0:x070").unwrap();
        assert_eq!(score.notes[0].kinds[1], NoteKind::None);
        assert_eq!(score.notes[0].appears, vec![0, 0, 0, 0]);
        assert_eq!(score.notes[0].targets, vec![0, 0, 7, 0]);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let score = parse_chart("\u{feff}#Title Star\n#1,0:2:0:3\n").unwrap();
        assert_eq!(score.header.title, "Star");
        assert_eq!(score.notes.len(), 1);
    }

    #[test]
    fn test_reader_skips_byte_order_mark_and_crlf() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"#Title Star\r\n#2,1:0200:0000:0500\r\n");
        let score = parse_chart_reader(bytes.as_slice()).unwrap();

        assert_eq!(score.header.title, "Star");
        assert_eq!(score.notes[0].channel, 2);
        assert_eq!(score.notes[0].measure, 1);
        assert_eq!(score.notes[0].targets, vec![0, 5, 0, 0]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_chart_file("/definitely/not/a/chart.txt").unwrap_err();
        assert!(matches!(err, StageError::Io(_)));
    }
}
