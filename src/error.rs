//! # Error Types
//!
//! This module defines all error types for the chart compiler.
//!
//! The policy is strict on structure and permissive on content: a note-grid line
//! whose channel/measure header cannot be tokenized is an error, while header values
//! that fail to parse and out-of-range lane codes are silently tolerated.
//!
//! ## Error Types
//! - `Io` - The chart source could not be opened or read
//! - `Format` - A note-grid line is structurally malformed (with line number)
//! - `InvalidTempo` - Compilation was asked to use a BPM that is not positive
//! - `TimeOutOfRange` - A note's command times do not fit in a signed 64-bit millisecond
//! - `Config` - An options file could not be deserialized
//! - `Message` - A wire message could not be parsed back into a command
//!
//! ## Usage
//! ```rust
//! use autostage::{parse_chart, StageError};
//!
//! match parse_chart("#1,x:2000:0000:2000") {
//!     Ok(_) => unreachable!(),
//!     Err(StageError::Format { line, message }) => {
//!         eprintln!("Format error on line {}: {}", line, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    /// The chart source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally malformed note-grid line.
    ///
    /// # Example
    /// ```
    /// # use autostage::StageError;
    /// let err = StageError::Format {
    ///     line: 12,
    ///     message: "invalid note header format".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Format error at line 12: invalid note header format");
    /// ```
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// Tempo must be a finite, strictly positive BPM.
    ///
    /// # Example
    /// ```
    /// # use autostage::StageError;
    /// let err = StageError::InvalidTempo(0.0);
    /// assert_eq!(err.to_string(), "Invalid tempo: 0 BPM (must be greater than zero)");
    /// ```
    #[error("Invalid tempo: {0} BPM (must be greater than zero)")]
    InvalidTempo(f64),

    /// A note (or its approach/follow-through) lands outside the `i64` millisecond range.
    ///
    /// # Example
    /// ```
    /// # use autostage::StageError;
    /// let err = StageError::TimeOutOfRange { measure: 3, beat: 1 };
    /// assert_eq!(err.to_string(), "Time out of range for note at measure 3, beat 1");
    /// ```
    #[error("Time out of range for note at measure {measure}, beat {beat}")]
    TimeOutOfRange { measure: u32, beat: u32 },

    #[error("Invalid options: {0}")]
    Config(String),

    #[error("Invalid command message: {0}")]
    Message(String),
}
