//! Error types for the motion capture parsers.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading a BVH, ASF or AMC file.
///
/// Parsing is all-or-nothing: any of these aborts the current parse and no
/// skeleton or motion data is produced.
#[derive(Debug, Error)]
pub enum ParseError {
    /// I/O error occurred while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input ended while a structural token was still expected
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: &'static str },

    /// A keyword, section or delimiter is missing or mismatched
    #[error("line {line}: expected {expected}, found `{found}`")]
    Syntax {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// A token that should be numeric could not be parsed
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    /// A channel, root order or DOF name is not recognised
    #[error("line {line}: unknown channel `{name}`")]
    UnknownChannel { line: usize, name: String },

    /// The number of values differs from the declared channel count
    #[error("line {line}: expected {expected} channel values, found {found}")]
    ChannelCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A record refers to a bone that the skeleton does not declare
    #[error("line {line}: unknown bone `{name}`")]
    UnknownBone { line: usize, name: String },

    /// A bone name is declared more than once
    #[error("line {line}: bone `{name}` is declared twice")]
    DuplicateBone { line: usize, name: String },

    /// A bone is linked under more than one parent
    #[error("line {line}: bone `{name}` already has a parent")]
    DuplicateParent { line: usize, name: String },

    /// An AMC frame marker is not a valid 1-based frame number
    #[error("line {line}: invalid frame number {frame}")]
    InvalidFrame { line: usize, frame: usize },

    /// The declared frame count does not fit in a motion table
    #[error("motion table of {frame_count} frames x {joint_count} joints cannot be allocated")]
    MotionTooLarge {
        frame_count: usize,
        joint_count: usize,
    },

    /// The ASF length unit is not a positive number
    #[error("line {line}: invalid length unit {value}")]
    InvalidUnits { line: usize, value: f64 },
}

/// Result type used by every parser in this crate
pub type Result<T> = std::result::Result<T, ParseError>;
