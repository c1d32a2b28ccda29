//! Error types and result handling for the memory-economics subsystem.
//!
//! All recoverable failures carry enough context (offending value, range
//! bounds) to diagnose a bad control-plane write from the log alone.

use core::fmt;

/// Result type alias for mm-econ operations.
pub type EconResult<T> = Result<T, EconError>;

/// Error type for mm-econ operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EconError {
    /// Control-plane input could not be parsed.
    Parse {
        /// What failed to parse.
        what: ParseFailure,
    },

    /// A profile range conflicts with an already-loaded range.
    Overlap {
        /// Start of the rejected range (inclusive)
        start: u64,
        /// End of the rejected range (exclusive)
        end: u64,
    },

    /// The rejected range was empty or inverted (`start >= end`).
    EmptyRange {
        /// Start of the rejected range
        start: u64,
        /// End of the rejected range
        end: u64,
    },

    /// Storage for a profile batch could not be allocated.
    NoMemory,

    /// A mode write was outside the defined enumeration.
    InvalidMode {
        /// The attempted raw mode value
        value: u64,
    },
}

/// The specific shape of a control-plane parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Empty field where an integer was expected
    EmptyField,
    /// Non-digit character in an integer field
    BadDigit,
    /// Integer does not fit in 64 bits
    Overflow,
    /// A triple did not have exactly three fields
    FieldCount {
        /// Number of fields actually present
        found: usize,
    },
}

impl EconError {
    /// Kernel-style negative errno code for the control plane.
    pub fn code(&self) -> i32 {
        match self {
            EconError::Parse { .. } => -22,       // EINVAL
            EconError::Overlap { .. } => -22,     // EINVAL
            EconError::EmptyRange { .. } => -22,  // EINVAL
            EconError::NoMemory => -12,           // ENOMEM
            EconError::InvalidMode { .. } => -22, // EINVAL
        }
    }
}

impl fmt::Display for EconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EconError::Parse { what } => {
                write!(f, "invalid argument: {}", what)
            },
            EconError::Overlap { start, end } => {
                write!(f, "range [{}, {}) overlaps an existing range", start, end)
            },
            EconError::EmptyRange { start, end } => {
                write!(f, "range [{}, {}) is empty", start, end)
            },
            EconError::NoMemory => {
                write!(f, "out of memory")
            },
            EconError::InvalidMode { value } => {
                write!(f, "mode {} is not a valid policy mode", value)
            },
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::EmptyField => write!(f, "empty integer field"),
            ParseFailure::BadDigit => write!(f, "malformed integer"),
            ParseFailure::Overflow => write!(f, "integer overflows 64 bits"),
            ParseFailure::FieldCount { found } => {
                write!(f, "expected 3 fields per triple, found {}", found)
            },
        }
    }
}
