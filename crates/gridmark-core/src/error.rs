use std::fmt::{self, Display};

use crate::MAX_COORD;

/// The coordinate axis named in a [`CodecError::OutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Column, or the x coordinate of a line.
    Column,
    /// Row, or the y coordinate of a line.
    Row,
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Column => f.write_str("column"),
            Axis::Row => f.write_str("row"),
        }
    }
}

/// Errors raised while encoding or reinterpreting packed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CodecError {
    /// A coordinate does not fit in the reserved bit width.
    #[display("{axis} {value} is out of range (max {})", MAX_COORD)]
    OutOfRange {
        /// The offending axis.
        axis: Axis,
        /// The offending coordinate.
        value: u16,
    },
    /// A raw integer has bits set outside the cell key layout.
    #[display("invalid cell key: {raw:#010x}")]
    InvalidCellKey {
        /// The rejected integer.
        raw: u32,
    },
    /// A raw integer carries an unknown line type discriminator.
    #[display("invalid line key: {raw:#010x}")]
    InvalidLineKey {
        /// The rejected integer.
        raw: u32,
    },
    /// A line type discriminator outside the closed set.
    #[display("unknown line type: {value}")]
    UnknownLineType {
        /// The rejected discriminator.
        value: u8,
    },
}
