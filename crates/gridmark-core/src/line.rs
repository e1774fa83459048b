//! Line segments on the grid and their packed integer keys.
//!
//! A line is addressed by the grid point it starts from and a [`LineType`]
//! telling which way it runs and what drew it. Cell borders and freehand pen
//! strokes share the same coordinate space, so the type is part of the key.

use std::fmt::{self, Display};

use crate::{Axis, COORD_BITS, CodecError, cell::check_coord};

const COORD_MASK: u32 = (1 << COORD_BITS) - 1;
const Y_SHIFT: u32 = COORD_BITS;
const TYPE_SHIFT: u32 = 2 * COORD_BITS;

/// The kind of a line segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LineType {
    /// Cell border running from `(x, y)` to `(x + 1, y)`.
    EdgeHorizontal = 0,
    /// Cell border running from `(x, y)` to `(x, y + 1)`.
    EdgeVertical = 1,
    /// Pen stroke running from `(x, y)` to `(x + 1, y)`.
    PenHorizontal = 2,
    /// Pen stroke running from `(x, y)` to `(x, y + 1)`.
    PenVertical = 3,
}

impl LineType {
    /// All line types in discriminator order.
    pub const ALL: [Self; 4] = [
        Self::EdgeHorizontal,
        Self::EdgeVertical,
        Self::PenHorizontal,
        Self::PenVertical,
    ];

    /// Returns the discriminator stored in a [`LineKey`].
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Looks up a line type by its discriminator.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownLineType`] if no line type uses `value`.
    pub const fn from_value(value: u8) -> Result<Self, CodecError> {
        match value {
            0 => Ok(Self::EdgeHorizontal),
            1 => Ok(Self::EdgeVertical),
            2 => Ok(Self::PenHorizontal),
            3 => Ok(Self::PenVertical),
            _ => Err(CodecError::UnknownLineType { value }),
        }
    }
}

impl Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::EdgeHorizontal => "edge-h",
            Self::EdgeVertical => "edge-v",
            Self::PenHorizontal => "pen-h",
            Self::PenVertical => "pen-v",
        };
        f.write_str(s)
    }
}

/// A line segment packed into a single integer.
///
/// Layout from the low bits: `x` ([`COORD_BITS`] bits), `y` ([`COORD_BITS`]
/// bits), then the 8-bit [`LineType`] discriminator.
///
/// # Examples
///
/// ```
/// use gridmark_core::{LineKey, LineType};
///
/// let edge = LineKey::new(5, 9, LineType::EdgeHorizontal).unwrap();
/// let pen = LineKey::new(5, 9, LineType::PenHorizontal).unwrap();
/// assert_ne!(edge, pen);
/// assert_eq!(pen.parts(), (5, 9, LineType::PenHorizontal));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct LineKey(u32);

impl LineKey {
    /// Packs a line starting at `(x, y)` into a key.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] if either coordinate exceeds
    /// [`MAX_COORD`](crate::MAX_COORD).
    pub fn new(x: u16, y: u16, line_type: LineType) -> Result<Self, CodecError> {
        let x = check_coord(Axis::Column, x)?;
        let y = check_coord(Axis::Row, y)?;
        Ok(Self(
            (u32::from(line_type.value()) << TYPE_SHIFT) | (y << Y_SHIFT) | x,
        ))
    }

    /// Reinterprets a raw integer as a key.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidLineKey`] if the discriminator bits do not
    /// name a [`LineType`].
    pub fn from_raw(raw: u32) -> Result<Self, CodecError> {
        #[allow(clippy::cast_possible_truncation)]
        let value = (raw >> TYPE_SHIFT) as u8;
        match LineType::from_value(value) {
            Ok(_) => Ok(Self(raw)),
            Err(_) => Err(CodecError::InvalidLineKey { raw }),
        }
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the x coordinate of the starting point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn x(self) -> u16 {
        (self.0 & COORD_MASK) as u16
    }

    /// Returns the y coordinate of the starting point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn y(self) -> u16 {
        ((self.0 >> Y_SHIFT) & COORD_MASK) as u16
    }

    /// Returns the line type.
    #[must_use]
    pub fn line_type(self) -> LineType {
        #[allow(clippy::cast_possible_truncation)]
        let value = (self.0 >> TYPE_SHIFT) as u8;
        // Keys are only built by `new` and `from_raw`, which both check the discriminator.
        match LineType::from_value(value) {
            Ok(line_type) => line_type,
            Err(_) => unreachable!("line key with invalid discriminator: {value}"),
        }
    }

    /// Unpacks the key into `(x, y, line_type)`.
    #[must_use]
    pub fn parts(self) -> (u16, u16, LineType) {
        (self.x(), self.y(), self.line_type())
    }
}

impl Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({}, {})", self.line_type(), self.x(), self.y())
    }
}

impl From<LineKey> for u32 {
    fn from(key: LineKey) -> u32 {
        key.get()
    }
}

impl TryFrom<u32> for LineKey {
    type Error = CodecError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

/// Packs a line starting at `(x, y)` into a [`LineKey`].
///
/// # Errors
///
/// Returns [`CodecError::OutOfRange`] if either coordinate exceeds
/// [`MAX_COORD`](crate::MAX_COORD).
pub fn encode_line(x: u16, y: u16, line_type: LineType) -> Result<LineKey, CodecError> {
    LineKey::new(x, y, line_type)
}

/// Unpacks a [`LineKey`] into `(x, y, line_type)`.
#[must_use]
pub fn decode_line(key: LineKey) -> (u16, u16, LineType) {
    key.parts()
}
