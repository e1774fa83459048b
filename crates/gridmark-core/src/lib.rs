//! Coordinate codec for puzzle grids.
//!
//! Grid cells and line segments are used as map and set keys throughout an
//! editor. This crate packs them into single integers so that lookups compare
//! one word and iteration over a sorted collection of keys is deterministic.
//!
//! # Overview
//!
//! - [`cell`]: [`Cell`] positions and their [`CellKey`] packing (row-major order)
//! - [`line`]: [`LineKey`] packing of a grid point plus a [`LineType`] discriminator
//!
//! Each axis reserves [`COORD_BITS`] bits, so coordinates `0..=MAX_COORD` are
//! supported. Encoding a larger coordinate fails with
//! [`CodecError::OutOfRange`]; nothing is silently truncated.
//!
//! # Examples
//!
//! ```
//! use gridmark_core::{Cell, LineType, decode_cell, encode_cell, encode_line};
//!
//! let key = encode_cell(2, 3).unwrap();
//! assert_eq!(decode_cell(key), (2, 3));
//! assert_eq!(key.cell(), Cell::new(2, 3));
//!
//! let edge = encode_line(5, 9, LineType::EdgeHorizontal).unwrap();
//! let pen = encode_line(5, 9, LineType::PenHorizontal).unwrap();
//! assert_ne!(edge, pen);
//!
//! assert!(encode_cell(4096, 0).is_err());
//! ```

pub mod cell;
pub mod line;

mod error;

pub use self::{
    cell::{Cell, CellKey, cells_equal, decode_cell, encode_cell},
    error::{Axis, CodecError},
    line::{LineKey, LineType, decode_line, encode_line},
};

/// Number of bits reserved for each coordinate axis.
pub const COORD_BITS: u32 = 12;

/// Largest coordinate that can be encoded on either axis.
pub const MAX_COORD: u16 = (1 << COORD_BITS) - 1;
