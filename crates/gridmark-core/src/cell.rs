//! Grid cells and their packed integer keys.

use std::fmt::{self, Display};

use crate::{Axis, COORD_BITS, CodecError, MAX_COORD};

const COORD_MASK: u32 = (1 << COORD_BITS) - 1;
const ROW_SHIFT: u32 = COORD_BITS;
const CELL_KEY_BITS: u32 = 2 * COORD_BITS;

/// A position on the puzzle grid.
///
/// `col` grows to the right and `row` grows downwards. A `Cell` can hold any
/// `u16` pair; only cells whose coordinates are at most [`MAX_COORD`] can be
/// turned into a [`CellKey`].
///
/// # Examples
///
/// ```
/// use gridmark_core::Cell;
///
/// let cell = Cell::new(2, 3);
/// assert_eq!(cell.col(), 2);
/// assert_eq!(cell.row(), 3);
/// assert_eq!(cell.to_string(), "(2, 3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    col: u16,
    row: u16,
}

impl Cell {
    /// Creates a cell from a column and a row.
    #[must_use]
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Returns the column (x coordinate).
    #[must_use]
    pub const fn col(self) -> u16 {
        self.col
    }

    /// Returns the row (y coordinate).
    #[must_use]
    pub const fn row(self) -> u16 {
        self.row
    }

    /// Packs this cell into a [`CellKey`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] if either coordinate exceeds [`MAX_COORD`].
    pub fn key(self) -> Result<CellKey, CodecError> {
        CellKey::new(self)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A cell packed into a single integer.
///
/// The column occupies the low [`COORD_BITS`] bits and the row the next
/// [`COORD_BITS`] bits, so comparing keys orders cells row-major.
///
/// # Examples
///
/// ```
/// use gridmark_core::{Cell, CellKey};
///
/// let a = Cell::new(8, 0).key().unwrap();
/// let b = Cell::new(0, 1).key().unwrap();
/// assert!(a < b);
/// assert_eq!(b.cell(), Cell::new(0, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct CellKey(u32);

impl CellKey {
    /// Packs `cell` into a key.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] if either coordinate exceeds [`MAX_COORD`].
    pub fn new(cell: Cell) -> Result<Self, CodecError> {
        let col = check_coord(Axis::Column, cell.col)?;
        let row = check_coord(Axis::Row, cell.row)?;
        Ok(Self((row << ROW_SHIFT) | col))
    }

    /// Reinterprets a raw integer as a key.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCellKey`] if `raw` has bits set above the
    /// cell key width.
    pub const fn from_raw(raw: u32) -> Result<Self, CodecError> {
        if raw >> CELL_KEY_BITS != 0 {
            return Err(CodecError::InvalidCellKey { raw });
        }
        Ok(Self(raw))
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Unpacks the key back into a [`Cell`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn cell(self) -> Cell {
        Cell::new(
            (self.0 & COORD_MASK) as u16,
            ((self.0 >> ROW_SHIFT) & COORD_MASK) as u16,
        )
    }
}

impl Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.cell(), f)
    }
}

impl From<CellKey> for u32 {
    fn from(key: CellKey) -> u32 {
        key.get()
    }
}

impl TryFrom<u32> for CellKey {
    type Error = CodecError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<CellKey> for Cell {
    fn from(key: CellKey) -> Cell {
        key.cell()
    }
}

impl TryFrom<Cell> for CellKey {
    type Error = CodecError;

    fn try_from(cell: Cell) -> Result<Self, Self::Error> {
        Self::new(cell)
    }
}

pub(crate) fn check_coord(axis: Axis, value: u16) -> Result<u32, CodecError> {
    if value > MAX_COORD {
        return Err(CodecError::OutOfRange { axis, value });
    }
    Ok(u32::from(value))
}

/// Packs `(col, row)` into a [`CellKey`].
///
/// # Errors
///
/// Returns [`CodecError::OutOfRange`] if either coordinate exceeds [`MAX_COORD`].
pub fn encode_cell(col: u16, row: u16) -> Result<CellKey, CodecError> {
    CellKey::new(Cell::new(col, row))
}

/// Unpacks a [`CellKey`] into `(col, row)`.
#[must_use]
pub const fn decode_cell(key: CellKey) -> (u16, u16) {
    let cell = key.cell();
    (cell.col, cell.row)
}

/// Compares two cells by position, without encoding them.
#[must_use]
pub const fn cells_equal(a: Cell, b: Cell) -> bool {
    a.col == b.col && a.row == b.row
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_key_layout_is_row_major() {
        assert_eq!(encode_cell(0, 0).unwrap().get(), 0);
        assert_eq!(encode_cell(1, 0).unwrap().get(), 1);
        assert_eq!(encode_cell(0, 1).unwrap().get(), 1 << COORD_BITS);
        assert!(encode_cell(MAX_COORD, 0).unwrap() < encode_cell(0, 1).unwrap());
        assert_eq!(decode_cell(encode_cell(2, 3).unwrap()), (2, 3));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(encode_cell(MAX_COORD, MAX_COORD).is_ok());
        assert_eq!(
            encode_cell(MAX_COORD + 1, 0),
            Err(CodecError::OutOfRange {
                axis: Axis::Column,
                value: MAX_COORD + 1
            })
        );
        assert_eq!(
            Cell::new(0, u16::MAX).key(),
            Err(CodecError::OutOfRange {
                axis: Axis::Row,
                value: u16::MAX
            })
        );
    }

    #[test]
    fn test_from_raw() {
        let key = encode_cell(7, 11).unwrap();
        assert_eq!(CellKey::from_raw(key.get()), Ok(key));
        assert_eq!(
            CellKey::from_raw(1 << CELL_KEY_BITS),
            Err(CodecError::InvalidCellKey {
                raw: 1 << CELL_KEY_BITS
            })
        );
    }

    #[test]
    fn test_cells_equal() {
        assert!(cells_equal(Cell::new(1, 2), Cell::new(1, 2)));
        assert!(!cells_equal(Cell::new(1, 2), Cell::new(2, 1)));
        assert_eq!(
            cells_equal(Cell::new(4, 4), Cell::new(4, 5)),
            Cell::new(4, 4) == Cell::new(4, 5)
        );
    }

    proptest! {
        #[test]
        fn prop_round_trip(col in 0..=MAX_COORD, row in 0..=MAX_COORD) {
            let key = encode_cell(col, row).unwrap();
            prop_assert_eq!(decode_cell(key), (col, row));
            prop_assert_eq!(CellKey::from_raw(key.get()), Ok(key));
        }

        #[test]
        fn prop_injective(
            a in (0..=MAX_COORD, 0..=MAX_COORD),
            b in (0..=MAX_COORD, 0..=MAX_COORD),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(encode_cell(a.0, a.1).unwrap(), encode_cell(b.0, b.1).unwrap());
        }

        #[test]
        fn prop_key_order_is_row_major(
            a in (0..=MAX_COORD, 0..=MAX_COORD),
            b in (0..=MAX_COORD, 0..=MAX_COORD),
        ) {
            let ka = encode_cell(a.0, a.1).unwrap();
            let kb = encode_cell(b.0, b.1).unwrap();
            prop_assert_eq!(ka.cmp(&kb), (a.1, a.0).cmp(&(b.1, b.0)));
        }
    }
}
