use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Bound,
};

use gridmark_core::{Cell, CellKey};

use crate::{ActiveModes, Mode, ModeGroup};

/// A single digit or mark entered into a cell.
///
/// The reducer treats marks as opaque values and only compares them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display, derive_more::From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Mark(String);

impl Mark {
    /// Creates a mark.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the mark text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Mark {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Mark {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Marks entered per cell.
///
/// Cells without marks have no entry, so two states holding the same marks
/// always compare equal.
pub type DigitMap = BTreeMap<CellKey, Vec<Mark>>;

/// The set of selected cells and the primary cell among them.
///
/// Cells are kept in key order. The primary cell is always a member of the
/// selection and is `None` only when the selection is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SelectionRepr"))]
pub struct Selection {
    cells: BTreeSet<CellKey>,
    primary: Option<CellKey>,
}

impl Selection {
    /// Creates a selection of `keys` whose primary cell is the smallest key.
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = CellKey>) -> Self {
        let cells = keys.into_iter().collect::<BTreeSet<_>>();
        let primary = cells.first().copied();
        Self { cells, primary }
    }

    /// Returns `true` if no cell is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the number of selected cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the cell with `key` is selected.
    #[must_use]
    pub fn contains(&self, key: CellKey) -> bool {
        self.cells.contains(&key)
    }

    /// Returns the primary cell.
    #[must_use]
    pub fn primary(&self) -> Option<CellKey> {
        self.primary
    }

    /// Iterates over the selected keys in key (row-major) order.
    pub fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.iter().copied()
    }

    /// Iterates over the selected cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.keys().map(CellKey::cell)
    }

    /// Returns a copy whose primary cell is the next selected cell in key
    /// order, wrapping around after the last one.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let primary = self.primary.and_then(|current| {
            self.cells
                .range((Bound::Excluded(current), Bound::Unbounded))
                .next()
                .or_else(|| self.cells.first())
                .copied()
        });
        Self {
            cells: self.cells.clone(),
            primary,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SelectionRepr {
    cells: BTreeSet<CellKey>,
    primary: Option<CellKey>,
}

#[cfg(feature = "serde")]
#[derive(Debug, derive_more::Display, derive_more::Error)]
enum InvalidSelection {
    #[display("primary cell {primary} is not selected")]
    PrimaryNotSelected { primary: CellKey },
    #[display("non-empty selection has no primary cell")]
    MissingPrimary,
}

#[cfg(feature = "serde")]
impl TryFrom<SelectionRepr> for Selection {
    type Error = InvalidSelection;

    fn try_from(repr: SelectionRepr) -> Result<Self, Self::Error> {
        let SelectionRepr { cells, primary } = repr;
        match primary {
            Some(primary) if !cells.contains(&primary) => {
                Err(InvalidSelection::PrimaryNotSelected { primary })
            }
            None if !cells.is_empty() => Err(InvalidSelection::MissingPrimary),
            _ => Ok(Self { cells, primary }),
        }
    }
}

/// The interaction state of one puzzle session.
///
/// Values are never modified in place; every change produces a new state via
/// the `with_*` constructors, which is what [`reduce`](crate::reduce) does.
///
/// # Examples
///
/// ```
/// use gridmark_state::{Mode, ModeGroup, PuzzleState};
///
/// let state = PuzzleState::default();
/// assert_eq!(state.mode(ModeGroup::ENTRY), Some(Mode::Normal));
/// assert!(state.selection().is_empty());
/// assert!(state.digits().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "PuzzleStateRepr"))]
pub struct PuzzleState {
    modes: ActiveModes,
    selection: Selection,
    digits: DigitMap,
}

impl PuzzleState {
    /// Creates an empty state with `initial_mode` active.
    #[must_use]
    pub fn new(initial_mode: Mode) -> Self {
        Self {
            modes: ActiveModes::new(initial_mode),
            selection: Selection::default(),
            digits: DigitMap::new(),
        }
    }

    /// Returns the active modes.
    #[must_use]
    pub fn modes(&self) -> &ActiveModes {
        &self.modes
    }

    /// Returns the active mode of `group`.
    #[must_use]
    pub fn mode(&self, group: ModeGroup) -> Option<Mode> {
        self.modes.get(group)
    }

    /// Returns the selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns all entered marks.
    #[must_use]
    pub fn digits(&self) -> &DigitMap {
        &self.digits
    }

    /// Returns the marks entered into the cell with `key`.
    #[must_use]
    pub fn digits_at(&self, key: CellKey) -> &[Mark] {
        self.digits.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns a copy with the active modes replaced.
    #[must_use]
    pub fn with_modes(&self, modes: ActiveModes) -> Self {
        Self {
            modes,
            selection: self.selection.clone(),
            digits: self.digits.clone(),
        }
    }

    /// Returns a copy with the selection replaced.
    #[must_use]
    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            modes: self.modes.clone(),
            selection,
            digits: self.digits.clone(),
        }
    }

    /// Returns a copy with the marks replaced.
    ///
    /// Cells mapped to an empty list are dropped.
    #[must_use]
    pub fn with_digits(&self, mut digits: DigitMap) -> Self {
        digits.retain(|_, marks| !marks.is_empty());
        Self {
            modes: self.modes.clone(),
            selection: self.selection.clone(),
            digits,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PuzzleStateRepr {
    modes: ActiveModes,
    selection: Selection,
    digits: DigitMap,
}

#[cfg(feature = "serde")]
impl From<PuzzleStateRepr> for PuzzleState {
    fn from(repr: PuzzleStateRepr) -> Self {
        let state = Self {
            modes: repr.modes,
            selection: repr.selection,
            digits: DigitMap::new(),
        };
        state.with_digits(repr.digits)
    }
}
