//! Interaction modes and the groups that keep them mutually exclusive.
//!
//! Every [`Mode`] belongs to exactly one [`ModeGroup`]. At most one mode per
//! group is active at a time, so activating a mode only displaces the active
//! mode of its own group: switching between corner and centre marks leaves
//! the pen untouched.

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
};

/// An interaction mode.
///
/// The set is closed; [`Mode::group`] is checked exhaustively at compile time.
///
/// # Examples
///
/// ```
/// use gridmark_state::{Mode, ModeGroup};
///
/// assert_eq!(Mode::Corner.group(), ModeGroup::ENTRY);
/// assert_eq!(Mode::Pen.group(), ModeGroup::PEN);
/// assert_eq!("colour".parse::<Mode>().unwrap(), Mode::Colour);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Plain cell selection and digit entry.
    Normal,
    /// Small marks in the cell corners.
    Corner,
    /// Small marks in the cell centre.
    Centre,
    /// Cell colouring.
    Colour,
    /// Freehand pen drawing on top of the grid.
    Pen,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Corner,
        Self::Centre,
        Self::Colour,
        Self::Pen,
    ];

    /// Returns the group this mode belongs to.
    #[must_use]
    pub const fn group(self) -> ModeGroup {
        match self {
            Self::Normal | Self::Corner | Self::Centre | Self::Colour => ModeGroup::ENTRY,
            Self::Pen => ModeGroup::PEN,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Corner => "corner",
            Self::Centre => "centre",
            Self::Colour => "colour",
            Self::Pen => "pen",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.to_ascii_lowercase().as_str() {
            "normal" => Self::Normal,
            "corner" => Self::Corner,
            "centre" | "center" => Self::Centre,
            "colour" | "color" => Self::Colour,
            "pen" => Self::Pen,
            _ => {
                return Err(ModeError::UnknownMode {
                    name: s.to_owned(),
                });
            }
        };
        Ok(mode)
    }
}

/// Looks up the group of a mode given by name.
///
/// # Errors
///
/// Returns [`ModeError::UnknownMode`] if `name` is not a mode.
pub fn mode_group(name: &str) -> Result<ModeGroup, ModeError> {
    Ok(name.parse::<Mode>()?.group())
}

/// Errors raised when a mode is looked up by name or a set of active modes
/// is rebuilt from a list.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ModeError {
    /// The name is outside the closed set of modes.
    #[display("unknown mode: {name:?}")]
    UnknownMode {
        /// The rejected name.
        name: String,
    },
    /// No mode of [`ModeGroup::ENTRY`] is active.
    #[display("no mode of {} is active", ModeGroup::ENTRY)]
    MissingEntryMode,
    /// Two modes of the same group are active.
    #[display("{first} and {second} are both active in {}", first.group())]
    GroupConflict {
        /// The mode listed first.
        first: Mode,
        /// The mode listed second.
        second: Mode,
    },
}

/// Identifier of a mutually exclusive family of modes.
///
/// Group ids are stable: new families get new ids, existing assignments
/// never move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeGroup(u8);

impl ModeGroup {
    /// Selection and digit/mark entry modes.
    pub const ENTRY: Self = Self(0);
    /// The freehand pen.
    pub const PEN: Self = Self(1);

    /// Returns the numeric group id.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }
}

impl Display for ModeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {}", self.0)
    }
}

/// The active mode of each group.
///
/// [`ModeGroup::ENTRY`] always has an active mode. A group without an entry
/// has no active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<Mode>", try_from = "Vec<Mode>"))]
pub struct ActiveModes {
    modes: BTreeMap<ModeGroup, Mode>,
}

impl ActiveModes {
    /// Creates a set with `mode` active.
    ///
    /// If `mode` is not an entry mode, [`Mode::Normal`] is active as well.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self::default().with(mode)
    }

    /// Returns the active mode of `group`, if any.
    #[must_use]
    pub fn get(&self, group: ModeGroup) -> Option<Mode> {
        self.modes.get(&group).copied()
    }

    /// Returns a copy with `mode` replacing the active mode of its group.
    #[must_use]
    pub fn with(&self, mode: Mode) -> Self {
        let mut modes = self.modes.clone();
        modes.insert(mode.group(), mode);
        Self { modes }
    }

    /// Iterates over the active modes in group order.
    pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ {
        self.modes.values().copied()
    }
}

impl Default for ActiveModes {
    fn default() -> Self {
        Self {
            modes: BTreeMap::from([(ModeGroup::ENTRY, Mode::Normal)]),
        }
    }
}

impl From<ActiveModes> for Vec<Mode> {
    fn from(modes: ActiveModes) -> Self {
        modes.iter().collect()
    }
}

impl TryFrom<Vec<Mode>> for ActiveModes {
    type Error = ModeError;

    fn try_from(list: Vec<Mode>) -> Result<Self, Self::Error> {
        let mut modes = BTreeMap::new();
        for mode in list {
            if let Some(first) = modes.insert(mode.group(), mode) {
                return Err(ModeError::GroupConflict {
                    first,
                    second: mode,
                });
            }
        }
        if !modes.contains_key(&ModeGroup::ENTRY) {
            return Err(ModeError::MissingEntryMode);
        }
        Ok(Self { modes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_has_a_stable_group() {
        for mode in Mode::ALL {
            let group = mode.group();
            assert!(group == ModeGroup::ENTRY || group == ModeGroup::PEN);
            assert_eq!(mode.group(), group);
        }
        assert_eq!(
            Mode::ALL
                .iter()
                .filter(|mode| mode.group() == ModeGroup::PEN)
                .count(),
            1
        );
        assert_eq!(ModeGroup::ENTRY.id(), 0);
        assert_eq!(ModeGroup::PEN.id(), 1);
    }

    #[test]
    fn test_parse_names() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>(), Ok(mode));
            assert_eq!(mode.to_string(), mode.name());
        }
        assert_eq!("Center".parse::<Mode>(), Ok(Mode::Centre));
        assert_eq!("color".parse::<Mode>(), Ok(Mode::Colour));
        assert_eq!(
            "eraser".parse::<Mode>(),
            Err(ModeError::UnknownMode {
                name: "eraser".to_owned()
            })
        );
    }

    #[test]
    fn test_mode_group_by_name() {
        assert_eq!(mode_group("pen"), Ok(ModeGroup::PEN));
        assert_eq!(mode_group("centre"), Ok(ModeGroup::ENTRY));
        assert!(mode_group("").is_err());
    }

    #[test]
    fn test_with_replaces_within_group_only() {
        let modes = ActiveModes::default();
        assert_eq!(modes.get(ModeGroup::ENTRY), Some(Mode::Normal));
        assert_eq!(modes.get(ModeGroup::PEN), None);

        let modes = modes.with(Mode::Pen).with(Mode::Corner);
        assert_eq!(modes.get(ModeGroup::ENTRY), Some(Mode::Corner));
        assert_eq!(modes.get(ModeGroup::PEN), Some(Mode::Pen));
        assert_eq!(modes.iter().collect::<Vec<_>>(), [Mode::Corner, Mode::Pen]);
    }

    #[test]
    fn test_new_keeps_an_entry_mode() {
        let modes = ActiveModes::new(Mode::Pen);
        assert_eq!(modes.get(ModeGroup::ENTRY), Some(Mode::Normal));
        assert_eq!(modes.get(ModeGroup::PEN), Some(Mode::Pen));
        assert_eq!(ActiveModes::new(Mode::Centre).iter().collect::<Vec<_>>(), [Mode::Centre]);
    }

    #[test]
    fn test_rebuild_from_list() {
        let modes = ActiveModes::default().with(Mode::Pen).with(Mode::Colour);
        assert_eq!(ActiveModes::try_from(Vec::from(modes.clone())), Ok(modes));
        assert_eq!(
            ActiveModes::try_from(vec![Mode::Pen]),
            Err(ModeError::MissingEntryMode)
        );
        assert_eq!(
            ActiveModes::try_from(vec![Mode::Corner, Mode::Pen, Mode::Centre]),
            Err(ModeError::GroupConflict {
                first: Mode::Corner,
                second: Mode::Centre
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_modes() {
        let modes = serde_json::from_str::<ActiveModes>(r#"["corner","pen"]"#).unwrap();
        assert_eq!(modes, ActiveModes::new(Mode::Corner).with(Mode::Pen));
        assert_eq!(serde_json::to_string(&modes).unwrap(), r#"["corner","pen"]"#);

        assert!(serde_json::from_str::<ActiveModes>(r#"["pen"]"#).is_err());
        assert!(serde_json::from_str::<ActiveModes>("[]").is_err());
        assert!(serde_json::from_str::<ActiveModes>(r#"["normal","colour"]"#).is_err());
    }
}
