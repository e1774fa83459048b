//! Actions: immutable instructions for the reducer.
//!
//! An [`Action`] names a [`Target`], a [`Verb`] and a [`Payload`]. Not every
//! combination is meaningful; [`is_supported`] lists the ones the reducer
//! accepts.
//!
//! Actions also have a one-line text form used by scripts and logs:
//!
//! ```text
//! mode set corner
//! selection set 2,3 4,3
//! digits push 7
//! digits set 1 2
//! selection rotate
//! ```
//!
//! A mark that is empty, holds whitespace or starts with `"` is written in
//! double quotes, with `\"` and `\\` escaping a quote and a backslash:
//! `digits push "a b"`.

use std::{
    fmt::{self, Display, Write as _},
    mem,
    str::FromStr,
};

use gridmark_core::Cell;

use crate::{Mark, Mode, ModeError};

/// The part of the state an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Target {
    /// The active modes.
    Mode,
    /// The marks of the selected cells.
    Digits,
    /// The selected cells.
    Selection,
}

impl Target {
    const fn name(self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Digits => "digits",
            Self::Selection => "selection",
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an action does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Verb {
    /// Replace the value.
    Set,
    /// Append to the value.
    Push,
    /// Empty the value.
    Clear,
    /// Remove one entry from the value.
    Remove,
    /// Cycle the primary entry.
    Rotate,
}

impl Verb {
    const fn name(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Push => "push",
            Self::Clear => "clear",
            Self::Remove => "remove",
            Self::Rotate => "rotate",
        }
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns `true` if the reducer accepts `verb` applied to `target`.
#[must_use]
pub const fn is_supported(target: Target, verb: Verb) -> bool {
    matches!(
        (target, verb),
        (Target::Mode, Verb::Set)
            | (
                Target::Digits,
                Verb::Set | Verb::Push | Verb::Remove | Verb::Clear
            )
            | (Target::Selection, Verb::Set | Verb::Clear | Verb::Rotate)
    )
}

/// The argument of an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    /// No argument (`clear`, `rotate`).
    None,
    /// A mode to activate.
    Mode(Mode),
    /// A single mark to push or remove.
    Mark(Mark),
    /// The full mark list of a `digits set`.
    Marks(Vec<Mark>),
    /// The cells of a `selection set`.
    Cells(Vec<Cell>),
}

/// An instruction for [`reduce`](crate::reduce).
///
/// # Examples
///
/// ```
/// use gridmark_state::{Action, Mode, Target, Verb};
///
/// let action: Action = "mode set corner".parse().unwrap();
/// assert_eq!(action, Action::set_mode(Mode::Corner));
/// assert_eq!(action.target(), Target::Mode);
/// assert_eq!(action.verb(), Verb::Set);
/// assert_eq!(action.to_string(), "mode set corner");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    target: Target,
    verb: Verb,
    payload: Payload,
}

impl Action {
    /// Creates an action from its parts, supported or not.
    #[must_use]
    pub fn new(target: Target, verb: Verb, payload: Payload) -> Self {
        Self {
            target,
            verb,
            payload,
        }
    }

    /// `mode set <mode>`
    #[must_use]
    pub fn set_mode(mode: Mode) -> Self {
        Self::new(Target::Mode, Verb::Set, Payload::Mode(mode))
    }

    /// `digits set <marks>`
    #[must_use]
    pub fn set_digits<I>(marks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Mark>,
    {
        let marks = marks.into_iter().map(Into::into).collect();
        Self::new(Target::Digits, Verb::Set, Payload::Marks(marks))
    }

    /// `digits push <mark>`
    #[must_use]
    pub fn push_digit(mark: impl Into<Mark>) -> Self {
        Self::new(Target::Digits, Verb::Push, Payload::Mark(mark.into()))
    }

    /// `digits remove <mark>`
    #[must_use]
    pub fn remove_digit(mark: impl Into<Mark>) -> Self {
        Self::new(Target::Digits, Verb::Remove, Payload::Mark(mark.into()))
    }

    /// `digits clear`
    #[must_use]
    pub fn clear_digits() -> Self {
        Self::new(Target::Digits, Verb::Clear, Payload::None)
    }

    /// `selection set <cells>`
    #[must_use]
    pub fn set_selection(cells: impl IntoIterator<Item = Cell>) -> Self {
        let cells = cells.into_iter().collect();
        Self::new(Target::Selection, Verb::Set, Payload::Cells(cells))
    }

    /// `selection clear`
    #[must_use]
    pub fn clear_selection() -> Self {
        Self::new(Target::Selection, Verb::Clear, Payload::None)
    }

    /// `selection rotate`
    #[must_use]
    pub fn rotate_selection() -> Self {
        Self::new(Target::Selection, Verb::Rotate, Payload::None)
    }

    /// Returns the target.
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    /// Returns the verb.
    #[must_use]
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Returns the payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.verb)?;
        match &self.payload {
            Payload::None => {}
            Payload::Mode(mode) => write!(f, " {mode}")?,
            Payload::Mark(mark) => write_mark(f, mark)?,
            Payload::Marks(marks) => {
                for mark in marks {
                    write_mark(f, mark)?;
                }
            }
            Payload::Cells(cells) => {
                for cell in cells {
                    write!(f, " {},{}", cell.col(), cell.row())?;
                }
            }
        }
        Ok(())
    }
}

fn write_mark(f: &mut fmt::Formatter<'_>, mark: &Mark) -> fmt::Result {
    let text = mark.as_str();
    let bare =
        !text.is_empty() && !text.starts_with('"') && !text.contains(char::is_whitespace);
    if bare {
        return write!(f, " {text}");
    }
    f.write_str(" \"")?;
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

/// Errors raised when parsing the text form of an action.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParseActionError {
    /// The line holds no words.
    #[display("empty action")]
    Empty,
    /// The first word is not a target.
    #[display("unknown target: {word:?}")]
    UnknownTarget {
        /// The rejected word.
        word: String,
    },
    /// The line ends after the target.
    #[display("missing verb after `{target}`")]
    MissingVerb {
        /// Target of the action.
        target: Target,
    },
    /// The second word is not a verb.
    #[display("unknown verb: {word:?}")]
    UnknownVerb {
        /// The rejected word.
        word: String,
    },
    /// The action needs a payload but none was given.
    #[display("missing payload for `{target} {verb}`")]
    MissingPayload {
        /// Target of the action.
        target: Target,
        /// Verb of the action.
        verb: Verb,
    },
    /// The action takes no (or less) payload than was given.
    #[display("unexpected payload for `{target} {verb}`: {word:?}")]
    UnexpectedPayload {
        /// Target of the action.
        target: Target,
        /// Verb of the action.
        verb: Verb,
        /// The first surplus word.
        word: String,
    },
    /// A quoted word is not closed, or is followed by more text.
    #[display("malformed quoted word: {word}")]
    InvalidQuote {
        /// The rest of the line from the opening quote.
        word: String,
    },
    /// A cell is not written as `col,row`.
    #[display("invalid cell: {word:?}")]
    InvalidCell {
        /// The rejected word.
        word: String,
    },
    /// The mode name is unknown.
    #[display("{_0}")]
    #[from]
    Mode(ModeError),
}

impl FromStr for Target {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mode" => Ok(Self::Mode),
            "digits" => Ok(Self::Digits),
            "selection" => Ok(Self::Selection),
            _ => Err(ParseActionError::UnknownTarget { word: s.to_owned() }),
        }
    }
}

impl FromStr for Verb {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "push" => Ok(Self::Push),
            "clear" => Ok(Self::Clear),
            "remove" => Ok(Self::Remove),
            "rotate" => Ok(Self::Rotate),
            _ => Err(ParseActionError::UnknownVerb { word: s.to_owned() }),
        }
    }
}

fn split_words(line: &str) -> Result<Vec<String>, ParseActionError> {
    let mut words = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        let (word, tail) = match rest.strip_prefix('"') {
            Some(quoted) => {
                split_quoted(quoted).ok_or_else(|| ParseActionError::InvalidQuote {
                    word: rest.trim_end().to_owned(),
                })?
            }
            None => {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                (rest[..end].to_owned(), &rest[end..])
            }
        };
        words.push(word);
        rest = tail.trim_start();
    }
    Ok(words)
}

/// Unescapes a quoted word whose opening quote is already stripped.
///
/// The closing quote must end the word.
fn split_quoted(s: &str) -> Option<(String, &str)> {
    let mut word = String::new();
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => word.push(chars.next()?.1),
            '"' => {
                let tail = &s[i + 1..];
                return tail
                    .chars()
                    .next()
                    .is_none_or(char::is_whitespace)
                    .then_some((word, tail));
            }
            _ => word.push(c),
        }
    }
    None
}

fn parse_cell(word: &str) -> Result<Cell, ParseActionError> {
    let invalid = || ParseActionError::InvalidCell {
        word: word.to_owned(),
    };
    let (col, row) = word.split_once(',').ok_or_else(invalid)?;
    let col = col.trim().parse().map_err(|_| invalid())?;
    let row = row.trim().parse().map_err(|_| invalid())?;
    Ok(Cell::new(col, row))
}

impl FromStr for Action {
    type Err = ParseActionError;

    /// Parses `<target> <verb> [payload...]`.
    ///
    /// Unsupported target/verb pairs without a payload parse successfully;
    /// the reducer rejects them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = split_words(s)?.into_iter();
        let target = words
            .next()
            .ok_or(ParseActionError::Empty)?
            .parse::<Target>()?;
        let verb = words
            .next()
            .ok_or(ParseActionError::MissingVerb { target })?
            .parse::<Verb>()?;
        let rest = words.collect::<Vec<_>>();
        let unexpected = |word: &str| ParseActionError::UnexpectedPayload {
            target,
            verb,
            word: word.to_owned(),
        };

        let payload = match (target, verb, rest.as_slice()) {
            (Target::Mode, Verb::Set, [mode]) => Payload::Mode(mode.parse::<Mode>()?),
            (Target::Mode, Verb::Set, [_, extra, ..])
            | (Target::Digits, Verb::Push | Verb::Remove, [_, extra, ..]) => {
                return Err(unexpected(extra.as_str()));
            }
            (Target::Digits, Verb::Push | Verb::Remove, [mark]) => {
                Payload::Mark(Mark::new(mark.clone()))
            }
            (Target::Digits, Verb::Set, marks) => {
                Payload::Marks(marks.iter().cloned().map(Mark::new).collect())
            }
            (Target::Selection, Verb::Set, cells) => Payload::Cells(
                cells
                    .iter()
                    .map(|cell| parse_cell(cell))
                    .collect::<Result<_, _>>()?,
            ),
            (Target::Mode, Verb::Set, [])
            | (Target::Digits, Verb::Push | Verb::Remove, []) => {
                return Err(ParseActionError::MissingPayload { target, verb });
            }
            (_, _, []) => Payload::None,
            (_, _, [word, ..]) => return Err(unexpected(word.as_str())),
        };
        Ok(Self::new(target, verb, payload))
    }
}

/// Actions waiting to be applied, in the order they were requested.
#[derive(Debug, Default)]
pub struct ActionRequestQueue {
    actions: Vec<Action>,
}

impl ActionRequestQueue {
    /// Appends `action` to the queue.
    pub fn request(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Removes and returns every queued action.
    pub fn take_all(&mut self) -> Vec<Action> {
        mem::take(&mut self.actions)
    }

    /// Puts `actions` back in front of the queue, keeping their order.
    pub fn restore_front(&mut self, actions: impl IntoIterator<Item = Action>) {
        let mut restored = actions.into_iter().collect::<Vec<_>>();
        restored.append(&mut self.actions);
        self.actions = restored;
    }

    /// Drops every queued action.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Returns the number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
