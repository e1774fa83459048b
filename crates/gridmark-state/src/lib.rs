//! Interaction state of a puzzle-grid editor.
//!
//! The UI layer translates each user gesture into an [`Action`] and hands it
//! to [`reduce`], a pure function from the current [`PuzzleState`] to the next
//! one. [`PuzzleStore`] wraps that loop for a session: it owns the state,
//! serialises queued actions and notifies subscribers after every change.
//!
//! # Overview
//!
//! - [`mode`]: the closed set of interaction [`Mode`]s and their exclusive
//!   [`ModeGroup`]s
//! - [`action`]: [`Action`] values (target, verb, payload) and their text form
//! - [`PuzzleState`]: active modes, [`Selection`] and per-cell [`Mark`]s,
//!   keyed by [`CellKey`](gridmark_core::CellKey)
//! - [`reduce`]: the state transition function
//! - [`store`]: [`PuzzleStore`], configured by [`PuzzleSettings`]
//!
//! # Examples
//!
//! ```
//! use gridmark_core::{Cell, encode_cell};
//! use gridmark_state::{Action, Mark, Mode, ModeGroup, PuzzleState, reduce};
//!
//! let mut state = PuzzleState::default();
//! for action in [
//!     Action::set_mode(Mode::Corner),
//!     Action::set_selection([Cell::new(2, 3)]),
//!     Action::push_digit("7"),
//! ] {
//!     state = reduce(&state, &action).unwrap();
//! }
//!
//! assert_eq!(state.mode(ModeGroup::ENTRY), Some(Mode::Corner));
//! assert_eq!(state.digits_at(encode_cell(2, 3).unwrap()), [Mark::from("7")]);
//! ```

pub mod action;
pub mod mode;
pub mod store;

mod reducer;
mod settings;
mod state;

pub use self::{
    action::{Action, ActionRequestQueue, ParseActionError, Payload, Target, Verb},
    mode::{ActiveModes, Mode, ModeError, ModeGroup, mode_group},
    reducer::{ReduceError, reduce},
    settings::{GridSize, PuzzleSettings},
    state::{DigitMap, Mark, PuzzleState, Selection},
    store::{PuzzleStore, StoreError, SubscriptionId},
};
