use gridmark_core::{Cell, CellKey, CodecError};

use crate::{
    Action, Mark, Payload, PuzzleState, Selection, Target, Verb, action::is_supported,
    state::DigitMap,
};

/// Errors returned by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ReduceError {
    /// The target/verb pair is not handled by the reducer.
    #[display("unsupported action: `{target} {verb}`")]
    UnsupportedAction {
        /// Target of the action.
        target: Target,
        /// Verb of the action.
        verb: Verb,
    },
    /// The pair is supported but the payload has the wrong kind.
    #[display("payload does not fit `{target} {verb}`")]
    PayloadMismatch {
        /// Target of the action.
        target: Target,
        /// Verb of the action.
        verb: Verb,
    },
    /// A cell of the action cannot be encoded.
    #[display("{_0}")]
    #[from]
    Codec(CodecError),
}

/// Applies `action` to `state` and returns the resulting state.
///
/// `state` is left untouched; on error the caller keeps it. Equal inputs
/// always produce equal outputs.
///
/// | target    | verb   | effect                                                        |
/// |-----------|--------|---------------------------------------------------------------|
/// | mode      | set    | replaces the active mode of the given mode's group            |
/// | digits    | set    | replaces the marks of every selected cell                     |
/// | digits    | push   | appends a mark to every selected cell unless already present  |
/// | digits    | remove | removes a mark from every selected cell, if present           |
/// | digits    | clear  | removes all marks from every selected cell                    |
/// | selection | set    | selects exactly the given cells, primary = smallest key       |
/// | selection | clear  | deselects everything                                          |
/// | selection | rotate | moves the primary cell to the next selected cell in key order |
///
/// # Errors
///
/// Returns [`ReduceError::UnsupportedAction`] for pairs outside the table,
/// [`ReduceError::PayloadMismatch`] for a payload of the wrong kind, and
/// [`ReduceError::Codec`] if a cell to select cannot be encoded.
///
/// # Examples
///
/// ```
/// use gridmark_core::{Cell, encode_cell};
/// use gridmark_state::{Action, Mark, PuzzleState, reduce};
///
/// let state = PuzzleState::default();
/// let state = reduce(&state, &Action::set_selection([Cell::new(2, 3)])).unwrap();
/// let state = reduce(&state, &Action::push_digit("7")).unwrap();
/// assert_eq!(state.digits_at(encode_cell(2, 3).unwrap()), [Mark::from("7")]);
/// ```
pub fn reduce(state: &PuzzleState, action: &Action) -> Result<PuzzleState, ReduceError> {
    let (target, verb) = (action.target(), action.verb());
    if !is_supported(target, verb) {
        return Err(ReduceError::UnsupportedAction { target, verb });
    }

    let next = match (target, verb, action.payload()) {
        (Target::Mode, Verb::Set, Payload::Mode(mode)) => {
            state.with_modes(state.modes().with(*mode))
        }
        (Target::Digits, Verb::Set, Payload::Marks(marks)) => {
            update_selected_digits(state, |entry| {
                entry.clear();
                for mark in marks {
                    push_unique(entry, mark);
                }
            })
        }
        (Target::Digits, Verb::Push, Payload::Mark(mark)) => {
            update_selected_digits(state, |entry| push_unique(entry, mark))
        }
        (Target::Digits, Verb::Remove, Payload::Mark(mark)) => {
            update_selected_digits(state, |entry| {
                if let Some(index) = entry.iter().position(|m| m == mark) {
                    entry.remove(index);
                }
            })
        }
        (Target::Digits, Verb::Clear, Payload::None) => update_selected_digits(state, Vec::clear),
        (Target::Selection, Verb::Set, Payload::Cells(cells)) => {
            let keys = cells
                .iter()
                .map(|cell| Cell::key(*cell))
                .collect::<Result<Vec<CellKey>, _>>()?;
            state.with_selection(Selection::from_keys(keys))
        }
        (Target::Selection, Verb::Clear, Payload::None) => {
            state.with_selection(Selection::default())
        }
        (Target::Selection, Verb::Rotate, Payload::None) => {
            state.with_selection(state.selection().rotated())
        }
        _ => return Err(ReduceError::PayloadMismatch { target, verb }),
    };
    Ok(next)
}

fn push_unique(entry: &mut Vec<Mark>, mark: &Mark) {
    if !entry.contains(mark) {
        entry.push(mark.clone());
    }
}

fn update_selected_digits<F>(state: &PuzzleState, mut f: F) -> PuzzleState
where
    F: FnMut(&mut Vec<Mark>),
{
    let mut digits: DigitMap = state.digits().clone();
    for key in state.selection().keys() {
        let entry = digits.entry(key).or_default();
        f(entry);
    }
    state.with_digits(digits)
}

#[cfg(test)]
mod tests {
    use gridmark_core::{Axis, MAX_COORD, encode_cell};
    use proptest::prelude::*;

    use super::*;
    use crate::{Mode, ModeGroup};

    fn key(col: u16, row: u16) -> CellKey {
        encode_cell(col, row).unwrap()
    }

    fn apply(state: &PuzzleState, actions: &[Action]) -> PuzzleState {
        actions.iter().fold(state.clone(), |state, action| {
            reduce(&state, action).unwrap()
        })
    }

    fn scenario_a() -> PuzzleState {
        apply(
            &PuzzleState::default(),
            &[
                Action::set_selection([Cell::new(2, 3)]),
                Action::push_digit("7"),
            ],
        )
    }

    #[test]
    fn test_push_digit_into_selected_cell() {
        let state = scenario_a();
        assert_eq!(state.digits().len(), 1);
        assert_eq!(state.digits_at(key(2, 3)), [Mark::from("7")]);
        assert_eq!(state.mode(ModeGroup::ENTRY), Some(Mode::Normal));
    }

    #[test]
    fn test_remove_digit_empties_payload() {
        let state = reduce(&scenario_a(), &Action::remove_digit("7")).unwrap();
        assert!(state.digits_at(key(2, 3)).is_empty());
        assert!(state.digits().is_empty());
    }

    #[test]
    fn test_mode_set_replaces_within_group() {
        let state = apply(
            &PuzzleState::default(),
            &[Action::set_mode(Mode::Corner), Action::set_mode(Mode::Colour)],
        );
        assert_eq!(state.mode(ModeGroup::ENTRY), Some(Mode::Colour));
        assert_eq!(state.mode(ModeGroup::PEN), None);

        let state = apply(
            &PuzzleState::default(),
            &[
                Action::set_mode(Mode::Pen),
                Action::set_mode(Mode::Corner),
                Action::set_mode(Mode::Colour),
            ],
        );
        assert_eq!(state.mode(ModeGroup::ENTRY), Some(Mode::Colour));
        assert_eq!(state.mode(ModeGroup::PEN), Some(Mode::Pen));
    }

    #[test]
    fn test_push_is_deduplicated_and_ordered() {
        let state = apply(
            &scenario_a(),
            &[
                Action::push_digit("3"),
                Action::push_digit("7"),
                Action::push_digit("1"),
            ],
        );
        assert_eq!(
            state.digits_at(key(2, 3)),
            [Mark::from("7"), Mark::from("3"), Mark::from("1")]
        );
    }

    #[test]
    fn test_digits_apply_to_every_selected_cell() {
        let state = apply(
            &PuzzleState::default(),
            &[
                Action::set_selection([Cell::new(0, 0), Cell::new(1, 0)]),
                Action::set_digits(["4", "4", "5"]),
                Action::set_selection([Cell::new(1, 0), Cell::new(2, 0)]),
                Action::push_digit("6"),
            ],
        );
        assert_eq!(
            state.digits_at(key(0, 0)),
            [Mark::from("4"), Mark::from("5")]
        );
        assert_eq!(
            state.digits_at(key(1, 0)),
            [Mark::from("4"), Mark::from("5"), Mark::from("6")]
        );
        assert_eq!(state.digits_at(key(2, 0)), [Mark::from("6")]);

        let state = reduce(&state, &Action::clear_digits()).unwrap();
        assert_eq!(state.digits().len(), 1);
        assert_eq!(
            state.digits_at(key(0, 0)),
            [Mark::from("4"), Mark::from("5")]
        );
    }

    #[test]
    fn test_digits_without_selection_are_noop() {
        let state = PuzzleState::default();
        for action in [
            Action::push_digit("1"),
            Action::set_digits(["1"]),
            Action::remove_digit("1"),
            Action::clear_digits(),
        ] {
            assert_eq!(reduce(&state, &action).unwrap(), state);
        }
    }

    #[test]
    fn test_set_digits_overwrites_and_empty_set_clears() {
        let state = apply(&scenario_a(), &[Action::set_digits(["9"])]);
        assert_eq!(state.digits_at(key(2, 3)), [Mark::from("9")]);

        let state = reduce(&state, &Action::set_digits(Vec::<Mark>::new())).unwrap();
        assert!(state.digits().is_empty());
    }

    #[test]
    fn test_selection_set_clear_and_rotate() {
        let state = apply(
            &PuzzleState::default(),
            &[Action::set_selection([
                Cell::new(3, 1),
                Cell::new(0, 2),
                Cell::new(5, 0),
            ])],
        );
        assert_eq!(state.selection().primary(), Some(key(5, 0)));

        let rotated = reduce(&state, &Action::rotate_selection()).unwrap();
        assert_eq!(rotated.selection().primary(), Some(key(3, 1)));
        assert!(rotated.selection().keys().eq(state.selection().keys()));

        let cleared = reduce(&rotated, &Action::clear_selection()).unwrap();
        assert!(cleared.selection().is_empty());
        assert_eq!(cleared.selection().primary(), None);
    }

    #[test]
    fn test_unsupported_and_mismatched_actions_are_rejected() {
        let state = scenario_a();
        for (target, verb) in [
            (Target::Mode, Verb::Clear),
            (Target::Mode, Verb::Push),
            (Target::Digits, Verb::Rotate),
            (Target::Selection, Verb::Push),
            (Target::Selection, Verb::Remove),
        ] {
            let action = Action::new(target, verb, Payload::None);
            assert_eq!(
                reduce(&state, &action),
                Err(ReduceError::UnsupportedAction { target, verb })
            );
        }

        let action = Action::new(Target::Digits, Verb::Push, Payload::Mode(Mode::Pen));
        assert_eq!(
            reduce(&state, &action),
            Err(ReduceError::PayloadMismatch {
                target: Target::Digits,
                verb: Verb::Push
            })
        );
        let action = Action::new(Target::Selection, Verb::Clear, Payload::Cells(Vec::new()));
        assert_eq!(
            reduce(&state, &action),
            Err(ReduceError::PayloadMismatch {
                target: Target::Selection,
                verb: Verb::Clear
            })
        );
    }

    #[test]
    fn test_out_of_range_selection_is_rejected() {
        let state = scenario_a();
        let action = Action::set_selection([Cell::new(1, 1), Cell::new(MAX_COORD + 1, 0)]);
        assert_eq!(
            reduce(&state, &action),
            Err(ReduceError::Codec(CodecError::OutOfRange {
                axis: Axis::Column,
                value: MAX_COORD + 1
            }))
        );
        assert_eq!(state, scenario_a());
    }

    fn cell_strategy() -> impl Strategy<Value = Cell> {
        (0u16..9, 0u16..9).prop_map(|(col, row)| Cell::new(col, row))
    }

    fn mark_strategy() -> impl Strategy<Value = Mark> {
        (1u8..=9).prop_map(|digit| Mark::new(digit.to_string()))
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            prop::sample::select(Mode::ALL.to_vec()).prop_map(Action::set_mode),
            prop::collection::vec(mark_strategy(), 0..4).prop_map(Action::set_digits),
            mark_strategy().prop_map(Action::push_digit),
            mark_strategy().prop_map(Action::remove_digit),
            Just(Action::clear_digits()),
            prop::collection::vec(cell_strategy(), 0..6).prop_map(Action::set_selection),
            Just(Action::clear_selection()),
            Just(Action::rotate_selection()),
        ]
    }

    fn state_strategy() -> impl Strategy<Value = PuzzleState> {
        prop::collection::vec(action_strategy(), 0..24)
            .prop_map(|actions| apply(&PuzzleState::default(), &actions))
    }

    proptest! {
        #[test]
        fn prop_reduce_is_pure(state in state_strategy(), action in action_strategy()) {
            let before = state.clone();
            let first = reduce(&state, &action);
            let second = reduce(&state, &action);
            prop_assert_eq!(first, second);
            prop_assert_eq!(state, before);
        }

        #[test]
        fn prop_clear_selection_is_idempotent(state in state_strategy()) {
            let clear = Action::clear_selection();
            let once = reduce(&state, &clear).unwrap();
            let twice = reduce(&once, &clear).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_remove_absent_mark_is_noop(state in state_strategy(), mark in mark_strategy()) {
            let absent_everywhere = state
                .selection()
                .keys()
                .all(|key| !state.digits_at(key).contains(&mark));
            prop_assume!(absent_everywhere);
            let next = reduce(&state, &Action::remove_digit(mark)).unwrap();
            prop_assert_eq!(next, state);
        }

        #[test]
        fn prop_rotate_keeps_membership(state in state_strategy()) {
            let next = reduce(&state, &Action::rotate_selection()).unwrap();
            prop_assert!(next.selection().keys().eq(state.selection().keys()));
            prop_assert_eq!(next.selection().primary().is_some(), !state.selection().is_empty());
        }

        #[test]
        fn prop_every_mode_lands_in_its_group(state in state_strategy(), mode in prop::sample::select(Mode::ALL.to_vec())) {
            let next = reduce(&state, &Action::set_mode(mode)).unwrap();
            prop_assert_eq!(next.mode(mode.group()), Some(mode));
            for group in [ModeGroup::ENTRY, ModeGroup::PEN] {
                if group != mode.group() {
                    prop_assert_eq!(next.mode(group), state.mode(group));
                }
            }
        }
    }
}
