//! Session store: owns the current state and tells subscribers about changes.
//!
//! UI components read the state through [`PuzzleStore::state`] and send
//! changes through [`PuzzleStore::dispatch`]. Actions coming from several
//! sources are queued with [`PuzzleStore::request`] and applied strictly in
//! request order by [`PuzzleStore::dispatch_all`].

use std::fmt;

use gridmark_core::Cell;

use crate::{
    Action, ActionRequestQueue, GridSize, Payload, PuzzleSettings, PuzzleState, ReduceError,
    Target, Verb, reduce,
};

/// Errors returned by [`PuzzleStore::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum StoreError {
    /// The reducer rejected the action.
    #[display("{_0}")]
    #[from]
    Reduce(ReduceError),
    /// The action names a cell outside the configured grid.
    #[display("cell {cell} is outside the {size} grid")]
    CellOutsideGrid {
        /// The rejected cell.
        cell: Cell,
        /// The configured grid size.
        size: GridSize,
    },
}

/// Handle returned by [`PuzzleStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&PuzzleState)>;

/// Owner of a session's [`PuzzleState`].
///
/// # Examples
///
/// ```
/// use std::{cell::Cell as Counter, rc::Rc};
///
/// use gridmark_core::Cell;
/// use gridmark_state::{Action, PuzzleStore};
///
/// let mut store = PuzzleStore::default();
/// let changes = Rc::new(Counter::new(0));
/// let counter = Rc::clone(&changes);
/// store.subscribe(move |_| counter.set(counter.get() + 1));
///
/// store.request(Action::set_selection([Cell::new(2, 3)]));
/// store.request(Action::push_digit("7"));
/// assert_eq!(store.dispatch_all().unwrap(), 2);
/// assert_eq!(changes.get(), 2);
/// ```
pub struct PuzzleStore {
    settings: PuzzleSettings,
    state: PuzzleState,
    queue: ActionRequestQueue,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl PuzzleStore {
    /// Creates a store holding a fresh state for `settings`.
    #[must_use]
    pub fn new(settings: PuzzleSettings) -> Self {
        let state = PuzzleState::new(settings.initial_mode);
        Self {
            settings,
            state,
            queue: ActionRequestQueue::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &PuzzleSettings {
        &self.settings
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Registers `subscriber`, called with the new state after every change.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&PuzzleState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != len
    }

    /// Applies `action` and notifies subscribers if the state changed.
    ///
    /// Returns whether the state changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CellOutsideGrid`] if the action names a cell
    /// outside the grid, or [`StoreError::Reduce`] if the reducer rejects it.
    /// The state is unchanged in both cases.
    pub fn dispatch(&mut self, action: &Action) -> Result<bool, StoreError> {
        log::debug!("dispatch: {} {}", action.target(), action.verb());

        let next = self
            .check_grid(action)
            .and_then(|()| reduce(&self.state, action).map_err(StoreError::from))
            .inspect_err(|err| log::warn!("rejected action `{action}`: {err}"))?;
        if next == self.state {
            return Ok(false);
        }
        self.state = next;
        self.notify();
        Ok(true)
    }

    /// Queues `action` for [`dispatch_all`](Self::dispatch_all).
    pub fn request(&mut self, action: Action) {
        self.queue.request(action);
    }

    /// Returns the number of queued actions.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatches every queued action in request order.
    ///
    /// Returns how many actions changed the state.
    ///
    /// # Errors
    ///
    /// Stops at the first failing action and returns its error. That action is
    /// dropped; the ones after it stay queued.
    pub fn dispatch_all(&mut self) -> Result<usize, StoreError> {
        let mut actions = self.queue.take_all().into_iter();
        let mut changed = 0;
        while let Some(action) = actions.next() {
            match self.dispatch(&action) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(err) => {
                    self.queue.restore_front(actions);
                    return Err(err);
                }
            }
        }
        Ok(changed)
    }

    /// Replaces the state with a fresh one and drops queued actions.
    pub fn reset(&mut self) {
        self.queue.clear();
        let fresh = PuzzleState::new(self.settings.initial_mode);
        if fresh != self.state {
            self.state = fresh;
            self.notify();
        }
    }

    /// Bounds-checks the cells of a `selection set`. Other actions carrying
    /// cells are left to the reducer, which rejects them.
    fn check_grid(&self, action: &Action) -> Result<(), StoreError> {
        let (Target::Selection, Verb::Set, Payload::Cells(cells)) =
            (action.target(), action.verb(), action.payload())
        else {
            return Ok(());
        };
        let size = self.settings.grid;
        match cells.iter().find(|cell| !size.contains(**cell)) {
            Some(cell) => Err(StoreError::CellOutsideGrid { cell: *cell, size }),
            None => Ok(()),
        }
    }

    fn notify(&mut self) {
        log::trace!("notifying {} subscriber(s)", self.subscribers.len());
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state);
        }
    }
}

impl Default for PuzzleStore {
    fn default() -> Self {
        Self::new(PuzzleSettings::default())
    }
}

impl fmt::Debug for PuzzleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleStore")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("queue", &self.queue)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
