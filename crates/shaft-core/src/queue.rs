//! The input queue: single authority over what happens next.
//!
//! Inputs are admitted only if the current state accepts them, then popped
//! one per tick in FIFO order. An inadmissible input is dropped on arrival; a
//! head that the state no longer accepts (the state moved on since it was
//! admitted) is dropped on pop. Nothing is retried and nothing is dispatched
//! twice.
//!
//! # Example
//!
//! ```
//! use shaft_core::input::{Input, InputType};
//! use shaft_core::queue::InputQueue;
//! use shaft_core::state::GameState;
//!
//! let mut queue = InputQueue::new();
//! assert!(queue.append(Input::new(InputType::Pause)));
//! assert!(!queue.append(Input::new(InputType::AnimationsFinished)));
//!
//! let popped = queue.pop().unwrap();
//! assert_eq!(popped.input_type, InputType::Pause);
//! assert_eq!(queue.state(), GameState::Paused);
//! ```

use std::collections::VecDeque;
use tracing::debug;

use crate::input::Input;
use crate::referee::Referee;
use crate::state::GameState;

/// FIFO of admitted inputs plus the current state.
#[derive(Debug)]
pub struct InputQueue {
    queue: VecDeque<Input>,
    state: GameState,
    referee: Referee,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    /// An empty queue in the `playing` state with the standard referee.
    #[must_use]
    pub fn new() -> Self {
        Self::with_referee(GameState::Playing, Referee::default())
    }

    /// An empty queue starting in `state`, consulting `referee` on reffing.
    #[must_use]
    pub fn with_referee(state: GameState, referee: Referee) -> Self {
        Self {
            queue: VecDeque::new(),
            state,
            referee,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Number of queued inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The next input to be popped.
    #[must_use]
    pub fn peek(&self) -> Option<&Input> {
        self.queue.front()
    }

    /// Admits `input` if the current state accepts it.
    ///
    /// Returns `false` when the input was dropped.
    pub fn append(&mut self, input: Input) -> bool {
        if !self.state.should_append(&input) {
            debug!(kind = %input.kind(), state = %self.state, "dropped inadmissible input");
            return false;
        }
        self.queue.push_back(input);
        true
    }

    /// Pops the head and performs its transition.
    ///
    /// Returns `None` when the queue is empty or the head was dropped because
    /// the current state refuses it. On a state change the new state's
    /// [`enter`](GameState::enter) hook runs and its follow-up, if any, is
    /// appended.
    pub fn pop(&mut self) -> Option<Input> {
        let head = self.queue.front()?;
        let Some(next) = self.state.transition(head) else {
            debug!(kind = %head.kind(), state = %self.state, "dropped illegal head input");
            self.queue.pop_front();
            return None;
        };
        let input = self.queue.pop_front()?;

        let previous = std::mem::replace(&mut self.state, next);
        if previous != next {
            debug!(from = %previous, to = %next, input = %input.kind(), "state change");
            if let Some(follow_up) = next.enter(&input, &self.referee) {
                self.append(follow_up);
            }
        }
        Some(input)
    }

    /// Moves back to `state` after its work could not be completed.
    ///
    /// Queued inputs are kept and no hook runs.
    pub(crate) fn revert(&mut self, state: GameState) {
        debug!(from = %self.state, to = %state, "state reverted");
        self.state = state;
    }

    /// Clears the queue and moves to `state` without running any hook.
    pub fn reset(&mut self, state: GameState) {
        self.queue.clear();
        self.state = state;
    }
}
