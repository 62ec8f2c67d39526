//! Hand-off queue between the solver side and an external consumer,
//! typically a renderer animating the rotations.
//!
//! The queue carries rotations interleaved with speed hints, the stop flag
//! shuts the whole pipeline down, and the solution stack holds a finished
//! solve back-to-front until the driver feeds it into the queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::rotation::Rotation;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Action {
    Rotation(Rotation),
    /// Faster animation while a scramble plays out.
    IsScrambling,
    /// Slower animation while a solution plays out.
    IsSolving,
    /// Snap back to the solved state.
    Reset,
}

#[derive(Default)]
pub struct Actions {
    queue: Mutex<VecDeque<Action>>,
    // solution rotations, stored back-to-front
    solution: Mutex<Vec<Rotation>>,
    stop: AtomicBool,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, action: Action) {
        self.queue.lock().push_back(action);
    }

    /// Next queued action, or `None` when the queue is empty.
    pub fn try_pop(&self) -> Option<Action> {
        self.queue.lock().pop_front()
    }

    /// Store a finished solution; rotations come in application order and
    /// are kept back-to-front.
    pub fn push_solution(&self, rotations: &[Rotation]) {
        let mut solution = self.solution.lock();
        solution.extend(rotations.iter().rev());
    }

    /// Next solution rotation in application order.
    pub fn pop_solution(&self) -> Option<Rotation> {
        self.solution.lock().pop()
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn stop_flag(&self) -> &AtomicBool {
        &self.stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let actions = Actions::new();
        actions.push(Action::IsScrambling);
        actions.push(Action::Rotation(Rotation::R));
        actions.push(Action::Reset);

        assert_eq!(actions.try_pop(), Some(Action::IsScrambling));
        assert_eq!(actions.try_pop(), Some(Action::Rotation(Rotation::R)));
        assert_eq!(actions.try_pop(), Some(Action::Reset));
        assert_eq!(actions.try_pop(), None);
    }

    #[test]
    fn solution_stack_replays_in_application_order() {
        let actions = Actions::new();
        actions.push_solution(&[Rotation::R, Rotation::U, Rotation::Fp]);
        assert_eq!(actions.pop_solution(), Some(Rotation::R));
        assert_eq!(actions.pop_solution(), Some(Rotation::U));
        assert_eq!(actions.pop_solution(), Some(Rotation::Fp));
        assert_eq!(actions.pop_solution(), None);
    }

    #[test]
    fn stop_flag_latches() {
        let actions = Actions::new();
        assert!(!actions.should_stop());
        actions.request_stop();
        assert!(actions.should_stop());
    }
}
