//! # Commands
//!
//! Commands are the only way the session state is modified. Gesture sources and the user's actions produce
//! commands, which are queued and applied in order by the [`queue`](crate::queue) on the owning context.

pub use crate::state::commands::Command as SessionCommand;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("command constructed for a state that does not match the current state")]
    MismatchedState,
    #[error("command makes no changes")]
    NoOp,
}
pub trait CommandConsumer<C> {
    /// Apply a single command. If this generates an error,
    /// the state of `self` should *not* be observably changed.
    fn apply(&mut self, command: &C) -> Result<(), CommandError>;
}
