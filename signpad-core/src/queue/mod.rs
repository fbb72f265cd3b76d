//! Command Queue
//!
//! The session queue owns the [`SessionState`] and is the ground truth for what has been drawn. Gesture sources
//! running on other threads never touch the state directly. They hold a [`Dispatcher`] and send
//! [commands](crate::commands::SessionCommand) down a channel, and the owning context [pumps](SessionQueue::pump)
//! them in order. This serializes every mutation without the gesture source ever blocking on the state.
//!
//! Every batch of commands that changes the state bumps the [`Revision`] and notifies [listeners](SessionListener).
//! A listener that falls behind only sees the latest revision, never the ones in between.

use std::sync::Arc;

use crate::{commands::SessionCommand, state::SessionState};

pub mod writer;

/// Version of the session state. Starts at zero, and increases by one for every batch of effective commands.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Revision(pub u64);
impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

struct SessionQueueInner {
    state: SessionState,
    revision: Revision,
    on_change: tokio::sync::watch::Sender<Revision>,
}

pub struct SessionQueue {
    inner: Arc<parking_lot::RwLock<SessionQueueInner>>,
    incoming: crossbeam::channel::Receiver<SessionCommand>,
    // Kept so the channel never disconnects while the queue is alive, and to hand out clones.
    outgoing: crossbeam::channel::Sender<SessionCommand>,
}
impl Default for SessionQueue {
    fn default() -> Self {
        let (outgoing, incoming) = crossbeam::channel::unbounded();
        let (on_change, _) = tokio::sync::watch::channel(Revision::default());
        Self {
            inner: Arc::new(
                SessionQueueInner {
                    state: SessionState::new(),
                    revision: Revision::default(),
                    on_change,
                }
                .into(),
            ),
            incoming,
            outgoing,
        }
    }
}
impl SessionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Get a handle that can send commands to this queue from any thread.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            sender: self.outgoing.clone(),
        }
    }
    /// Apply every command sent by dispatchers so far, in the order they were sent.
    /// Returns true if the state changed.
    pub fn pump(&self) -> bool {
        // Don't take the lock if there's nothing to do.
        if self.incoming.is_empty() {
            return false;
        }
        self.write_with(|writer| {
            for command in self.incoming.try_iter() {
                // Rejected commands are malformed gestures. They change nothing, so they're dropped.
                let _ = writer.apply(&command);
            }
            writer.changed()
        })
    }
    /// Locks the queue for applying commands during the span of the closure.
    /// If any command takes effect, listeners are notified once the closure returns.
    pub fn write_with<F, T>(&self, write: F) -> T
    where
        F: FnOnce(&mut writer::SessionWriter<'_>) -> T,
    {
        let mut writer = writer::SessionWriter {
            lock: self.inner.write(),
            applied: 0,
        };
        // Notifying happens in the writer's Drop.
        write(&mut writer)
    }
    /// Clear every stroke. Commands already dispatched are applied first, so the reset lands after them.
    pub fn reset(&self) {
        self.pump();
        self.write_with(|writer| {
            // NoOp if already clear, which is just as good.
            let _ = writer.apply(&SessionCommand::Reset);
        });
    }
    /// Call the closure with the state as it is at this moment.
    pub fn read_with<F, T>(&self, read: F) -> T
    where
        F: FnOnce(&SessionState, Revision) -> T,
    {
        let lock = self.inner.read();
        read(&lock.state, lock.revision)
    }
    /// A helper method to clone the state as it is at this moment.
    #[must_use]
    pub fn peek_clone_state(&self) -> (SessionState, Revision) {
        self.read_with(|state, revision| (state.clone(), revision))
    }
    #[must_use]
    pub fn revision(&self) -> Revision {
        self.inner.read().revision
    }
    /// Create a listener that will only see new activity.
    #[must_use]
    pub fn listen_from_now(&self) -> SessionListener {
        // Fresh subscriptions have already seen the current value.
        let changes = self.inner.read().on_change.subscribe();
        SessionListener {
            changes,
            inner: Arc::downgrade(&self.inner),
        }
    }
    /// Create a listener that considers the current state as not yet seen.
    #[must_use]
    pub fn listen_from_start(&self) -> SessionListener {
        let mut listener = self.listen_from_now();
        listener.changes.mark_changed();
        listener
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("session queue closed")]
    Closed,
}

/// Sends commands to a [`SessionQueue`]. Cheap to clone, may be moved to other threads.
#[derive(Clone)]
pub struct Dispatcher {
    sender: crossbeam::channel::Sender<SessionCommand>,
}
impl Dispatcher {
    /// Queue a command. It takes effect on the next [`SessionQueue::pump`].
    pub fn send(&self, command: SessionCommand) -> Result<(), DispatchError> {
        self.sender.send(command).map_err(|_| DispatchError::Closed)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerError {
    #[error("session not available")]
    SessionClosed,
}
pub struct SessionListener {
    changes: tokio::sync::watch::Receiver<Revision>,
    inner: std::sync::Weak<parking_lot::RwLock<SessionQueueInner>>,
}
impl SessionListener {
    /// Check for new revisions without waiting, bringing this listener up-to-date in the process.
    /// Returns the new revision if there was one.
    pub fn forward(&mut self) -> Result<Option<Revision>, ListenerError> {
        match self.changes.has_changed() {
            Ok(true) => Ok(Some(*self.changes.borrow_and_update())),
            Ok(false) => Ok(None),
            Err(_) => Err(ListenerError::SessionClosed),
        }
    }
    /// Wait until a revision this listener has not seen yet is available, and mark it seen.
    pub async fn changed(&mut self) -> Result<Revision, ListenerError> {
        self.changes
            .changed()
            .await
            .map_err(|_| ListenerError::SessionClosed)?;
        Ok(*self.changes.borrow_and_update())
    }
    /// Locks the shared state for the span of the closure, without forwarding this listener.
    pub fn read_with<F, T>(&self, read: F) -> Result<T, ListenerError>
    where
        F: FnOnce(&SessionState, Revision) -> T,
    {
        let inner = self.inner.upgrade().ok_or(ListenerError::SessionClosed)?;
        let lock = inner.read();
        Ok(read(&lock.state, lock.revision))
    }
}

#[cfg(test)]
mod test {
    use super::{ListenerError, Revision, SessionQueue};
    use crate::commands::SessionCommand;
    use crate::util::Point;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y).unwrap()
    }

    #[test]
    fn dispatch_applies_in_order_across_threads() {
        let queue = SessionQueue::new();
        let dispatch = queue.dispatcher();
        std::thread::spawn(move || {
            for i in 0..3u8 {
                let x = f32::from(i);
                dispatch.send(SessionCommand::GestureStart(p(x, 0.0))).unwrap();
                dispatch.send(SessionCommand::GestureUpdate(p(x, 1.0))).unwrap();
                dispatch.send(SessionCommand::GestureEnd).unwrap();
            }
        })
        .join()
        .unwrap();

        // Nothing happens until the owner pumps.
        assert_eq!(queue.read_with(|state, _| state.strokes().len()), 0);
        assert!(queue.pump());
        let (state, revision) = queue.peek_clone_state();
        assert_eq!(state.strokes().len(), 3);
        let starts: Vec<_> = state.strokes().iter().map(|s| s.start().x()).collect();
        assert_eq!(starts, [0.0, 1.0, 2.0]);
        // One batch, one revision.
        assert_eq!(revision, Revision(1));
    }
    #[test]
    fn listeners_see_effective_batches_only() {
        let queue = SessionQueue::new();
        let dispatch = queue.dispatcher();
        let mut listener = queue.listen_from_now();
        assert_eq!(listener.forward(), Ok(None));

        // Malformed batch, no change.
        dispatch.send(SessionCommand::GestureUpdate(p(1.0, 1.0))).unwrap();
        dispatch.send(SessionCommand::GestureEnd).unwrap();
        assert!(!queue.pump());
        assert_eq!(listener.forward(), Ok(None));

        dispatch.send(SessionCommand::GestureStart(p(1.0, 1.0))).unwrap();
        assert!(queue.pump());
        assert_eq!(listener.forward(), Ok(Some(Revision(1))));
        assert_eq!(listener.forward(), Ok(None));

        // Reset on a drawn session is a change, twice is not.
        queue.reset();
        queue.reset();
        assert_eq!(listener.forward(), Ok(Some(Revision(2))));
        assert_eq!(queue.revision(), Revision(2));
        assert!(listener
            .read_with(|state, _| state.live().is_empty())
            .unwrap());
    }
    #[test]
    fn reset_lands_after_dispatched_commands() {
        let queue = SessionQueue::new();
        let dispatch = queue.dispatcher();
        dispatch.send(SessionCommand::GestureStart(p(1.0, 1.0))).unwrap();
        dispatch.send(SessionCommand::GestureEnd).unwrap();
        queue.reset();
        assert!(queue.read_with(|state, _| state.strokes().is_empty()));
    }
    #[test]
    fn listener_outliving_queue() {
        let queue = SessionQueue::new();
        let mut listener = queue.listen_from_start();
        assert_eq!(listener.forward(), Ok(Some(Revision(0))));
        drop(queue);
        assert_eq!(listener.forward(), Err(ListenerError::SessionClosed));
        assert_eq!(
            listener.read_with(|_, revision| revision),
            Err(ListenerError::SessionClosed)
        );
    }
    #[tokio::test]
    async fn changed_wakes_on_pump() {
        let queue = SessionQueue::new();
        let mut listener = queue.listen_from_now();
        queue
            .dispatcher()
            .send(SessionCommand::GestureStart(p(2.0, 2.0)))
            .unwrap();
        queue.pump();
        assert_eq!(listener.changed().await, Ok(Revision(1)));
    }
}
