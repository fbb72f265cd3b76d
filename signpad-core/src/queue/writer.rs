use crate::commands::{CommandConsumer, CommandError, SessionCommand};

pub struct SessionWriter<'a> {
    pub(super) lock: parking_lot::RwLockWriteGuard<'a, super::SessionQueueInner>,
    /// Number of commands that took effect during this write.
    pub(super) applied: usize,
}
// Notify once per write, not once per command, so a burst of pointer moves costs listeners a single wakeup.
impl Drop for SessionWriter<'_> {
    fn drop(&mut self) {
        if self.applied == 0 {
            return;
        }
        let next = super::Revision(self.lock.revision.0 + 1);
        self.lock.revision = next;
        log::trace!("Session at {next} after {} commands", self.applied);
        // Succeeds with or without receivers.
        self.lock.on_change.send_replace(next);
    }
}
impl SessionWriter<'_> {
    /// Apply a command to the state. On error, the state is untouched.
    pub fn apply(&mut self, command: &SessionCommand) -> Result<(), CommandError> {
        match self.lock.state.apply(command) {
            Ok(()) => {
                self.applied += 1;
                Ok(())
            }
            Err(e) => {
                log::trace!("Ignored {command:?}: {e}");
                Err(e)
            }
        }
    }
    #[must_use]
    pub fn changed(&self) -> bool {
        self.applied != 0
    }
}
