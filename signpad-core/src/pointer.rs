//! # Pointer events
//!
//! Raw pointer events from the host, and the single-contact pan filter which turns them into gesture
//! [commands](crate::commands::SessionCommand).

use crate::commands::SessionCommand;
use crate::util::Point;

/// Identifies one contact (finger, mouse button, stylus) for the span of its press.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u64);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub phase: PointerPhase,
    /// Canvas-local position.
    pub pos: (f32, f32),
}

/// A pan recognizer restricted to one simultaneous contact.
///
/// The first contact to go down owns the gesture until it lifts or is cancelled. Everything from other contacts
/// in the meantime is dropped.
#[derive(Default, Debug)]
pub struct SinglePointerFilter {
    active: Option<PointerId>,
}
impl SinglePointerFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// The contact that currently owns the gesture.
    #[must_use]
    pub fn active(&self) -> Option<PointerId> {
        self.active
    }
    /// Translate one event. `None` if it is ignored.
    pub fn process(&mut self, event: PointerEvent) -> Option<SessionCommand> {
        if self.active.is_some_and(|active| active != event.pointer) {
            log::trace!("Ignoring {:?}, pointer {:?} is active", event.pointer, self.active);
            return None;
        }
        match event.phase {
            PointerPhase::Down => {
                let at = Self::position(&event)?;
                self.active = Some(event.pointer);
                Some(SessionCommand::GestureStart(at))
            }
            // Moves with no active contact still go through. The session ignores them.
            PointerPhase::Move => Self::position(&event).map(SessionCommand::GestureUpdate),
            PointerPhase::Up => {
                self.active = None;
                Some(SessionCommand::GestureEnd)
            }
            PointerPhase::Cancel => {
                self.active = None;
                Some(SessionCommand::GestureCancel)
            }
        }
    }
    fn position(event: &PointerEvent) -> Option<Point> {
        match Point::new(event.pos.0, event.pos.1) {
            Ok(point) => Some(point),
            Err(e) => {
                log::warn!("Dropping pointer event at {:?}: {e}", event.pos);
                None
            }
        }
    }
}
