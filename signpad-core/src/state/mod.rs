//! # Session state
//!
//! Everything one drawing screen knows: the committed strokes, the stroke being drawn, and where the pointer
//! last was. Only [commands](crate::commands) applied through the [queue](crate::queue) modify it.

pub mod commands;

use crate::commands::{CommandConsumer, CommandError};
use crate::path::{FrozenPath, LivePath, LivePhase};
use crate::util::Point;

/// Completed strokes, in the order they were drawn. Later strokes paint over earlier ones.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct StrokeList {
    strokes: Vec<FrozenPath>,
}
// Public methods for readers
impl StrokeList {
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FrozenPath> + '_ {
        self.strokes.iter()
    }
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&FrozenPath> {
        self.strokes.get(idx)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
// Append-only, or cleared in full. Never partially.
impl StrokeList {
    fn push_back(&mut self, stroke: FrozenPath) {
        self.strokes.push(stroke);
    }
    fn clear(&mut self) {
        self.strokes.clear();
    }
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct SessionState {
    strokes: StrokeList,
    live: LivePath,
    /// Last known pointer position. Only used to place the cursor marker.
    cursor: Point,
}
impl SessionState {
    /// A fresh session with nothing drawn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn strokes(&self) -> &StrokeList {
        &self.strokes
    }
    #[must_use]
    pub fn live(&self) -> &LivePath {
        &self.live
    }
    #[must_use]
    pub fn cursor(&self) -> Point {
        self.cursor
    }
}

impl CommandConsumer<commands::Command> for SessionState {
    fn apply(&mut self, command: &commands::Command) -> Result<(), CommandError> {
        use commands::Command;
        match command {
            Command::GestureStart(at) => {
                // Any previous live path is dropped here, committed or not.
                self.live = LivePath::begin(*at);
                self.cursor = *at;
                Ok(())
            }
            Command::GestureUpdate(to) => {
                // Update without a start. The gesture source broke protocol, ignore it.
                self.live
                    .line_to(*to)
                    .map_err(|_| CommandError::MismatchedState)?;
                self.cursor = *to;
                Ok(())
            }
            Command::GestureEnd => {
                let frozen = self
                    .live
                    .freeze()
                    .map_err(|_| CommandError::MismatchedState)?;
                self.strokes.push_back(frozen);
                Ok(())
            }
            Command::GestureCancel => {
                if self.live.phase() == LivePhase::Drawing {
                    self.live = LivePath::new();
                    Ok(())
                } else {
                    Err(CommandError::MismatchedState)
                }
            }
            Command::Reset => {
                if self.strokes.is_empty() && self.live.is_empty() {
                    Err(CommandError::NoOp)
                } else {
                    self.strokes.clear();
                    self.live = LivePath::new();
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{commands::Command, SessionState};
    use crate::commands::{CommandConsumer, CommandError};
    use crate::path::{LivePhase, PathCommand};
    use crate::util::Point;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y).unwrap()
    }
    fn run(state: &mut SessionState, commands: &[Command]) {
        for command in commands {
            let _ = state.apply(command);
        }
    }

    #[test]
    fn cycles_accumulate_in_order() {
        let mut state = SessionState::new();
        for i in 0..5u8 {
            let x = f32::from(i) * 10.0;
            run(
                &mut state,
                &[
                    Command::GestureStart(p(x, 0.0)),
                    Command::GestureUpdate(p(x, 5.0)),
                    Command::GestureEnd,
                ],
            );
        }
        assert_eq!(state.strokes().len(), 5);
        for (i, stroke) in state.strokes().iter().enumerate() {
            assert_eq!(stroke.start(), p(i as f32 * 10.0, 0.0));
        }
    }
    #[test]
    fn l_shape_then_tap() {
        let mut state = SessionState::new();
        run(
            &mut state,
            &[
                Command::GestureStart(p(10.0, 10.0)),
                Command::GestureUpdate(p(20.0, 10.0)),
                Command::GestureUpdate(p(20.0, 20.0)),
                Command::GestureEnd,
                Command::GestureStart(p(50.0, 50.0)),
                Command::GestureEnd,
            ],
        );
        assert_eq!(state.strokes().len(), 2);
        let l_shape = state.strokes().get(0).unwrap();
        assert_eq!(
            l_shape.commands(),
            &[
                PathCommand::MoveTo(p(10.0, 10.0)),
                PathCommand::LineTo(p(20.0, 10.0)),
                PathCommand::LineTo(p(20.0, 20.0)),
            ]
        );
        let tap = state.strokes().get(1).unwrap();
        assert_eq!(tap.commands(), &[PathCommand::MoveTo(p(50.0, 50.0))]);
        // The spent live path still shows the tap.
        assert_eq!(state.live().phase(), LivePhase::Spent);
        assert_eq!(state.live().commands(), tap.commands());
        assert_eq!(state.cursor(), p(50.0, 50.0));
    }
    #[test]
    fn malformed_sequences_leave_state_alone() {
        let mut state = SessionState::new();
        assert_eq!(
            state.apply(&Command::GestureUpdate(p(1.0, 1.0))),
            Err(CommandError::MismatchedState)
        );
        assert_eq!(
            state.apply(&Command::GestureEnd),
            Err(CommandError::MismatchedState)
        );
        assert_eq!(state, SessionState::new());

        // Points after an end don't reach the spent path, and it isn't committed twice.
        run(
            &mut state,
            &[Command::GestureStart(p(0.0, 0.0)), Command::GestureEnd],
        );
        let before = state.clone();
        run(
            &mut state,
            &[Command::GestureUpdate(p(9.0, 9.0)), Command::GestureEnd],
        );
        assert_eq!(state, before);
    }
    #[test]
    fn cursor_follows_accepted_points() {
        let mut state = SessionState::new();
        // Rejected update, nothing is drawing yet.
        let _ = state.apply(&Command::GestureUpdate(p(9.0, 9.0)));
        assert_eq!(state.cursor(), Point::ORIGIN);

        run(
            &mut state,
            &[
                Command::GestureStart(p(1.0, 2.0)),
                Command::GestureUpdate(p(3.0, 4.0)),
            ],
        );
        assert_eq!(state.cursor(), p(3.0, 4.0));
        state.apply(&Command::GestureUpdate(p(5.0, 6.0))).unwrap();
        assert_eq!(state.cursor(), p(5.0, 6.0));

        // Ending leaves it in place, and the spent path doesn't move it either.
        state.apply(&Command::GestureEnd).unwrap();
        assert_eq!(
            state.apply(&Command::GestureUpdate(p(7.0, 8.0))),
            Err(CommandError::MismatchedState)
        );
        assert_eq!(state.cursor(), p(5.0, 6.0));
    }
    #[test]
    fn start_discards_uncommitted() {
        let mut state = SessionState::new();
        run(
            &mut state,
            &[
                Command::GestureStart(p(0.0, 0.0)),
                Command::GestureUpdate(p(1.0, 1.0)),
                Command::GestureStart(p(5.0, 5.0)),
                Command::GestureEnd,
            ],
        );
        assert_eq!(state.strokes().len(), 1);
        assert!(state.strokes().get(0).unwrap().is_single_point());
    }
    #[test]
    fn cancel_drops_stroke() {
        let mut state = SessionState::new();
        run(
            &mut state,
            &[
                Command::GestureStart(p(0.0, 0.0)),
                Command::GestureUpdate(p(3.0, 4.0)),
                Command::GestureCancel,
            ],
        );
        assert!(state.strokes().is_empty());
        assert!(state.live().is_empty());
        assert_eq!(state.live().phase(), LivePhase::Empty);
        // Nothing to cancel now.
        assert_eq!(
            state.apply(&Command::GestureCancel),
            Err(CommandError::MismatchedState)
        );
        // ..and the end that would have followed is ignored.
        assert_eq!(
            state.apply(&Command::GestureEnd),
            Err(CommandError::MismatchedState)
        );
    }
    #[test]
    fn reset_is_idempotent() {
        let mut state = SessionState::new();
        run(
            &mut state,
            &[
                Command::GestureStart(p(0.0, 0.0)),
                Command::GestureUpdate(p(3.0, 4.0)),
                Command::GestureEnd,
                Command::GestureStart(p(7.0, 7.0)),
            ],
        );
        assert_eq!(state.apply(&Command::Reset), Ok(()));
        assert!(state.strokes().is_empty());
        assert_eq!(state.live().len(), 0);
        let once = state.clone();

        assert_eq!(state.apply(&Command::Reset), Err(CommandError::NoOp));
        assert_eq!(state, once);
    }
}
