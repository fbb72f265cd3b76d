//! # Paths
//!
//! A path is an ordered series of [`PathCommand`]s. While a gesture is in progress, its points are appended to a
//! [`LivePath`]. When the gesture completes, the live path is frozen into an immutable [`FrozenPath`], which is what
//! the [stroke list](crate::state::StrokeList) stores.
//!
//! Frozen paths display as SVG path data (`M10 10L20 10`), and can be parsed back from it.

mod svg;

pub use svg::PathParseError;

use crate::util::Point;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}
impl PathCommand {
    #[must_use]
    pub fn point(&self) -> Point {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => *p,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("live path is not accepting points")]
    NotDrawing,
}

/// Where a [`LivePath`] is in its lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum LivePhase {
    /// Freshly allocated, holds no commands.
    #[default]
    Empty,
    /// Started by a move-to, accepting line-tos.
    Drawing,
    /// Already frozen. Still holds its commands for display, but won't accept more points.
    Spent,
}

/// The mutable path of the stroke currently being drawn.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct LivePath {
    /// Invariant: empty iff `phase == Empty`, otherwise `commands[0]` is the only `MoveTo`.
    commands: Vec<PathCommand>,
    phase: LivePhase,
}
impl LivePath {
    /// An empty path, accepting nothing until replaced by [`LivePath::begin`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Allocate a new path starting at `at`.
    #[must_use]
    pub fn begin(at: Point) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(at)],
            phase: LivePhase::Drawing,
        }
    }
    /// Extend the path with a straight segment to `to`.
    pub fn line_to(&mut self, to: Point) -> Result<(), PathError> {
        if self.phase != LivePhase::Drawing {
            return Err(PathError::NotDrawing);
        }
        self.commands.push(PathCommand::LineTo(to));
        Ok(())
    }
    /// Snapshot the path into its frozen form, and stop accepting points.
    /// The commands are kept, so the path may still be drawn.
    pub fn freeze(&mut self) -> Result<FrozenPath, PathError> {
        if self.phase != LivePhase::Drawing {
            return Err(PathError::NotDrawing);
        }
        self.phase = LivePhase::Spent;
        Ok(FrozenPath(self.commands.as_slice().into()))
    }
    #[must_use]
    pub fn phase(&self) -> LivePhase {
        self.phase
    }
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

/// Immutable geometry of a completed stroke. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrozenPath(std::sync::Arc<[PathCommand]>);
impl FrozenPath {
    /// Build a frozen path from raw commands.
    /// Returns `None` unless there is exactly one move-to, and it comes first.
    #[must_use]
    pub fn from_commands(commands: &[PathCommand]) -> Option<Self> {
        let (first, rest) = commands.split_first()?;
        let valid = matches!(first, PathCommand::MoveTo(_))
            && rest
                .iter()
                .all(|command| matches!(command, PathCommand::LineTo(_)));
        valid.then(|| Self(commands.into()))
    }
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.0
    }
    /// Share the commands without copying them.
    #[must_use]
    pub fn shared(&self) -> std::sync::Arc<[PathCommand]> {
        self.0.clone()
    }
    /// The point where the stroke began.
    #[must_use]
    pub fn start(&self) -> Point {
        // Never empty by construction.
        self.0.first().map_or(Point::ORIGIN, PathCommand::point)
    }
    /// Number of straight segments. Zero for a stroke that was a single tap.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
    #[must_use]
    pub fn is_single_point(&self) -> bool {
        self.segments() == 0
    }
}
