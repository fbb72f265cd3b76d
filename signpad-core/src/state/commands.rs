use crate::util::Point;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// A drag began. Allocates a new live path starting here.
    GestureStart(Point),
    /// The drag moved. Extends the live path.
    GestureUpdate(Point),
    /// The drag finished. Freezes the live path into the stroke list.
    GestureEnd,
    /// The recognizer gave up on the drag. The live path is dropped without being committed.
    GestureCancel,
    /// Clear every stroke.
    Reset,
}
impl Command {
    /// The pointer position carried by this command, if any.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        match self {
            Self::GestureStart(p) | Self::GestureUpdate(p) => Some(*p),
            Self::GestureEnd | Self::GestureCancel | Self::Reset => None,
        }
    }
}
