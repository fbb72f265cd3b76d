//! # Rendering
//!
//! The session is drawn by first flattening it into a [`DrawList`], which is then [rasterized](raster) onto the
//! [render surface](surface). The draw list is plain data, so what *would* be drawn can be inspected without
//! touching pixels.

pub mod raster;
pub mod surface;

use crate::path::{FrozenPath, LivePath, PathCommand};
use crate::state::SessionState;
use crate::util::Point;

/// Straight (non-premultiplied) sRGB color, 8 bits per channel.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Color(pub [u8; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([0; 4]);
    pub const WHITE: Self = Self([255; 4]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    #[must_use]
    pub fn alpha(self) -> u8 {
        self.0[3]
    }
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.alpha() == 0
    }
}

/// How strokes are drawn. Not user-configurable.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in canvas pixels.
    pub width: f32,
}
impl StrokeStyle {
    pub const DEFAULT: Self = Self {
        color: Color::BLACK,
        width: 1.0,
    };
}
impl Default for StrokeStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Radius of the cursor marker.
pub const MARKER_RADIUS: f32 = 1.0;

/// Which path a [`DrawItem::Path`] comes from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PathSource {
    /// The committed stroke at this index of the stroke list.
    Stroke(usize),
    /// The live path.
    Live,
}

#[derive(Clone, PartialEq, Debug)]
pub enum DrawItem {
    /// A filled circle. Used for the cursor marker.
    Point {
        center: Point,
        radius: f32,
        color: Color,
    },
    /// An outlined (never filled) path.
    Path {
        source: PathSource,
        commands: std::sync::Arc<[PathCommand]>,
        style: StrokeStyle,
    },
}

/// An ordered list of things to draw. Earlier items are painted first.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
}
impl DrawList {
    /// Flatten the session: cursor marker at the bottom, then every stroke in order, then the live path on top.
    ///
    /// The live path is always present, even when empty, so consumers can rely on it being last.
    #[must_use]
    pub fn from_session(state: &SessionState, style: StrokeStyle) -> Self {
        let strokes = state.strokes();
        let mut items = Vec::with_capacity(strokes.len() + 2);
        items.push(DrawItem::Point {
            center: state.cursor(),
            radius: MARKER_RADIUS,
            color: Color::TRANSPARENT,
        });
        items.extend(strokes.iter().enumerate().map(|(idx, stroke)| {
            Self::frozen_item(PathSource::Stroke(idx), stroke, style)
        }));
        items.push(Self::live_item(state.live(), style));
        Self { items }
    }
    fn frozen_item(source: PathSource, path: &FrozenPath, style: StrokeStyle) -> DrawItem {
        DrawItem::Path {
            source,
            commands: path.shared(),
            style,
        }
    }
    fn live_item(path: &LivePath, style: StrokeStyle) -> DrawItem {
        DrawItem::Path {
            source: PathSource::Live,
            commands: path.commands().into(),
            style,
        }
    }
    #[must_use]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }
    /// Iterate only the path items, in paint order.
    pub fn paths(&self) -> impl Iterator<Item = (&PathSource, &[PathCommand])> + '_ {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Path {
                source, commands, ..
            } => Some((source, &commands[..])),
            DrawItem::Point { .. } => None,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Color, DrawItem, DrawList, PathSource, StrokeStyle};
    use crate::commands::{CommandConsumer, SessionCommand};
    use crate::state::SessionState;
    use crate::util::Point;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y).unwrap()
    }

    #[test]
    fn empty_session() {
        let list = DrawList::from_session(&SessionState::new(), StrokeStyle::default());
        assert_eq!(list.items().len(), 2);
        let paths: Vec<_> = list.paths().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].0, &PathSource::Live);
        assert!(paths[0].1.is_empty());
    }
    #[test]
    fn paint_order() {
        let mut state = SessionState::new();
        for command in [
            SessionCommand::GestureStart(p(10.0, 10.0)),
            SessionCommand::GestureUpdate(p(20.0, 10.0)),
            SessionCommand::GestureUpdate(p(20.0, 20.0)),
            SessionCommand::GestureEnd,
            SessionCommand::GestureStart(p(50.0, 50.0)),
            SessionCommand::GestureEnd,
        ] {
            state.apply(&command).unwrap();
        }
        let list = DrawList::from_session(&state, StrokeStyle::default());

        // Invisible marker first, at the cursor.
        assert_eq!(
            list.items()[0],
            DrawItem::Point {
                center: p(50.0, 50.0),
                radius: 1.0,
                color: Color::TRANSPARENT
            }
        );
        let sources: Vec<_> = list.paths().map(|(source, _)| source.clone()).collect();
        assert_eq!(
            sources,
            [PathSource::Stroke(0), PathSource::Stroke(1), PathSource::Live]
        );
        let lengths: Vec<_> = list.paths().map(|(_, commands)| commands.len()).collect();
        assert_eq!(lengths, [3, 1, 1]);
        assert!(list.items().iter().all(|item| match item {
            DrawItem::Path { style, .. } => *style == StrokeStyle::DEFAULT,
            DrawItem::Point { .. } => true,
        }));
    }
}
