//! Software rasterization of [draw lists](super::DrawList) via `tiny-skia`.

use super::{Color, DrawItem, DrawList, StrokeStyle};
use crate::path::PathCommand;
use crate::util::Point;

use super::surface::Snapshot;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterError {
    #[error("cannot allocate a {width}x{height} canvas")]
    InvalidSize { width: u32, height: u32 },
}

/// The drawable area. Every frame is drawn from scratch onto the background.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Color,
}
impl Canvas {
    /// A white canvas of the given size in pixels.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        // Same limits tiny-skia checks on allocation, caught early so a bad config fails at startup.
        if tiny_skia::IntSize::from_wh(width, height).is_none() {
            return Err(RasterError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            background: Color::WHITE,
        })
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Draw the list, in order, onto a fresh frame.
    pub fn rasterize(&self, list: &DrawList) -> Result<Snapshot, RasterError> {
        let mut pixmap =
            tiny_skia::Pixmap::new(self.width, self.height).ok_or(RasterError::InvalidSize {
                width: self.width,
                height: self.height,
            })?;
        pixmap.fill(skia_color(self.background));

        for item in list.items() {
            match item {
                DrawItem::Point {
                    center,
                    radius,
                    color,
                } => {
                    // Would blend to nothing anyways.
                    if color.is_transparent() {
                        continue;
                    }
                    fill_disc(&mut pixmap, *center, *radius, *color);
                }
                DrawItem::Path {
                    commands, style, ..
                } => stroke_commands(&mut pixmap, commands, *style),
            }
        }

        Ok(Snapshot::from_pixmap(&pixmap))
    }
}

fn skia_color(Color([r, g, b, a]): Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(r, g, b, a)
}
fn paint(color: Color) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}
fn fill_disc(pixmap: &mut tiny_skia::Pixmap, center: Point, radius: f32, color: Color) {
    let Some(circle) = tiny_skia::PathBuilder::from_circle(center.x(), center.y(), radius) else {
        // Zero or negative radius.
        return;
    };
    pixmap.fill_path(
        &circle,
        &paint(color),
        tiny_skia::FillRule::Winding,
        tiny_skia::Transform::identity(),
        None,
    );
}
fn stroke_commands(pixmap: &mut tiny_skia::Pixmap, commands: &[PathCommand], style: StrokeStyle) {
    let Some(first) = commands.first() else {
        return;
    };
    let dot = |pixmap: &mut tiny_skia::Pixmap| {
        fill_disc(pixmap, first.point(), style.width / 2.0, style.color);
    };
    // A tap, or a press that never moved. Stroking a zero-length path paints nothing, so stand in with a dot
    // as wide as the line.
    if commands.iter().all(|command| command.point() == first.point()) {
        dot(pixmap);
        return;
    }

    let mut builder = tiny_skia::PathBuilder::with_capacity(commands.len(), commands.len());
    for command in commands {
        match command {
            PathCommand::MoveTo(p) => builder.move_to(p.x(), p.y()),
            PathCommand::LineTo(p) => builder.line_to(p.x(), p.y()),
        }
    }
    let Some(path) = builder.finish() else {
        return;
    };
    let stroke = tiny_skia::Stroke {
        width: style.width,
        ..Default::default()
    };
    pixmap.stroke_path(
        &path,
        &paint(style.color),
        &stroke,
        tiny_skia::Transform::identity(),
        None,
    );
}
