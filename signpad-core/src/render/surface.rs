//! # Render surface
//!
//! Holds the most recently rendered frame, so export can take a snapshot of exactly what is on screen.
//! The [`RenderBinding`] keeps it in sync with a [`SessionQueue`].

use std::sync::Arc;

use super::{raster::Canvas, raster::RasterError, DrawList, StrokeStyle};
use crate::queue::{ListenerError, Revision, SessionListener, SessionQueue};

/// A rendered frame. Straight-alpha RGBA8, rows top to bottom. Cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    /// Invariant: `rgba.len() == width * height * 4`
    rgba: Arc<[u8]>,
}
impl Snapshot {
    /// Wrap pixel data. `None` if the length doesn't match the dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected).then(|| Self {
            width,
            height,
            rgba: rgba.into(),
        })
    }
    pub(super) fn from_pixmap(pixmap: &tiny_skia::Pixmap) -> Self {
        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            rgba: rgba.into(),
        }
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Raw RGBA8 data.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }
    /// Fetch one pixel. `None` if out-of-bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba.get(idx..idx + 4)?.try_into().ok()
    }
}
impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

struct Frame {
    snapshot: Snapshot,
    revision: Revision,
}

/// Shared holder of the last presented frame. Clones refer to the same surface.
#[derive(Clone, Default)]
pub struct RenderSurface {
    frame: Arc<parking_lot::RwLock<Option<Frame>>>,
}
impl RenderSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Replace the displayed frame.
    pub fn present(&self, snapshot: Snapshot, revision: Revision) {
        *self.frame.write() = Some(Frame { snapshot, revision });
    }
    /// The frame currently displayed, or `None` if nothing has been presented yet.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.frame.read().as_ref().map(|frame| frame.snapshot.clone())
    }
    /// The session revision the displayed frame was drawn from.
    #[must_use]
    pub fn revision(&self) -> Option<Revision> {
        self.frame.read().as_ref().map(|frame| frame.revision)
    }
}
impl crate::export::SnapshotSource for RenderSurface {
    fn snapshot(&self) -> Option<Snapshot> {
        RenderSurface::snapshot(self)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Redraws the surface whenever the session changes.
pub struct RenderBinding {
    canvas: Canvas,
    style: StrokeStyle,
    listener: SessionListener,
    surface: RenderSurface,
}
impl RenderBinding {
    /// Bind a surface to a queue. The current state counts as unseen, so the first render draws it.
    #[must_use]
    pub fn new(queue: &SessionQueue, canvas: Canvas, surface: RenderSurface) -> Self {
        Self {
            canvas,
            style: StrokeStyle::default(),
            listener: queue.listen_from_start(),
            surface,
        }
    }
    #[must_use]
    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }
    /// Render if the session changed since the last call. Returns the revision drawn, if any.
    pub fn render_if_changed(&mut self) -> Result<Option<Revision>, RenderError> {
        if self.listener.forward()?.is_none() {
            return Ok(None);
        }
        self.render().map(Some)
    }
    /// Render every change until the session is dropped.
    pub async fn run(mut self) -> Result<(), RenderError> {
        loop {
            let rendered = match self.listener.changed().await {
                Ok(_) => self.render(),
                Err(e) => Err(e.into()),
            };
            match rendered {
                Ok(_) => (),
                // The session is gone, nothing left to draw.
                Err(RenderError::Listener(ListenerError::SessionClosed)) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }
    fn render(&self) -> Result<Revision, RenderError> {
        // Build the list under the lock, rasterize outside of it.
        let (list, revision) = self
            .listener
            .read_with(|state, revision| (DrawList::from_session(state, self.style), revision))?;
        let snapshot = self.canvas.rasterize(&list)?;
        self.surface.present(snapshot, revision);
        log::trace!("Presented {revision}");
        Ok(revision)
    }
}

#[cfg(test)]
mod test {
    use super::{RenderBinding, RenderSurface, Snapshot};
    use crate::commands::SessionCommand;
    use crate::queue::{Revision, SessionQueue};
    use crate::render::raster::Canvas;
    use crate::util::Point;

    #[test]
    fn snapshot_validates_length() {
        assert!(Snapshot::new(2, 2, vec![0; 16]).is_some());
        assert!(Snapshot::new(2, 2, vec![0; 15]).is_none());
        let snap = Snapshot::new(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(snap.pixel(0, 1), Some([5, 6, 7, 8]));
        assert_eq!(snap.pixel(1, 0), None);
    }
    #[test]
    fn nothing_before_first_render() {
        let surface = RenderSurface::new();
        assert!(surface.snapshot().is_none());
        assert!(surface.revision().is_none());
    }
    #[test]
    fn binding_tracks_revisions() {
        let queue = SessionQueue::new();
        let surface = RenderSurface::new();
        let mut binding = RenderBinding::new(&queue, Canvas::new(16, 16).unwrap(), surface.clone());

        // First call always draws.
        assert_eq!(binding.render_if_changed(), Ok(Some(Revision(0))));
        assert_eq!(binding.render_if_changed(), Ok(None));
        let blank = surface.snapshot().unwrap();

        let dispatch = queue.dispatcher();
        dispatch
            .send(SessionCommand::GestureStart(Point::new(2.0, 8.0).unwrap()))
            .unwrap();
        dispatch
            .send(SessionCommand::GestureUpdate(Point::new(14.0, 8.0).unwrap()))
            .unwrap();
        queue.pump();
        // Mid-gesture, the live path is drawn.
        assert_eq!(binding.render_if_changed(), Ok(Some(Revision(1))));
        assert_eq!(surface.revision(), Some(Revision(1)));
        assert_ne!(surface.snapshot().unwrap(), blank);
    }
    #[tokio::test]
    async fn run_exits_with_session() {
        let queue = SessionQueue::new();
        let surface = RenderSurface::new();
        let binding = RenderBinding::new(&queue, Canvas::new(8, 8).unwrap(), surface.clone());
        drop(queue);
        assert_eq!(binding.run().await, Ok(()));
    }
}
