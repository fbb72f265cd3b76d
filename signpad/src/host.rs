//! # Host
//!
//! Owns the session, its render binding, and the exporter, and drives them from a gesture script.
//!
//! Pointer events are produced on their own thread and dispatched straight into the session queue, the way a
//! touch screen delivers them. The reset and save buttons are requests to the owner, which applies everything
//! dispatched so far, renders, and then acts. The producer waits for each button to be handled so that a
//! save captures exactly what was drawn before it.

use std::path::PathBuf;
use std::sync::Arc;

use signpad_core::export::{Exporter, Platform};
use signpad_core::pointer::SinglePointerFilter;
use signpad_core::queue::{Revision, SessionQueue};
use signpad_core::render::{
    raster::Canvas,
    surface::{RenderBinding, RenderSurface},
};

use crate::script::{Script, ScriptEvent};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Button {
    Reset,
    Save,
}
struct ButtonPress {
    button: Button,
    handled: tokio::sync::oneshot::Sender<()>,
}

/// What happened over one script.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct PlayReport {
    /// Gesture commands that made it past the pointer filter.
    pub dispatched: usize,
    pub resets: usize,
    pub saved: Vec<PathBuf>,
    pub failed_saves: usize,
    /// Committed strokes once the script finished.
    pub strokes: usize,
    pub revision: Revision,
}

pub struct Host {
    queue: SessionQueue,
    binding: RenderBinding,
    exporter: Exporter,
}
impl Host {
    pub fn new(width: u32, height: u32, platform: Platform) -> anyhow::Result<Self> {
        let queue = SessionQueue::new();
        let surface = RenderSurface::new();
        let binding = RenderBinding::new(&queue, Canvas::new(width, height)?, surface.clone());
        let exporter = Exporter::new(platform, Arc::new(surface));
        Ok(Self {
            queue,
            binding,
            exporter,
        })
    }
    #[must_use]
    pub fn surface(&self) -> &RenderSurface {
        self.binding.surface()
    }
    /// Apply dispatched commands and redraw if anything changed.
    fn sync(&mut self) -> anyhow::Result<()> {
        self.queue.pump();
        if let Some(revision) = self.binding.render_if_changed()? {
            log::trace!("Synced to {revision}");
        }
        Ok(())
    }
    /// Replay a script against the session, which persists across calls.
    pub async fn play(&mut self, script: Script) -> anyhow::Result<PlayReport> {
        let (send, mut presses) = tokio::sync::mpsc::unbounded_channel::<ButtonPress>();
        let dispatcher = self.queue.dispatcher();

        let producer = std::thread::Builder::new()
            .name("Gesture source".to_owned())
            .spawn(move || {
                let mut filter = SinglePointerFilter::new();
                let mut dispatched = 0usize;
                for event in script.events {
                    let button = match event {
                        ScriptEvent::Reset => Button::Reset,
                        ScriptEvent::Save => Button::Save,
                        ref other => {
                            for command in other
                                .pointer_events()
                                .into_iter()
                                .filter_map(|e| filter.process(e))
                            {
                                if dispatcher.send(command).is_err() {
                                    log::warn!("Session closed during playback");
                                    return dispatched;
                                }
                                dispatched += 1;
                            }
                            continue;
                        }
                    };
                    let (handled, wait) = tokio::sync::oneshot::channel();
                    if send.send(ButtonPress { button, handled }).is_err() {
                        break;
                    }
                    // Host dropped the press without answering, it's shutting down.
                    if wait.blocking_recv().is_err() {
                        break;
                    }
                }
                dispatched
            })?;

        let mut report = PlayReport::default();
        while let Some(ButtonPress { button, handled }) = presses.recv().await {
            self.sync()?;
            match button {
                Button::Reset => {
                    log::debug!("Reset pressed");
                    self.queue.reset();
                    self.sync()?;
                    report.resets += 1;
                }
                Button::Save => {
                    log::debug!("Save pressed");
                    // The user has already been alerted of failures.
                    match self.exporter.save().await {
                        Ok(path) => report.saved.push(path),
                        Err(_) => report.failed_saves += 1,
                    }
                }
            }
            let _ = handled.send(());
        }
        // Normally finished by now, but joining still blocks.
        report.dispatched = tokio::task::spawn_blocking(move || producer.join())
            .await?
            .map_err(|_| anyhow::anyhow!("gesture source panicked"))?;

        self.sync()?;
        let (strokes, revision) = self
            .queue
            .read_with(|state, revision| (state.strokes().len(), revision));
        report.strokes = strokes;
        report.revision = revision;
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::Host;
    use crate::global::preferences::{PermissionPolicy, Settings};
    use crate::script::Script;

    const STROKE_THEN_SAVE: &str = r#"
        [[event]]
        kind = "down"
        x = 1.0
        y = 1.0
        [[event]]
        kind = "move"
        x = 6.0
        y = 6.0
        [[event]]
        kind = "up"
        [[event]]
        kind = "save"
    "#;

    fn host(name: &str, policy: PermissionPolicy) -> (Host, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("signpad-host-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        let settings = Settings {
            cache_dir: Some(root.join("cache")),
            gallery_dir: Some(root.join("gallery")),
            media_permission: policy,
            ..Settings::default()
        };
        let platform = crate::platform::desktop(&settings).unwrap();
        (Host::new(8, 8, platform).unwrap(), root)
    }

    #[tokio::test]
    async fn stroke_is_saved_to_gallery() {
        let (mut host, root) = host("save", PermissionPolicy::Grant);
        let report = host
            .play(Script::parse(STROKE_THEN_SAVE).unwrap())
            .await
            .unwrap();
        assert_eq!(report.dispatched, 3);
        assert_eq!(report.strokes, 1);
        assert_eq!(report.failed_saves, 0);
        assert_eq!(report.saved.len(), 1);

        let name = report.saved[0].file_name().unwrap();
        let bytes = std::fs::read(root.join("gallery").join(name)).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        // Moved, not copied.
        assert!(!report.saved[0].exists());
        let _ = std::fs::remove_dir_all(root);
    }
    #[tokio::test]
    async fn path_strokes_replay_as_drags() {
        let (mut host, root) = host("stroke", PermissionPolicy::Deny);
        let report = host
            .play(
                Script::parse(
                    r#"
                    [[event]]
                    kind = "stroke"
                    path = "M1 1L6 1L6 6"
                    [[event]]
                    kind = "stroke"
                    path = "M3 3"
                    "#,
                )
                .unwrap(),
            )
            .await
            .unwrap();
        // Down, two moves, up; then down, up.
        assert_eq!(report.dispatched, 6);
        assert_eq!(report.strokes, 2);
        let first = host
            .queue
            .read_with(|state, _| state.strokes().get(0).map(ToString::to_string));
        assert_eq!(first.as_deref(), Some("M1 1L6 1L6 6"));
        let _ = std::fs::remove_dir_all(root);
    }
    #[tokio::test]
    async fn denied_save_keeps_drawing() {
        let (mut host, root) = host("deny", PermissionPolicy::Deny);
        let report = host
            .play(Script::parse(STROKE_THEN_SAVE).unwrap())
            .await
            .unwrap();
        assert!(report.saved.is_empty());
        assert_eq!(report.failed_saves, 1);
        assert_eq!(report.strokes, 1);
        assert!(!root.join("gallery").exists());
        let _ = std::fs::remove_dir_all(root);
    }
    #[tokio::test]
    async fn reset_then_more_strokes() {
        let (mut host, root) = host("reset", PermissionPolicy::Deny);
        host.play(Script::parse(STROKE_THEN_SAVE).unwrap())
            .await
            .unwrap();
        let report = host
            .play(
                Script::parse(
                    r#"
                    [[event]]
                    kind = "reset"
                    [[event]]
                    kind = "down"
                    x = 2.0
                    y = 2.0
                    [[event]]
                    kind = "up"
                    "#,
                )
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(report.resets, 1);
        assert_eq!(report.strokes, 1);
        // The surface caught up with the last change.
        assert_eq!(host.surface().revision(), Some(report.revision));
        let _ = std::fs::remove_dir_all(root);
    }
}
