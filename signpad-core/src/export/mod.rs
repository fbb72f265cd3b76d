//! # Export
//!
//! Saving the drawing to the user's photo library. The platform pieces (permission prompt, cache storage, media
//! library, alert dialogs) are traits, so hosts can supply their own and tests can supply fakes.
//!
//! A save walks through [`SaveStage`]s, any of which can end it early:
//! permission → snapshot → encode and write → import. Exporting only ever reads the [render
//! surface](crate::render::surface::RenderSurface), never the session.

mod encode;
mod naming;

pub use encode::{decode_base64, encode_base64, encode_png};
pub use naming::FileNamer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::render::surface::Snapshot;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[async_trait::async_trait]
pub trait MediaPermissions: Send + Sync {
    /// Ask for permission to write to the media library. Called on every save, grants are never cached.
    async fn request(&self) -> PermissionStatus;
}
pub trait SnapshotSource: Send + Sync {
    /// The frame currently displayed. `None` if nothing has been rendered yet.
    fn snapshot(&self) -> Option<Snapshot>;
}
#[async_trait::async_trait]
pub trait CacheStorage: Send + Sync {
    /// Directory for temporary files.
    fn cache_dir(&self) -> PathBuf;
    /// Decode base64 `data` and write the bytes to `path`.
    async fn write_base64(&self, path: &Path, data: &str) -> std::io::Result<()>;
}
#[async_trait::async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Import the file into permanent, user-visible storage.
    async fn create_asset(&self, path: &Path) -> anyhow::Result<()>;
}
pub trait Alerts: Send + Sync {
    fn alert(&self, alert: Alert);
}

/// User-visible notifications.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Alert {
    PermissionDenied,
    Saved,
    Failed,
}
impl Alert {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Sorry, we need camera roll permissions to save the image!",
            Self::Saved => "Signature saved to photos!",
            Self::Failed => "Failed to save signature",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SaveStage {
    #[default]
    Idle,
    AwaitingPermission,
    AwaitingSnapshot,
    Writing,
    Importing,
    Done,
    Failed,
}

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("media library permission denied")]
    PermissionDenied,
    #[error("nothing has been rendered")]
    SnapshotUnavailable,
    #[error("encoding png: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("writing {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("importing into media library: {0:#}")]
    Import(anyhow::Error),
}

/// The platform capabilities a save needs.
#[derive(Clone)]
pub struct Platform {
    pub permissions: Arc<dyn MediaPermissions>,
    pub storage: Arc<dyn CacheStorage>,
    pub library: Arc<dyn MediaLibrary>,
    pub alerts: Arc<dyn Alerts>,
}

pub struct Exporter {
    platform: Platform,
    snapshots: Arc<dyn SnapshotSource>,
    names: FileNamer,
    stage: tokio::sync::watch::Sender<SaveStage>,
}
impl Exporter {
    #[must_use]
    pub fn new(platform: Platform, snapshots: Arc<dyn SnapshotSource>) -> Self {
        Self {
            platform,
            snapshots,
            names: FileNamer::new(),
            stage: tokio::sync::watch::Sender::new(SaveStage::Idle),
        }
    }
    #[must_use]
    pub fn with_namer(self, names: FileNamer) -> Self {
        Self { names, ..self }
    }
    /// The stage of the most recent save.
    #[must_use]
    pub fn stage(&self) -> SaveStage {
        *self.stage.borrow()
    }
    fn enter(&self, stage: SaveStage) {
        log::debug!("Save: {stage}");
        self.stage.send_replace(stage);
    }
    /// Save the displayed frame to the media library, alerting the user of the outcome.
    ///
    /// Returns the path of the written file on success. Failures are already reported to the user, the
    /// error is for callers that care.
    pub async fn save(&self) -> Result<PathBuf, SaveError> {
        let result = self.try_save().await;
        match &result {
            Ok(path) => {
                log::info!("Saved signature from {path:?}");
                self.enter(SaveStage::Done);
                self.platform.alerts.alert(Alert::Saved);
            }
            Err(SaveError::PermissionDenied) => {
                log::warn!("Media library permission denied");
                self.enter(SaveStage::Failed);
                self.platform.alerts.alert(Alert::PermissionDenied);
            }
            Err(e) => {
                log::error!("Failed to save signature: {e}");
                self.enter(SaveStage::Failed);
                self.platform.alerts.alert(Alert::Failed);
            }
        }
        result
    }
    async fn try_save(&self) -> Result<PathBuf, SaveError> {
        self.enter(SaveStage::AwaitingPermission);
        if self.platform.permissions.request().await != PermissionStatus::Granted {
            return Err(SaveError::PermissionDenied);
        }

        self.enter(SaveStage::AwaitingSnapshot);
        let snapshot = self
            .snapshots
            .snapshot()
            .ok_or(SaveError::SnapshotUnavailable)?;

        self.enter(SaveStage::Writing);
        let data = encode_base64(&encode_png(&snapshot)?);
        let path = self.platform.storage.cache_dir().join(self.names.next_name());
        if let Err(source) = self.platform.storage.write_base64(&path, &data).await {
            return Err(SaveError::Write { path, source });
        }

        self.enter(SaveStage::Importing);
        self.platform
            .library
            .create_asset(&path)
            .await
            .map_err(SaveError::Import)?;
        Ok(path)
    }
}
