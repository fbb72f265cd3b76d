//! # Desktop platform
//!
//! Stand-ins for the mobile platform services export relies on. The cache is a directory under the user's cache
//! dir, the "photo library" is a directory under their pictures, and permission prompts go to the terminal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use signpad_core::export::{
    decode_base64, Alert, Alerts, CacheStorage, MediaLibrary, MediaPermissions, PermissionStatus,
    Platform,
};

use crate::global::preferences::{PermissionPolicy, Settings};

pub struct PolicyPermissions {
    policy: PermissionPolicy,
    gallery: PathBuf,
}
#[async_trait::async_trait]
impl MediaPermissions for PolicyPermissions {
    async fn request(&self) -> PermissionStatus {
        match self.policy {
            PermissionPolicy::Grant => PermissionStatus::Granted,
            PermissionPolicy::Deny => PermissionStatus::Denied,
            PermissionPolicy::Ask => {
                let question = format!("Allow signpad to save images to {:?}? [y/N] ", self.gallery);
                // Reading stdin blocks, keep it off the event loop.
                match tokio::task::spawn_blocking(move || ask(&question)).await {
                    Ok(true) => PermissionStatus::Granted,
                    Ok(false) => PermissionStatus::Denied,
                    Err(e) => {
                        log::warn!("Permission prompt failed: {e}");
                        PermissionStatus::Denied
                    }
                }
            }
        }
    }
}
fn ask(question: &str) -> bool {
    use std::io::Write;
    print!("{question}");
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
}

pub struct DirectoryCache {
    dir: PathBuf,
}
#[async_trait::async_trait]
impl CacheStorage for DirectoryCache {
    fn cache_dir(&self) -> PathBuf {
        self.dir.clone()
    }
    async fn write_base64(&self, path: &Path, data: &str) -> std::io::Result<()> {
        let bytes = decode_base64(data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await
    }
}

/// Moves imported files into a gallery directory.
pub struct DirectoryLibrary {
    dir: PathBuf,
}
#[async_trait::async_trait]
impl MediaLibrary for DirectoryLibrary {
    async fn create_asset(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;
        let name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("{path:?} has no file name"))?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating gallery {:?}", self.dir))?;
        let destination = self.dir.join(name);
        tokio::fs::copy(path, &destination)
            .await
            .with_context(|| format!("copying into {destination:?}"))?;
        // The copy is what matters, a stale cache file is harmless.
        if let Err(e) = tokio::fs::remove_file(path).await {
            log::warn!("Failed to clean up {path:?}: {e}");
        }
        log::debug!("Imported {destination:?}");
        Ok(())
    }
}

/// Shows alerts on the terminal.
pub struct ConsoleAlerts;
impl Alerts for ConsoleAlerts {
    fn alert(&self, alert: Alert) {
        log::info!("Alert: {alert:?}");
        println!("{}", alert.message());
    }
}

/// Resolve the directories and build the desktop platform.
pub fn desktop(settings: &Settings) -> anyhow::Result<Platform> {
    let cache = match &settings.cache_dir {
        Some(dir) => dir.clone(),
        None => dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("No cache dir found"))?
            .join(env!("CARGO_PKG_NAME")),
    };
    let gallery = match &settings.gallery_dir {
        Some(dir) => dir.clone(),
        None => dirs::picture_dir()
            .ok_or_else(|| anyhow::anyhow!("No pictures dir found"))?
            .join(env!("CARGO_PKG_NAME")),
    };
    log::debug!("Caching in {cache:?}, importing into {gallery:?}");

    Ok(Platform {
        permissions: Arc::new(PolicyPermissions {
            policy: settings.media_permission,
            gallery: gallery.clone(),
        }),
        storage: Arc::new(DirectoryCache { dir: cache }),
        library: Arc::new(DirectoryLibrary { dir: gallery }),
        alerts: Arc::new(ConsoleAlerts),
    })
}

#[cfg(test)]
mod test {
    use super::{DirectoryCache, DirectoryLibrary};
    use signpad_core::export::{encode_base64, CacheStorage, MediaLibrary};

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("signpad-test-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn write_then_import_moves_file() {
        let root = scratch("import");
        let cache = DirectoryCache {
            dir: root.join("cache"),
        };
        let library = DirectoryLibrary {
            dir: root.join("gallery"),
        };
        let path = cache.cache_dir().join("signature-1.png");
        cache
            .write_base64(&path, &encode_base64(b"not really a png"))
            .await
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"not really a png");

        library.create_asset(&path).await.unwrap();
        assert!(!path.exists());
        assert_eq!(
            std::fs::read(root.join("gallery/signature-1.png")).unwrap(),
            b"not really a png"
        );
        let _ = std::fs::remove_dir_all(root);
    }
    #[tokio::test]
    async fn bad_base64_writes_nothing() {
        let root = scratch("bad");
        let cache = DirectoryCache { dir: root.clone() };
        let path = root.join("signature-2.png");
        let err = cache.write_base64(&path, "%%%").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(!path.exists());
    }
    #[tokio::test]
    async fn importing_missing_file_fails() {
        let root = scratch("missing");
        let library = DirectoryLibrary {
            dir: root.join("gallery"),
        };
        assert!(library
            .create_asset(&root.join("nope.png"))
            .await
            .is_err());
        let _ = std::fs::remove_dir_all(root);
    }
}
