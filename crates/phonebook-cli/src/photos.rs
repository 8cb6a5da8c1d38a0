use anyhow::{anyhow, Context as _, Result};
use phonebook_store::paths;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::invalid_input;

pub const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

/// Where contact pictures live. Contacts only keep the returned path.
pub trait PhotoStore {
    /// Copies `source` into the store and returns the stored path.
    fn save(&self, source: &Path) -> Result<String>;
    fn delete(&self, stored: &str) -> Result<()>;
}

/// Keeps photos as plain files under the photos directory, one fresh UUID
/// name per saved image.
pub struct FsPhotoStore {
    custom_dir: Option<PathBuf>,
}

impl FsPhotoStore {
    pub fn new(custom_dir: Option<PathBuf>) -> Self {
        Self { custom_dir }
    }

    fn dir(&self) -> Result<PathBuf> {
        paths::resolve_photos_dir(self.custom_dir.clone()).with_context(|| "resolve photos directory")
    }
}

impl PhotoStore for FsPhotoStore {
    fn save(&self, source: &Path) -> Result<String> {
        let ext = photo_extension(source)?;
        if !source.is_file() {
            return Err(invalid_input(format!(
                "photo not found: {}",
                source.display()
            )));
        }
        let dest = self.dir()?.join(format!("{}.{}", Uuid::new_v4(), ext));
        fs::copy(source, &dest)
            .with_context(|| format!("copy photo {} to {}", source.display(), dest.display()))?;
        debug!(from = %source.display(), to = %dest.display(), "photo stored");
        dest.to_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("photo path is not valid UTF-8: {}", dest.display()))
    }

    fn delete(&self, stored: &str) -> Result<()> {
        if stored.trim().is_empty() {
            return Ok(());
        }
        match fs::remove_file(stored) {
            Ok(()) => {
                debug!(path = stored, "photo removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove photo {stored}")),
        }
    }
}

/// Removes a photo that is no longer referenced. Failures are only logged.
pub fn release(photos: &dyn PhotoStore, stored: &str) {
    if let Err(err) = photos.delete(stored) {
        warn!(error = %err, path = stored, "failed to remove photo");
    }
}

fn photo_extension(source: &Path) -> Result<String> {
    let ext = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(invalid_input(format!(
            "unsupported photo type {}: expected one of {}",
            source.display(),
            PHOTO_EXTENSIONS.join(", ")
        )))
    }
}
