//! Fixed-name artifact files on the local filesystem.

use std::path::{Path, PathBuf};

use campaign_core::{ArtifactKind, CampaignError, CampaignResult, ImageBlob};
use image::{ImageFormat, RgbImage};
use tracing::{debug, info};

use crate::banner::draw_logo_placeholder;

/// Directory holding generated images. Every write overwrites the previous
/// file of the same kind.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    pub fn exists(&self, kind: ArtifactKind) -> bool {
        self.path(kind).is_file()
    }

    /// Write an image as PNG.
    pub fn save_png(&self, kind: ArtifactKind, img: &RgbImage) -> CampaignResult<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path(kind);
        img.save_with_format(&path, ImageFormat::Png)
            .map_err(|e| CampaignError::render(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Artifact written");
        Ok(path)
    }

    /// Decode an image returned by the model and store it as PNG.
    pub fn save_generated(&self, kind: ArtifactKind, blob: &ImageBlob) -> CampaignResult<PathBuf> {
        let decoded = image::load_from_memory(&blob.data).map_err(|e| {
            CampaignError::render(format!("image {} illisible: {}", blob.mime_type, e))
        })?;
        self.save_png(kind, &decoded.to_rgb8())
    }

    /// Raw bytes of a stored artifact.
    pub fn read(&self, kind: ArtifactKind) -> CampaignResult<Vec<u8>> {
        Ok(std::fs::read(self.path(kind))?)
    }

    /// Make sure a logo exists, drawing the placeholder when it does not.
    pub fn ensure_logo(&self) -> CampaignResult<PathBuf> {
        if self.exists(ArtifactKind::Logo) {
            return Ok(self.path(ArtifactKind::Logo));
        }
        info!(dir = %self.root.display(), "No logo found, drawing placeholder");
        self.save_png(ArtifactKind::Logo, &draw_logo_placeholder())
    }

    /// The logo decoded to RGB, if one exists and is readable.
    pub fn load_logo(&self) -> Option<RgbImage> {
        let path = self.path(ArtifactKind::Logo);
        match image::open(&path) {
            Ok(img) => Some(img.to_rgb8()),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Logo unavailable");
                None
            }
        }
    }
}
