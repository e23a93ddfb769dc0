use super::detection::{detect_kind, kind_from_extension};
use super::types::{GeneratedArtifact, ImageKind};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const MAX_ARTIFACT_BYTES: usize = 20 * 1_024 * 1_024;
const CURATED_PREFIX: &str = "inspiration_";

/// Generated images plus the curated inspiration pool fed by 5-star ratings.
pub struct ArtifactStore {
    generated_dir: PathBuf,
    inspiration_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(generated_dir: impl Into<PathBuf>, inspiration_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            generated_dir: generated_dir.into(),
            inspiration_dir: inspiration_dir.into(),
        };
        std::fs::create_dir_all(&store.generated_dir).with_context(|| {
            format!("Failed to create {}", store.generated_dir.display())
        })?;
        std::fs::create_dir_all(&store.inspiration_dir).with_context(|| {
            format!("Failed to create {}", store.inspiration_dir.display())
        })?;
        Ok(store)
    }

    #[must_use]
    pub fn generated_dir(&self) -> &Path {
        &self.generated_dir
    }

    #[must_use]
    pub fn inspiration_dir(&self) -> &Path {
        &self.inspiration_dir
    }

    /// Write PNG bytes under a fresh `<uuid>.png` name.
    pub async fn save_generated(&self, png: &[u8]) -> Result<GeneratedArtifact> {
        if png.len() > MAX_ARTIFACT_BYTES {
            anyhow::bail!(
                "image size {} exceeds maximum {} bytes",
                png.len(),
                MAX_ARTIFACT_BYTES
            );
        }
        if detect_kind(png) != Some(ImageKind::Png) {
            anyhow::bail!("generated artifact is not a PNG image");
        }

        let file_name = format!("{}.png", uuid::Uuid::new_v4());
        let path = self.generated_dir.join(&file_name);
        tokio::fs::write(&path, png)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!(file = %file_name, bytes = png.len(), "saved generated image");
        Ok(GeneratedArtifact::new(file_name, path))
    }

    /// Copy a generated image into the inspiration pool. Returns `None` when
    /// the source file no longer exists.
    pub async fn promote_to_curated(&self, artifact: &GeneratedArtifact) -> Result<Option<PathBuf>> {
        if !tokio::fs::try_exists(&artifact.path).await.unwrap_or(false) {
            tracing::warn!(file = %artifact.file_name, "generated image missing; nothing to promote");
            return Ok(None);
        }

        let target = self
            .inspiration_dir
            .join(format!("{CURATED_PREFIX}{}.png", uuid::Uuid::new_v4()));
        tokio::fs::copy(&artifact.path, &target)
            .await
            .with_context(|| format!("Failed to promote {}", artifact.file_name))?;

        tracing::info!(source = %artifact.file_name, target = %target.display(), "promoted to inspiration pool");
        Ok(Some(target))
    }

    /// Every image file in the inspiration pool, sorted by name.
    pub async fn curated_images(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.inspiration_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to list {}", self.inspiration_dir.display())
                });
            }
        };

        let mut images = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read inspiration entry")?
        {
            let path = entry.path();
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if is_file && kind_from_extension(&path).is_some() {
                images.push(path);
            }
        }
        images.sort();
        Ok(images)
    }
}
