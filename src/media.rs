//! Storage for uploaded photos and logos
//!
//! Files are written below the configured media root at
//! `jobmarket/user_<id>/<kind>/<random><ext>` and served back under the
//! media URL prefix.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::validators::extension_for;

const MEDIA_NAMESPACE: &str = "jobmarket";

/// Which profile image an upload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    WorkerPhoto,
    EmployerLogo,
    EmployerPhoto,
}

impl MediaKind {
    fn directory(&self) -> &'static str {
        match self {
            MediaKind::WorkerPhoto => "worker",
            MediaKind::EmployerLogo => "employer/logo",
            MediaKind::EmployerPhoto => "employer/photo",
        }
    }
}

/// Writes uploads to disk and maps stored paths to public URLs
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStorage {
    /// ### Arguments
    ///
    /// * `root` - Directory uploads are written to
    /// * `url_prefix` - URL prefix media is served under, e.g. `/media/`
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Builds the relative path a new upload will be stored under
    pub fn relative_path(user_id: &str, kind: MediaKind, content_type: &str) -> String {
        format!(
            "{}/user_{}/{}/{}{}",
            MEDIA_NAMESPACE,
            user_id,
            kind.directory(),
            Uuid::new_v4().simple(),
            extension_for(content_type)
        )
    }

    /// Stores `bytes` and returns the relative path to keep in the database
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, user_id: &str, kind: MediaKind, content_type: &str, bytes: &[u8]) -> Result<String> {
        let relative = Self::relative_path(user_id, kind, content_type);
        let full = self.root.join(&relative);

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create media directory {:?}", parent))?;
        }
        tokio::fs::write(&full, bytes)
            .await
            .with_context(|| format!("Failed to write media file {:?}", full))?;

        debug!("Stored media file at {}", relative);
        Ok(relative)
    }

    /// Removes a stored file; a file that is already gone is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, relative: &str) -> Result<()> {
        let full = self.resolve(relative)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => {
                debug!("Removed media file {}", relative);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove media file {:?}", full)),
        }
    }

    /// Public URL of a stored file
    pub fn url(&self, relative: &str) -> String {
        format!("{}{}", self.url_prefix, relative)
    }

    /// Joins `relative` onto the media root, refusing paths that escape it
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        if path.components().any(|c| !matches!(c, Component::Normal(_))) {
            bail!("Invalid media path: {}", relative);
        }
        Ok(self.root.join(path))
    }
}
