use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// URL prefix under which generated images are served.
pub const GENERATED_ROUTE: &str = "/generated";
/// URL prefix under which curated inspiration images are served.
pub const INSPIRATION_ROUTE: &str = "/inspiration";

/// Raster formats accepted in the artifact directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
}

/// A rendered image saved under the generated directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// `<uuid>.png`
    pub file_name: String,
    pub path: PathBuf,
    /// Browser path, e.g. `/generated/<uuid>.png`
    pub public_path: String,
}

impl GeneratedArtifact {
    pub fn new(file_name: impl Into<String>, path: PathBuf) -> Self {
        let file_name = file_name.into();
        let public_path = format!("{GENERATED_ROUTE}/{file_name}");
        Self {
            file_name,
            path,
            public_path,
        }
    }
}
