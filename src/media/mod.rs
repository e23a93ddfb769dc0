pub mod detection;
pub mod storage;
pub mod types;

pub use storage::ArtifactStore;
pub use types::{GENERATED_ROUTE, GeneratedArtifact, INSPIRATION_ROUTE, ImageKind};
