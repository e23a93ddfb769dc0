pub mod schema;

pub use schema::{
    CatalogConfig, CategoryConfig, Config, DEFAULT_IMAGE_API_URL, DEFAULT_SECRET_KEY,
    GatingConfig, ImageBackend, ImageConfig, SelectionConfig, ServerConfig, StoreBackend,
    StoreConfig, TagEntry,
};
