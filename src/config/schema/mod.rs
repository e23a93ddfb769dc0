mod catalog;
mod core;
mod image;
mod selection;
mod server;
mod store;

pub use catalog::{CatalogConfig, CategoryConfig, TagEntry};
pub use self::core::Config;
pub use self::image::{DEFAULT_IMAGE_API_URL, ImageBackend, ImageConfig};
pub use selection::{GatingConfig, SelectionConfig};
pub use server::{DEFAULT_SECRET_KEY, ServerConfig};
pub use store::{StoreBackend, StoreConfig};
