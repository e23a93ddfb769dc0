//! Image producers: the procedural compositor and the remote text-to-image
//! client.

pub mod compositor;
pub mod factory;
pub mod http_client;
pub mod remote;
pub mod scrub;
pub mod traits;

pub use compositor::LocalCompositor;
pub use factory::create_producer;
pub use remote::RemoteImageProducer;
pub use traits::{ImageProducer, RenderFuture, RenderRequest};

use crate::error::GenerationError;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Flatten to RGB and encode as PNG.
pub fn encode_png(image: RgbaImage) -> Result<Vec<u8>, GenerationError> {
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let mut bytes = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| GenerationError::Render(format!("PNG encoding failed: {e}")))?;
    Ok(bytes)
}
