use crate::error::GenerationError;
use crate::selection::Selection;
use std::future::Future;
use std::pin::Pin;

pub type RenderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<u8>, GenerationError>> + Send + 'a>>;

/// What a producer gets to work with for one image.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub selection: &'a Selection,
    /// Scene prompt built from the selection
    pub prompt: &'a str,
}

/// Turns a selection into PNG bytes.
pub trait ImageProducer: Send + Sync {
    /// Backend identifier (e.g. "local", "remote").
    fn name(&self) -> &str;

    /// Render one image. Failures are recoverable and never retried here.
    fn render<'a>(&'a self, request: RenderRequest<'a>) -> RenderFuture<'a>;
}
