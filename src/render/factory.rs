use super::compositor::LocalCompositor;
use super::remote::RemoteImageProducer;
use super::traits::ImageProducer;
use crate::catalog::Catalog;
use crate::config::{Config, ImageBackend};
use crate::media::ArtifactStore;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

/// Build the configured image producer.
pub fn create_producer(
    config: &Config,
    catalog: Arc<Catalog>,
    artifacts: Arc<ArtifactStore>,
    rng: Arc<Mutex<StdRng>>,
) -> Arc<dyn ImageProducer> {
    let producer: Arc<dyn ImageProducer> = match config.image.backend {
        ImageBackend::Local => Arc::new(LocalCompositor::new(
            config.image.width,
            config.image.height,
            catalog,
            artifacts,
            rng,
        )),
        ImageBackend::Remote => Arc::new(RemoteImageProducer::new(&config.image)),
    };
    tracing::info!(
        backend = producer.name(),
        width = config.image.width,
        height = config.image.height,
        "image producer ready"
    );
    producer
}
