//! One generation request end to end: select tags, build the prompt, render,
//! save the artifact and log the prompt.

use crate::catalog::Catalog;
use crate::config::{Config, GatingConfig};
use crate::error::GenerationError;
use crate::media::{ArtifactStore, GeneratedArtifact};
use crate::prompt::ScenePromptBuilder;
use crate::render::{ImageProducer, RenderRequest, create_producer};
use crate::selection::{
    HistoryCounts, PromptHistory, PromptRecord, Selection, Selector, included_categories,
};
use crate::store::AggregateStore;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};

/// A finished generation awaiting its rating.
#[derive(Debug, Clone)]
pub struct Generation {
    pub selection: Selection,
    pub prompt: String,
    pub artifact: GeneratedArtifact,
}

/// Rendering failed after the draw. The selection is kept so the same scene
/// can be retried.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct GenerationFailure {
    pub selection: Selection,
    #[source]
    pub error: GenerationError,
}

pub struct Studio {
    catalog: Arc<Catalog>,
    selector: Selector,
    prompts: ScenePromptBuilder,
    producer: Arc<dyn ImageProducer>,
    artifacts: Arc<ArtifactStore>,
    history: PromptHistory,
    gating: Option<GatingConfig>,
    rng: Arc<Mutex<StdRng>>,
}

impl Studio {
    pub fn from_config(
        config: &Config,
        catalog: Arc<Catalog>,
        store: Arc<dyn AggregateStore>,
        artifacts: Arc<ArtifactStore>,
    ) -> Result<Self> {
        let rng = Arc::new(Mutex::new(match config.selection.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }));
        let prompts = ScenePromptBuilder::new(
            config.image.prompt_template.as_deref(),
            catalog.category_names(),
        )?;
        let producer = create_producer(config, catalog.clone(), artifacts.clone(), rng.clone());

        Ok(Self {
            selector: Selector::new(
                store,
                config.selection.weighted,
                config.selection.max_per_category,
            ),
            catalog,
            prompts,
            producer,
            artifacts,
            history: PromptHistory::new(config.prompt_log_path()),
            gating: config.selection.gating.clone(),
            rng,
        })
    }

    /// Swap the image producer, keeping everything else.
    pub fn with_producer(mut self, producer: Arc<dyn ImageProducer>) -> Self {
        self.producer = producer;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn producer_name(&self) -> &str {
        self.producer.name()
    }

    /// Draw a fresh selection, honouring history gating.
    pub async fn select(&self) -> Result<Selection> {
        let counts = match &self.gating {
            Some(gating) => self.history.counts(&gating.primary).await?,
            None => HistoryCounts::default(),
        };
        let included = included_categories(&self.catalog, self.gating.as_ref(), counts);
        let plan = self.selector.plan(&self.catalog, &included).await?;

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        plan.draw(&mut *rng)
    }

    /// Render a selection to PNG bytes along with the prompt used.
    pub async fn render(&self, selection: &Selection) -> Result<(String, Vec<u8>), GenerationError> {
        let prompt = self
            .prompts
            .build(selection)
            .map_err(|e| GenerationError::Render(e.to_string()))?;
        let png = self
            .producer
            .render(RenderRequest {
                selection,
                prompt: &prompt,
            })
            .await?;
        Ok((prompt, png))
    }

    /// Draw and render a new scene.
    pub async fn generate(&self) -> Result<Generation> {
        let selection = self.select().await?;
        self.regenerate(selection).await
    }

    /// Render, save and log an existing selection. Render failures come back
    /// as [`GenerationFailure`] carrying the selection.
    pub async fn regenerate(&self, selection: Selection) -> Result<Generation> {
        let (prompt, png) = match self.render(&selection).await {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::warn!(backend = self.producer.name(), error = %error, "generation failed");
                return Err(GenerationFailure { selection, error }.into());
            }
        };

        let artifact = match self.artifacts.save_generated(&png).await {
            Ok(artifact) => artifact,
            Err(e) => {
                let error = GenerationError::Render(format!("could not save image: {e:#}"));
                return Err(GenerationFailure { selection, error }.into());
            }
        };

        if let Err(e) = self
            .history
            .append(&PromptRecord::new(prompt.clone(), &selection))
            .await
        {
            tracing::warn!(error = %e, "failed to append prompt history");
        }

        tracing::info!(
            backend = self.producer.name(),
            file = %artifact.file_name,
            categories = selection.categories().count(),
            "generated image"
        );
        Ok(Generation {
            selection,
            prompt,
            artifact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderFuture;
    use crate::store::TextLogStore;
    use tempfile::TempDir;

    struct FailingProducer;

    impl ImageProducer for FailingProducer {
        fn name(&self) -> &str {
            "failing"
        }

        fn render<'a>(&'a self, _request: RenderRequest<'a>) -> RenderFuture<'a> {
            Box::pin(async { Err(GenerationError::Transport("request timed out".into())) })
        }
    }

    async fn studio(tmp: &TempDir, configure: impl FnOnce(&mut Config)) -> Studio {
        let mut config = Config {
            workspace_dir: tmp.path().to_path_buf(),
            ..Config::default()
        };
        config.image.width = 180;
        config.image.height = 104;
        config.selection.seed = Some(11);
        configure(&mut config);

        let catalog = Arc::new(config.validate().unwrap());
        let store: Arc<dyn AggregateStore> =
            Arc::new(TextLogStore::open(&config.rating_log_path()).await.unwrap());
        let artifacts = Arc::new(
            ArtifactStore::new(config.generated_dir(), config.inspiration_dir()).unwrap(),
        );
        Studio::from_config(&config, catalog, store, artifacts).unwrap()
    }

    #[tokio::test]
    async fn generate_saves_artifact_and_logs_prompt() {
        let tmp = TempDir::new().unwrap();
        let studio = studio(&tmp, |_| {}).await;

        let generation = studio.generate().await.unwrap();
        assert!(generation.artifact.path.exists());
        assert_eq!(generation.selection.categories().count(), 4);
        assert!(generation.prompt.contains(&generation.selection.joined("actors")));

        let records = studio.history.records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prompt, generation.prompt);
    }

    #[tokio::test]
    async fn failure_keeps_the_selection() {
        let tmp = TempDir::new().unwrap();
        let studio = studio(&tmp, |_| {})
            .await
            .with_producer(Arc::new(FailingProducer));

        let selection = Selection::new().with("actors", &["a grumpy cat"]);
        let err = studio.regenerate(selection.clone()).await.unwrap_err();
        let failure = err.downcast::<GenerationFailure>().unwrap();
        assert_eq!(failure.selection, selection);
        assert!(matches!(failure.error, GenerationError::Transport(_)));
        assert!(studio.history.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn gating_skips_primary_until_its_turn() {
        let tmp = TempDir::new().unwrap();
        let studio = studio(&tmp, |config| {
            config.selection.gating = Some(GatingConfig {
                primary: "accessories".into(),
                primary_every: 2,
                companion: None,
                companion_every: 3,
            });
        })
        .await;

        let first = studio.generate().await.unwrap();
        assert!(!first.selection.contains_category("accessories"));
        let second = studio.generate().await.unwrap();
        assert!(second.selection.contains_category("accessories"));
    }

    #[tokio::test]
    async fn same_seed_draws_the_same_selection() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let a = studio(&first, |_| {}).await.select().await.unwrap();
        let b = studio(&second, |_| {}).await.select().await.unwrap();
        assert_eq!(a, b);
    }
}
