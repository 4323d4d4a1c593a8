use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    config::AppConfig,
    db,
    models::{HttpModelLoader, ModelCache, ModelLoader},
    pipelines::{Paraphraser, Summarizer},
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub summarizer: Arc<Summarizer>,
    pub paraphraser: Arc<Paraphraser>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;

        let loader = HttpModelLoader::new(
            &config.models.inference_url,
            config.models.api_token.clone(),
        );
        let models = ModelCache::new(Arc::new(loader));

        Ok(Self::from_parts(db, config, models))
    }

    /// Both pipelines share one model cache, so a model used for summaries
    /// and paraphrases is loaded once.
    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, models: ModelCache) -> Self {
        let summarizer = Summarizer::new(models.clone(), config.models.summary_model.clone());
        let paraphraser = Paraphraser::new(models, config.models.paraphrase_model.clone());
        Self {
            db,
            config,
            summarizer: Arc::new(summarizer),
            paraphraser: Arc::new(paraphraser),
        }
    }

    /// Migrated in-memory database with test configuration and the given
    /// model loader.
    pub async fn in_memory(loader: Arc<dyn ModelLoader>) -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::for_tests());
        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;
        Ok(Self::from_parts(db, config, ModelCache::new(loader)))
    }
}
