use std::sync::Arc;

use moka::future::Cache;
use tracing::{info, warn};

use super::{ModelError, ModelLoader, Seq2SeqModel};

/// Models resolved once per process and shared by every request.
///
/// Unbounded and never evicts; concurrent first lookups of the same name
/// wait on a single load.
#[derive(Clone)]
pub struct ModelCache {
    loader: Arc<dyn ModelLoader>,
    models: Cache<String, Arc<dyn Seq2SeqModel>>,
}

impl ModelCache {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            models: Cache::builder().build(),
        }
    }

    pub async fn get(&self, name: &str) -> Result<Arc<dyn Seq2SeqModel>, Arc<ModelError>> {
        let loader = self.loader.clone();
        let model_name = name.to_string();
        self.models
            .try_get_with(name.to_string(), async move {
                info!(model = %model_name, "loading model");
                loader.load(&model_name).await
            })
            .await
            .map_err(|e| {
                warn!(model = %name, error = %e, "model load failed");
                e
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{FakeLoader, FakeModel};

    #[tokio::test]
    async fn loads_each_model_once() {
        let loader = FakeLoader::serving(FakeModel::echo_words("m", 3));
        let cache = ModelCache::new(loader.clone());

        let a = cache.get("pegasus").await.expect("first");
        let b = cache.get("pegasus").await.expect("second");
        assert_eq!(a.name(), b.name());
        assert_eq!(loader.load_count(), 1);

        cache.get("bart").await.expect("other model");
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let loader = FakeLoader::failing();
        let cache = ModelCache::new(loader.clone());

        assert!(cache.get("pegasus").await.is_err());
        assert!(cache.get("pegasus").await.is_err());
        assert_eq!(loader.load_count(), 2);
    }
}
