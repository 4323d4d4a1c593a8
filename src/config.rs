use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
    pub remember_ttl_hours: i64,
}

/// Where the seq2seq models live and which ones each pipeline uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub inference_url: String,
    pub api_token: Option<String>,
    pub summary_model: String,
    pub paraphrase_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub models: ModelConfig,
}

const DEFAULT_MODEL: &str = "google/pegasus-xsum";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://textmorph.db?mode=rwc".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "textmorph".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "textmorph-users".into()),
            ttl_hours: env_i64("JWT_TTL_HOURS").unwrap_or(1),
            remember_ttl_hours: env_i64("JWT_REMEMBER_TTL_HOURS").unwrap_or(168),
        };
        let models = ModelConfig {
            inference_url: std::env::var("INFERENCE_URL")
                .unwrap_or_else(|_| "https://api-inference.huggingface.co".into()),
            api_token: std::env::var("INFERENCE_TOKEN").ok().filter(|t| !t.is_empty()),
            summary_model: std::env::var("SUMMARY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            paraphrase_model: std::env::var("PARAPHRASE_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.into()),
        };
        Ok(Self {
            database_url,
            jwt,
            models,
        })
    }

    /// Configuration used by unit and HTTP tests.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_hours: 1,
                remember_ttl_hours: 168,
            },
            models: ModelConfig {
                inference_url: "http://localhost:0".into(),
                api_token: None,
                summary_model: DEFAULT_MODEL.into(),
                paraphrase_model: DEFAULT_MODEL.into(),
            },
        }
    }
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.parse::<i64>().ok())
}
