use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, state::AppState};

/// Identity token payload. `sub` is the username.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// HS256 keys plus the two validity windows: a normal session and a
/// "remember me" session.
#[derive(Clone)]
pub struct TokenKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub session_ttl: Duration,
    pub remember_ttl: Duration,
}

impl From<&JwtConfig> for TokenKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            session_ttl: Duration::from_secs((cfg.ttl_hours.max(0) as u64) * 3600),
            remember_ttl: Duration::from_secs((cfg.remember_ttl_hours.max(0) as u64) * 3600),
        }
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        TokenKeys::from(&state.config.jwt)
    }
}

impl TokenKeys {
    pub fn ttl(&self, remember: bool) -> Duration {
        if remember {
            self.remember_ttl
        } else {
            self.session_ttl
        }
    }

    pub fn issue(&self, username: &str, remember: bool) -> anyhow::Result<(String, Claims)> {
        self.issue_at(username, remember, OffsetDateTime::now_utc())
    }

    pub fn issue_at(
        &self,
        username: &str,
        remember: bool,
        now: OffsetDateTime,
    ) -> anyhow::Result<(String, Claims)> {
        let exp = now + TimeDuration::seconds(self.ttl(remember).as_secs() as i64);
        let claims = Claims {
            sub: username.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(username = %username, remember, "jwt signed");
        Ok((token, claims))
    }

    /// Fails on any signature, issuer, audience or expiry mismatch.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(username = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }

    /// Username carried by a valid token, `None` otherwise.
    pub fn validate(&self, token: &str) -> Option<String> {
        self.verify(token).ok().map(|c| c.sub)
    }
}
