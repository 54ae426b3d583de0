/// Configuration management
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: i64,
}

fn default_jwt_issuer() -> String {
    "session-service".to_string()
}

fn default_jwt_audience() -> String {
    "api".to_string()
}

fn default_access_token_ttl_secs() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60 // 7 days
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn token_config(&self) -> jwt_tokens::TokenConfig {
        let mut config = jwt_tokens::TokenConfig::new(
            self.jwt_secret.clone(),
            self.jwt_issuer.clone(),
            self.jwt_audience.clone(),
        );
        config.access_ttl = chrono::Duration::seconds(self.access_token_ttl_secs);
        config.refresh_ttl = chrono::Duration::seconds(self.refresh_token_ttl_secs);
        config
    }
}
