use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub password_min_len: usize,
    pub password_max_len: usize,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let auth = AuthConfig {
            password_min_len: std::env::var("AUTH_PASSWORD_MIN_LEN")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(8),
            password_max_len: std::env::var("AUTH_PASSWORD_MAX_LEN")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(128),
            cookie_secure: std::env::var("AUTH_COOKIE_SECURE")
                .map(|v| v != "false")
                .unwrap_or(true),
        };
        Ok(Self { database_url, auth })
    }
}
