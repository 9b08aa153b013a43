use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// The single accepted reference credential. A real deployment would look
/// this up in a credential store; here it is one fixed record from env.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceCredential {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub credential: ReferenceCredential,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let credential = ReferenceCredential {
            login: std::env::var("API_LOGIN").unwrap_or_else(|_| "login".into()),
            password: std::env::var("API_PASSWORD").unwrap_or_else(|_| "password".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            credential,
        })
    }
}
