use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials and endpoints for the external companion services. All
/// optional at boot; checked per call so the rest of the API keeps working
/// when they are unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanionConfig {
    pub gemini_api_key: Option<String>,
    pub tts_api_key: Option<String>,
    pub tts_api_url: Option<String>,
    pub tts_voice: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub companion: CompanionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "companion".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "companion-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let companion = CompanionConfig {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            tts_api_key: std::env::var("TTS_API_KEY").ok(),
            tts_api_url: std::env::var("TTS_API_URL").ok(),
            tts_voice: std::env::var("TTS_VOICE").unwrap_or_else(|_| "en-US-Wavenet-F".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            companion,
        })
    }
}
