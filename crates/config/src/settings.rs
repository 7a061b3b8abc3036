use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub superadmin: SuperadminSettings,
    pub storage: StorageSettings,
    pub email: EmailSettings,
    pub drive: DriveSettings,
    pub review: ReviewSettings,
    pub cron: CronSettings,
    pub demo: DemoSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub issuer: String,
}

/// Credentials and token lifetime for the tenant-independent superadmin
/// console. Superadmin tokens are signed with the same JWT secret but carry
/// their own token type and a much shorter TTL.
#[derive(Debug, Deserialize, Clone)]
pub struct SuperadminSettings {
    pub email: String,
    pub password: String,
    pub token_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub root_dir: String,
    pub max_upload_bytes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from_address: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DriveSettings {
    pub api_url: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReviewSettings {
    pub webhook_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CronSettings {
    pub key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DemoSettings {
    pub organization_slug: String,
    pub ttl_minutes: i64,
    pub sweep_batch_limit: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitSettings {
    pub login_attempts: u32,
    pub login_window_secs: u64,
    pub message_creates: u32,
    pub message_window_secs: u64,
    pub document_uploads: u32,
    pub document_window_secs: u64,
    pub reminder_batch_size: i64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("CASEFOLIO"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "casefolio")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.access_token_ttl_secs", 3600)?
            .set_default("jwt.refresh_token_ttl_secs", 604800)?
            .set_default("jwt.issuer", "casefolio")?
            .set_default("superadmin.email", "root@casefolio.local")?
            .set_default("superadmin.password", "change-me-in-production")?
            .set_default("superadmin.token_ttl_secs", 1800)?
            .set_default("storage.root_dir", "uploads")?
            .set_default("storage.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("email.api_url", "https://api.mailchannel.example/v1/send")?
            .set_default("email.api_key", None::<String>)?
            .set_default("email.from_address", "no-reply@casefolio.local")?
            .set_default("email.timeout_secs", 10)?
            .set_default("drive.api_url", "https://www.googleapis.com/drive/v3")?
            .set_default("drive.access_token", None::<String>)?
            .set_default("drive.timeout_secs", 10)?
            .set_default("review.webhook_url", None::<String>)?
            .set_default("review.api_key", None::<String>)?
            .set_default("review.timeout_secs", 30)?
            .set_default("cron.key", "change-me-in-production")?
            .set_default("demo.organization_slug", "demo")?
            .set_default("demo.ttl_minutes", 60)?
            .set_default("demo.sweep_batch_limit", 500)?
            .set_default("limits.login_attempts", 10)?
            .set_default("limits.login_window_secs", 60)?
            .set_default("limits.message_creates", 30)?
            .set_default("limits.message_window_secs", 60)?
            .set_default("limits.document_uploads", 20)?
            .set_default("limits.document_window_secs", 300)?
            .set_default("limits.reminder_batch_size", 50)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
