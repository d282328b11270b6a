use anyhow::{anyhow, Context};
use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// SMTP account used for reservation notices. The account address is both
/// sender and recipient.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub database_name: String,
    /// Allowed CORS origin.
    pub app_url: String,
    pub cloudinary: CloudinaryConfig,
    pub email: Option<EmailConfig>,
    /// Offset every show date + time is interpreted in.
    pub show_offset: FixedOffset,
}

impl AppConfig {
    /// Reads configuration through `lookup`, normally the deployment's secret store.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| optional(key).ok_or_else(|| anyhow!("secret {} was not found", key));

        let email = match optional("EMAIL_USER") {
            Some(user) => Some(EmailConfig {
                smtp_host: optional("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                password: required("EMAIL_PASS")?,
                user,
            }),
            None => None,
        };

        let offset_minutes: i32 = match optional("SHOW_UTC_OFFSET_MINUTES") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("SHOW_UTC_OFFSET_MINUTES must be an integer, got '{}'", raw))?,
            None => 0,
        };
        let show_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("SHOW_UTC_OFFSET_MINUTES out of range: {}", offset_minutes))?;

        Ok(AppConfig {
            mongodb_uri: required("MONGODB_URI")?,
            database_name: optional("DATABASE_NAME").unwrap_or_else(|| "cinema".to_string()),
            app_url: required("APP_URL")?,
            cloudinary: CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
            },
            email,
            show_offset,
        })
    }
}
