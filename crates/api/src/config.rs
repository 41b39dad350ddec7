use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Default body limit for book uploads (20 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Settings used when opening a payment with the gateway.
#[derive(Debug, Clone)]
pub struct PaymentSettings {
    /// URL the gateway redirects the buyer to once the payment settles.
    pub callback_url: String,
    /// ISO 4217 currency code (default: `XOF`).
    pub currency: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Root directory for uploaded covers and PDFs (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Maximum request body size in bytes (default: 20 MiB).
    pub max_upload_bytes: usize,
    pub payment: PaymentSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                      |
    /// |------------------------|----------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                    |
    /// | `PORT`                 | `3000`                                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                         |
    /// | `UPLOAD_DIR`           | `uploads`                                    |
    /// | `MAX_UPLOAD_BYTES`     | `20971520`                                   |
    /// | `FEDAPAY_CALLBACK_URL` | `http://localhost:3000/api/payment/callback` |
    /// | `PAYMENT_CURRENCY`     | `XOF`                                        |
    ///
    /// # Panics
    ///
    /// Panics on unparsable numbers and when `JWT_SECRET` is missing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let payment = PaymentSettings {
            callback_url: std::env::var("FEDAPAY_CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/payment/callback".into()),
            currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "XOF".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            upload_dir,
            max_upload_bytes,
            payment,
        }
    }
}
