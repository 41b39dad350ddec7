//! Gateway configuration loaded from the environment.

use std::str::FromStr;

const SANDBOX_BASE_URL: &str = "https://sandbox-api.fedapay.com";
const LIVE_BASE_URL: &str = "https://api.fedapay.com";

/// Which FedaPay environment requests are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FedaPayEnvironment {
    #[default]
    Sandbox,
    Live,
}

impl FedaPayEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }
}

impl FromStr for FedaPayEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" => Ok(Self::Live),
            other => Err(format!("unknown FedaPay environment '{other}' (expected sandbox or live)")),
        }
    }
}

/// Credentials and endpoint for the FedaPay API.
#[derive(Clone)]
pub struct FedaPayConfig {
    pub secret_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for FedaPayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedaPayConfig")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FedaPayConfig {
    pub fn new(secret_key: impl Into<String>, environment: FedaPayEnvironment) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: environment.base_url().to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default   |
    /// |----------------------|----------|-----------|
    /// | `FEDAPAY_SECRET_KEY` | yes      |           |
    /// | `FEDAPAY_ENV`        | no       | `sandbox` |
    ///
    /// Returns `None` when no secret key is configured. An unrecognised
    /// `FEDAPAY_ENV` falls back to sandbox with a warning.
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("FEDAPAY_SECRET_KEY").ok()?;
        let environment = match std::env::var("FEDAPAY_ENV") {
            Ok(raw) => raw.parse().unwrap_or_else(|err: String| {
                tracing::warn!(error = %err, "Falling back to the sandbox environment");
                FedaPayEnvironment::Sandbox
            }),
            Err(_) => FedaPayEnvironment::Sandbox,
        };
        Some(Self::new(secret_key, environment))
    }
}
