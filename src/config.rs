//! Application configuration loaded from environment variables.
//!
//! # Security Notes
//! - Sensitive fields are marked and must never be logged
//! - `JWT_SECRET` is shared with the service issuing the tokens

use anyhow::bail;
use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Medical records database (NON-SENSITIVE)
    /// Example: "sqlite:data/medical.db"
    pub db_host: String,

    /// Pet directory database, read only (NON-SENSITIVE)
    /// Example: "sqlite:data/app.db"
    pub pet_db_host: String,

    /// 🔒 SENSITIVE: Password to encrypt SQLite data, only applied in prod
    pub db_pass_encrypt: Option<String>,

    /// 🔒 SENSITIVE: HS256 secret used to verify bearer tokens
    pub jwt_secret: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub wep_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub wep_server_port: u16,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: Logfire write token, telemetry stays local without it
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Reads the environment and checks the values the server can't start without
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::init_from_env()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        if self.is_prod() && self.db_pass_encrypt.as_deref().is_none_or(str::is_empty) {
            bail!("DB_PASS_ENCRYPT is required in prod");
        }

        Ok(())
    }

    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Encryption key for the databases, only used in prod
    pub fn db_encryption_key(&self) -> Option<&str> {
        if self.is_prod() {
            return self.db_pass_encrypt.as_deref();
        }
        None
    }

    pub fn server_addr(&self) -> (String, u16) {
        (self.wep_server_host.clone(), self.wep_server_port)
    }
}
