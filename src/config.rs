//! Configuration management for tapvote.
//!
//! Configuration comes from command-line arguments via clap, with every
//! option also readable from the environment:
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 5000)
//! - `DATABASE_URL` - Realtime Database URL (required)
//! - `DATABASE_SECRET` - Database secret granting admin access (optional)
//! - `FIREBASE_API_KEY` - Web API key used to verify ID tokens (required)
//! - `IDENTITY_ENDPOINT` - Identity Toolkit base URL (default: public endpoint)
//! - `CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use tapvote::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! ```

use clap::Parser;
use url::Url;

use crate::identity::DEFAULT_IDENTITY_ENDPOINT;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// tapvote - questionnaire API server.
///
/// Serves questionnaires stored in a Realtime Database, with ID tokens
/// verified by the Identity Toolkit.
#[derive(Parser, Debug, Clone)]
#[command(name = "tapvote")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Document Store Configuration
    // =========================================================================
    /// Realtime Database URL (e.g. https://my-project.firebaseio.com).
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Database secret passed as the `auth` parameter on every store request.
    #[arg(long, env = "DATABASE_SECRET", hide_env_values = true)]
    pub database_secret: Option<String>,

    // =========================================================================
    // Identity Verifier Configuration
    // =========================================================================
    /// Web API key used to verify ID tokens.
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Identity Toolkit base URL. Override to point at an emulator.
    #[arg(long, default_value = DEFAULT_IDENTITY_ENDPOINT, env = "IDENTITY_ENDPOINT")]
    pub identity_endpoint: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,

    /// Validate configuration, test database connectivity, and exit.
    #[arg(long, default_value_t = false)]
    pub check: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }

        self.database_url()?;
        self.identity_endpoint()?;

        if self.api_key.trim().is_empty() {
            return Err("API key is required. Set --api-key or FIREBASE_API_KEY".to_string());
        }

        if matches!(&self.database_secret, Some(secret) if secret.trim().is_empty()) {
            return Err("database_secret must not be empty when set".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed database URL.
    pub fn database_url(&self) -> Result<Url, String> {
        parse_http_url(&self.database_url, "database_url")
    }

    /// Parsed identity endpoint.
    pub fn identity_endpoint(&self) -> Result<Url, String> {
        parse_http_url(&self.identity_endpoint, "identity_endpoint")
    }
}

fn parse_http_url(value: &str, name: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!(
            "{} must use http or https (got {}://)",
            name, other
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
