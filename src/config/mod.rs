use serde::{Deserialize, Serialize};
use std::env;

use crate::api::encoding::Encoding;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub response: ResponseConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix under which the module endpoints are mounted
    pub base_path: String,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    /// Pool acquire timeout in seconds
    pub connection_timeout: u64,
    pub table_name: String,
}

/// How handlers render their envelopes onto the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    pub encoding: Encoding,
    /// chrono strftime pattern applied to every timestamp in a response
    pub date_format: String,
    pub encrypted: bool,
    pub compressed: bool,
    pub cipher_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub max_limit: Option<i32>,
    pub debug_logging: bool,
}

pub const LONG_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_BASE_PATH: &str = "/sm/security/module";
pub const DEFAULT_TABLE_NAME: &str = "sm_module";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("MODULE_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("MODULE_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("MODULE_API_BASE_PATH") {
            self.server.base_path = normalize_base_path(&v);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_TABLE") {
            self.database.table_name = v;
        }

        // Response overrides
        if let Ok(v) = env::var("RESPONSE_ENCODING") {
            match v.parse() {
                Ok(encoding) => self.response.encoding = encoding,
                Err(e) => tracing::warn!("Ignoring RESPONSE_ENCODING: {}", e),
            }
        }
        if let Ok(v) = env::var("RESPONSE_DATE_FORMAT") {
            self.response.date_format = v;
        }
        if let Ok(v) = env::var("RESPONSE_ENCRYPTED") {
            self.response.encrypted = v.parse().unwrap_or(self.response.encrypted);
        }
        if let Ok(v) = env::var("RESPONSE_COMPRESSED") {
            self.response.compressed = v.parse().unwrap_or(self.response.compressed);
        }
        if let Ok(v) = env::var("RESPONSE_CIPHER_KEY") {
            self.response.cipher_key = v;
        }

        // Filter overrides
        if let Ok(v) = env::var("FILTER_MAX_LIMIT") {
            self.filter.max_limit = v.parse().ok();
        }
        if let Ok(v) = env::var("FILTER_DEBUG_LOGGING") {
            self.filter.debug_logging = v.parse().unwrap_or(self.filter.debug_logging);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                base_path: DEFAULT_BASE_PATH.to_string(),
                enable_cors: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                table_name: DEFAULT_TABLE_NAME.to_string(),
            },
            response: ResponseConfig::default(),
            filter: FilterConfig {
                max_limit: Some(1000),
                debug_logging: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                base_path: DEFAULT_BASE_PATH.to_string(),
                enable_cors: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                table_name: DEFAULT_TABLE_NAME.to_string(),
            },
            response: ResponseConfig::default(),
            filter: FilterConfig {
                max_limit: Some(500),
                debug_logging: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                base_path: DEFAULT_BASE_PATH.to_string(),
                enable_cors: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                table_name: DEFAULT_TABLE_NAME.to_string(),
            },
            response: ResponseConfig::default(),
            filter: FilterConfig {
                max_limit: Some(100),
                debug_logging: false,
            },
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            date_format: LONG_DATE_FORMAT.to_string(),
            encrypted: false,
            compressed: false,
            cipher_key: "huhuo".to_string(),
        }
    }
}

/// Ensure a leading slash and no trailing slash, e.g. `sm/module/` -> `/sm/module`
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
