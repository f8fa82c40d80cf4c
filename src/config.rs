/// Configuration management for the Amora service
use crate::error::{AmoraError, AmoraResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// SHA-256 of the development admin password ("admin123")
const DEFAULT_ADMIN_PASSWORD_SHA256: &str =
    "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub auth: AuthConfig,
    pub matching: MatchingConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
}

/// Which document store backs the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreBackend {
    Memory,
    Sqlite { path: PathBuf },
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub backend: StoreBackend,
}

/// Admin console credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    /// Hex-encoded SHA-256 digest of the admin password
    pub password_sha256: String,
}

/// Member authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// One-time code accepted by the mock OTP verifier
    pub mock_otp: String,
}

/// Match simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub match_probability: f64,
    pub new_flag_probability: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 3580,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            storage: StorageConfig {
                data_directory: PathBuf::from("./data"),
                backend: StoreBackend::Memory,
            },
            admin: AdminConfig {
                username: "admin".to_string(),
                password_sha256: DEFAULT_ADMIN_PASSWORD_SHA256.to_string(),
            },
            auth: AuthConfig {
                mock_otp: "123456".to_string(),
            },
            matching: MatchingConfig {
                match_probability: 0.3,
                new_flag_probability: 0.5,
            },
            logging: LoggingConfig {
                level: "amora=debug,tower_http=debug".to_string(),
                json: false,
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AmoraResult<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let hostname = env::var("AMORA_HOSTNAME").unwrap_or(defaults.service.hostname);
        let port = env::var("AMORA_PORT")
            .unwrap_or_else(|_| defaults.service.port.to_string())
            .parse()
            .map_err(|_| AmoraError::Validation("Invalid port number".to_string()))?;
        let version = env::var("AMORA_VERSION").unwrap_or(defaults.service.version);

        let data_directory: PathBuf = env::var("AMORA_DATA_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.data_directory);

        let backend = match env::var("AMORA_STORE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "sqlite" => StoreBackend::Sqlite {
                path: env::var("AMORA_SQLITE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| data_directory.join("amora.sqlite")),
            },
            other => {
                return Err(AmoraError::Validation(format!(
                    "Unknown store backend: {}",
                    other
                )))
            }
        };

        let admin_username = env::var("AMORA_ADMIN_USERNAME").unwrap_or(defaults.admin.username);
        let admin_password_sha256 = env::var("AMORA_ADMIN_PASSWORD_SHA256")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or(defaults.admin.password_sha256);

        let mock_otp = env::var("AMORA_MOCK_OTP").unwrap_or(defaults.auth.mock_otp);

        let match_probability = env::var("AMORA_MATCH_PROBABILITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.matching.match_probability);
        let new_flag_probability = env::var("AMORA_NEW_FLAG_PROBABILITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.matching.new_flag_probability);

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.logging.level);
        let log_json = env::var("AMORA_LOG_FORMAT")
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
            },
            storage: StorageConfig {
                data_directory,
                backend,
            },
            admin: AdminConfig {
                username: admin_username,
                password_sha256: admin_password_sha256,
            },
            auth: AuthConfig { mock_otp },
            matching: MatchingConfig {
                match_probability,
                new_flag_probability,
            },
            logging: LoggingConfig {
                level: log_level,
                json: log_json,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> AmoraResult<()> {
        if self.service.hostname.is_empty() {
            return Err(AmoraError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.service.port == 0 {
            return Err(AmoraError::Validation("Port cannot be 0".to_string()));
        }

        if self.admin.username.trim().is_empty() {
            return Err(AmoraError::Validation(
                "Admin username cannot be empty".to_string(),
            ));
        }

        let digest_ok = self.admin.password_sha256.len() == 64
            && hex::decode(&self.admin.password_sha256).is_ok();
        if !digest_ok {
            return Err(AmoraError::Validation(
                "Admin password must be a hex-encoded SHA-256 digest".to_string(),
            ));
        }

        if self.auth.mock_otp.len() != 6 || !self.auth.mock_otp.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmoraError::Validation(
                "Mock OTP must be exactly 6 digits".to_string(),
            ));
        }

        for (name, p) in [
            ("match probability", self.matching.match_probability),
            ("new flag probability", self.matching.new_flag_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(AmoraError::Validation(format!(
                    "The {} must be between 0 and 1",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = ServerConfig::default();
        config.service.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = ServerConfig::default();
        config.matching.match_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_plaintext_password() {
        let mut config = ServerConfig::default();
        config.admin.password_sha256 = "admin123".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_short_otp() {
        let mut config = ServerConfig::default();
        config.auth.mock_otp = "1234".to_string();
        assert!(config.validate().is_err());
    }
}
