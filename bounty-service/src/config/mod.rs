use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5000,https://localhost:5001";

#[derive(Debug, Clone)]
pub struct BountyConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub server: ServerConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub request_timeout_seconds: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub enabled: bool,
}

impl BountyConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = BountyConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("bounty-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),
            database: DatabaseConfig {
                url: Secret::new(get_env("DATABASE_URL", None, is_prod)?),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "10", is_prod)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", "2", is_prod)?,
                run_migrations: parse_env("RUN_MIGRATIONS", "true", is_prod)?,
            },
            security: SecurityConfig {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGINS),
                    is_prod,
                )?),
            },
            server: ServerConfig {
                request_timeout_seconds: parse_env("REQUEST_TIMEOUT_SECONDS", "30", is_prod)?,
            },
            swagger: SwaggerConfig {
                enabled: parse_env("ENABLE_SWAGGER", "true", is_prod)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Swagger UI left on in production. Allowed, but worth a warning at startup.
    pub fn exposes_docs_in_prod(&self) -> bool {
        self.environment == Environment::Prod && self.swagger.enabled
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "REQUEST_TIMEOUT_SECONDS must be positive"
            )));
        }

        if self.database.max_connections == 0
            || self.database.min_connections > self.database.max_connections
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS must not exceed a positive DATABASE_MAX_CONNECTIONS"
            )));
        }

        if self.security.allowed_origins.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ALLOWED_ORIGINS must list at least one origin"
            )));
        }

        if self.environment == Environment::Prod
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Wildcard CORS origin not allowed in production"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(key, Some(default), is_prod)?;
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: Environment, origins: &[&str]) -> BountyConfig {
        BountyConfig {
            common: core_config::Config::default(),
            environment,
            service_name: "bounty-service".to_string(),
            service_version: "0.1.0".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                url: Secret::new("postgres://localhost/bounty".to_string()),
                max_connections: 10,
                min_connections: 2,
                run_migrations: true,
            },
            security: SecurityConfig {
                allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            },
            server: ServerConfig {
                request_timeout_seconds: 30,
            },
            swagger: SwaggerConfig { enabled: false },
        }
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(DEFAULT_ALLOWED_ORIGINS),
            vec!["http://localhost:5000", "https://localhost:5001"]
        );
        assert_eq!(parse_origins(" a , ,b "), vec!["a", "b"]);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Prod));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_wildcard_origin_rejected_only_in_prod() {
        assert!(config(Environment::Dev, &["*"]).validate().is_ok());
        assert!(config(Environment::Prod, &["*"]).validate().is_err());
        assert!(config(Environment::Prod, &["https://bounty.example"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_swagger_in_prod_is_valid_but_flagged() {
        let mut prod = config(Environment::Prod, &["https://bounty.example"]);
        prod.swagger.enabled = true;
        assert!(prod.validate().is_ok());
        assert!(prod.exposes_docs_in_prod());

        let mut dev = config(Environment::Dev, &["http://localhost:5000"]);
        dev.swagger.enabled = true;
        assert!(!dev.exposes_docs_in_prod());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let mut zero_timeout = config(Environment::Dev, &["http://localhost:5000"]);
        zero_timeout.server.request_timeout_seconds = 0;
        assert!(zero_timeout.validate().is_err());

        let mut inverted_pool = config(Environment::Dev, &["http://localhost:5000"]);
        inverted_pool.database.min_connections = 20;
        assert!(inverted_pool.validate().is_err());

        assert!(config(Environment::Dev, &[]).validate().is_err());
    }

    #[test]
    fn test_database_url_is_redacted_in_debug() {
        let rendered = format!("{:?}", config(Environment::Dev, &["*"]));
        assert!(!rendered.contains("postgres://localhost/bounty"));
        assert_eq!(
            config(Environment::Dev, &["*"]).server.request_timeout(),
            Duration::from_secs(30)
        );
    }
}
