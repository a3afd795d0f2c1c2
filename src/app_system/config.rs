use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

use crate::clients::Registration;

pub const DEV_JWT_SECRET: &str = "storefront-development-secret";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub tax_rate: f64,
    pub cors_origins: Vec<String>,
    pub actor_buffer: usize,
    pub admin: Option<Registration>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `load` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let jwt_ttl_hours: i64 = try_load(&lookup, "JWT_TTL_HOURS", "168")?;
        if jwt_ttl_hours <= 0 {
            return Err(invalid("JWT_TTL_HOURS", jwt_ttl_hours, "must be positive"));
        }
        let tax_rate: f64 = try_load(&lookup, "TAX_RATE", "0.18")?;
        if !(0.0..=1.0).contains(&tax_rate) {
            return Err(invalid("TAX_RATE", tax_rate, "must be between 0 and 1"));
        }
        let actor_buffer: usize = try_load(&lookup, "ACTOR_BUFFER", "100")?;
        if actor_buffer == 0 {
            return Err(invalid("ACTOR_BUFFER", actor_buffer, "must be at least 1"));
        }

        let raw_origins = lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string());
        let cors_origins: Vec<String> = raw_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        // Credentialed CORS cannot use a wildcard origin.
        if cors_origins.iter().any(|origin| origin.contains('*')) {
            return Err(invalid("CORS_ORIGINS", &raw_origins, "wildcard origins are not allowed"));
        }

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(Registration {
                name: lookup("ADMIN_NAME").unwrap_or_else(|| "Admin".to_string()),
                email,
                password,
            }),
            _ => {
                info!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin seeding");
                None
            }
        };

        Ok(Self {
            port: try_load(&lookup, "PORT", "5000")?,
            jwt_secret,
            jwt_ttl_hours,
            tax_rate,
            cors_origins,
            actor_buffer,
            admin,
        })
    }
}

fn invalid(key: &'static str, value: impl Display, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        invalid(key, &raw, &e.to_string())
    })
}
