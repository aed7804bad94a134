use anyhow::{Context, Result};
use panel_auth::LockoutConfig;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Password used when `ADMIN_PASSWORD` is not set
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Deployment profile selecting default limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
    Testing,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Development => "development",
            RunMode::Production => "production",
            RunMode::Testing => "testing",
        }
    }

    fn default_max_attempts(&self) -> u32 {
        match self {
            RunMode::Development => 5,
            RunMode::Production => 3,
            RunMode::Testing => 999,
        }
    }

    fn default_lockout_seconds(&self) -> u64 {
        match self {
            RunMode::Development => 60,
            RunMode::Production => 600,
            RunMode::Testing => 1,
        }
    }

    fn default_data_path(&self) -> &'static str {
        match self {
            RunMode::Testing => panel_storage::MEMORY_PATH,
            _ => "./data/cards.json",
        }
    }
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "default" => Ok(RunMode::Development),
            "production" | "prod" => Ok(RunMode::Production),
            "testing" | "test" => Ok(RunMode::Testing),
            other => anyhow::bail!("Unknown RUN_MODE: {}", other),
        }
    }
}

/// Server configuration
#[derive(Clone)]
pub struct Config {
    pub run_mode: RunMode,

    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Shared admin password (plaintext in the environment)
    pub admin_password: String,

    /// Card document path, or `:memory:`
    pub data_path: PathBuf,

    pub lockout: LockoutConfig,

    /// Seconds an admin session stays valid
    pub session_ttl: u64,

    /// Add permissive CORS headers
    pub cors_enabled: bool,

    /// Proxies whose forwarding headers are trusted for the client IP
    pub trusted_proxies: Vec<IpAddr>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode: RunMode = lookup("RUN_MODE")
            .unwrap_or_else(|| "development".to_string())
            .parse()?;

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| "127.0.0.1:5000".to_string())
            .parse()
            .context("BIND_ADDRESS must be host:port")?;

        let admin_password =
            lookup("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());

        let data_path = lookup("DATA_PATH")
            .unwrap_or_else(|| run_mode.default_data_path().to_string())
            .into();

        let max_attempts = match lookup("MAX_LOGIN_ATTEMPTS") {
            Some(value) => value.parse().context("MAX_LOGIN_ATTEMPTS must be an integer")?,
            None => run_mode.default_max_attempts(),
        };

        let lockout_seconds = match lookup("LOCKOUT_DURATION") {
            Some(value) => value.parse().context("LOCKOUT_DURATION must be seconds")?,
            None => run_mode.default_lockout_seconds(),
        };

        let session_ttl = lookup("SESSION_TTL_SECONDS")
            .unwrap_or_else(|| "86400".to_string()) // 24 hours
            .parse()
            .context("SESSION_TTL_SECONDS must be seconds")?;

        let cors_enabled = lookup("CORS_ENABLED")
            .map(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let trusted_proxies = lookup("TRUSTED_PROXIES")
            .map(|value| parse_ip_list(&value))
            .transpose()?
            .unwrap_or_default();

        Ok(Config {
            run_mode,
            bind_address,
            admin_password,
            data_path,
            lockout: LockoutConfig::new(max_attempts, lockout_seconds),
            session_ttl,
            cors_enabled,
            trusted_proxies,
        })
    }

    /// Configuration problems; fatal in production, warnings otherwise
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.admin_password.is_empty() {
            errors.push("ADMIN_PASSWORD must be set".to_string());
        } else if self.admin_password.chars().count() < 6 {
            errors.push("ADMIN_PASSWORD must be at least 6 characters".to_string());
        }

        if self.lockout.max_attempts < 1 {
            errors.push("MAX_LOGIN_ATTEMPTS must be at least 1".to_string());
        }

        if self.run_mode != RunMode::Testing && self.lockout.window_seconds < 60 {
            errors.push("LOCKOUT_DURATION must be at least 60 seconds".to_string());
        }

        errors
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("run_mode", &self.run_mode)
            .field("bind_address", &self.bind_address)
            .field("admin_password", &"***")
            .field("data_path", &self.data_path)
            .field("lockout", &self.lockout)
            .field("session_ttl", &self.session_ttl)
            .field("cors_enabled", &self.cors_enabled)
            .field("trusted_proxies", &self.trusted_proxies)
            .finish()
    }
}

fn parse_ip_list(value: &str) -> Result<Vec<IpAddr>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse()
                .with_context(|| format!("Invalid IP in TRUSTED_PROXIES: {}", entry))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_development_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.run_mode, RunMode::Development);
        assert_eq!(config.bind_address, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.data_path, PathBuf::from("./data/cards.json"));
        assert_eq!(config.lockout, LockoutConfig::new(5, 60));
        assert!(config.uses_default_password());
        assert!(!config.cors_enabled);
        assert!(config.trusted_proxies.is_empty());
    }

    #[test]
    fn test_profiles() {
        let production = load(&[("RUN_MODE", "production")]).unwrap();
        assert_eq!(production.lockout, LockoutConfig::new(3, 600));

        let testing = load(&[("RUN_MODE", "test")]).unwrap();
        assert_eq!(testing.lockout, LockoutConfig::new(999, 1));
        assert_eq!(testing.data_path, PathBuf::from(":memory:"));
        assert!(testing.validate().is_empty());

        assert!(load(&[("RUN_MODE", "staging")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ADMIN_PASSWORD", "s3cret-pass"),
            ("MAX_LOGIN_ATTEMPTS", "7"),
            ("LOCKOUT_DURATION", "120"),
            ("CORS_ENABLED", "true"),
            ("TRUSTED_PROXIES", "10.0.0.1, 10.0.0.2"),
            ("DATA_PATH", "/var/lib/panel/cards.json"),
        ])
        .unwrap();

        assert_eq!(config.lockout, LockoutConfig::new(7, 120));
        assert!(config.cors_enabled);
        assert_eq!(config.trusted_proxies.len(), 2);
        assert!(!config.uses_default_password());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("MAX_LOGIN_ATTEMPTS", "many")]).is_err());
        assert!(load(&[("TRUSTED_PROXIES", "not-an-ip")]).is_err());
        assert!(load(&[("BIND_ADDRESS", "localhost")]).is_err());
    }

    #[test]
    fn test_validate_reports_weak_settings() {
        let config = load(&[
            ("ADMIN_PASSWORD", "abc"),
            ("MAX_LOGIN_ATTEMPTS", "0"),
            ("LOCKOUT_DURATION", "30"),
        ])
        .unwrap();
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn test_debug_hides_password() {
        let config = load(&[("ADMIN_PASSWORD", "hunter22")]).unwrap();
        assert!(!format!("{:?}", config).contains("hunter22"));
    }
}
