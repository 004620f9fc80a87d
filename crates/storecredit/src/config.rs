use std::{env, time::Duration};

use storecredit_core::state_machine::ORDER_RETURN_STATE_MACHINE;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "storecredit.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Bearer token required by the admin API. Admin requests are rejected
    /// while unset.
    pub admin_token: Option<String>,
    /// Name of the storefront session cookie (default: "session")
    pub session_cookie_name: String,
    /// Storefront login page used for redirects (default: "/account/login")
    pub login_path: String,
    /// Technical name of the return state machine (default: "order_return.state")
    pub state_machine_name: String,
    /// Attempts per ledger operation before giving up (default: 5)
    pub ledger_max_attempts: u32,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// Lifetime of demo sessions in hours (default: 24)
    pub session_ttl_hours: i64,
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "storecredit.db")
    /// - `ADMIN_TOKEN` - Admin API bearer token (default: unset)
    /// - `SESSION_COOKIE_NAME` - Session cookie name (default: "session")
    /// - `LOGIN_PATH` - Storefront login path (default: "/account/login")
    /// - `STATE_MACHINE_NAME` - Return state machine (default: "order_return.state")
    /// - `LEDGER_MAX_ATTEMPTS` - Ledger retry bound (default: 5)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `SESSION_TTL_HOURS` - Demo session lifetime (default: 24)
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "storecredit.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "session".to_string()),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/account/login".to_string()),
            state_machine_name: env::var("STATE_MACHINE_NAME")
                .unwrap_or_else(|_| ORDER_RETURN_STATE_MACHINE.to_string()),
            ledger_max_attempts: parsed("LEDGER_MAX_ATTEMPTS", 5),
            request_timeout_seconds: parsed("REQUEST_TIMEOUT_SECONDS", 10),
            session_ttl_hours: parsed("SESSION_TTL_HOURS", 24),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            sqlite_path: "test.db".to_string(),
            admin_token: Some("secret".to_string()),
            session_cookie_name: "session".to_string(),
            login_path: "/account/login".to_string(),
            state_machine_name: ORDER_RETURN_STATE_MACHINE.to_string(),
            ledger_max_attempts: 5,
            request_timeout_seconds: 30,
            session_ttl_hours: 2,
        }
    }

    #[test]
    fn test_duration_conversions() {
        let config = config();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.session_ttl(), chrono::Duration::hours(2));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        for key in [
            "SQLITE_PATH",
            "ADMIN_TOKEN",
            "SESSION_COOKIE_NAME",
            "LOGIN_PATH",
            "STATE_MACHINE_NAME",
            "LEDGER_MAX_ATTEMPTS",
            "REQUEST_TIMEOUT_SECONDS",
            "SESSION_TTL_HOURS",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env();

        assert_eq!(config.sqlite_path, "storecredit.db");
        assert_eq!(config.admin_token, None);
        assert_eq!(config.session_cookie_name, "session");
        assert_eq!(config.login_path, "/account/login");
        assert_eq!(config.state_machine_name, "order_return.state");
        assert_eq!(config.ledger_max_attempts, 5);
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.session_ttl_hours, 24);
    }
}
