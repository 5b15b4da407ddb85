//! Rate limiting configuration.

use std::env;

/// Per-client request quota for the weather endpoint
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Accepted requests per client within one window (`RATE_LIMIT_RPM`)
    pub requests_per_window: usize,
    /// Window length in seconds, never zero
    pub period_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 5,
            period_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let requests_per_window = env::var("RATE_LIMIT_RPM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.requests_per_window);

        let period_seconds = env::var("RATE_LIMIT_PERIOD")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.period_seconds);

        Self {
            requests_per_window,
            period_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_rate_limit_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::remove_var("RATE_LIMIT_RPM");
            env::remove_var("RATE_LIMIT_PERIOD");
        }

        let config = RateLimitConfig::from_env();
        assert_eq!(config.requests_per_window, 5);
        assert_eq!(config.period_seconds, 60);
    }

    #[test]
    fn test_rate_limit_from_env_ignores_garbage() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::set_var("RATE_LIMIT_RPM", "20");
            env::set_var("RATE_LIMIT_PERIOD", "not-a-number");
        }

        let config = RateLimitConfig::from_env();
        assert_eq!(config.requests_per_window, 20);
        assert_eq!(config.period_seconds, 60);

        unsafe {
            env::remove_var("RATE_LIMIT_RPM");
            env::remove_var("RATE_LIMIT_PERIOD");
        }
    }

    #[test]
    fn test_zero_period_falls_back_to_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::set_var("RATE_LIMIT_PERIOD", "0");
        }

        let config = RateLimitConfig::from_env();
        assert_eq!(config.period_seconds, 60);

        unsafe {
            env::remove_var("RATE_LIMIT_PERIOD");
        }
    }
}
