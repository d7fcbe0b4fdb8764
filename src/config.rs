use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    /// `None` keeps abandoned sessions forever.
    pub session_idle_timeout: Option<Duration>,
    pub session_sweep_interval: Duration,
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        let idle_secs: u64 = env::var("SESSION_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1800);
        let sweep_secs: u64 = env::var("SESSION_SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            session_idle_timeout: (idle_secs > 0).then(|| Duration::from_secs(idle_secs)),
            session_sweep_interval: Duration::from_secs(sweep_secs.max(1)),
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
