use crate::engine::Rules;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,

    // Workflow rules
    pub pulse_window_ms: i64,
    pub xp_first_save: u32,
    pub xp_week_submit: u32,
    pub xp_copy_per_day: u32,
    pub xp_per_level: u32,
    pub late_after_days: u32,

    // Leave allowances given to seeded members
    pub paid_leave_days: f64,
    pub rtt_days: f64,

    pub seed_demo: bool,
}

/// Reads `key`, falling back to `default` when unset. A value that is set
/// but does not parse is an error.
fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: var_or("LOG_LEVEL", tracing::Level::DEBUG)?,

            pulse_window_ms: var_or("PULSE_WINDOW_MS", 3000)?,
            xp_first_save: var_or("XP_FIRST_SAVE", 10)?,
            xp_week_submit: var_or("XP_WEEK_SUBMIT", 50)?,
            xp_copy_per_day: var_or("XP_COPY_PER_DAY", 5)?,
            xp_per_level: var_or("XP_PER_LEVEL", 200)?,
            late_after_days: var_or("LATE_AFTER_DAYS", 2)?,

            paid_leave_days: var_or("PAID_LEAVE_DAYS", 26.0)?,
            rtt_days: var_or("RTT_DAYS", 10.0)?,

            seed_demo: var_or("SEED_DEMO", true)?,
        })
    }

    pub fn rules(&self) -> Rules {
        Rules {
            xp_first_save: self.xp_first_save,
            xp_week_submit: self.xp_week_submit,
            xp_copy_per_day: self.xp_copy_per_day,
            xp_per_level: self.xp_per_level,
            pulse_window: chrono::Duration::milliseconds(self.pulse_window_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api/v1".to_string(),
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
            pulse_window_ms: rules.pulse_window.num_milliseconds(),
            xp_first_save: rules.xp_first_save,
            xp_week_submit: rules.xp_week_submit,
            xp_copy_per_day: rules.xp_copy_per_day,
            xp_per_level: rules.xp_per_level,
            late_after_days: 2,
            paid_leave_days: 26.0,
            rtt_days: 10.0,
            seed_demo: true,
        }
    }
}
