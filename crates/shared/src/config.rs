//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Recurrence scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// How many days before a due date the reminder window opens.
    #[serde(default = "default_reminder_days")]
    pub reminder_days: i64,
    /// Default lookahead window for upcoming-payment listings, in days.
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,
}

fn default_reminder_days() -> i64 {
    1
}

fn default_upcoming_window_days() -> i64 {
    7
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reminder_days: default_reminder_days(),
            upcoming_window_days: default_upcoming_window_days(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_with_empty_environment() {
        temp_env::with_vars_unset(
            ["TALLY__SCHEDULER__REMINDER_DAYS", "RUN_MODE"],
            || {
                let config = AppConfig::load().expect("load config");
                assert_eq!(config.scheduler.reminder_days, 1);
                assert_eq!(config.scheduler.upcoming_window_days, 7);
            },
        );
    }

    #[test]
    fn test_env_overrides_scheduler_knobs() {
        temp_env::with_vars(
            [
                ("TALLY__SCHEDULER__REMINDER_DAYS", Some("3")),
                ("TALLY__SCHEDULER__UPCOMING_WINDOW_DAYS", Some("14")),
            ],
            || {
                let config = AppConfig::load().expect("load config");
                assert_eq!(config.scheduler.reminder_days, 3);
                assert_eq!(config.scheduler.upcoming_window_days, 14);
            },
        );
    }
}
