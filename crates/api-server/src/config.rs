//! Server configuration from the environment

use std::path::PathBuf;
use std::str::FromStr;

use dt_core::locale::Locale;
use dt_core::reminder::{
    NotificationPermission, ReminderConfig, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REMINDER_WINDOW_SECS,
};
use tracing::warn;

const DEFAULT_DATA_DIR: &str = ".dt-data";
const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub locale: Locale,
    pub permission: NotificationPermission,
    pub reminders: ReminderConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("DT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let window_secs: i64 = parse_or(
            &lookup,
            "DT_REMINDER_WINDOW_SECS",
            DEFAULT_REMINDER_WINDOW_SECS,
        );
        let interval_secs: u64 =
            parse_or(&lookup, "DT_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS);

        Self {
            data_dir,
            port: parse_or(&lookup, "DT_PORT", DEFAULT_PORT),
            locale: parse_or(&lookup, "DT_LOCALE", Locale::default()),
            permission: parse_or(&lookup, "DT_NOTIFICATIONS", NotificationPermission::Granted),
            reminders: ReminderConfig {
                window: chrono::Duration::seconds(window_secs.max(1)),
                interval: std::time::Duration::from_secs(interval_secs.max(1)),
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring {}={:?}: {}", name, raw, e);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from(".dt-data"));
        assert_eq!(config.port, 8081);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.permission, NotificationPermission::Granted);
        assert_eq!(config.reminders.window.num_seconds(), 300);
        assert_eq!(config.reminders.interval.as_secs(), 60);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("DT_DATA_DIR", "/tmp/dt"),
            ("DT_PORT", "9000"),
            ("DT_LOCALE", "bn"),
            ("DT_NOTIFICATIONS", "denied"),
            ("DT_REMINDER_WINDOW_SECS", "600"),
            ("DT_POLL_INTERVAL_SECS", "15"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dt"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.locale, Locale::Bn);
        assert_eq!(config.permission, NotificationPermission::Denied);
        assert_eq!(config.reminders.window.num_seconds(), 600);
        assert_eq!(config.reminders.interval.as_secs(), 15);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[("DT_PORT", "eighty"), ("DT_POLL_INTERVAL_SECS", "-3")]);
        assert_eq!(config.port, 8081);
        assert_eq!(config.reminders.interval.as_secs(), 60);
    }
}
