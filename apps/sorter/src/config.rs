use std::str::FromStr;

use anyhow::{Context, Result};

use crate::sorter::SortOverrides;

/// Service configuration loaded from environment variables.
/// Fails at startup if a variable is present but unparseable.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Server-wide defaults layered between the built-in options and each request.
    pub sort_defaults: SortOverrides,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: optional_env(&lookup, "PORT")?.unwrap_or(8080),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            sort_defaults: SortOverrides {
                verbose: None,
                procrastination_probability: optional_env(&lookup, "PROCRASTINATION_PROBABILITY")?,
                procrastination_activities: None,
                min_delay_ms: optional_env(&lookup, "MIN_DELAY_MS")?,
                max_delay_ms: optional_env(&lookup, "MAX_DELAY_MS")?,
            },
        })
    }
}

fn optional_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.sort_defaults, SortOverrides::default());
    }

    #[test]
    fn test_sort_defaults_read_from_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("PROCRASTINATION_PROBABILITY", "0.25"),
            ("MIN_DELAY_MS", "5"),
            ("MAX_DELAY_MS", " 50 "),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.sort_defaults.procrastination_probability, Some(0.25));
        assert_eq!(config.sort_defaults.min_delay_ms, Some(5));
        assert_eq!(config.sort_defaults.max_delay_ms, Some(50));
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = Config::from_lookup(lookup_from(&[("MAX_DELAY_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("MAX_DELAY_MS"));
    }
}
