//! Runtime configuration parsed from environment variables.

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "CHATSTATS_DATA_DIR";
pub const STATS_SOURCE_VAR: &str = "CHATSTATS_STATS_SOURCE";
pub const WELCOME_VAR: &str = "CHATSTATS_WELCOME";
pub const CHART_VAR: &str = "CHATSTATS_CHART";

/// Where the aggregate comes from when a snapshot is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsSource {
    /// Trust the stored aggregate as-is.
    Snapshot,
    /// Use the stored aggregate only if it agrees with the loaded log.
    #[default]
    Reconcile,
    /// Always rebuild the aggregate from the loaded log.
    Recompute,
}

/// Whether the seeded welcome message counts toward the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WelcomePolicy {
    #[default]
    Exclude,
    Count,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub data_dir: PathBuf,
    pub stats_source: StatsSource,
    pub welcome: WelcomePolicy,
    pub chart_enabled: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            stats_source: StatsSource::default(),
            welcome: WelcomePolicy::default(),
            chart_enabled: true,
        }
    }
}

impl ChatConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `CHATSTATS_DATA_DIR`: default `$HOME/.chatstats`
    /// - `CHATSTATS_STATS_SOURCE`: `snapshot`, `reconcile` (default) or `recompute`
    /// - `CHATSTATS_WELCOME`: `exclude` (default) or `count`
    /// - `CHATSTATS_CHART`: `true` (default) or `false`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let stats_source = parse_stats_source(lookup(STATS_SOURCE_VAR).as_deref())?;
        let welcome = parse_welcome(lookup(WELCOME_VAR).as_deref())?;
        let chart_enabled = parse_bool(CHART_VAR, lookup(CHART_VAR).as_deref(), true)?;

        Ok(Self {
            data_dir,
            stats_source,
            welcome,
            chart_enabled,
        })
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    home_dir().join(".chatstats")
}

fn parse_stats_source(raw: Option<&str>) -> Result<StatsSource, ConfigError> {
    match raw.map(str::trim).unwrap_or("reconcile") {
        "snapshot" => Ok(StatsSource::Snapshot),
        "reconcile" => Ok(StatsSource::Reconcile),
        "recompute" => Ok(StatsSource::Recompute),
        other => Err(ConfigError::UnknownValue {
            var: STATS_SOURCE_VAR,
            value: other.to_string(),
            expected: "snapshot, reconcile, recompute",
        }),
    }
}

fn parse_welcome(raw: Option<&str>) -> Result<WelcomePolicy, ConfigError> {
    match raw.map(str::trim).unwrap_or("exclude") {
        "exclude" => Ok(WelcomePolicy::Exclude),
        "count" => Ok(WelcomePolicy::Count),
        other => Err(ConfigError::UnknownValue {
            var: WELCOME_VAR,
            value: other.to_string(),
            expected: "exclude, count",
        }),
    }
}

fn parse_bool(var: &'static str, raw: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ChatConfig::from_lookup(lookup_from(&[])).expect("defaults should parse");
        assert_eq!(config.stats_source, StatsSource::Reconcile);
        assert_eq!(config.welcome, WelcomePolicy::Exclude);
        assert!(config.chart_enabled);
        assert!(config.data_dir.ends_with(".chatstats"));
    }

    #[test]
    fn parses_overrides() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            (DATA_DIR_VAR, "/tmp/chat-data"),
            (STATS_SOURCE_VAR, "recompute"),
            (WELCOME_VAR, "count"),
            (CHART_VAR, "off"),
        ]))
        .expect("overrides should parse");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/chat-data"));
        assert_eq!(config.stats_source, StatsSource::Recompute);
        assert_eq!(config.welcome, WelcomePolicy::Count);
        assert!(!config.chart_enabled);
    }

    #[test]
    fn blank_data_dir_falls_back_to_default() {
        let config = ChatConfig::from_lookup(lookup_from(&[(DATA_DIR_VAR, "  ")]))
            .expect("blank dir should parse");
        assert!(config.data_dir.ends_with(".chatstats"));
    }

    #[test]
    fn rejects_unknown_stats_source() {
        let err = ChatConfig::from_lookup(lookup_from(&[(STATS_SOURCE_VAR, "guess")]))
            .expect_err("unknown source should fail");
        assert_eq!(
            err,
            ConfigError::UnknownValue {
                var: STATS_SOURCE_VAR,
                value: "guess".into(),
                expected: "snapshot, reconcile, recompute",
            }
        );
    }

    #[test]
    fn rejects_invalid_bool() {
        let err = ChatConfig::from_lookup(lookup_from(&[(CHART_VAR, "maybe")]))
            .expect_err("invalid bool should fail");
        assert!(err.to_string().contains(CHART_VAR));
    }
}
