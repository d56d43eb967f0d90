//! Load configuration from XDG `config.toml` and project `.env`, then apply to the process
//! environment with priority: **existing env > .env > XDG**.
//!
//! Also exposes `AgentConfig`, a typed read of the numeric caps and LLM provider settings the
//! orchestrator consumes, once the layered env is in place.

mod dotenv;
mod xdg_toml;

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Default XDG/`.env` application name used for `load_and_apply`.
pub const APP_NAME: &str = "agent-core";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Loads config from XDG `config.toml` and optional project `.env`, then sets environment
/// variables only for keys that are **not** already set (so existing env has highest priority).
///
/// Order of precedence when a key is missing in the process environment:
/// 1. Value from project `.env` (current directory or `override_dir` if given)
/// 2. Value from `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` table
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut keys: std::collections::HashSet<String> = xdg_map.keys().cloned().collect();
    keys.extend(dotenv_map.keys().cloned());

    for key in keys {
        if std::env::var(&key).is_ok() {
            continue;
        }
        let value = dotenv_map.get(&key).or_else(|| xdg_map.get(&key)).cloned();
        if let Some(v) = value {
            std::env::set_var(&key, v);
        }
    }

    Ok(())
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Which complex-task strategy the orchestrator routes to.
///
/// Decided open question (SPEC_FULL.md §11): exposed as a config switch rather than guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyMode {
    MultiStep,
    React,
}

impl StrategyMode {
    fn from_env(key: &str, default: Self) -> Self {
        match std::env::var(key).ok().as_deref() {
            Some("react") => StrategyMode::React,
            Some("multistep") | Some("multi_step") => StrategyMode::MultiStep,
            _ => default,
        }
    }
}

/// Typed orchestrator configuration, read from the process environment after `load_and_apply`.
///
/// Field names mirror the configuration options enumerated in SPEC_FULL.md §6.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub max_simple_steps: u32,
    pub max_outer_steps: u32,
    pub max_inner_steps: u32,
    pub max_react_cycles: u32,
    pub max_validation_attempts: u32,
    pub human_input_timeout: Duration,
    pub human_input_check_interval: Duration,
    pub loop_lookback: usize,
    pub loop_threshold: usize,
    pub strategy_mode: StrategyMode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_simple_steps: 10,
            max_outer_steps: 100,
            max_inner_steps: 30,
            max_react_cycles: 15,
            max_validation_attempts: 5,
            human_input_timeout: Duration::from_millis(600_000),
            human_input_check_interval: Duration::from_millis(500),
            loop_lookback: 8,
            loop_threshold: 4,
            strategy_mode: StrategyMode::MultiStep,
        }
    }
}

impl AgentConfig {
    /// Reads config from the process environment, falling back to defaults per field.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_simple_steps: env_u32("MAX_SIMPLE_STEPS", defaults.max_simple_steps),
            max_outer_steps: env_u32("MAX_OUTER_STEPS", defaults.max_outer_steps),
            max_inner_steps: env_u32("MAX_INNER_STEPS", defaults.max_inner_steps),
            max_react_cycles: env_u32("MAX_REACT_CYCLES", defaults.max_react_cycles),
            max_validation_attempts: env_u32(
                "MAX_VALIDATION_ATTEMPTS",
                defaults.max_validation_attempts,
            ),
            human_input_timeout: Duration::from_millis(env_u64(
                "HUMAN_INPUT_TIMEOUT",
                defaults.human_input_timeout.as_millis() as u64,
            )),
            human_input_check_interval: Duration::from_millis(env_u64(
                "HUMAN_INPUT_CHECK_INTERVAL",
                defaults.human_input_check_interval.as_millis() as u64,
            )),
            loop_lookback: env_u32("LOOP_LOOKBACK", defaults.loop_lookback as u32) as usize,
            loop_threshold: env_u32("LOOP_THRESHOLD", defaults.loop_threshold as u32) as usize,
            strategy_mode: StrategyMode::from_env("STRATEGY_MODE", defaults.strategy_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn restore_var(key: &str, prev: Option<String>) {
        match prev {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }

    #[test]
    fn existing_env_wins() {
        env::set_var("CONFIG_TEST_EXISTING", "from_env");
        let _ = load_and_apply(APP_NAME, None);
        assert_eq!(env::var("CONFIG_TEST_EXISTING").as_deref(), Ok("from_env"));
        env::remove_var("CONFIG_TEST_EXISTING");
    }

    #[test]
    fn load_and_apply_no_config_ok() {
        let r = load_and_apply("config-crate-nonexistent-app-xyz", None::<&std::path::Path>);
        assert!(r.is_ok());
    }

    #[test]
    fn dotenv_overrides_xdg() {
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join(APP_NAME);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(
            app_dir.join("config.toml"),
            "[env]\nCONFIG_TEST_PRIORITY = \"from_xdg\"\n",
        )
        .unwrap();

        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "CONFIG_TEST_PRIORITY=from_dotenv\n",
        )
        .unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("CONFIG_TEST_PRIORITY");

        let _ = load_and_apply(APP_NAME, Some(dotenv_dir.path()));
        let val = env::var("CONFIG_TEST_PRIORITY").unwrap();
        env::remove_var("CONFIG_TEST_PRIORITY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(val, "from_dotenv");
    }

    #[test]
    fn default_caps_match_spec() {
        let c = AgentConfig::default();
        assert_eq!(c.max_simple_steps, 10);
        assert_eq!(c.max_outer_steps, 100);
        assert_eq!(c.max_inner_steps, 30);
        assert_eq!(c.loop_lookback, 8);
        assert_eq!(c.loop_threshold, 4);
        assert_eq!(c.human_input_timeout, Duration::from_millis(600_000));
        assert_eq!(c.strategy_mode, StrategyMode::MultiStep);
    }

    #[test]
    fn strategy_mode_from_env_react() {
        env::set_var("STRATEGY_MODE_TEST", "react");
        let mode = StrategyMode::from_env("STRATEGY_MODE_TEST", StrategyMode::MultiStep);
        env::remove_var("STRATEGY_MODE_TEST");
        assert_eq!(mode, StrategyMode::React);
    }
}
