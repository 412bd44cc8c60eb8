//! Engine limits.

use std::env;

use serde::Deserialize;

use crate::autofinish::DEFAULT_MAX_SWEEPS;
use crate::error::ConfigError;
use crate::history::DEFAULT_UNDO_DEPTH;

pub const UNDO_DEPTH_VAR: &str = "KLONDIKE_UNDO_DEPTH";
pub const AUTO_FINISH_SWEEPS_VAR: &str = "KLONDIKE_AUTO_FINISH_SWEEPS";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// How many snapshots the undo history keeps.
    pub undo_depth: usize,
    /// Cap on auto-finish sweeps. A guard against runaway loops; a normal
    /// finish needs at most 52.
    pub auto_finish_max_sweeps: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            undo_depth: DEFAULT_UNDO_DEPTH,
            auto_finish_max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

impl GameConfig {
    /// Defaults, overridden by `KLONDIKE_UNDO_DEPTH` and
    /// `KLONDIKE_AUTO_FINISH_SWEEPS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = GameConfig::default();
        if let Some(v) = lookup(UNDO_DEPTH_VAR) {
            cfg.undo_depth = positive(UNDO_DEPTH_VAR, &v)?;
        }
        if let Some(v) = lookup(AUTO_FINISH_SWEEPS_VAR) {
            cfg.auto_finish_max_sweeps = positive(AUTO_FINISH_SWEEPS_VAR, &v)?;
        }
        Ok(cfg)
    }
}

fn positive(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}
