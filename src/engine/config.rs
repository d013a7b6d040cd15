//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [session]
//! player1_marker = "X"
//! player2_marker = "O"
//! computer_slot = "two"      # omit for human vs human
//! strategy = "hard"          # random | heuristic | minimax, or a [difficulty] tier
//! computer_delay_ms = 700
//! seed = 42
//!
//! [minimax]
//! tie_break = "shuffle"      # or "first_in_order"
//!
//! [difficulty]
//! easy = "random"
//! medium = "heuristic"
//! hard = "minimax"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::bot_strategy::StrategyKind;
use crate::engine::error::ConfigError;
use crate::engine::minimax::MinimaxParams;
use crate::engine::models::{PlayMode, Slot};
use crate::engine::scheduler::DEFAULT_COMPUTER_DELAY;
use crate::engine::session::{validate_markers, SessionConfig};

pub const CONFIG_FILE_NAME: &str = "tictactoe.toml";

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub minimax: MinimaxParams,
    #[serde(default)]
    pub difficulty: DifficultyConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionSettings {
    #[serde(default = "default_player1_marker")]
    pub player1_marker: String,
    #[serde(default = "default_player2_marker")]
    pub player2_marker: String,
    /// Slot played by the computer; None for human vs human.
    #[serde(default)]
    pub computer_slot: Option<Slot>,
    /// Strategy name or difficulty tier.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_delay_ms")]
    pub computer_delay_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_player1_marker() -> String {
    "X".into()
}

fn default_player2_marker() -> String {
    "O".into()
}

fn default_strategy() -> String {
    "easy".into()
}

fn default_delay_ms() -> u64 {
    DEFAULT_COMPUTER_DELAY.as_millis() as u64
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            player1_marker: default_player1_marker(),
            player2_marker: default_player2_marker(),
            computer_slot: None,
            strategy: default_strategy(),
            computer_delay_ms: default_delay_ms(),
            seed: None,
        }
    }
}

/// Maps difficulty tiers to strategies. Unset tiers use the built-in mapping.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct DifficultyConfig {
    pub easy: Option<StrategyKind>,
    pub medium: Option<StrategyKind>,
    pub hard: Option<StrategyKind>,
}

impl DifficultyConfig {
    pub fn resolve(&self, tier: &str) -> Option<StrategyKind> {
        match tier {
            "easy" => Some(self.easy.unwrap_or(StrategyKind::Random)),
            "medium" => Some(self.medium.unwrap_or(StrategyKind::Heuristic)),
            "hard" => Some(self.hard.unwrap_or(StrategyKind::Minimax)),
            _ => None,
        }
    }
}

impl EngineConfig {
    /// Resolve a strategy name or difficulty tier.
    pub fn resolve_strategy(&self, name: &str) -> Result<StrategyKind, ConfigError> {
        let name = name.trim().to_lowercase();
        match self.difficulty.resolve(&name) {
            Some(kind) => Ok(kind),
            None => name.parse(),
        }
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.session.computer_delay_ms)
    }

    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        let s = &self.session;
        let markers = validate_markers(&s.player1_marker, &s.player2_marker)?;
        let mode = match s.computer_slot {
            Some(computer) => PlayMode::HumanVsComputer { computer },
            None => PlayMode::HumanVsHuman,
        };
        Ok(SessionConfig {
            markers,
            mode,
            strategy: self.resolve_strategy(&s.strategy)?,
            minimax: self.minimax.clone(),
            seed: s.seed,
        })
    }
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config: EngineConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    // Surface bad markers or strategy names at load time.
    config.to_session_config().map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    Ok(config)
}

/// Try well-known paths, returning the built-in defaults if none is usable.
pub fn load_default_config() -> EngineConfig {
    let candidates = [
        "tictactoe.toml",
        "../tictactoe.toml",
        "/etc/tictactoe/tictactoe.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), "loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load config");
                }
            }
        }
    }
    tracing::info!("no {} found, using built-in defaults", CONFIG_FILE_NAME);
    EngineConfig::default()
}
