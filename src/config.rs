// Configuration module for reading Snake.toml
// Every tunable the agent uses is threaded through construction from here;
// nothing reads module-level defaults at decision time.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::{Direction, InfoResponse};

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub metadata: MetadataConfig,
    pub agent: AgentConfig,
    pub board: BoardConfig,
    pub game_rules: GameRulesConfig,
    pub engine: EngineConfig,
    pub portfolio: PortfolioConfig,
}

/// Static identity/appearance returned on GET /
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataConfig {
    pub apiversion: String,
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

impl MetadataConfig {
    pub fn to_info(&self) -> InfoResponse {
        InfoResponse {
            apiversion: self.apiversion.clone(),
            author: self.author.clone(),
            color: self.color.clone(),
            head: self.head.clone(),
            tail: self.tail.clone(),
        }
    }
}

/// Move-selection behaviour
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Softmax temperature; must be > 0
    pub temperature: f64,
    pub log_performance_stats: bool,
    /// Move handed to an agent that has no passable neighbour
    pub default_move: Direction,
}

/// Grid construction constants
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    /// Tails are only treated as vacating from this turn onwards
    pub tail_vanish_grace_turns: u32,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub max_health: i32,
    pub health_loss_per_turn: i32,
}

/// Worker pool sizing
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// 0 lets rayon pick one thread per CPU
    pub worker_threads: usize,
}

/// Heuristics to register, in report order
#[derive(Debug, Deserialize, Clone)]
pub struct PortfolioConfig {
    pub heuristics: Vec<HeuristicConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HeuristicConfig {
    pub name: String,
    pub weight: f64,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Rejects values the engine cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if !(self.agent.temperature > 0.0) {
            return Err(format!(
                "agent.temperature must be > 0, got {}",
                self.agent.temperature
            ));
        }
        if self.game_rules.max_health <= 0 {
            return Err("game_rules.max_health must be positive".to_string());
        }
        if self.portfolio.heuristics.is_empty() {
            return Err("portfolio.heuristics must not be empty".to_string());
        }
        if let Some(h) = self.portfolio.heuristics.iter().find(|h| h.weight < 0.0) {
            return Err(format!("heuristic '{}' has negative weight", h.name));
        }
        let total: f64 = self.portfolio.heuristics.iter().map(|h| h.weight).sum();
        if total <= 0.0 {
            return Err("portfolio weights must sum to a positive value".to_string());
        }
        Ok(())
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            metadata: MetadataConfig {
                apiversion: "1".to_string(),
                author: "portfolio-snake".to_string(),
                color: "#FF7F7F".to_string(),
                head: "evil".to_string(),
                tail: "nr-booster".to_string(),
            },
            agent: AgentConfig {
                temperature: 5.0,
                log_performance_stats: true,
                default_move: Direction::Up,
            },
            board: BoardConfig {
                tail_vanish_grace_turns: 3,
            },
            game_rules: GameRulesConfig {
                max_health: 100,
                health_loss_per_turn: 1,
            },
            engine: EngineConfig { worker_threads: 0 },
            portfolio: PortfolioConfig {
                heuristics: vec![
                    HeuristicConfig {
                        name: "health".to_string(),
                        weight: 1.0,
                    },
                    HeuristicConfig {
                        name: "food".to_string(),
                        weight: 1.0,
                    },
                    HeuristicConfig {
                        name: "space".to_string(),
                        weight: 1.0,
                    },
                ],
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
