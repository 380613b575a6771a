// Endpoint-facing bot
//
// Takes static configuration at construction and exposes one method per API
// endpoint. The decision itself is CPU-bound, so /move hands it to a blocking
// task and the async worker stays free.

use log::{error, info};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::agent::SnakeAgent;
use crate::board::TailVanishRule;
use crate::config::Config;
use crate::error::EngineError;
use crate::snapshot::GameSnapshot;
use crate::types::{Battlesnake, Board, Game, GameState, MoveResponse};

pub struct Bot {
    config: Config,
    agent: Arc<SnakeAgent>,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Result<Self, EngineError> {
        let agent = SnakeAgent::from_config(&config)?;
        Ok(Bot::with_agent(config, agent))
    }

    /// Creates a Bot around an already-built agent
    pub fn with_agent(config: Config, agent: SnakeAgent) -> Self {
        Bot {
            config,
            agent: Arc::new(agent),
        }
    }

    pub fn agent(&self) -> &SnakeAgent {
        &self.agent
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");
        json!(self.config.metadata.to_info())
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &u32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START {}", game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &u32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes the next move for a /move request
    /// Corresponds to POST /move endpoint
    ///
    /// # Returns
    /// * `Ok(MoveResponse)` - chosen direction and shout
    /// * `Err(EngineError)` - the request or a simulated state was inconsistent;
    ///   no move is guessed
    pub async fn get_move(&self, state: GameState) -> Result<MoveResponse, EngineError> {
        let tail_rule = TailVanishRule::from_config(&self.config);
        let snapshot = GameSnapshot::from_request(&state, tail_rule)?;
        let agent = self.agent.clone();

        let decision = tokio::task::spawn_blocking(move || agent.choose_move(&snapshot))
            .await
            .map_err(|e| EngineError::Task(e.to_string()))?;

        match decision {
            Ok(d) => {
                info!(
                    "Turn {}: Move {}, Shout '{}'",
                    state.turn, d.direction, d.shout
                );
                Ok(d.to_response())
            }
            Err(e) => {
                error!("Turn {}: decision failed: {}", state.turn, e);
                Err(e)
            }
        }
    }
}
