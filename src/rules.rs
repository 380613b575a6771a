// Rules collaborator: advances a snapshot given one move per living snake
//
// The engine only depends on the `Ruleset` trait. `StandardRules` implements
// the standard ruleset minus hazards and food spawning, which is all a
// one-ply lookahead needs.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::Config;
use crate::snapshot::{AgentState, EliminationCause, GameSnapshot, Move};
use crate::types::Coord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("no move supplied for living snake '{0}'")]
    MissingMove(String),

    #[error("more than one move supplied for snake '{0}'")]
    DuplicateMove(String),

    #[error("move supplied for unknown snake '{0}'")]
    UnknownAgent(String),

    #[error("move supplied for eliminated snake '{0}'")]
    EliminatedAgent(String),
}

/// Applies a complete move set to a snapshot, producing the next turn
pub trait Ruleset: Send + Sync {
    fn apply_moves(&self, snapshot: &GameSnapshot, moves: &[Move]) -> Result<GameSnapshot, RulesError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardRules {
    pub max_health: i32,
    pub health_loss_per_turn: i32,
}

impl StandardRules {
    pub fn new(max_health: i32, health_loss_per_turn: i32) -> Self {
        StandardRules {
            max_health,
            health_loss_per_turn,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        StandardRules::new(
            config.game_rules.max_health,
            config.game_rules.health_loss_per_turn,
        )
    }

    /// Maps each living snake's index to its move, rejecting incomplete sets
    fn validate<'m>(
        snapshot: &GameSnapshot,
        moves: &'m [Move],
    ) -> Result<HashMap<usize, &'m Move>, RulesError> {
        let index_of: HashMap<&str, usize> = snapshot
            .agent_states()
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.as_str(), i))
            .collect();

        let mut by_index = HashMap::with_capacity(moves.len());
        for mv in moves {
            let idx = *index_of
                .get(mv.agent_id.as_str())
                .ok_or_else(|| RulesError::UnknownAgent(mv.agent_id.clone()))?;
            if !snapshot.agent_states()[idx].is_alive() {
                return Err(RulesError::EliminatedAgent(mv.agent_id.clone()));
            }
            if by_index.insert(idx, mv).is_some() {
                return Err(RulesError::DuplicateMove(mv.agent_id.clone()));
            }
        }

        if let Some(missing) = snapshot
            .agent_states()
            .iter()
            .enumerate()
            .find(|(i, a)| a.is_alive() && !by_index.contains_key(i))
        {
            return Err(RulesError::MissingMove(missing.1.id.clone()));
        }

        Ok(by_index)
    }
}

impl Ruleset for StandardRules {
    fn apply_moves(&self, snapshot: &GameSnapshot, moves: &[Move]) -> Result<GameSnapshot, RulesError> {
        let by_index = Self::validate(snapshot, moves)?;
        let mut agents: Vec<AgentState> = snapshot.agent_states().to_vec();
        let mut food: Vec<Coord> = snapshot.food().to_vec();

        // Phase 1: move heads forward and drop the last segment
        for (idx, mv) in &by_index {
            let agent = &mut agents[*idx];
            let new_head = mv.direction.apply(&agent.body[0]);
            agent.body.insert(0, new_head);
            agent.body.pop();
        }

        // Phase 2: hunger
        for agent in agents.iter_mut().filter(|a| a.is_alive()) {
            agent.health -= self.health_loss_per_turn;
        }

        // Phase 3: feed and grow; every snake landing on a food eats it
        let mut eaten = HashSet::new();
        for agent in agents.iter_mut().filter(|a| a.is_alive()) {
            let head = agent.body[0];
            if food.contains(&head) {
                agent.health = self.max_health;
                let tail = agent.body[agent.body.len() - 1];
                agent.body.push(tail);
                eaten.insert(head);
            }
        }
        food.retain(|f| !eaten.contains(f));

        // Phase 4: starvation and walls
        for agent in agents.iter_mut().filter(|a| a.is_alive()) {
            if agent.health <= 0 {
                agent.eliminated = Some(EliminationCause::OutOfHealth);
            } else if !snapshot.in_bounds(agent.body[0]) {
                agent.eliminated = Some(EliminationCause::WallCollision);
            }
        }

        // Phase 5: collisions among the survivors of phase 4, applied together
        let collisions: Vec<(usize, EliminationCause)> = agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_alive())
            .filter_map(|(i, agent)| Self::collision(i, agent, &agents).map(|cause| (i, cause)))
            .collect();
        for (idx, cause) in collisions {
            agents[idx].eliminated = Some(cause);
        }

        snapshot.next_turn(food, agents)
    }
}

impl StandardRules {
    fn collision(idx: usize, agent: &AgentState, agents: &[AgentState]) -> Option<EliminationCause> {
        let head = agent.body[0];

        if agent.body[1..].contains(&head) {
            return Some(EliminationCause::SelfCollision);
        }

        let others = agents
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != idx && other.is_alive());

        for (_, other) in others.clone() {
            if other.body[1..].contains(&head) {
                return Some(EliminationCause::BodyCollision);
            }
        }

        for (_, other) in others {
            if other.body[0] == head && agent.body.len() <= other.body.len() {
                return Some(EliminationCause::HeadToHeadCollision);
            }
        }

        None
    }
}
