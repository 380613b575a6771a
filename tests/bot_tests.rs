// Endpoint-level tests for the Bot
//
// Drives the bot the way the HTTP handlers do: requests arrive as JSON,
// /move runs the full decision on a blocking task.

use serde_json::json;

use portfolio_snake::bot::Bot;
use portfolio_snake::config::Config;
use portfolio_snake::error::EngineError;
use portfolio_snake::types::{Coord, Direction, GameState, MoveResponse};

fn request(turn: u32, you_id: &str) -> GameState {
    serde_json::from_value(json!({
        "game": { "id": "test-game", "ruleset": { "name": "standard" }, "timeout": 500 },
        "turn": turn,
        "board": {
            "height": 11,
            "width": 11,
            "food": [{ "x": 5, "y": 5 }, { "x": 0, "y": 10 }],
            "hazards": [],
            "snakes": [
                {
                    "id": "me", "name": "me", "health": 80,
                    "body": [{ "x": 1, "y": 1 }, { "x": 1, "y": 2 }, { "x": 1, "y": 3 }],
                    "head": { "x": 1, "y": 1 }, "length": 3, "latency": "12", "shout": ""
                },
                {
                    "id": "them", "name": "them", "health": 75,
                    "body": [{ "x": 8, "y": 8 }, { "x": 8, "y": 7 }, { "x": 8, "y": 6 }],
                    "head": { "x": 8, "y": 8 }, "length": 3
                }
            ]
        },
        "you": {
            "id": you_id, "name": you_id, "health": 80,
            "body": [{ "x": 1, "y": 1 }, { "x": 1, "y": 2 }, { "x": 1, "y": 3 }],
            "head": { "x": 1, "y": 1 }, "length": 3
        }
    }))
    .expect("well-formed request")
}

fn bot() -> Bot {
    Bot::new(Config::default_hardcoded()).expect("default config builds a bot")
}

#[test]
fn test_info_returns_configured_metadata() {
    let info = bot().info();

    assert_eq!(info["apiversion"], "1");
    assert_eq!(info["author"], "portfolio-snake");
    assert_eq!(info["color"], "#FF7F7F");
    assert_eq!(info["head"], "evil");
    assert_eq!(info["tail"], "nr-booster");
}

#[tokio::test]
async fn test_move_is_legal_and_announced() {
    let bot = bot();
    let response = bot.get_move(request(10, "me")).await.expect("decision");

    // Up runs into the neck
    assert!(
        matches!(response.direction, Direction::Right | Direction::Down | Direction::Left),
        "chose {}",
        response.direction
    );
    let next = response.direction.apply(&Coord::new(1, 1));
    assert_ne!(next, Coord::new(1, 2));
    assert_eq!(response.shout, format!("I'm moving {}", response.direction));
}

#[tokio::test]
async fn test_trapped_at_top_wall_moves_down() {
    let bot = bot();
    let state: GameState = serde_json::from_value(json!({
        "game": { "id": "test-game", "timeout": 500 },
        "turn": 20,
        "board": {
            "height": 11,
            "width": 11,
            "food": [],
            "snakes": [{
                "id": "me", "name": "me", "health": 100,
                "body": [
                    { "x": 5, "y": 10 }, { "x": 4, "y": 10 }, { "x": 4, "y": 9 },
                    { "x": 4, "y": 8 }, { "x": 5, "y": 8 }, { "x": 6, "y": 8 },
                    { "x": 6, "y": 9 }, { "x": 6, "y": 10 }
                ],
                "head": { "x": 5, "y": 10 }, "length": 8
            }]
        },
        "you": {
            "id": "me", "name": "me", "health": 100,
            "body": [{ "x": 5, "y": 10 }],
            "head": { "x": 5, "y": 10 }, "length": 8
        }
    }))
    .expect("well-formed request");

    let response = bot.get_move(state).await.expect("decision");
    assert_eq!(response.direction, Direction::Down);
}

#[tokio::test]
async fn test_unknown_controlled_snake_is_an_error() {
    let result = bot().get_move(request(10, "stranger")).await;

    assert!(matches!(
        result,
        Err(EngineError::MissingAgent(id)) if id == "stranger"
    ));
}

#[test]
fn test_move_response_wire_format() {
    let response = MoveResponse {
        direction: Direction::Up,
        shout: "I'm moving up".to_string(),
    };

    assert_eq!(
        serde_json::to_value(&response).expect("serializable"),
        json!({ "move": "up", "shout": "I'm moving up" })
    );
}
