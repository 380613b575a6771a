// HTTP handler bindings for Battlesnake API endpoints
//
// Thin wrappers binding Rocket routes to the Bot:
// - Deserializing incoming JSON requests
// - Extracting the Bot from Rocket's managed state
// - Delegating to Bot methods
// - Mapping engine failures to a 500 with a JSON error body

use log::error;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Route};
use serde_json::{json, Value};

use crate::bot::Bot;
use crate::types::{GameState, MoveResponse};

/// Every Battlesnake endpoint, for mounting at the server root
pub fn routes() -> Vec<Route> {
    routes![index, start, get_move, end]
}

/// GET / endpoint
/// Returns bot metadata and appearance configuration
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameState>) -> Status {
    bot.start(
        &start_req.game,
        &start_req.turn,
        &start_req.board,
        &start_req.you,
    );

    Status::Ok
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<GameState>,
) -> Result<Json<MoveResponse>, Custom<Json<Value>>> {
    bot.get_move(move_req.into_inner())
        .await
        .map(Json)
        .map_err(|e| {
            error!("Unable to choose a move: {}", e);
            Custom(
                Status::InternalServerError,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

/// POST /end endpoint
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameState>) -> Status {
    bot.end(&end_req.game, &end_req.turn, &end_req.board, &end_req.you);

    Status::Ok
}
