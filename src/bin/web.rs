//! Single binary JSON API over the tournament engine, backed by the in-memory store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, patch, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use dart_poule_engine::{
    assign_board, assign_referee, board_status, compute_standings, create_tournament,
    report_score, start_knockout_phase, update_round_format, update_settings, BoardId,
    CompetitorId, MatchId, MemoryStore, SettingsUpdate, TournamentError, TournamentId,
    TournamentSettings, TournamentStore,
};
use serde::Deserialize;
use std::sync::RwLock;

/// In-memory state. The write lock is held for a whole engine call, so score reports and the
/// round advance they trigger never interleave.
type AppState = Data<RwLock<MemoryStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddCompetitorBody {
    name: String,
}

#[derive(Deserialize)]
struct AddBoardBody {
    name: String,
    number: u32,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(flatten)]
    settings: TournamentSettings,
    competitor_ids: Vec<CompetitorId>,
    #[serde(default)]
    board_ids: Vec<BoardId>,
}

#[derive(Deserialize)]
struct ScoreBody {
    score_1: u32,
    score_2: u32,
}

#[derive(Deserialize)]
struct BoardBody {
    board_number: u32,
}

/// `referee_id: null` clears the referee.
#[derive(Deserialize)]
struct RefereeBody {
    referee_id: Option<CompetitorId>,
}

#[derive(Deserialize)]
struct RoundFormatBody {
    best_of_legs: u32,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct TournamentRoundPath {
    id: TournamentId,
    round: u32,
}

#[derive(Deserialize)]
struct TournamentBoardPath {
    id: TournamentId,
    number: u32,
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        e if e.is_integrity_error() => {
            log::error!("Integrity error: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dart-poule-engine",
    })
}

/// Register a competitor (a player, or a pair for doubles).
#[post("/api/competitors")]
async fn api_add_competitor(state: AppState, body: Json<AddCompetitorBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    HttpResponse::Ok().json(store.add_competitor(&body.name))
}

#[post("/api/boards")]
async fn api_add_board(state: AppState, body: Json<AddBoardBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(store.add_board(&body.name, body.number))
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(store.tournaments())
}

/// Create a tournament and generate its opening schedule.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    match create_tournament(
        &mut *store,
        &body.name,
        body.settings,
        &body.competitor_ids,
        &body.board_ids,
        &mut rand::thread_rng(),
    ) {
        Ok((tournament, matches)) => HttpResponse::Ok().json(serde_json::json!({
            "tournament": tournament,
            "matches": matches,
        })),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.tournament(path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// Change settings, e.g. allow byes, before the knockout phase is generated.
#[patch("/api/tournaments/{id}")]
async fn api_update_settings(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SettingsUpdate>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match update_settings(&mut *store, path.id, &body) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}/matches")]
async fn api_get_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.matches(path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}/standings")]
async fn api_get_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match compute_standings(&*store, path.id) {
        Ok(tables) => HttpResponse::Ok().json(tables),
        Err(e) => error_response(e),
    }
}

/// Seed the knockout phase from the group tables (hybrid format only).
#[post("/api/tournaments/{id}/start-knockout")]
async fn api_start_knockout(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match start_knockout_phase(&mut *store, path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(e),
    }
}

/// Report a score. Completing a knockout match may generate the next round or finish the
/// tournament.
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_report_score(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match report_score(&mut *store, path.id, path.match_id, body.score_1, body.score_2) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(e),
    }
}

/// Manual override: move a match to another board.
#[patch("/api/tournaments/{id}/matches/{match_id}/board")]
async fn api_assign_board(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<BoardBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match assign_board(&mut *store, path.id, path.match_id, body.board_number) {
        Ok(game) => HttpResponse::Ok().json(game),
        Err(e) => error_response(e),
    }
}

/// Manual override of the scheduled referee.
#[patch("/api/tournaments/{id}/matches/{match_id}/referee")]
async fn api_assign_referee(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RefereeBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match assign_referee(&mut *store, path.id, path.match_id, body.referee_id) {
        Ok(game) => HttpResponse::Ok().json(game),
        Err(e) => error_response(e),
    }
}

/// Change best-of-legs for all unplayed matches of a round.
#[post("/api/tournaments/{id}/rounds/{round}/format")]
async fn api_update_round_format(
    state: AppState,
    path: Path<TournamentRoundPath>,
    body: Json<RoundFormatBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match update_round_format(&mut *store, path.id, path.round, body.best_of_legs) {
        Ok(updated) => HttpResponse::Ok().json(serde_json::json!({ "updated": updated })),
        Err(e) => error_response(e),
    }
}

/// Polled by the scorer at a board: current match, queue and recent results.
#[get("/api/tournaments/{id}/boards/{number}/status")]
async fn api_board_status(state: AppState, path: Path<TournamentBoardPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match board_status(&*store, path.id, path.number) {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(e) => error_response(e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(MemoryStore::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_add_competitor)
            .service(api_add_board)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_update_settings)
            .service(api_get_matches)
            .service(api_get_standings)
            .service(api_start_knockout)
            .service(api_report_score)
            .service(api_assign_board)
            .service(api_assign_referee)
            .service(api_update_round_format)
            .service(api_board_status)
    })
    .bind(bind)?
    .run()
    .await
}
