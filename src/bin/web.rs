//! Single binary web server: JSON API over one washer toss tournament.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, STATE_FILE (JSON snapshot path),
//! PRESET_PLAYERS (comma-separated names registered when no tournament is saved).

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::RwLock;
use washer_toss_bracket::{
    report, GameMatch, JsonFileStore, MatchFilter, MatchId, PlayerId, TournamentEngine,
    TournamentError, TournamentState,
};

type Engine = TournamentEngine<JsonFileStore>;

/// The one tournament this process serves.
type AppState = Data<RwLock<Engine>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

/// A score as typed: JSON number or string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreField {
    Number(i64),
    Text(String),
}

impl ScoreField {
    fn as_text(&self) -> String {
        match self {
            ScoreField::Number(n) => n.to_string(),
            ScoreField::Text(s) => s.clone(),
        }
    }
}

#[derive(Deserialize)]
struct SubmitScoreBody {
    team1_score: ScoreField,
    team2_score: ScoreField,
}

#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: String,
}

/// Bad input is the caller's to fix (400); storage and corrupted state are ours (500).
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Storage(_) | TournamentError::InvariantViolation(_) => {
            log::error!("{e}");
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
        service: "washer-toss-bracket",
    })
}

/// Full tournament state (roster, teams, matches, counters, champion).
#[get("/api/tournament")]
async fn api_get_tournament(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.tournament())
}

/// Register a player (Registration only).
#[post("/api/tournament/players")]
async fn api_add_player(state: AppState, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_player(&body.name) {
        Ok(_) => HttpResponse::Ok().json(g.tournament()),
        Err(e) => error_response(&e),
    }
}

/// Remove a player by id (Registration only).
#[delete("/api/tournament/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove_player(path.player_id) {
        Ok(()) => HttpResponse::Ok().json(g.tournament()),
        Err(e) => error_response(&e),
    }
}

/// Draw teams from the roster; calling again re-shuffles until the bracket starts.
#[post("/api/tournament/teams")]
async fn api_form_teams(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.form_teams() {
        Ok(_) => HttpResponse::Ok().json(g.tournament()),
        Err(e) => error_response(&e),
    }
}

/// Confirm teams and create winners round 1.
#[post("/api/tournament/bracket")]
async fn api_generate_bracket(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.generate_bracket() {
        Ok(()) => HttpResponse::Ok().json(g.tournament()),
        Err(e) => error_response(&e),
    }
}

/// List matches, optionally by `bracket` (winners, losers, grand-final) and `round`.
#[get("/api/tournament/matches")]
async fn api_list_matches(state: AppState, filter: Query<MatchFilter>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let matches: Vec<&GameMatch> = g.list_matches(&filter);
    HttpResponse::Ok().json(matches)
}

/// Submit the score of one match, then return the updated tournament.
#[post("/api/tournament/matches/{match_id}/score")]
async fn api_submit_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<SubmitScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let id = MatchId::from(path.match_id.as_str());
    if let Err(e) = g.open_score_entry(&id) {
        return error_response(&e);
    }
    let result = g.submit_score_entry(&body.team1_score.as_text(), &body.team2_score.as_text());
    match result {
        Ok(()) => HttpResponse::Ok().json(g.tournament()),
        Err(e) => {
            g.cancel_score_entry();
            error_response(&e)
        }
    }
}

/// Champion team, or null while the tournament is running.
#[get("/api/tournament/champion")]
async fn api_champion(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(serde_json::json!({
        "complete": g.is_complete(),
        "champion": g.champion(),
    }))
}

/// Standings as CSV (one row per team).
#[get("/api/tournament/standings.csv")]
async fn api_standings_csv(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut buf = Vec::new();
    match report::write_standings_csv(g.tournament(), &mut buf) {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(buf),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Start over: clears roster, teams, matches and champion.
#[post("/api/tournament/reset")]
async fn api_reset(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.reset_tournament() {
        Ok(()) => HttpResponse::Ok().json(g.tournament()),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_state_file() -> String {
    "washer_toss_tournament.json".to_string()
}

/// Register the configured names on a fresh tournament. Duplicates are skipped with a warning.
fn register_preset_players(engine: &mut Engine, names: &str) {
    if engine.state() != TournamentState::Registration || !engine.tournament().players.is_empty() {
        return;
    }
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if let Err(e) = engine.add_player(name) {
            log::warn!("Skipping preset player {name:?}: {e}");
        }
    }
    log::info!("Registered {} preset players", engine.tournament().players.len());
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let state_file = std::env::var("STATE_FILE").unwrap_or_else(|_| default_state_file());

    let mut engine = TournamentEngine::open(JsonFileStore::new(&state_file))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    if let Ok(names) = std::env::var("PRESET_PLAYERS") {
        register_preset_players(&mut engine, &names);
    }
    log::info!(
        "Tournament {} ({:?}) backed by {}",
        engine.tournament().id,
        engine.state(),
        state_file
    );

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(engine));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_form_teams)
            .service(api_generate_bracket)
            .service(api_list_matches)
            .service(api_submit_score)
            .service(api_champion)
            .service(api_standings_csv)
            .service(api_reset)
    })
    .bind(bind)?
    .run()
    .await
}
