//! Game lifecycle and game-scoped reads.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::run_flow;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, GameId, ValidatedJson};
use crate::services::queries;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct CreateGameRequest {
    category: String,
    max_rounds: i32,
}

#[derive(Debug, Deserialize)]
struct JoinGameRequest {
    code: String,
}

#[derive(Debug, Default, Deserialize)]
struct RequestCardsRequest {
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CardsRequested {
    game_id: i64,
    requested: usize,
}

/// POST /api/games
async fn create_game(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let CreateGameRequest {
        category,
        max_rounds,
    } = body.into_inner();

    let created = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move {
            flow.create_game(txn, &user.user_id, &user.username, &category, max_rounds)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(created))
}

/// POST /api/games/join
async fn join_game(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<JoinGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = body.into_inner().code;
    let joined = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move {
            flow.join_game(txn, &code, &user.user_id, &user.username)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(joined))
}

/// POST /api/games/{game_id}/start
async fn start_game(
    http_req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move { flow.start_game(txn, game_id.0, &user.user_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(game))
}

/// POST /api/games/{game_id}/leave
async fn leave_game(
    http_req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let left = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move { flow.leave_game(txn, game_id.0, &user.user_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(left))
}

/// POST /api/games/{game_id}/cards
///
/// Queues card generation for the game. Generation itself runs after the
/// response is sent.
async fn request_cards(
    http_req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<Option<RequestCardsRequest>>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let count = body.into_inner().unwrap_or_default().count;
    let requested = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move {
            flow.request_cards(txn, game_id.0, &user.user_id, count)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Accepted().json(CardsRequested {
        game_id: game_id.0,
        requested,
    }))
}

/// POST /api/games/{game_id}/turns
///
/// The response carries the secret word; only the drawer can get here.
async fn start_turn(
    http_req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let started = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move { flow.start_turn(txn, game_id.0, &user.user_id).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(started))
}

/// GET /api/games/{game_id}
async fn get_game(
    http_req: HttpRequest,
    _user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { queries::get_game(txn, game_id.0).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(game))
}

/// GET /api/games/{game_id}/players
async fn get_players(
    http_req: HttpRequest,
    _user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let players = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { queries::get_players(txn, game_id.0).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(players))
}

/// GET /api/games/{game_id}/turn
///
/// The active turn, or the last one played. 204 when no turn exists yet.
async fn get_current_turn(
    http_req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let now = app_state.ctx.now();
    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move {
            queries::get_current_turn(txn, game_id.0, &user.user_id, now).await
        })
    })
    .await?;

    Ok(match view {
        Some(view) => HttpResponse::Ok().json(view),
        None => HttpResponse::NoContent().finish(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_game)));
    cfg.service(web::resource("/join").route(web::post().to(join_game)));
    cfg.service(web::resource("/{game_id}").route(web::get().to(get_game)));
    cfg.service(web::resource("/{game_id}/start").route(web::post().to(start_game)));
    cfg.service(web::resource("/{game_id}/leave").route(web::post().to(leave_game)));
    cfg.service(web::resource("/{game_id}/cards").route(web::post().to(request_cards)));
    cfg.service(web::resource("/{game_id}/turns").route(web::post().to(start_turn)));
    cfg.service(web::resource("/{game_id}/turn").route(web::get().to(get_current_turn)));
    cfg.service(web::resource("/{game_id}/players").route(web::get().to(get_players)));
}
