//! Turn actions and turn-scoped reads.

use actix_web::{web, HttpRequest, HttpResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::run_flow;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, TurnId, ValidatedJson};
use crate::services::game_flow::{GameFlowService, SnapshotUploader};
use crate::services::queries;
use crate::state::app_state::AppState;

/// Largest accepted drawing snapshot.
const MAX_DRAWING_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct GuessRequest {
    guess: String,
}

#[derive(Debug, Deserialize)]
struct SelectWinnerRequest {
    winner_id: String,
    time_remaining_seconds: i32,
    /// Base64 PNG of the final canvas
    #[serde(default)]
    drawing: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TimeUpRequest {
    #[serde(default)]
    drawing: Option<String>,
}

#[derive(Debug, Serialize)]
struct DrawingResponse {
    turn_id: i64,
    drawing_url: Option<String>,
}

fn decode_drawing(encoded: Option<&str>) -> Result<Option<Bytes>, AppError> {
    let Some(encoded) = encoded.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let raw = STANDARD.decode(encoded).map_err(|_| {
        AppError::bad_request(ErrorCode::BadRequest, "drawing must be base64-encoded")
    })?;
    if raw.len() > MAX_DRAWING_BYTES {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("drawing exceeds {MAX_DRAWING_BYTES} bytes"),
        ));
    }
    Ok(Some(Bytes::from(raw)))
}

/// Refuse callers who could not attach a snapshot before any bytes hit the
/// blob store.
async fn authorize_snapshot(
    http_req: &HttpRequest,
    app_state: &AppState,
    flow: &GameFlowService,
    turn_id: i64,
    user_id: &str,
    uploader: SnapshotUploader,
) -> Result<(), AppError> {
    let flow = flow.clone();
    let user_id = user_id.to_string();
    with_txn(Some(http_req), app_state, move |txn| {
        Box::pin(async move {
            flow.authorize_snapshot(txn, turn_id, &user_id, uploader)
                .await
        })
    })
    .await
}

async fn store_snapshot(
    http_req: &HttpRequest,
    app_state: &AppState,
    flow: &GameFlowService,
    turn_id: i64,
    user_id: &str,
    uploader: SnapshotUploader,
    encoded: Option<&str>,
) -> Result<Option<String>, AppError> {
    let Some(bytes) = decode_drawing(encoded)? else {
        return Ok(None);
    };
    authorize_snapshot(http_req, app_state, flow, turn_id, user_id, uploader).await?;
    Ok(flow.store_drawing(bytes).await)
}

/// POST /api/turns/{turn_id}/stroke
///
/// Starts the clock. Repeated calls are harmless.
async fn register_first_stroke(
    http_req: HttpRequest,
    user: CurrentUser,
    turn_id: TurnId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let turn = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move {
            flow.register_first_stroke(txn, turn_id.0, &user.user_id)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(turn))
}

/// POST /api/turns/{turn_id}/guesses
async fn submit_guess(
    http_req: HttpRequest,
    user: CurrentUser,
    turn_id: TurnId,
    body: ValidatedJson<GuessRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let flow = app_state.game_flow();
    let outcome = flow
        .submit_guess(
            Some(&http_req),
            &app_state,
            turn_id.0,
            &user.user_id,
            &body.guess,
        )
        .await?;
    let result = flow.dispatch(require_db(&app_state)?, outcome);

    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/turns/{turn_id}/winner
async fn select_winner(
    http_req: HttpRequest,
    user: CurrentUser,
    turn_id: TurnId,
    body: ValidatedJson<SelectWinnerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let SelectWinnerRequest {
        winner_id,
        time_remaining_seconds,
        drawing,
    } = body.into_inner();

    let flow = app_state.game_flow();
    let drawing_ref = store_snapshot(
        &http_req,
        &app_state,
        &flow,
        turn_id.0,
        &user.user_id,
        SnapshotUploader::Drawer,
        drawing.as_deref(),
    )
    .await?;

    let snapshot = drawing_ref.clone();
    let result = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move {
            flow.select_winner(
                txn,
                turn_id.0,
                &user.user_id,
                &winner_id,
                time_remaining_seconds,
                snapshot,
            )
            .await
        })
    })
    .await;

    match result {
        Ok(turn) => Ok(HttpResponse::Ok().json(turn)),
        Err(err) => {
            if let Some(blob_ref) = drawing_ref {
                flow.discard_drawing(&blob_ref).await;
            }
            Err(err)
        }
    }
}

/// POST /api/turns/{turn_id}/time-up
async fn time_up(
    http_req: HttpRequest,
    user: CurrentUser,
    turn_id: TurnId,
    body: ValidatedJson<Option<TimeUpRequest>>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let drawing = body.into_inner().unwrap_or_default().drawing;

    let flow = app_state.game_flow();
    let drawing_ref = store_snapshot(
        &http_req,
        &app_state,
        &flow,
        turn_id.0,
        &user.user_id,
        SnapshotUploader::Member,
        drawing.as_deref(),
    )
    .await?;

    let snapshot = drawing_ref.clone();
    let result = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move { flow.time_up(txn, turn_id.0, &user.user_id, snapshot).await })
    })
    .await;

    match result {
        Ok(turn) => Ok(HttpResponse::Ok().json(turn)),
        Err(err) => {
            if let Some(blob_ref) = drawing_ref {
                flow.discard_drawing(&blob_ref).await;
            }
            Err(err)
        }
    }
}

/// PUT /api/turns/{turn_id}/drawing
///
/// Raw image bytes. If the blob store is down the snapshot is dropped and
/// `drawing_url` comes back null.
async fn attach_drawing(
    http_req: HttpRequest,
    user: CurrentUser,
    turn_id: TurnId,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            "Drawing body is empty",
        ));
    }

    let flow = app_state.game_flow();
    authorize_snapshot(
        &http_req,
        &app_state,
        &flow,
        turn_id.0,
        &user.user_id,
        SnapshotUploader::Drawer,
    )
    .await?;
    let drawing_ref = flow.store_drawing(body).await;

    let stored = drawing_ref.clone();
    let result = run_flow(&http_req, &app_state, move |txn, flow| {
        Box::pin(async move {
            flow.attach_drawing(txn, turn_id.0, &user.user_id, stored.as_deref())
                .await
        })
    })
    .await;

    match result {
        Ok(turn) => {
            let blobs = &app_state.ctx.blobs;
            Ok(HttpResponse::Ok().json(DrawingResponse {
                turn_id: turn.id,
                drawing_url: turn.drawing_ref.as_deref().map(|r| blobs.url(r)),
            }))
        }
        Err(err) => {
            if let Some(blob_ref) = drawing_ref {
                flow.discard_drawing(&blob_ref).await;
            }
            Err(err)
        }
    }
}

/// GET /api/turns/{turn_id}/guesses
async fn get_guesses(
    http_req: HttpRequest,
    _user: CurrentUser,
    turn_id: TurnId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let guesses = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { queries::get_turn_guesses(txn, turn_id.0).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(guesses))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{turn_id}/stroke").route(web::post().to(register_first_stroke)));
    cfg.service(
        web::resource("/{turn_id}/guesses")
            .route(web::post().to(submit_guess))
            .route(web::get().to(get_guesses)),
    );
    cfg.service(web::resource("/{turn_id}/winner").route(web::post().to(select_winner)));
    cfg.service(web::resource("/{turn_id}/time-up").route(web::post().to(time_up)));
    cfg.service(
        web::resource("/{turn_id}/drawing")
            .app_data(web::PayloadConfig::new(MAX_DRAWING_BYTES))
            .route(web::put().to(attach_drawing)),
    );
}
