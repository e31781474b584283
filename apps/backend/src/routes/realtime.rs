//! Server-sent change notifications for a game.

use std::convert::Infallible;
use std::future::ready;

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, GameId};
use crate::realtime::{ChangeEvent, Topic};
use crate::services::permissions::GameAccess;
use crate::state::app_state::AppState;

fn event_frame(event: &ChangeEvent) -> Bytes {
    match serde_json::to_string(event) {
        Ok(json) => Bytes::from(format!("event: {}\ndata: {json}\n\n", event.name())),
        Err(_) => Bytes::from_static(b": unserializable event\n\n"),
    }
}

fn frame(item: Result<ChangeEvent, BroadcastStreamRecvError>) -> Bytes {
    match item {
        Ok(event) => event_frame(&event),
        // The client re-fetches on any event, so a gap only needs a nudge.
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            Bytes::from(format!("event: lagged\ndata: {missed}\n\n"))
        }
    }
}

/// GET /api/games/{game_id}/events
///
/// Members only. The stream ends after a `game_deleted` event.
async fn game_events(
    http_req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move {
            let access = GameAccess::load(txn, game_id.0).await?;
            access.require_member(&user.user_id)?;
            Ok(())
        })
    })
    .await?;

    app_state.realtime.prune();
    let receiver = app_state.realtime.subscribe(Topic::Game(game_id.0));
    debug!(game_id = game_id.0, "event stream opened");

    let events = stream::unfold(
        (BroadcastStream::new(receiver), false),
        |(mut inner, finished)| async move {
            if finished {
                return None;
            }
            let item = inner.next().await?;
            let last = matches!(item, Ok(ChangeEvent::GameDeleted { .. }));
            Some((Ok::<_, Infallible>(frame(item)), (inner, last)))
        },
    );
    let body = stream::once(ready(Ok(Bytes::from_static(b": connected\n\n")))).chain(events);

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{game_id}/events").route(web::get().to(game_events)));
}
