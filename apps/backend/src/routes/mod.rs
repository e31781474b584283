use actix_web::{web, HttpRequest};
use futures_util::future::BoxFuture;
use sea_orm::DatabaseTransaction;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::services::game_flow::{FlowOutcome, GameFlowService};
use crate::state::app_state::AppState;

pub mod games;
pub mod health;
pub mod realtime;
pub mod turns;

/// Register every route. `main.rs` wraps the result in middleware; tests
/// mount it bare.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(
        web::scope("/api/games")
            .configure(realtime::configure_routes)
            .configure(games::configure_routes),
    );
    cfg.service(web::scope("/api/turns").configure(turns::configure_routes));
}

/// Run a game flow mutation in a transaction, then dispatch its side
/// effects once the transaction has committed.
pub(crate) async fn run_flow<T, F>(
    http_req: &HttpRequest,
    app_state: &AppState,
    f: F,
) -> Result<T, AppError>
where
    F: for<'a> FnOnce(
        &'a DatabaseTransaction,
        GameFlowService,
    ) -> BoxFuture<'a, Result<FlowOutcome<T>, AppError>>,
{
    let flow = app_state.game_flow();
    let service = flow.clone();
    let outcome = with_txn(Some(http_req), app_state, move |txn| f(txn, service)).await?;
    Ok(flow.dispatch(require_db(app_state)?, outcome))
}
