use actix_web::{web, App, HttpServer};
use drawguess::config::db::DbProfile;
use drawguess::config::game::GameSettings;
use drawguess::config::server::ServerSettings;
use drawguess::infra::state::build_state;
use drawguess::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use drawguess::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Configuration comes from the process environment only; nothing reads
    // .env files.
    let server = match ServerSettings::from_env() {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };
    let settings = match GameSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid game configuration");
            std::process::exit(1);
        }
    };
    let profile = match DbProfile::from_env() {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "invalid database configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db(profile)
        .with_settings(settings)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };
    info!(?profile, host = %server.host, port = server.port, "drawguess backend starting");

    let data = web::Data::new(app_state);
    let origins = server.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
