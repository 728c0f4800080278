use actix_web::{web, App, HttpServer};
use backend::config::ServerConfig;
use backend::middleware::cors::cors_middleware;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend::state::app_state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid server configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %config.host, port = config.port, "starting game loop backend");

    // The in-memory store stands in for the external document store;
    // game-state records are seeded by the out-of-scope bootstrap.
    let (app_state, _store) = AppState::with_memory_store();
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .route("/", web::get().to(routes::health::root))
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
