use actix_web::web;

pub mod health;
pub mod realtime;

/// Configure application routes for the server and for test harnesses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Realtime gateway: /ws
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));
}
