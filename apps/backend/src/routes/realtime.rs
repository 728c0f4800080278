use actix_web::web;

use crate::ws::session;

/// The websocket upgrade endpoint. Room membership is negotiated over
/// the socket itself via the `join` event, so the path carries no
/// game token.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(session::upgrade)));
}
