use actix_web::web;

use crate::handlers;

/// All resource endpoints live under `/api/<resource>?action=...`; the
/// per-resource dispatchers route on the action and HTTP method.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/auth", web::route().to(handlers::auth::dispatch))
            .route("/pages", web::route().to(handlers::pages::dispatch))
            .route("/news", web::route().to(handlers::news::dispatch))
            .route("/programs", web::route().to(handlers::programs::dispatch))
            .route("/staff", web::route().to(handlers::staff::dispatch))
            .route("/media", web::route().to(handlers::media::dispatch))
            .route("/contact", web::route().to(handlers::contact::dispatch))
            .route("/settings", web::route().to(handlers::settings::dispatch)),
    );
}
