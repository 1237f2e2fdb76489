use actix_cors::Cors;
use actix_web::{get, middleware::NormalizePath, web, App, HttpResponse, HttpServer, Responder};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use school_cms_backend::{
    background_task::start_session_purge_task,
    constants::START_TIME,
    db::postgres::create_pool,
    graceful_shutdown::shutdown_signal,
    middlewares::session::SessionMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};

#[get("/")]
async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "School CMS API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": (chrono::Utc::now() - *START_TIME).num_seconds(),
    }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };

    let worker_count = config.worker_count;
    let server_addr = format!("{}:{}", config.host, config.port);
    let app_state = web::Data::new(AppState::new(config, pool));

    tracing::info!(
        "Starting School CMS API v{} on {}",
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let session_repo = app_state.repos.session_repo.clone();

    let server = HttpServer::new({
        let app_state = app_state.clone();
        move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .app_data(app_state.clone())
                .wrap(SessionMiddleware::new(app_state.repos.session_repo.clone()))
                .wrap(cors)
                .wrap(TracingLogger::default())
                .wrap(NormalizePath::trim())
                .service(home)
                .configure(configure_routes)
        }
    })
    .workers(worker_count)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_session_purge_task(session_repo));

    tokio::select! {
        res = server => res.map_err(anyhow::Error::from),
        _ = shutdown_signal() => Ok(()),
    }
}
