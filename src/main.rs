use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use promptline_server::{
    app_state::AppState,
    config::Config,
    handlers::{configure_routes, json_config},
    middleware::{SessionIdMiddleware, SESSION_HEADER},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }

    let state = AppState::new(config.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!(
        "Starting HTTP server on {}:{} using model {}",
        config.web_server_host,
        config.web_server_port,
        config.generation_model
    );

    let max_upload_bytes = config.max_upload_bytes;
    let cors_origin = config.cors_allowed_origin.clone();

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .expose_headers([SESSION_HEADER]),
            None => Cors::default(),
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .app_data(json_config(max_upload_bytes))
            .wrap(SessionIdMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}
