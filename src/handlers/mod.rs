use actix_web::web;

use crate::errors::AppError;

pub mod career_handler;
pub mod health_handler;
pub mod session_handler;
pub mod study_handler;
pub mod ux_handler;

pub use career_handler::{
    career_navigation, list_domains, parse_background, recommend_tracks, skill_gap,
    skill_mapping, unlearning,
};
pub use health_handler::{health_check, health_check_live};
pub use session_handler::{download_artifact, end_session, get_session};
pub use study_handler::study_assistant;
pub use ux_handler::ux_prototype;

/// Registers every route of the HTTP surface.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(study_assistant)
        .service(parse_background)
        .service(skill_mapping)
        .service(list_domains)
        .service(skill_gap)
        .service(unlearning)
        .service(recommend_tracks)
        .service(career_navigation)
        .service(ux_prototype)
        .service(get_session)
        .service(end_session)
        .service(download_artifact);
}

/// JSON extractor settings whose rejections use the tagged failure body.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            AppError::ValidationError(format!("malformed JSON body: {}", err)).into()
        })
}
