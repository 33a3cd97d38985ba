use actix_web::{
    delete, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::SessionId,
    models::dto::response::{ApiResponse, SessionDto},
};

#[get("/api/session")]
pub async fn get_session(
    state: web::Data<AppState>,
    session: SessionId,
) -> Result<HttpResponse, AppError> {
    let current = state.session_service.get_or_create(session.as_str()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(SessionDto::from(current))))
}

#[delete("/api/session")]
pub async fn end_session(
    state: web::Data<AppState>,
    session: SessionId,
) -> Result<HttpResponse, AppError> {
    state.session_service.end(session.as_str()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "ended": session.as_str()
    }))))
}

#[get("/api/session/download")]
pub async fn download_artifact(
    state: web::Data<AppState>,
    session: SessionId,
) -> Result<HttpResponse, AppError> {
    let artifact = state.session_service.artifact(session.as_str()).await?;

    Ok(HttpResponse::Ok()
        .content_type(format!("{}; charset=utf-8", artifact.mime_type))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(artifact.filename)],
        })
        .body(artifact.content))
}
