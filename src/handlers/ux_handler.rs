use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::SessionId,
    models::dto::{
        request::UxPrototypeRequestDto,
        response::{ApiResponse, UxPrototypeResponseDto},
    },
    services::ux_service::UxBrief,
};

#[post("/api/ux/prototype")]
pub async fn ux_prototype(
    state: web::Data<AppState>,
    session: SessionId,
    request: web::Json<UxPrototypeRequestDto>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let request = request.into_inner();
    let brief = UxBrief {
        project: request.project,
        domain: request.domain,
        activity: request.activity,
    };

    let outcome = state.ux_service.prototype(session.as_str(), &brief).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UxPrototypeResponseDto::from(outcome))))
}
