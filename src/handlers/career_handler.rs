use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::SessionId,
    models::dto::{
        request::{
            BackgroundRequestDto, NavigationRequestDto, SkillGapRequestDto, TrackRequestDto,
            UnlearningRequestDto,
        },
        response::{
            AnswerResponseDto, ApiResponse, NavigationResponseDto, ProfileResponseDto,
            SkillGapResponseDto, TrackResponseDto,
        },
    },
    services::result_renderer::{render, DisplayFormat},
};

#[post("/api/career/background")]
pub async fn parse_background(
    state: web::Data<AppState>,
    session: SessionId,
    request: web::Json<BackgroundRequestDto>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let profile = state
        .career_service
        .parse_background(session.as_str(), &request.background)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(ProfileResponseDto {
        structured_profile: render(&profile, DisplayFormat::Json),
    })))
}

#[post("/api/career/skill-mapping")]
pub async fn skill_mapping(
    state: web::Data<AppState>,
    session: SessionId,
) -> Result<HttpResponse, AppError> {
    let mapping = state.career_service.skill_mapping(session.as_str()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(AnswerResponseDto::markdown(&mapping))))
}

#[get("/api/career/domains")]
pub async fn list_domains(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(state.career_service.domains()))
}

#[post("/api/career/skill-gap")]
pub async fn skill_gap(
    state: web::Data<AppState>,
    session: SessionId,
    request: web::Json<SkillGapRequestDto>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let outcome = state
        .career_service
        .skill_gap(session.as_str(), &request.domain, &request.skills)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(SkillGapResponseDto::from(outcome))))
}

#[post("/api/career/unlearning")]
pub async fn unlearning(
    state: web::Data<AppState>,
    session: SessionId,
    request: web::Json<UnlearningRequestDto>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let advice = state
        .career_service
        .unlearning(
            session.as_str(),
            request.background.as_deref(),
            request.target_domain.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(AnswerResponseDto::markdown(&advice))))
}

#[post("/api/career/tracks")]
pub async fn recommend_tracks(
    state: web::Data<AppState>,
    session: SessionId,
    request: web::Json<TrackRequestDto>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let outcome = state
        .career_service
        .recommend_tracks(session.as_str(), &request.goal)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(TrackResponseDto::from(outcome))))
}

#[post("/api/career/navigation")]
pub async fn career_navigation(
    state: web::Data<AppState>,
    session: SessionId,
    request: web::Json<NavigationRequestDto>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let outcome = state
        .career_service
        .navigate(
            session.as_str(),
            &request.education,
            &request.roles,
            &request.interests,
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(NavigationResponseDto::from(outcome))))
}
