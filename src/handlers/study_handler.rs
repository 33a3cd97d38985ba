use actix_web::{post, web, HttpMessage, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    middleware::SessionId,
    models::{
        domain::DocumentSource,
        dto::{
            request::StudyTextRequestDto,
            response::{ApiResponse, StudyResponseDto},
        },
    },
};

/// Accepts either raw PDF bytes or a JSON body `{"text": "..."}`.
#[post("/api/study/assistant")]
pub async fn study_assistant(
    state: web::Data<AppState>,
    session: SessionId,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let source = study_source(req.content_type(), &body)?;
    let outcome = state.study_service.run(session.as_str(), source).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(StudyResponseDto::from(outcome))))
}

fn study_source(content_type: &str, body: &[u8]) -> AppResult<DocumentSource> {
    if body.is_empty() {
        return Err(AppError::MissingInput(
            "please upload a PDF or send study text".to_string(),
        ));
    }

    if content_type == "application/json" {
        let request: StudyTextRequestDto = serde_json::from_slice(body)
            .map_err(|e| AppError::ValidationError(format!("malformed JSON body: {}", e)))?;
        request.validate()?;
        return Ok(DocumentSource::Text(request.text));
    }

    if content_type == "application/pdf" || body.starts_with(b"%PDF") {
        return Ok(DocumentSource::Pdf(body.to_vec()));
    }

    Err(AppError::InvalidDocument(format!(
        "expected a PDF upload, got content type '{}'",
        content_type
    )))
}
