use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{
        career_graph::CareerSection, CareerGraph, DownloadArtifact, Session, SessionKey,
    },
    services::{
        career_service::{NavigationOutcome, SkillGapOutcome, TrackOutcome},
        result_renderer::{render, DisplayFormat, RenderedOutput},
        retrieval::ScoredChunk,
        study_service::StudyOutcome,
        ux_service::UxOutcome,
    },
};

pub const DOWNLOAD_PATH: &str = "/api/session/download";

/// Success body: `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadDto {
    pub filename: String,
    pub mime_type: String,
    pub url: &'static str,
}

impl From<&DownloadArtifact> for DownloadDto {
    fn from(artifact: &DownloadArtifact) -> Self {
        DownloadDto {
            filename: artifact.filename.clone(),
            mime_type: artifact.mime_type.clone(),
            url: DOWNLOAD_PATH,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudyResponseDto {
    pub summary: RenderedOutput,
    pub quiz: RenderedOutput,
    pub download: DownloadDto,
}

impl From<StudyOutcome> for StudyResponseDto {
    fn from(outcome: StudyOutcome) -> Self {
        StudyResponseDto {
            summary: render(&outcome.summary, DisplayFormat::Markdown),
            quiz: render(&outcome.quiz, DisplayFormat::Markdown),
            download: DownloadDto::from(&outcome.artifact),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponseDto {
    pub structured_profile: RenderedOutput,
}

/// Single generated answer, shown as markdown.
#[derive(Debug, Serialize)]
pub struct AnswerResponseDto {
    pub answer: RenderedOutput,
}

impl AnswerResponseDto {
    pub fn markdown(text: &str) -> Self {
        AnswerResponseDto {
            answer: render(text, DisplayFormat::Markdown),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillGapResponseDto {
    pub domain: &'static str,
    pub required_skills: &'static [&'static str],
    pub analysis: RenderedOutput,
}

impl From<SkillGapOutcome> for SkillGapResponseDto {
    fn from(outcome: SkillGapOutcome) -> Self {
        SkillGapResponseDto {
            domain: outcome.domain.domain,
            required_skills: outcome.domain.skills,
            analysis: render(&outcome.analysis, DisplayFormat::Markdown),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackResponseDto {
    pub recommendations: RenderedOutput,
    pub sources: Vec<ScoredChunk>,
}

impl From<TrackOutcome> for TrackResponseDto {
    fn from(outcome: TrackOutcome) -> Self {
        TrackResponseDto {
            recommendations: render(&outcome.recommendations, DisplayFormat::Markdown),
            sources: outcome.sources,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NavigationResponseDto {
    pub suggestions: RenderedOutput,
    pub sections: Vec<CareerSection>,
    pub graph: CareerGraph,
    pub download: DownloadDto,
}

impl From<NavigationOutcome> for NavigationResponseDto {
    fn from(outcome: NavigationOutcome) -> Self {
        NavigationResponseDto {
            suggestions: render(&outcome.suggestions, DisplayFormat::Markdown),
            download: DownloadDto::from(&outcome.artifact),
            sections: outcome.sections,
            graph: outcome.graph,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UxPrototypeResponseDto {
    pub inspirations: RenderedOutput,
    pub journey: RenderedOutput,
    pub screens: RenderedOutput,
    pub storyboard: RenderedOutput,
    pub documentation: RenderedOutput,
    pub download: DownloadDto,
}

impl From<UxOutcome> for UxPrototypeResponseDto {
    fn from(outcome: UxOutcome) -> Self {
        UxPrototypeResponseDto {
            inspirations: render(&outcome.inspirations, DisplayFormat::Markdown),
            journey: render(&outcome.flow_schema, DisplayFormat::Json),
            screens: render(&outcome.screen_descriptions, DisplayFormat::Markdown),
            storyboard: render(&outcome.storyboard, DisplayFormat::Markdown),
            documentation: render(&outcome.documentation, DisplayFormat::Markdown),
            download: DownloadDto::from(&outcome.artifact),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub id: String,
    pub values: BTreeMap<SessionKey, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadDto>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        SessionDto {
            values: session.values().clone(),
            download: session.artifact.as_ref().map(DownloadDto::from),
            id: session.id,
            created_at: session.created_at,
            modified_at: session.modified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::success(AnswerResponseDto::markdown(
            " - drop jargon ",
        )))
        .unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["answer"]["format"], "markdown");
        assert_eq!(body["data"]["answer"]["body"], "- drop jargon");
    }

    #[test]
    fn test_session_dto_lists_values_and_download() {
        let mut session = Session::new("abc");
        session.set(SessionKey::Summary, "notes");
        session.set_artifact(DownloadArtifact::new("study_summary_and_quiz.txt", "x"));

        let value = serde_json::to_value(SessionDto::from(session)).unwrap();

        assert_eq!(value["id"], "abc");
        assert_eq!(value["values"]["summary"], "notes");
        assert_eq!(value["download"]["url"], DOWNLOAD_PATH);
    }
}
