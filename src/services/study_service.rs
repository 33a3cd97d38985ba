use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{DocumentSource, DownloadArtifact},
    services::{
        context_extractor::ContextExtractor,
        generation_client::GenerationClient,
        pipeline::bindings,
        pipelines::study::{create_study_assistant_pipeline, QUIZ_STAGE, SUMMARY_STAGE},
        session_service::SessionService,
    },
};

pub const STUDY_DOWNLOAD_FILENAME: &str = "study_summary_and_quiz.txt";

#[derive(Debug, Clone)]
pub struct StudyOutcome {
    pub summary: String,
    pub quiz: String,
    pub artifact: DownloadArtifact,
}

/// Summarises study material and writes a short quiz about it.
pub struct StudyService {
    client: Arc<dyn GenerationClient>,
    extractor: Arc<ContextExtractor>,
    sessions: Arc<SessionService>,
    model: String,
}

impl StudyService {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        extractor: Arc<ContextExtractor>,
        sessions: Arc<SessionService>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            extractor,
            sessions,
            model: model.into(),
        }
    }

    pub async fn run(&self, session_id: &str, source: DocumentSource) -> AppResult<StudyOutcome> {
        let session = self.sessions.get_or_create(session_id).await?;

        let document = self.extractor.extract(&source, None).await?.ensure_content()?;
        log::info!(
            "Study material from {} has {} characters",
            document.source,
            document.text.chars().count()
        );

        let run = create_study_assistant_pipeline(&self.model)
            .run(
                self.client.as_ref(),
                &session,
                bindings([("content", document.text)]),
            )
            .await?;

        let summary = run.require(SUMMARY_STAGE)?;
        let quiz = run.require(QUIZ_STAGE)?;
        let artifact = DownloadArtifact::from_sections(
            STUDY_DOWNLOAD_FILENAME,
            &[("Summary", summary.as_str()), ("Quiz Questions", quiz.as_str())],
        );

        let mut updated = run.session;
        updated.set_artifact(artifact.clone());
        self.sessions.commit(updated).await?;

        Ok(StudyOutcome {
            summary,
            quiz,
            artifact,
        })
    }
}
