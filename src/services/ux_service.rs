use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{DocumentSource, DownloadArtifact},
    services::{
        generation_client::GenerationClient,
        pipeline::{bindings, require_inputs},
        pipelines::ux::{
            create_ux_prototype_pipeline, UxKnowledge, CHUNK_OVERLAP, CHUNK_SIZE,
            DESIGN_SOURCES, DOCUMENTATION_SOURCES, JOURNEY_SOURCES,
        },
        retrieval::{RetrievalService, TextSplitter},
        session_service::SessionService,
    },
};

pub const UX_DOWNLOAD_FILENAME: &str = "final_documentation.txt";

/// Reference material for each retrieval-augmented UX stage.
#[derive(Debug, Clone)]
pub struct UxCorpora {
    pub design: Vec<DocumentSource>,
    pub journey: Vec<DocumentSource>,
    pub documentation: Vec<DocumentSource>,
}

impl Default for UxCorpora {
    fn default() -> Self {
        fn urls(list: &[&str]) -> Vec<DocumentSource> {
            list.iter()
                .map(|url| DocumentSource::Url(url.to_string()))
                .collect()
        }
        Self {
            design: urls(DESIGN_SOURCES),
            journey: urls(JOURNEY_SOURCES),
            documentation: urls(DOCUMENTATION_SOURCES),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UxBrief {
    pub project: String,
    pub domain: String,
    pub activity: String,
}

#[derive(Debug, Clone)]
pub struct UxOutcome {
    pub inspirations: String,
    pub flow_schema: String,
    pub screen_descriptions: String,
    pub storyboard: String,
    pub documentation: String,
    pub artifact: DownloadArtifact,
}

pub struct UxService {
    client: Arc<dyn GenerationClient>,
    retrieval: Arc<RetrievalService>,
    sessions: Arc<SessionService>,
    model: String,
    corpora: UxCorpora,
}

impl UxService {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        retrieval: Arc<RetrievalService>,
        sessions: Arc<SessionService>,
        model: impl Into<String>,
        corpora: UxCorpora,
    ) -> Self {
        Self {
            client,
            retrieval,
            sessions,
            model: model.into(),
            corpora,
        }
    }

    /// Runs the five UX agents for one product brief and exports the final
    /// documentation.
    pub async fn prototype(&self, session_id: &str, brief: &UxBrief) -> AppResult<UxOutcome> {
        let inputs = bindings([
            ("project", brief.project.as_str()),
            ("domain", brief.domain.as_str()),
            ("activity", brief.activity.as_str()),
        ]);
        require_inputs(&inputs, &["project", "domain", "activity"])?;
        let session = self.sessions.get_or_create(session_id).await?;

        let knowledge = self.knowledge().await?;
        let run = create_ux_prototype_pipeline(&self.model, &knowledge)
            .run(self.client.as_ref(), &session, inputs)
            .await?;

        let documentation = run.require("documentation")?;
        let artifact = DownloadArtifact::new(UX_DOWNLOAD_FILENAME, documentation.clone())
            .without_emphasis();
        let outcome = UxOutcome {
            inspirations: run.require("inspirations")?,
            flow_schema: run.require("flow_schema")?,
            screen_descriptions: run.require("screen_descriptions")?,
            storyboard: run.require("storyboard")?,
            documentation,
            artifact: artifact.clone(),
        };

        let mut updated = run.session;
        updated.set_artifact(artifact);
        self.sessions.commit(updated).await?;
        Ok(outcome)
    }

    async fn knowledge(&self) -> AppResult<UxKnowledge> {
        let splitter = TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP);
        Ok(UxKnowledge {
            design: self
                .retrieval
                .knowledge_base(&self.corpora.design, splitter)
                .await?,
            journey: self
                .retrieval
                .knowledge_base(&self.corpora.journey, splitter)
                .await?,
            documentation: self
                .retrieval
                .knowledge_base(&self.corpora.documentation, splitter)
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        errors::AppError,
        models::domain::SessionKey,
        repositories::InMemorySessionRepository,
        services::{context_extractor::ContextExtractor, retrieval::HashingEmbedder},
        test_utils::test_helpers::ScriptedGenerationClient,
    };

    fn corpora() -> UxCorpora {
        UxCorpora {
            design: vec![DocumentSource::Text(
                "Headspace uses a calm palette and large tap targets.".into(),
            )],
            journey: vec![DocumentSource::Text(
                "User flows start at onboarding and end at the goal screen.".into(),
            )],
            documentation: vec![DocumentSource::Text(
                "Document design decisions with rationale per screen.".into(),
            )],
        }
    }

    fn service(client: &ScriptedGenerationClient) -> (UxService, Arc<SessionService>) {
        let config = Config::test_config();
        let extractor = Arc::new(ContextExtractor::new(&config).unwrap());
        let retrieval = Arc::new(RetrievalService::new(
            extractor,
            Arc::new(HashingEmbedder::default()),
        ));
        let sessions = Arc::new(SessionService::new(Arc::new(
            InMemorySessionRepository::new(),
        )));
        let service = UxService::new(
            Arc::new(client.clone()),
            retrieval,
            Arc::clone(&sessions),
            config.generation_model,
            corpora(),
        );
        (service, sessions)
    }

    fn brief() -> UxBrief {
        UxBrief {
            project: "Calm".into(),
            domain: "Wellness".into(),
            activity: "Book a meditation session".into(),
        }
    }

    #[actix_rt::test]
    async fn test_chain_feeds_every_output_forward() {
        let client = ScriptedGenerationClient::with_responses([
            "Reference apps: Headspace",
            "```json\n[{\"step_number\":1,\"screen\":\"Home\"}]\n```",
            "1. Home screen",
            "Home → tap Book → slide → Booking",
            "# **Calm** spec",
        ]);
        let (service, sessions) = service(&client);

        let outcome = service.prototype("s", &brief()).await.unwrap();

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 5);
        assert!(prompts[0].contains("calm palette"));
        assert!(prompts[2].contains("\"screen\": \"Home\""));
        assert!(prompts[3].contains("1. Home screen"));
        assert!(prompts[4].contains("Reference apps: Headspace"));
        assert!(prompts[4].contains("Home → tap Book → slide → Booking"));
        assert!(outcome.flow_schema.starts_with("[\n  {"));

        assert_eq!(outcome.artifact.filename, UX_DOWNLOAD_FILENAME);
        assert_eq!(outcome.artifact.content, "# Calm spec");
        let stored = sessions.get("s").await.unwrap();
        assert_eq!(stored.get(SessionKey::Documentation), "# **Calm** spec");
    }

    #[actix_rt::test]
    async fn test_missing_brief_field_makes_no_calls() {
        let client = ScriptedGenerationClient::default();
        let (service, _) = service(&client);
        let mut brief = brief();
        brief.activity = "   ".into();

        let err = service.prototype("s", &brief).await.unwrap_err();

        assert!(matches!(err, AppError::MissingInput(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[actix_rt::test]
    async fn test_empty_storyboard_aborts_without_commit() {
        let client =
            ScriptedGenerationClient::with_responses(["apps", "[]", "screens", " ", "never"]);
        let (service, sessions) = service(&client);

        let err = service.prototype("s", &brief()).await.unwrap_err();

        assert!(matches!(err, AppError::EmptyGeneration(_)));
        assert_eq!(client.call_count(), 4);
        assert!(sessions.get("s").await.is_err());
    }
}
