use std::sync::Arc;

use crate::{
    config::Config,
    constants::domain_skills::{find_domain, DomainSkills, DOMAIN_SKILLS},
    errors::{AppError, AppResult},
    models::domain::{
        career_graph::{parse_career_sections, CareerSection},
        CareerGraph, DocumentSource, DownloadArtifact, SessionKey,
    },
    services::{
        context_extractor::ContextExtractor,
        generation_client::GenerationClient,
        pipeline::{bindings, require_inputs},
        pipelines::career::{
            create_background_pipeline, create_career_navigation_pipeline,
            create_skill_gap_pipeline, create_skill_mapping_pipeline,
            create_track_recommender_pipeline, create_unlearning_pipeline, NAVIGATION_STAGE,
            PROFILE_STAGE, SKILL_GAP_STAGE, SKILL_MAPPING_STAGE, TRACKS_STAGE, UNLEARNING_STAGE,
        },
        retrieval::{RetrievalService, ScoredChunk, TextSplitter},
        session_service::SessionService,
    },
};

pub const NAVIGATION_DOWNLOAD_FILENAME: &str = "career_mapping_suggestions.txt";
pub const DEFAULT_TARGET_DOMAIN: &str = "a new field";

const GUIDE_MAX_CHARS: usize = 3000;
const TRACK_CHUNK_SIZE: usize = 512;
const TRACK_CHUNK_OVERLAP: usize = 64;
const TRACK_TOP_K: usize = 4;

/// Static documents the career agents draw knowledge from.
#[derive(Debug, Clone)]
pub struct CareerSources {
    pub career_guide: DocumentSource,
    pub learning_tracks: Vec<DocumentSource>,
}

impl CareerSources {
    pub fn from_config(config: &Config) -> Self {
        Self {
            career_guide: DocumentSource::PdfFile(config.career_guide_pdf.clone()),
            learning_tracks: vec![DocumentSource::PdfFile(config.learning_tracks_pdf.clone())],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkillGapOutcome {
    pub domain: &'static DomainSkills,
    pub analysis: String,
}

#[derive(Debug, Clone)]
pub struct TrackOutcome {
    pub recommendations: String,
    pub sources: Vec<ScoredChunk>,
}

#[derive(Debug, Clone)]
pub struct NavigationOutcome {
    pub suggestions: String,
    pub sections: Vec<CareerSection>,
    pub graph: CareerGraph,
    pub artifact: DownloadArtifact,
}

/// Career transition agents sharing one session.
pub struct CareerService {
    client: Arc<dyn GenerationClient>,
    extractor: Arc<ContextExtractor>,
    retrieval: Arc<RetrievalService>,
    sessions: Arc<SessionService>,
    model: String,
    sources: CareerSources,
}

impl CareerService {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        extractor: Arc<ContextExtractor>,
        retrieval: Arc<RetrievalService>,
        sessions: Arc<SessionService>,
        model: impl Into<String>,
        sources: CareerSources,
    ) -> Self {
        Self {
            client,
            extractor,
            retrieval,
            sessions,
            model: model.into(),
            sources,
        }
    }

    /// Parses free text into a structured profile and shares it, together
    /// with the raw text, for the agents that follow.
    pub async fn parse_background(&self, session_id: &str, background: &str) -> AppResult<String> {
        let session = self.sessions.get_or_create(session_id).await?;

        let run = create_background_pipeline(&self.model)
            .run(
                self.client.as_ref(),
                &session,
                bindings([("user_background", background)]),
            )
            .await?;

        let profile = run.require(PROFILE_STAGE)?;
        let mut updated = run.session;
        updated.set(SessionKey::UserInput, background.trim());
        self.sessions.commit(updated).await?;
        Ok(profile)
    }

    /// Maps the shared profile onto the target career. Not ready until a
    /// background has been parsed in this session.
    pub async fn skill_mapping(&self, session_id: &str) -> AppResult<String> {
        let session = self.sessions.get_or_create(session_id).await?;

        let run = create_skill_mapping_pipeline(&self.model)
            .run(self.client.as_ref(), &session, Default::default())
            .await
            .map_err(|e| match e {
                AppError::MissingInput(_) => AppError::MissingInput(
                    "please parse your background first".to_string(),
                ),
                other => other,
            })?;

        run.require(SKILL_MAPPING_STAGE)
    }

    pub fn domains(&self) -> &'static [DomainSkills] {
        DOMAIN_SKILLS
    }

    pub async fn skill_gap(
        &self,
        session_id: &str,
        domain: &str,
        user_skills: &str,
    ) -> AppResult<SkillGapOutcome> {
        let entry = find_domain(domain).ok_or_else(|| {
            AppError::ValidationError(format!(
                "unknown domain '{}', expected one of: {}",
                domain.trim(),
                DOMAIN_SKILLS
                    .iter()
                    .map(|d| d.domain)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        let session = self.sessions.get_or_create(session_id).await?;

        let run = create_skill_gap_pipeline(&self.model)
            .run(
                self.client.as_ref(),
                &session,
                bindings([
                    ("domain", entry.domain.to_string()),
                    ("domain_skills", entry.skills.join(", ")),
                    ("user_skills", user_skills.to_string()),
                ]),
            )
            .await?;

        Ok(SkillGapOutcome {
            domain: entry,
            analysis: run.require(SKILL_GAP_STAGE)?,
        })
    }

    /// Background comes from the request, else the shared profile, else the
    /// raw background text stored earlier in the session.
    pub async fn unlearning(
        &self,
        session_id: &str,
        background: Option<&str>,
        target_domain: Option<&str>,
    ) -> AppResult<String> {
        let session = self.sessions.get_or_create(session_id).await?;

        let background = non_blank(background)
            .or_else(|| non_blank(Some(session.get(SessionKey::StructuredProfile))))
            .or_else(|| non_blank(Some(session.get(SessionKey::UserInput))))
            .unwrap_or_default();
        let target_domain = non_blank(target_domain).unwrap_or(DEFAULT_TARGET_DOMAIN);

        let run = create_unlearning_pipeline(&self.model)
            .run(
                self.client.as_ref(),
                &session,
                bindings([("background", background), ("target_domain", target_domain)]),
            )
            .await?;

        run.require(UNLEARNING_STAGE)
    }

    /// Recommends learning tracks grounded in the most similar passages of
    /// the tracks corpus.
    pub async fn recommend_tracks(&self, session_id: &str, goal: &str) -> AppResult<TrackOutcome> {
        require_inputs(&bindings([("query", goal)]), &["query"])?;
        let session = self.sessions.get_or_create(session_id).await?;

        let knowledge_base = self
            .retrieval
            .knowledge_base(
                &self.sources.learning_tracks,
                TextSplitter::new(TRACK_CHUNK_SIZE, TRACK_CHUNK_OVERLAP),
            )
            .await?;
        let hits = knowledge_base.search(goal, TRACK_TOP_K, None);
        let context = hits
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        log::debug!("Retrieved {} track passages for '{}'", hits.len(), goal);

        let run = create_track_recommender_pipeline(&self.model)
            .run(
                self.client.as_ref(),
                &session,
                bindings([("context", context.as_str()), ("query", goal)]),
            )
            .await?;

        Ok(TrackOutcome {
            recommendations: run.require(TRACKS_STAGE)?,
            sources: hits,
        })
    }

    /// Suggests a transition path using the career guide, and lays the
    /// suggestion sections out as a graph.
    pub async fn navigate(
        &self,
        session_id: &str,
        education: &str,
        roles: &str,
        interests: &str,
    ) -> AppResult<NavigationOutcome> {
        let mut inputs = bindings([
            ("education", education),
            ("roles", roles),
            ("interests", interests),
        ]);
        require_inputs(&inputs, &["education", "roles", "interests"])?;
        let session = self.sessions.get_or_create(session_id).await?;

        let guide = self
            .extractor
            .extract(&self.sources.career_guide, Some(GUIDE_MAX_CHARS))
            .await?
            .ensure_content()?;
        inputs.insert("rag_context".to_string(), guide.text);

        let run = create_career_navigation_pipeline(&self.model)
            .run(self.client.as_ref(), &session, inputs)
            .await?;

        let suggestions = run.require(NAVIGATION_STAGE)?;
        let sections = parse_career_sections(&suggestions);
        let graph = CareerGraph::from_sections(&sections);
        if sections.iter().all(|section| section.items.is_empty()) {
            log::warn!("Career suggestions had no recognisable section items");
        }
        let artifact = DownloadArtifact::new(NAVIGATION_DOWNLOAD_FILENAME, suggestions.clone());

        let mut updated = run.session;
        updated.set_artifact(artifact.clone());
        self.sessions.commit(updated).await?;

        Ok(NavigationOutcome {
            suggestions,
            sections,
            graph,
            artifact,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
