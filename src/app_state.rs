use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::InMemorySessionRepository,
    services::{
        career_service::{CareerService, CareerSources},
        context_extractor::ContextExtractor,
        generation_client::{GenerationClient, OpenAiCompatibleClient},
        retrieval::{HashingEmbedder, RetrievalService},
        session_service::SessionService,
        study_service::StudyService,
        ux_service::{UxCorpora, UxService},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub study_service: Arc<StudyService>,
    pub career_service: Arc<CareerService>,
    pub ux_service: Arc<UxService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let client = Arc::new(OpenAiCompatibleClient::new(&config));
        Self::with_client(config, client)
    }

    /// Wires every service around the given generation client, with the
    /// knowledge sources named in `config`.
    pub fn with_client(config: Config, client: Arc<dyn GenerationClient>) -> AppResult<Self> {
        let sources = CareerSources::from_config(&config);
        Self::with_sources(config, client, sources, UxCorpora::default())
    }

    pub fn with_sources(
        config: Config,
        client: Arc<dyn GenerationClient>,
        career_sources: CareerSources,
        ux_corpora: UxCorpora,
    ) -> AppResult<Self> {
        let extractor = Arc::new(ContextExtractor::new(&config)?);
        let retrieval = Arc::new(RetrievalService::new(
            Arc::clone(&extractor),
            Arc::new(HashingEmbedder::default()),
        ));
        let session_service = Arc::new(SessionService::new(Arc::new(
            InMemorySessionRepository::new(),
        )));
        let model = config.generation_model.clone();

        let study_service = Arc::new(StudyService::new(
            Arc::clone(&client),
            Arc::clone(&extractor),
            Arc::clone(&session_service),
            model.clone(),
        ));
        let career_service = Arc::new(CareerService::new(
            Arc::clone(&client),
            extractor,
            Arc::clone(&retrieval),
            Arc::clone(&session_service),
            model.clone(),
            career_sources,
        ));
        let ux_service = Arc::new(UxService::new(
            client,
            retrieval,
            Arc::clone(&session_service),
            model,
            ux_corpora,
        ));

        Ok(Self {
            session_service,
            study_service,
            career_service,
            ux_service,
            config: Arc::new(config),
        })
    }
}
