use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{DownloadArtifact, Session},
    repositories::SessionRepository,
};

pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Stored session for `id`, or a fresh one. Fresh sessions are not
    /// persisted until a run commits them.
    pub async fn get_or_create(&self, id: &str) -> AppResult<Session> {
        Ok(self
            .repository
            .find(id)
            .await?
            .unwrap_or_else(|| Session::new(id)))
    }

    pub async fn get(&self, id: &str) -> AppResult<Session> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session '{}' not found", id)))
    }

    /// Replaces the stored session with the result of a successful run.
    pub async fn commit(&self, session: Session) -> AppResult<Session> {
        log::debug!(
            "Committing session {} with {} values",
            session.id,
            session.values().len()
        );
        self.repository.save(session).await
    }

    pub async fn end(&self, id: &str) -> AppResult<()> {
        if self.repository.delete(id).await? {
            log::info!("Session {} ended", id);
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Session '{}' not found", id)))
        }
    }

    /// Latest export produced in this session.
    pub async fn artifact(&self, id: &str) -> AppResult<DownloadArtifact> {
        self.get(id)
            .await?
            .artifact
            .ok_or_else(|| AppError::NotFound("Nothing to download yet".to_string()))
    }
}
