use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{artifact::DownloadArtifact, prompt_template::Bindings};

/// Well-known values shared between independent pipeline runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    UserInput,
    StructuredProfile,
    Summary,
    Quiz,
    CareerMapping,
    Documentation,
}

impl SessionKey {
    pub const ALL: [SessionKey; 6] = [
        SessionKey::UserInput,
        SessionKey::StructuredProfile,
        SessionKey::Summary,
        SessionKey::Quiz,
        SessionKey::CareerMapping,
        SessionKey::Documentation,
    ];

    /// Name used both in serialized form and as a template variable.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::UserInput => "user_input",
            SessionKey::StructuredProfile => "structured_profile",
            SessionKey::Summary => "summary",
            SessionKey::Quiz => "quiz",
            SessionKey::CareerMapping => "career_mapping",
            SessionKey::Documentation => "documentation",
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State owned by one interactive user.
///
/// Pipelines receive a session by reference and hand back an updated copy;
/// the store only ever sees complete, successful updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    values: BTreeMap<SessionKey, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<DownloadArtifact>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            values: BTreeMap::new(),
            artifact: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Last written value, or the empty string.
    pub fn get(&self, key: SessionKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, key: SessionKey) -> bool {
        !self.get(key).trim().is_empty()
    }

    pub fn set(&mut self, key: SessionKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
        self.modified_at = Utc::now();
    }

    pub fn set_artifact(&mut self, artifact: DownloadArtifact) {
        self.artifact = Some(artifact);
        self.modified_at = Utc::now();
    }

    pub fn values(&self) -> &BTreeMap<SessionKey, String> {
        &self.values
    }

    /// Non-empty values as template bindings.
    pub fn bindings(&self) -> Bindings {
        self.values
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.as_str().to_string(), value.clone()))
            .collect()
    }
}
