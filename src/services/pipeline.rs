use std::{collections::HashSet, sync::Arc};

use serde::Serialize;

use crate::{
    constants::prompts::RETRIEVAL_QA_PROMPT,
    errors::{AppError, AppResult},
    models::domain::{Bindings, GenerationParams, PromptTemplate, Session, SessionKey},
    services::{generation_client::GenerationClient, retrieval::KnowledgeBase},
};

/// Rewrites a stage's raw output before later stages see it.
pub type OutputTransform = fn(&str) -> String;

#[derive(Clone)]
pub struct StageRetrieval {
    pub knowledge_base: Arc<KnowledgeBase>,
    pub top_k: usize,
}

/// A template bound to generation parameters.
#[derive(Clone)]
pub struct PipelineStage {
    pub name: String,
    pub template: PromptTemplate,
    pub params: GenerationParams,
    pub output_key: String,
    pub shared_as: Option<SessionKey>,
    pub retrieval: Option<StageRetrieval>,
    pub transform: Option<OutputTransform>,
}

impl PipelineStage {
    /// The output is bound under the stage name unless overridden.
    pub fn new(name: impl Into<String>, template: &str, params: GenerationParams) -> Self {
        let name = name.into();
        Self {
            template: PromptTemplate::new(name.clone(), template),
            output_key: name.clone(),
            name,
            params,
            shared_as: None,
            retrieval: None,
            transform: None,
        }
    }

    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    /// Writes the output to `key` in the session on a successful run.
    pub fn shared_as(mut self, key: SessionKey) -> Self {
        self.shared_as = Some(key);
        self
    }

    /// Answers the rendered prompt over the `top_k` most similar chunks.
    pub fn with_retrieval(mut self, knowledge_base: Arc<KnowledgeBase>, top_k: usize) -> Self {
        self.retrieval = Some(StageRetrieval {
            knowledge_base,
            top_k,
        });
        self
    }

    pub fn with_transform(mut self, transform: OutputTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    fn prompt(&self, bindings: &Bindings) -> AppResult<String> {
        let rendered = self.template.render(bindings)?;
        match &self.retrieval {
            None => Ok(rendered),
            Some(retrieval) => {
                let context = retrieval
                    .knowledge_base
                    .context_for(&rendered, retrieval.top_k);
                let qa = PromptTemplate::new("retrieval_qa", RETRIEVAL_QA_PROMPT);
                let mut qa_bindings = Bindings::new();
                qa_bindings.insert("context".to_string(), context);
                qa_bindings.insert("question".to_string(), rendered);
                qa.render(&qa_bindings)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageOutput {
    pub stage: String,
    pub output_key: String,
    pub text: String,
}

/// Result of a successful run: the updated session and every stage output.
#[derive(Clone, Debug)]
pub struct PipelineRun {
    pub session: Session,
    pub outputs: Vec<StageOutput>,
}

impl PipelineRun {
    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|output| output.output_key == key)
            .map(|output| output.text.as_str())
    }

    /// Output for `key`, which a successful run always carries.
    pub fn require(&self, key: &str) -> AppResult<String> {
        self.output(key).map(str::to_string).ok_or_else(|| {
            AppError::InternalError(format!("pipeline produced no output for '{}'", key))
        })
    }
}

/// Fixed, strictly sequential chain of stages.
pub struct Pipeline {
    pub name: String,
    pub stages: Vec<PipelineStage>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, stages: Vec<PipelineStage>) -> Self {
        Self {
            name: name.into(),
            stages,
        }
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Verifies every stage can be bound from the inputs, the session and the
    /// outputs of the stages before it.
    pub fn check_ready(&self, session: &Session, inputs: &Bindings) -> AppResult<()> {
        let mut available: HashSet<String> = session.bindings().into_keys().collect();
        available.extend(
            inputs
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(key, _)| key.clone()),
        );

        for stage in &self.stages {
            let missing: Vec<&str> = stage
                .template
                .required_variables
                .iter()
                .filter(|name| !available.contains(name.as_str()))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(AppError::MissingInput(format!(
                    "{} needs {}",
                    stage.name,
                    missing.join(", ")
                )));
            }
            available.insert(stage.output_key.clone());
            if let Some(key) = stage.shared_as {
                available.insert(key.as_str().to_string());
            }
        }
        Ok(())
    }

    /// Runs every stage in order against a copy of `session`.
    ///
    /// Stage bindings layer session values, then non-blank `inputs`, then the
    /// outputs of earlier stages. The first failure ends the run and nothing
    /// is returned for the caller to commit.
    pub async fn run(
        &self,
        client: &dyn GenerationClient,
        session: &Session,
        inputs: Bindings,
    ) -> AppResult<PipelineRun> {
        self.check_ready(session, &inputs)?;

        let mut updated = session.clone();
        let mut bindings = session.bindings();
        bindings.extend(
            inputs
                .into_iter()
                .filter(|(_, value)| !value.trim().is_empty()),
        );
        let mut outputs = Vec::with_capacity(self.stages.len());

        for (index, stage) in self.stages.iter().enumerate() {
            log::info!(
                "Pipeline {}: stage {}/{} '{}' for session {}",
                self.name,
                index + 1,
                self.stages.len(),
                stage.name,
                session.id
            );

            let prompt = stage.prompt(&bindings)?;
            let raw = client.generate(&prompt, &stage.params).await.map_err(|e| {
                log::error!("Pipeline {}: stage '{}' failed: {}", self.name, stage.name, e);
                e
            })?;

            if raw.trim().is_empty() {
                log::warn!(
                    "Pipeline {}: stage '{}' returned empty output",
                    self.name,
                    stage.name
                );
                return Err(AppError::EmptyGeneration(format!(
                    "stage '{}' returned no text",
                    stage.name
                )));
            }

            let text = match stage.transform {
                Some(transform) => transform(raw.trim()),
                None => raw.trim().to_string(),
            };

            bindings.insert(stage.output_key.clone(), text.clone());
            if let Some(key) = stage.shared_as {
                bindings.insert(key.as_str().to_string(), text.clone());
                updated.set(key, text.clone());
            }
            outputs.push(StageOutput {
                stage: stage.name.clone(),
                output_key: stage.output_key.clone(),
                text,
            });
        }

        Ok(PipelineRun {
            session: updated,
            outputs,
        })
    }
}

/// Fails as not ready when any of `names` is absent or blank in `inputs`.
///
/// For callers that must reject a request before doing expensive setup
/// (fetching corpora, reading documents) ahead of [`Pipeline::run`].
pub fn require_inputs(inputs: &Bindings, names: &[&str]) -> AppResult<()> {
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| {
            inputs
                .get(*name)
                .map_or(true, |value| value.trim().is_empty())
        })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingInput(format!("please provide {}", missing.join(", "))))
    }
}

/// Builds bindings from `(name, value)` pairs.
pub fn bindings<K, V, I>(pairs: I) -> Bindings
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
