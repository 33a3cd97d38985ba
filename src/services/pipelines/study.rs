use crate::{
    constants::prompts::{STUDY_QUIZ_PROMPT, STUDY_SUMMARY_PROMPT},
    models::domain::{GenerationParams, SessionKey},
    services::pipeline::{Pipeline, PipelineStage},
};

const STUDY_TEMPERATURE: f32 = 0.7;

pub const SUMMARY_STAGE: &str = "summary";
pub const QUIZ_STAGE: &str = "quiz";

/// Material → bullet summary → multiple-choice quiz.
pub fn create_study_assistant_pipeline(model: &str) -> Pipeline {
    Pipeline::new(
        "study_assistant",
        vec![summary_stage(model), quiz_stage(model)],
    )
}

fn summary_stage(model: &str) -> PipelineStage {
    PipelineStage::new(
        SUMMARY_STAGE,
        STUDY_SUMMARY_PROMPT,
        GenerationParams::new(model, STUDY_TEMPERATURE),
    )
    .shared_as(SessionKey::Summary)
}

fn quiz_stage(model: &str) -> PipelineStage {
    PipelineStage::new(
        QUIZ_STAGE,
        STUDY_QUIZ_PROMPT,
        GenerationParams::new(model, STUDY_TEMPERATURE),
    )
    .shared_as(SessionKey::Quiz)
}
