use crate::{
    constants::prompts::{
        BACKGROUND_PROFILE_PROMPT, CAREER_NAVIGATION_PROMPT, SKILL_GAP_PROMPT,
        SKILL_MAPPING_PROMPT, TRACK_RECOMMENDER_PROMPT, UNLEARNING_PROMPT,
    },
    models::domain::{GenerationParams, SessionKey},
    services::pipeline::{Pipeline, PipelineStage},
};

const ANALYSIS_TEMPERATURE: f32 = 0.3;
const SKILL_GAP_TEMPERATURE: f32 = 0.4;
const UNLEARNING_TEMPERATURE: f32 = 0.5;

const SHORT_ANSWER_TOKENS: u32 = 512;
const UNLEARNING_TOKENS: u32 = 700;

pub const PROFILE_STAGE: &str = "structured_profile";
pub const SKILL_MAPPING_STAGE: &str = "skill_mapping";
pub const SKILL_GAP_STAGE: &str = "skill_gap";
pub const UNLEARNING_STAGE: &str = "unlearning";
pub const TRACKS_STAGE: &str = "learning_tracks";
pub const NAVIGATION_STAGE: &str = "career_mapping";

/// Free-text background → structured JSON profile, shared with later agents.
pub fn create_background_pipeline(model: &str) -> Pipeline {
    Pipeline::new(
        "parse_background",
        vec![PipelineStage::new(
            PROFILE_STAGE,
            BACKGROUND_PROFILE_PROMPT,
            GenerationParams::new(model, ANALYSIS_TEMPERATURE)
                .with_max_output_tokens(SHORT_ANSWER_TOKENS),
        )
        .shared_as(SessionKey::StructuredProfile)],
    )
}

/// Reads the shared profile; fails as not ready when no profile was parsed.
pub fn create_skill_mapping_pipeline(model: &str) -> Pipeline {
    Pipeline::new(
        "skill_mapping",
        vec![PipelineStage::new(
            SKILL_MAPPING_STAGE,
            SKILL_MAPPING_PROMPT,
            GenerationParams::new(model, ANALYSIS_TEMPERATURE),
        )],
    )
}

pub fn create_skill_gap_pipeline(model: &str) -> Pipeline {
    Pipeline::new(
        "skill_gap",
        vec![PipelineStage::new(
            SKILL_GAP_STAGE,
            SKILL_GAP_PROMPT,
            GenerationParams::new(model, SKILL_GAP_TEMPERATURE)
                .with_max_output_tokens(SHORT_ANSWER_TOKENS),
        )],
    )
}

pub fn create_unlearning_pipeline(model: &str) -> Pipeline {
    Pipeline::new(
        "unlearning",
        vec![PipelineStage::new(
            UNLEARNING_STAGE,
            UNLEARNING_PROMPT,
            GenerationParams::new(model, UNLEARNING_TEMPERATURE)
                .with_max_output_tokens(UNLEARNING_TOKENS),
        )],
    )
}

/// Expects `context` to be retrieved by the caller from the tracks corpus.
pub fn create_track_recommender_pipeline(model: &str) -> Pipeline {
    Pipeline::new(
        "track_recommender",
        vec![PipelineStage::new(
            TRACKS_STAGE,
            TRACK_RECOMMENDER_PROMPT,
            GenerationParams::new(model, ANALYSIS_TEMPERATURE)
                .with_max_output_tokens(SHORT_ANSWER_TOKENS),
        )],
    )
}

pub fn create_career_navigation_pipeline(model: &str) -> Pipeline {
    Pipeline::new(
        "career_navigation",
        vec![PipelineStage::new(
            NAVIGATION_STAGE,
            CAREER_NAVIGATION_PROMPT,
            GenerationParams::new(model, ANALYSIS_TEMPERATURE),
        )
        .shared_as(SessionKey::CareerMapping)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_pipeline_shares_the_profile() {
        let pipeline = create_background_pipeline("m");
        let stage = &pipeline.stages[0];

        assert_eq!(pipeline.stage_names(), vec![PROFILE_STAGE]);
        assert_eq!(stage.shared_as, Some(SessionKey::StructuredProfile));
        assert_eq!(stage.params.temperature, ANALYSIS_TEMPERATURE);
        assert_eq!(stage.params.max_output_tokens, Some(SHORT_ANSWER_TOKENS));
    }

    #[test]
    fn skill_mapping_reads_the_shared_profile() {
        let pipeline = create_skill_mapping_pipeline("m");

        assert!(pipeline.stages[0]
            .template
            .required_variables
            .contains(SessionKey::StructuredProfile.as_str()));
        assert_eq!(pipeline.stages[0].shared_as, None);
    }

    #[test]
    fn single_stage_pipelines_have_expected_params() {
        let cases = [
            (create_skill_gap_pipeline("m"), SKILL_GAP_TEMPERATURE, Some(512)),
            (create_unlearning_pipeline("m"), UNLEARNING_TEMPERATURE, Some(700)),
            (create_track_recommender_pipeline("m"), ANALYSIS_TEMPERATURE, Some(512)),
            (create_career_navigation_pipeline("m"), ANALYSIS_TEMPERATURE, None),
        ];

        for (pipeline, temperature, tokens) in cases {
            assert_eq!(pipeline.stages.len(), 1, "{}", pipeline.name);
            assert_eq!(pipeline.stages[0].params.temperature, temperature);
            assert_eq!(pipeline.stages[0].params.max_output_tokens, tokens);
        }
    }

    #[test]
    fn navigation_shares_the_career_mapping() {
        let pipeline = create_career_navigation_pipeline("m");

        assert_eq!(pipeline.stages[0].shared_as, Some(SessionKey::CareerMapping));
    }
}
