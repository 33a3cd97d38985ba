use std::sync::Arc;

use crate::{
    constants::prompts::{
        UX_DESIGN_PROMPT, UX_DOCUMENTATION_PROMPT, UX_JOURNEY_PROMPT, UX_SCREEN_PROMPT,
        UX_STORYBOARD_PROMPT,
    },
    models::domain::{GenerationParams, SessionKey},
    services::{
        pipeline::{Pipeline, PipelineStage},
        result_renderer::normalize_json,
        retrieval::KnowledgeBase,
    },
};

const UX_TEMPERATURE: f32 = 0.3;
const LONG_FORM_TOKENS: u32 = 1000;
const STAGE_TOKENS: u32 = 800;

pub const RETRIEVAL_TOP_K: usize = 4;
pub const CHUNK_SIZE: usize = 800;
pub const CHUNK_OVERLAP: usize = 200;

pub const DESIGN_STAGE: &str = "design_research";
pub const JOURNEY_STAGE: &str = "journey_mapping";
pub const SCREEN_STAGE: &str = "screen_description";
pub const STORYBOARD_STAGE: &str = "storyboard";
pub const DOCUMENTATION_STAGE: &str = "documentation";

pub const DESIGN_SOURCES: &[&str] = &[
    "https://uxdesign.cc/tagged/case-study",
    "https://uxplanet.org/tagged/ux-case-study",
    "https://www.smashingmagazine.com/category/uxdesign",
    "https://material.io/design",
    "https://uxfol.io/blog/ux-case-studies",
    "https://www.behance.net/search/projects?search=ui%20ux%20case%20study",
];

pub const JOURNEY_SOURCES: &[&str] = &[
    "https://www.behance.net/gallery/145239404/Mindful-Wellbeing-App-UX-Case-Study",
    "https://uxdesign.cc/user-flow-mapping-guide-32c6b9c5b9e6",
    "https://m2.material.io/design/navigation/understanding-navigation.html",
];

pub const DOCUMENTATION_SOURCES: &[&str] = &[
    "https://uxdesign.cc/documentation-design-decisions-ux-case-study-bcf56662e1f3",
    "https://www.behance.net/search/projects?search=mobile+app+case+study",
    "https://m2.material.io/design/guidelines-overview",
];

/// Knowledge bases behind the retrieval-augmented UX stages.
#[derive(Clone)]
pub struct UxKnowledge {
    pub design: Arc<KnowledgeBase>,
    pub journey: Arc<KnowledgeBase>,
    pub documentation: Arc<KnowledgeBase>,
}

/// Design research → journey → screens → storyboard → documentation.
///
/// Each stage binds the project inputs plus every earlier output, so the
/// documentation stage sees the whole chain.
pub fn create_ux_prototype_pipeline(model: &str, knowledge: &UxKnowledge) -> Pipeline {
    Pipeline::new(
        "ux_prototype",
        vec![
            PipelineStage::new(DESIGN_STAGE, UX_DESIGN_PROMPT, params(model, LONG_FORM_TOKENS))
                .with_output_key("inspirations")
                .with_retrieval(Arc::clone(&knowledge.design), RETRIEVAL_TOP_K),
            PipelineStage::new(JOURNEY_STAGE, UX_JOURNEY_PROMPT, params(model, STAGE_TOKENS))
                .with_output_key("flow_schema")
                .with_retrieval(Arc::clone(&knowledge.journey), RETRIEVAL_TOP_K)
                .with_transform(normalize_json),
            PipelineStage::new(SCREEN_STAGE, UX_SCREEN_PROMPT, params(model, STAGE_TOKENS))
                .with_output_key("screen_descriptions"),
            PipelineStage::new(
                STORYBOARD_STAGE,
                UX_STORYBOARD_PROMPT,
                params(model, STAGE_TOKENS),
            ),
            PipelineStage::new(
                DOCUMENTATION_STAGE,
                UX_DOCUMENTATION_PROMPT,
                params(model, LONG_FORM_TOKENS),
            )
            .with_retrieval(Arc::clone(&knowledge.documentation), RETRIEVAL_TOP_K)
            .shared_as(SessionKey::Documentation),
        ],
    )
}

fn params(model: &str, max_output_tokens: u32) -> GenerationParams {
    GenerationParams::new(model, UX_TEMPERATURE).with_max_output_tokens(max_output_tokens)
}
