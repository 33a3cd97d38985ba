pub mod career_service;
pub mod context_extractor;
pub mod generation_client;
pub mod pipeline;
pub mod pipelines;
pub mod result_renderer;
pub mod retrieval;
pub mod session_service;
pub mod study_service;
pub mod ux_service;
