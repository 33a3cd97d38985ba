pub mod artifact;
pub mod career_graph;
pub mod document;
pub mod generation;
pub mod prompt_template;
pub mod session;
pub use artifact::DownloadArtifact;
pub use career_graph::CareerGraph;
pub use document::{Chunk, Document, DocumentSource};
pub use generation::GenerationParams;
pub use prompt_template::{Bindings, PromptTemplate};
pub use session::{Session, SessionKey};
