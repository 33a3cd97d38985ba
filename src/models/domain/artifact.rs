use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const TEXT_PLAIN: &str = "text/plain";

static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*+").expect("EMPHASIS is a valid regex pattern"));

/// Raw-text file offered for download after a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

impl DownloadArtifact {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: TEXT_PLAIN.to_string(),
            content: content.into(),
        }
    }

    /// Joins labeled sections as `Label:\n<text>` separated by a blank line.
    pub fn from_sections(filename: impl Into<String>, sections: &[(&str, &str)]) -> Self {
        let content = sections
            .iter()
            .map(|(label, text)| format!("{}:\n{}", label, text))
            .collect::<Vec<_>>()
            .join("\n\n");
        Self::new(filename, content)
    }

    /// Drops markdown emphasis markers, for documents exported outside a renderer.
    pub fn without_emphasis(mut self) -> Self {
        self.content = EMPHASIS.replace_all(&self.content, "").into_owned();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sections_labels_each_output() {
        let artifact = DownloadArtifact::from_sections(
            "study_summary_and_quiz.txt",
            &[("Summary", "- point"), ("Quiz Questions", "1. Why?")],
        );

        assert_eq!(artifact.mime_type, "text/plain");
        assert_eq!(
            artifact.content,
            "Summary:\n- point\n\nQuiz Questions:\n1. Why?"
        );
    }

    #[test]
    fn test_without_emphasis_strips_asterisks() {
        let artifact =
            DownloadArtifact::new("doc.txt", "**Bold** and *italic* ***all***").without_emphasis();

        assert_eq!(artifact.content, "Bold and italic all");
    }
}
