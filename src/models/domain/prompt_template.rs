use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// Variable bindings handed to a template, keyed by placeholder name.
pub type Bindings = HashMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A named prompt with `{name}` placeholders.
///
/// `{{` and `}}` render as literal braces so templates can embed JSON examples.
/// The template is parsed once on construction and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    pub id: String,
    pub template: String,
    #[serde(skip)]
    segments: Vec<Segment>,
    pub required_variables: BTreeSet<String>,
}

impl PromptTemplate {
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = parse_segments(&template);
        let required_variables = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect();

        Self {
            id: id.into(),
            template,
            segments,
            required_variables,
        }
    }

    /// Required variables that are absent or blank in `bindings`.
    pub fn missing_variables(&self, bindings: &Bindings) -> Vec<String> {
        self.required_variables
            .iter()
            .filter(|name| {
                bindings
                    .get(name.as_str())
                    .map_or(true, |value| value.trim().is_empty())
            })
            .cloned()
            .collect()
    }

    pub fn render(&self, bindings: &Bindings) -> AppResult<String> {
        let missing = self.missing_variables(bindings);
        if !missing.is_empty() {
            return Err(AppError::Configuration(format!(
                "template '{}' rendered without bindings for: {}",
                self.id,
                missing.join(", ")
            )));
        }

        let mut rendered = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Variable(name) => {
                    // presence checked above
                    if let Some(value) = bindings.get(name) {
                        rendered.push_str(value);
                    }
                }
            }
        }
        Ok(rendered)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("{{") {
            literal.push('{');
            rest = &rest[2..];
            continue;
        }
        if rest.starts_with("}}") {
            literal.push('}');
            rest = &rest[2..];
            continue;
        }
        if c == '{' {
            if let Some(end) = rest[1..].find('}') {
                let name = &rest[1..1 + end];
                if is_identifier(name) {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                    rest = &rest[end + 2..];
                    continue;
                }
            }
        }
        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_required_variables_are_collected() {
        let template = PromptTemplate::new("t", "Profile: {profile}\nTarget: {target} {profile}");

        let names: Vec<&str> = template
            .required_variables
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["profile", "target"]);
    }

    #[test]
    fn test_render_substitutes_every_placeholder() {
        let template = PromptTemplate::new("summary", "Study Material:\n{content}\n\nSummary:");
        let text = "Topic: gravity. Gravity pulls objects together.";

        let rendered = template.render(&bindings(&[("content", text)])).unwrap();

        assert_eq!(
            rendered,
            "Study Material:\nTopic: gravity. Gravity pulls objects together.\n\nSummary:"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = PromptTemplate::new("t", "{a}-{b}-{a}");
        let values = bindings(&[("a", "x"), ("b", "y")]);

        let first = template.render(&values).unwrap();
        let second = template.render(&values).unwrap();

        assert_eq!(first, "x-y-x");
        assert_eq!(first, second);
    }

    #[test]
    fn test_doubled_braces_are_literal() {
        let template = PromptTemplate::new("json", "[{{\"step\": {n}}}]");

        assert_eq!(template.required_variables.len(), 1);
        let rendered = template.render(&bindings(&[("n", "1")])).unwrap();
        assert_eq!(rendered, "[{\"step\": 1}]");
    }

    #[test]
    fn test_non_identifier_braces_are_kept() {
        let template = PromptTemplate::new("t", "keep { this } and {x}");

        let rendered = template.render(&bindings(&[("x", "ok")])).unwrap();
        assert_eq!(rendered, "keep { this } and ok");
    }

    #[test]
    fn test_missing_variable_fails_render() {
        let template = PromptTemplate::new("t", "{present} {absent}");

        let err = template
            .render(&bindings(&[("present", "yes")]))
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_blank_binding_counts_as_missing() {
        let template = PromptTemplate::new("t", "{profile}");

        let missing = template.missing_variables(&bindings(&[("profile", "   ")]));
        assert_eq!(missing, vec!["profile".to_string()]);
    }

    #[test]
    fn test_multibyte_text_survives() {
        let template = PromptTemplate::new("t", "✅ {a} — ⚠️");

        let rendered = template.render(&bindings(&[("a", "é")])).unwrap();
        assert_eq!(rendered, "✅ é — ⚠️");
    }
}
