use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*\n(.*?)\n?\s*```\s*$")
        .expect("JSON_FENCE is a valid regex pattern")
});

/// How a stage output is meant to be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFormat {
    #[default]
    Markdown,
    Json,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedOutput {
    pub format: DisplayFormat,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

/// Prepares generated text for display. A JSON hint whose text does not
/// parse falls back to plain text.
pub fn render(text: &str, hint: DisplayFormat) -> RenderedOutput {
    match hint {
        DisplayFormat::Json => match parse_json(text) {
            Some(value) => RenderedOutput {
                format: DisplayFormat::Json,
                body: pretty(&value).unwrap_or_else(|| text.trim().to_string()),
                json: Some(value),
            },
            None => {
                log::debug!("Output requested as JSON did not parse, showing as plain text");
                RenderedOutput {
                    format: DisplayFormat::Plain,
                    body: text.trim().to_string(),
                    json: None,
                }
            }
        },
        format => RenderedOutput {
            format,
            body: text.trim().to_string(),
            json: None,
        },
    }
}

/// Pretty-prints `text` when it is JSON (fenced or bare), otherwise returns
/// it trimmed.
pub fn normalize_json(text: &str) -> String {
    parse_json(text)
        .and_then(|value| pretty(&value))
        .unwrap_or_else(|| text.trim().to_string())
}

fn parse_json(text: &str) -> Option<Value> {
    let body = match JSON_FENCE.captures(text) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
        None => text,
    };
    serde_json::from_str(body.trim()).ok()
}

fn pretty(value: &Value) -> Option<String> {
    serde_json::to_string_pretty(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_is_parsed_and_pretty_printed() {
        let text = "```json\n{\"Education\":\"BSc Physics\",\"Years of Experience\":4}\n```";

        let out = render(text, DisplayFormat::Json);

        assert_eq!(out.format, DisplayFormat::Json);
        assert_eq!(out.json.as_ref().unwrap()["Education"], "BSc Physics");
        assert!(out.body.contains("\n  \"Education\": \"BSc Physics\""));
    }

    #[test]
    fn test_malformed_json_degrades_to_plain() {
        let out = render("{not json", DisplayFormat::Json);

        assert_eq!(out.format, DisplayFormat::Plain);
        assert_eq!(out.body, "{not json");
        assert!(out.json.is_none());
    }

    #[test]
    fn test_markdown_passes_through_trimmed() {
        let out = render("  - point one\n- point two \n", DisplayFormat::Markdown);

        assert_eq!(out.format, DisplayFormat::Markdown);
        assert_eq!(out.body, "- point one\n- point two");
    }

    #[test]
    fn test_normalize_json_leaves_prose_alone() {
        assert_eq!(normalize_json(" Home → Login "), "Home → Login");
        assert_eq!(normalize_json("[1,2]"), "[\n  1,\n  2\n]");
    }
}
