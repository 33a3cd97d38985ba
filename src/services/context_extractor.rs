use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Document, DocumentSource},
};

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];
const BLOCK_ELEMENTS: [&str; 13] = [
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "section", "article",
];

/// Turns uploaded bytes, files, inline text or web pages into plain text.
pub struct ContextExtractor {
    http: reqwest::Client,
}

impl ContextExtractor {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(concat!("promptline-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Extracts the text of one source, capped at `max_chars` characters.
    ///
    /// An empty result is returned as an empty document; callers decide
    /// whether that ends the run (see [`Document::ensure_content`]).
    pub async fn extract(
        &self,
        source: &DocumentSource,
        max_chars: Option<usize>,
    ) -> AppResult<Document> {
        let label = source.label();
        let text = match source {
            DocumentSource::Pdf(bytes) => {
                let bytes = bytes.clone();
                tokio::task::spawn_blocking(move || extract_pdf_text(&bytes, max_chars))
                    .await
                    .map_err(|e| AppError::InvalidDocument(format!("PDF parser aborted: {}", e)))??
            }
            DocumentSource::PdfFile(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    AppError::Configuration(format!(
                        "cannot read knowledge document {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                tokio::task::spawn_blocking(move || extract_pdf_text(&bytes, max_chars))
                    .await
                    .map_err(|e| AppError::InvalidDocument(format!("PDF parser aborted: {}", e)))??
            }
            DocumentSource::Text(text) => cap_text(text, max_chars),
            DocumentSource::Url(url) => {
                let html = self.fetch(url).await?;
                cap_text(&html_to_text(&html), max_chars)
            }
        };

        log::debug!("Extracted {} characters from {}", text.chars().count(), label);
        Ok(Document::new(label, text))
    }

    /// Extracts every source, skipping (and logging) the ones that fail or
    /// come back empty.
    pub async fn extract_all(
        &self,
        sources: &[DocumentSource],
        max_chars: Option<usize>,
    ) -> Vec<Document> {
        let mut documents = Vec::with_capacity(sources.len());
        for source in sources {
            match self.extract(source, max_chars).await {
                Ok(doc) if !doc.is_empty() => documents.push(doc),
                Ok(doc) => log::warn!("Skipping {}: no readable text", doc.source),
                Err(e) => log::warn!("Skipping {}: {}", source.label(), e),
            }
        }
        documents
    }

    async fn fetch(&self, url: &str) -> AppResult<String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::ValidationError(format!(
                "URL must start with http:// or https://, got '{}'",
                url
            )));
        }

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "fetching {} returned HTTP {}",
                url,
                response.status()
            )));
        }
        Ok(response.text().await?)
    }
}

/// Text layer of a PDF, trimmed and capped. Pure function of its input.
pub fn extract_pdf_text(bytes: &[u8], max_chars: Option<usize>) -> AppResult<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::InvalidDocument(format!("cannot read PDF: {}", e)))?;
    Ok(cap_text(&text, max_chars))
}

/// Trims `text` and truncates it to at most `max_chars` characters.
pub fn cap_text(text: &str, max_chars: Option<usize>) -> String {
    let trimmed = text.trim();
    match max_chars {
        Some(max) => match trimmed.char_indices().nth(max) {
            Some((byte_index, _)) => trimmed[..byte_index].trim_end().to_string(),
            None => trimmed.to_string(),
        },
        None => trimmed.to_string(),
    }
}

/// Visible text of an HTML page, one line per block element.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = match Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
    {
        Some(body) => element_text(&body),
        None => element_text(&document.root_element()),
    };
    collapse_whitespace(&text)
}

fn element_text(element: &ElementRef) -> String {
    let mut output = String::new();

    for node in element.descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                output.push_str(text);
                output.push(' ');
            }
        } else if let Some(el) = node.value().as_element() {
            if BLOCK_ELEMENTS.contains(&el.name()) {
                output.push('\n');
            }
        }
    }
    output
}

fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
