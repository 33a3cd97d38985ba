use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Chunk, Document, DocumentSource},
    services::context_extractor::ContextExtractor,
};

const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];
const DEFAULT_DIMENSIONS: usize = 384;

/// Recursive character splitter: paragraphs, then lines, then words, then
/// raw characters, merged back into chunks of at most `chunk_size` chars with
/// `chunk_overlap` chars carried between neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSplitter {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        self.split_into(text.trim(), 0, &mut pieces);
        self.merge(pieces)
    }

    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split(&doc.text)
                    .into_iter()
                    .enumerate()
                    .map(|(index, text)| Chunk {
                        source: doc.source.clone(),
                        index,
                        text,
                    })
            })
            .collect()
    }

    fn split_into(&self, text: &str, level: usize, out: &mut Vec<String>) {
        if text.is_empty() {
            return;
        }
        if text.chars().count() <= self.chunk_size {
            out.push(text.to_string());
            return;
        }
        match SEPARATORS.get(level) {
            Some(separator) => {
                for part in text.split(separator) {
                    let part = part.trim();
                    if !part.is_empty() {
                        self.split_into(part, level + 1, out);
                    }
                }
            }
            None => {
                let chars: Vec<char> = text.chars().collect();
                for window in chars.chunks(self.chunk_size) {
                    out.push(window.iter().collect());
                }
            }
        }
    }

    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            let candidate_len = if current.is_empty() {
                piece.chars().count()
            } else {
                current.chars().count() + 1 + piece.chars().count()
            };

            if candidate_len > self.chunk_size && !current.is_empty() {
                let overlap = tail_chars(&current, self.chunk_overlap);
                chunks.push(std::mem::take(&mut current));
                if !overlap.is_empty()
                    && overlap.chars().count() + 1 + piece.chars().count() <= self.chunk_size
                {
                    current = overlap;
                }
            }

            if current.is_empty() {
                current = piece;
            } else {
                current.push(' ');
                current.push_str(&piece);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

/// Last `count` characters of `text`, starting on a word boundary.
fn tail_chars(text: &str, count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    let total = text.chars().count();
    if total <= count {
        return text.to_string();
    }
    let start = text
        .char_indices()
        .nth(total - count)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let tail = &text[start..];
    match tail.find(' ') {
        Some(space) => tail[space + 1..].to_string(),
        None => tail.to_string(),
    }
}

/// Maps text to a fixed-size vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Local feature-hashing embedder over lowercase word unigrams and bigrams.
///
/// Deterministic across processes; vectors are L2-normalised so the dot
/// product is the cosine similarity.
#[derive(Clone, Copy, Debug)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        // FNV-1a
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in feature.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        ((hash % self.dimensions as u64) as usize, sign)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        for token in &tokens {
            let (index, sign) = self.bucket(token);
            vector[index] += sign;
        }
        for pair in tokens.windows(2) {
            let (index, sign) = self.bucket(&format!("{} {}", pair[0], pair[1]));
            vector[index] += 0.5 * sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub score: f32,
    #[serde(flatten)]
    pub chunk: Chunk,
}

/// Immutable similarity index over the chunks of a set of documents.
pub struct KnowledgeBase {
    entries: Vec<(Chunk, Vec<f32>)>,
    embedder: Arc<dyn Embedder>,
}

impl KnowledgeBase {
    pub fn build(
        documents: &[Document],
        splitter: TextSplitter,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let entries = splitter
            .split_documents(documents)
            .into_iter()
            .map(|chunk| {
                let vector = embedder.embed(&chunk.text);
                (chunk, vector)
            })
            .collect();
        Self { entries, embedder }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `k` chunks by cosine similarity, best first. Chunks scoring below
    /// `min_score` are dropped; ties keep document order.
    pub fn search(&self, query: &str, k: usize, min_score: Option<f32>) -> Vec<ScoredChunk> {
        let query_vector = self.embedder.embed(query);
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vector)| ScoredChunk {
                score: cosine(&query_vector, vector),
                chunk: chunk.clone(),
            })
            .filter(|scored| min_score.map_or(true, |min| scored.score >= min))
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }

    /// Retrieved chunk texts joined by blank lines.
    pub fn context_for(&self, query: &str, k: usize) -> String {
        self.search(query, k, None)
            .into_iter()
            .map(|scored| scored.chunk.text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Builds knowledge bases on first use and keeps them for the life of the
/// process, keyed by a digest of their sources and splitter settings. Only
/// knowledge bases built from every source are kept.
pub struct RetrievalService {
    extractor: Arc<ContextExtractor>,
    embedder: Arc<dyn Embedder>,
    cache: RwLock<HashMap<String, Arc<KnowledgeBase>>>,
}

impl RetrievalService {
    pub fn new(extractor: Arc<ContextExtractor>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            extractor,
            embedder,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn knowledge_base(
        &self,
        sources: &[DocumentSource],
        splitter: TextSplitter,
    ) -> AppResult<Arc<KnowledgeBase>> {
        let key = cache_key(sources, splitter);
        if let Some(kb) = self.cache.read().await.get(&key) {
            return Ok(Arc::clone(kb));
        }

        // No lock is held while sources are fetched.
        let documents = self.extractor.extract_all(sources, None).await;
        let kb = KnowledgeBase::build(&documents, splitter, Arc::clone(&self.embedder));
        if kb.is_empty() {
            return Err(AppError::EmptyExtraction(format!(
                "none of the {} knowledge sources produced readable text",
                sources.len()
            )));
        }

        log::info!(
            "Built knowledge base with {} chunks from {} of {} sources",
            kb.len(),
            documents.len(),
            sources.len()
        );
        let kb = Arc::new(kb);
        if documents.len() < sources.len() {
            log::warn!(
                "Knowledge base is missing {} sources; it will be rebuilt on next use",
                sources.len() - documents.len()
            );
            return Ok(kb);
        }

        let mut cache = self.cache.write().await;
        let cached = cache.entry(key).or_insert(kb);
        Ok(Arc::clone(cached))
    }
}

fn cache_key(sources: &[DocumentSource], splitter: TextSplitter) -> String {
    let mut hasher = Sha256::new();
    for source in sources {
        match source {
            DocumentSource::Pdf(bytes) => {
                hasher.update(b"pdf:");
                hasher.update(bytes);
            }
            DocumentSource::PdfFile(path) => {
                hasher.update(b"file:");
                hasher.update(path.to_string_lossy().as_bytes());
            }
            DocumentSource::Text(text) => {
                hasher.update(b"text:");
                hasher.update(text.as_bytes());
            }
            DocumentSource::Url(url) => {
                hasher.update(b"url:");
                hasher.update(url.as_bytes());
            }
        }
        hasher.update([0u8]);
    }
    hasher.update(splitter.chunk_size.to_le_bytes());
    hasher.update(splitter.chunk_overlap.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let splitter = TextSplitter::new(100, 10);
        assert_eq!(splitter.split("  one short paragraph "), vec!["one short paragraph"]);
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu ".repeat(20);
        let splitter = TextSplitter::new(50, 10);

        let chunks = splitter.split(&text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 50));
    }

    #[test]
    fn test_neighbouring_chunks_overlap() {
        let text = (1..=40).map(|n| format!("w{}", n)).collect::<Vec<_>>().join(" ");
        let splitter = TextSplitter::new(30, 8);

        let chunks = splitter.split(&text);

        for pair in chunks.windows(2) {
            let last_word = pair[0].split(' ').last().unwrap();
            assert!(
                pair[1].split(' ').any(|w| w == last_word),
                "expected '{}' carried into '{}'",
                last_word,
                pair[1]
            );
        }
    }

    #[test]
    fn test_paragraphs_split_before_words() {
        let text = format!("{}\n\n{}", "a".repeat(8), "b".repeat(8));
        let splitter = TextSplitter::new(10, 0);

        assert_eq!(splitter.split(&text), vec!["a".repeat(8), "b".repeat(8)]);
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let splitter = TextSplitter::new(4, 0);
        assert_eq!(splitter.split("abcdefghij"), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_documents_keeps_source_and_order() {
        let docs = vec![
            Document::new("a.pdf", "first"),
            Document::new("b.pdf", "second"),
        ];

        let chunks = TextSplitter::new(100, 0).split_documents(&docs);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].source, "b.pdf");
        assert_eq!(chunks[1].index, 0);
    }

    #[test]
    fn test_embeddings_are_deterministic_and_normalised() {
        let embedder = HashingEmbedder::default();

        let a = embedder.embed("Cloud engineering with Kubernetes");
        let b = embedder.embed("Cloud engineering with Kubernetes");

        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_search_ranks_relevant_chunk_first() {
        let docs = vec![
            Document::new("tracks", "Cybersecurity track: network security, ethical hacking, SIEM."),
            Document::new("tracks", "Data science track: Python, pandas, statistics, machine learning."),
            Document::new("tracks", "UI/UX track: Figma, prototyping, user research."),
        ];
        let kb = KnowledgeBase::build(
            &docs,
            TextSplitter::new(200, 0),
            Arc::new(HashingEmbedder::default()),
        );

        let results = kb.search("I want to learn machine learning with Python", 2, None);

        assert_eq!(results.len(), 2);
        assert!(results[0].chunk.text.starts_with("Data science"));
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_search_applies_score_threshold() {
        let docs = vec![Document::new("d", "completely unrelated words")];
        let kb = KnowledgeBase::build(
            &docs,
            TextSplitter::new(200, 0),
            Arc::new(HashingEmbedder::default()),
        );

        assert!(kb.search("kubernetes terraform", 4, Some(0.5)).is_empty());
        assert_eq!(kb.search("kubernetes terraform", 4, None).len(), 1);
    }

    #[test]
    fn test_cache_key_depends_on_sources_and_splitter() {
        let sources = vec![DocumentSource::Text("x".into())];
        let a = cache_key(&sources, TextSplitter::new(512, 64));
        let b = cache_key(&sources, TextSplitter::new(800, 100));
        let c = cache_key(&[DocumentSource::Text("y".into())], TextSplitter::new(512, 64));

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, cache_key(&sources, TextSplitter::new(512, 64)));
    }

    #[actix_rt::test]
    async fn test_knowledge_base_is_cached() {
        let extractor = Arc::new(ContextExtractor::new(&Config::test_config()).unwrap());
        let service = RetrievalService::new(extractor, Arc::new(HashingEmbedder::default()));
        let sources = vec![DocumentSource::Text("Learn Terraform and AWS.".into())];

        let first = service
            .knowledge_base(&sources, TextSplitter::new(512, 64))
            .await
            .unwrap();
        let second = service
            .knowledge_base(&sources, TextSplitter::new(512, 64))
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[actix_rt::test]
    async fn test_empty_sources_are_no_content() {
        let extractor = Arc::new(ContextExtractor::new(&Config::test_config()).unwrap());
        let service = RetrievalService::new(extractor, Arc::new(HashingEmbedder::default()));

        let err = service
            .knowledge_base(&[DocumentSource::Text("  ".into())], TextSplitter::new(512, 64))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::EmptyExtraction(_)));
    }

    #[actix_rt::test]
    async fn test_partial_knowledge_base_is_rebuilt() {
        let extractor = Arc::new(ContextExtractor::new(&Config::test_config()).unwrap());
        let service = RetrievalService::new(extractor, Arc::new(HashingEmbedder::default()));
        let sources = vec![
            DocumentSource::Url("ftp://tracks.invalid/catalogue".into()),
            DocumentSource::Text("Cloud track: Terraform, AWS, Kubernetes.".into()),
        ];

        let first = service
            .knowledge_base(&sources, TextSplitter::new(512, 64))
            .await
            .unwrap();
        let second = service
            .knowledge_base(&sources, TextSplitter::new(512, 64))
            .await
            .unwrap();

        assert_eq!(first.len(), 1);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[actix_rt::test]
    async fn test_slow_build_does_not_block_other_lookups() {
        // Accepts connections and never answers, so fetches run to the timeout.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        actix_rt::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let extractor = Arc::new(ContextExtractor::new(&Config::test_config()).unwrap());
        let service = Arc::new(RetrievalService::new(
            extractor,
            Arc::new(HashingEmbedder::default()),
        ));

        let slow = Arc::clone(&service);
        let slow_sources = vec![
            DocumentSource::Url(format!("http://{}/guide", addr)),
            DocumentSource::Url(format!("http://{}/tracks", addr)),
        ];
        let background = actix_rt::spawn(async move {
            slow.knowledge_base(&slow_sources, TextSplitter::new(800, 200))
                .await
        });
        actix_rt::time::sleep(std::time::Duration::from_millis(50)).await;

        let started = std::time::Instant::now();
        service
            .knowledge_base(
                &[DocumentSource::Text("tracks text".into())],
                TextSplitter::new(512, 64),
            )
            .await
            .unwrap();

        assert!(started.elapsed() < std::time::Duration::from_millis(500));
        assert!(background.await.unwrap().is_err());
    }
}
