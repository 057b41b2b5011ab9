//! In-process collaborators for offline use and tests: a deterministic
//! feature-hashing embedder and an in-memory store with vector, keyword,
//! and blended query paths. Real deployments inject network-backed
//! implementations of the same traits.

use async_trait::async_trait;
use ragline_core::error::{Error, Result};
use ragline_core::traits::{Embedder, TextGenerator, VectorStore};
use ragline_core::types::{Chunk, Message, StoreHit};
use std::hash::Hasher;
use tokio::sync::RwLock;
use twox_hash::XxHash64;

/// Bag-of-words feature hashing into a fixed-dimension vector,
/// L2-normalized. Deterministic, no model weights, good enough for
/// offline retrieval and reproducible tests.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        8192
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dim];
        let bounded: String = text.chars().take(self.max_len()).collect();
        for token in bounded
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let bucket = (hasher.finish() % self.dim as u64) as usize;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        Ok(vector)
    }
}

/// In-memory store keyed by `(doc_id, seq)`. Vector search is cosine
/// similarity, keyword search is query-term frequency.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<(Chunk, Vec<f32>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, chunk: &Chunk, embedding: &[f32]) -> Result<()> {
        let mut rows = self.rows.write().await;
        match rows
            .iter_mut()
            .find(|(c, _)| c.doc_id == chunk.doc_id && c.seq == chunk.seq)
        {
            Some(row) => *row = (chunk.clone(), embedding.to_vec()),
            None => rows.push((chunk.clone(), embedding.to_vec())),
        }
        Ok(())
    }

    async fn query_by_vector(&self, embedding: &[f32], k: usize) -> Result<Vec<StoreHit>> {
        let rows = self.rows.read().await;
        let mut hits: Vec<StoreHit> = rows
            .iter()
            .map(|(chunk, row_embedding)| hit(chunk, cosine(embedding, row_embedding).max(0.0)))
            .collect();
        sort_desc(&mut hits);
        hits.truncate(k);
        Ok(hits)
    }

    async fn query_by_keyword(&self, text: &str, k: usize) -> Result<Vec<StoreHit>> {
        let rows = self.rows.read().await;
        let query_tokens = tokens(text);
        let mut hits: Vec<StoreHit> = rows
            .iter()
            .filter_map(|(chunk, _)| {
                let content_tokens = tokens(&chunk.content);
                let score: usize = query_tokens
                    .iter()
                    .map(|q| content_tokens.iter().filter(|t| t == &q).count())
                    .sum();
                (score > 0).then(|| hit(chunk, score as f32))
            })
            .collect();
        sort_desc(&mut hits);
        hits.truncate(k);
        Ok(hits)
    }

    async fn query_hybrid(
        &self,
        text: &str,
        embedding: &[f32],
        alpha: f32,
        k: usize,
    ) -> Result<Vec<StoreHit>> {
        let dense = self.query_by_vector(embedding, usize::MAX).await?;
        let sparse = self.query_by_keyword(text, usize::MAX).await?;
        let dense_max = dense.iter().map(|h| h.score).fold(0.0f32, f32::max);
        let sparse_max = sparse.iter().map(|h| h.score).fold(0.0f32, f32::max);

        let mut blended = dense;
        for h in &mut blended {
            h.score = if dense_max > 0.0 { alpha * h.score / dense_max } else { 0.0 };
        }
        for s in sparse {
            let lexical = if sparse_max > 0.0 { (1.0 - alpha) * s.score / sparse_max } else { 0.0 };
            match blended
                .iter_mut()
                .find(|h| h.doc_id == s.doc_id && h.seq == s.seq)
            {
                Some(h) => h.score += lexical,
                None => {
                    let mut s = s;
                    s.score = lexical;
                    blended.push(s);
                }
            }
        }
        blended.retain(|h| h.score > 0.0);
        sort_desc(&mut blended);
        blended.truncate(k);
        Ok(blended)
    }
}

/// Generator stand-in for deployments without a text-generation backend.
/// Expansion and synthesis degrade exactly as they would on a dead
/// network collaborator.
pub struct NullGenerator;

#[async_trait]
impl TextGenerator for NullGenerator {
    async fn generate(
        &self,
        _messages: &[Message],
        _max_tokens: usize,
        _temperature: f32,
    ) -> Result<String> {
        Err(Error::Generation("no text-generation backend configured".into()))
    }
}

fn hit(chunk: &Chunk, score: f32) -> StoreHit {
    StoreHit {
        doc_id: chunk.doc_id.clone(),
        seq: chunk.seq,
        content: chunk.content.clone(),
        importance: chunk.metadata.importance,
        score,
    }
}

fn sort_desc(hits: &mut [StoreHit]) {
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
