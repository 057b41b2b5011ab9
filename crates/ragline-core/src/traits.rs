//! Collaborator seams. The store, the embedding service, and the text
//! generator are opaque to the pipeline; concrete backends implement these
//! traits and are injected at engine construction.

use crate::error::Result;
use crate::types::{Chunk, Message, StoreHit};
use async_trait::async_trait;

#[async_trait]
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    /// Embed a single text. Input longer than `max_len()` may be truncated
    /// by the backend.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, chunk: &Chunk, embedding: &[f32]) -> Result<()>;
    /// Ranked by similarity, best first. `score` is similarity in [0,1].
    async fn query_by_vector(&self, embedding: &[f32], k: usize) -> Result<Vec<StoreHit>>;
    /// Ranked by the store's native lexical score, best first.
    async fn query_by_keyword(&self, text: &str, k: usize) -> Result<Vec<StoreHit>>;
    /// Store-side blended search: one list, one score, `alpha` = vector share.
    async fn query_hybrid(
        &self,
        text: &str,
        embedding: &[f32],
        alpha: f32,
        k: usize,
    ) -> Result<Vec<StoreHit>>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        messages: &[Message],
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String>;
}
