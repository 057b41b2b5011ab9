//! Ingestion: segment a document, embed its chunks with bounded
//! concurrency, and hand them to the store.

use crate::{timed_generation, timed_retrieval, RagEngine};
use ragline_core::error::Result;
use ragline_core::traits::VectorStore;
use ragline_core::types::{Chunk, SourceDocument};
use ragline_segment::SegmentConfig;
use std::time::Duration;
use tracing::{debug, info};

const EMBED_BATCH: usize = 16;
const MAX_BATCHES_IN_FLIGHT: usize = 3;
/// Pause between concurrency waves so the embedding collaborator's rate
/// limits are respected.
const WAVE_DELAY: Duration = Duration::from_millis(50);

impl<S: VectorStore> RagEngine<S> {
    /// Segment `text`, embed every chunk, and upsert into the store.
    ///
    /// Embedding runs in fixed batches with at most
    /// `MAX_BATCHES_IN_FLIGHT` in flight per wave. A failed batch aborts
    /// the whole ingest with the originating error; partial success is
    /// never reported as success.
    pub async fn ingest(
        &self,
        doc_id: &str,
        text: &str,
        config: &SegmentConfig,
    ) -> Result<SourceDocument> {
        let chunks = self.segmenter().segment(doc_id, text, config)?;
        // Form feeds mark page boundaries in extracted document text.
        let page_count = text.matches('\u{c}').count() + 1;

        let mut waves = chunks.chunks(EMBED_BATCH * MAX_BATCHES_IN_FLIGHT).peekable();
        while let Some(wave) = waves.next() {
            let batches = wave.chunks(EMBED_BATCH).map(|batch| self.embed_batch(batch));
            let embedded = futures::future::try_join_all(batches).await?;
            for (chunk, embedding) in embedded.into_iter().flatten() {
                timed_retrieval("chunk upsert", self.store().upsert(chunk, &embedding)).await?;
            }
            debug!(doc_id, wave = wave.len(), "ingest wave stored");
            if waves.peek().is_some() {
                tokio::time::sleep(WAVE_DELAY).await;
            }
        }

        info!(doc_id, chunks = chunks.len(), pages = page_count, "document ingested");
        Ok(SourceDocument {
            id: doc_id.to_string(),
            page_count,
            chunk_count: chunks.len(),
        })
    }

    async fn embed_batch<'a>(&self, batch: &'a [Chunk]) -> Result<Vec<(&'a Chunk, Vec<f32>)>> {
        let mut out = Vec::with_capacity(batch.len());
        for chunk in batch {
            let embedding =
                timed_generation("chunk embedding", self.embedder().embed(&chunk.content)).await?;
            out.push((chunk, embedding));
        }
        Ok(out)
    }
}
