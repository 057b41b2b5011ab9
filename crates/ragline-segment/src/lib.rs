//! ragline-segment
//!
//! Splits raw document text into ordered, possibly overlapping chunks and
//! derives per-chunk scoring metadata. Pure and synchronous; the only
//! failures are configuration errors.

pub mod metadata;
pub mod policies;

use ragline_core::error::{Error, Result};
use ragline_core::types::Chunk;
use serde::{Deserialize, Serialize};

pub use metadata::{ChunkScorer, HeuristicScorer};

/// Chunks whose trimmed content is shorter than this are dropped as noise.
/// Capped by `max_chunk_size` so tiny windows still emit.
pub const MIN_MEANINGFUL_LEN: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPolicy {
    /// Fixed byte window with sentence-terminator snapping.
    FixedWindow,
    /// Accumulate whole sentences up to the size cap.
    Sentence,
    /// Accumulate paragraphs; oversized paragraphs fall back to sentences.
    Paragraph,
    /// Paragraph accumulation when it fits, else sentence accumulation
    /// with natural break-point heuristics.
    #[default]
    SemanticHybrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub max_chunk_size: usize,
    pub min_chunk_size: usize,
    /// Byte overlap carried between fixed windows.
    pub overlap: usize,
    /// Sentences carried between accumulated chunks.
    pub overlap_sentences: usize,
    pub policy: SegmentPolicy,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 1000,
            min_chunk_size: 100,
            overlap: 100,
            overlap_sentences: 1,
            policy: SegmentPolicy::SemanticHybrid,
        }
    }
}

impl SegmentConfig {
    /// Config errors are raised immediately, never silently clamped.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 || self.min_chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk sizes must be positive".into()));
        }
        if self.min_chunk_size > self.max_chunk_size {
            return Err(Error::InvalidConfig(format!(
                "min_chunk_size {} exceeds max_chunk_size {}",
                self.min_chunk_size, self.max_chunk_size
            )));
        }
        if self.overlap >= self.max_chunk_size {
            return Err(Error::InvalidConfig(format!(
                "overlap {} must be smaller than max_chunk_size {}",
                self.overlap, self.max_chunk_size
            )));
        }
        Ok(())
    }
}

pub struct Segmenter {
    scorer: Box<dyn ChunkScorer>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    pub fn new() -> Self {
        Self { scorer: Box::new(HeuristicScorer) }
    }

    /// Swap in an alternative scoring strategy (e.g. model-based) without
    /// touching segmentation itself.
    pub fn with_scorer(scorer: Box<dyn ChunkScorer>) -> Self {
        Self { scorer }
    }

    /// Split `text` into ordered chunks covering it start to end.
    ///
    /// Byte offsets are strictly increasing across `seq`. Empty input
    /// yields an empty vector.
    pub fn segment(&self, doc_id: &str, text: &str, config: &SegmentConfig) -> Result<Vec<Chunk>> {
        config.validate()?;
        if text.trim().is_empty() {
            return Ok(vec![]);
        }

        let drafts = match config.policy {
            SegmentPolicy::FixedWindow => policies::fixed_window(text, config),
            SegmentPolicy::Sentence => policies::sentence_accumulate(text, config),
            SegmentPolicy::Paragraph => policies::paragraph_accumulate(text, config),
            SegmentPolicy::SemanticHybrid => policies::semantic_hybrid(text, config),
        };

        let floor = MIN_MEANINGFUL_LEN.min(config.max_chunk_size);
        let mut chunks = Vec::new();
        for draft in drafts {
            let content = &text[draft.start..draft.end];
            if content.trim().len() < floor {
                continue;
            }
            let seq = chunks.len();
            chunks.push(Chunk {
                doc_id: doc_id.to_string(),
                seq,
                start: draft.start,
                end: draft.end,
                content: content.to_string(),
                metadata: metadata::derive(content, self.scorer.as_ref()),
            });
        }
        tracing::debug!(doc_id, chunks = chunks.len(), "segmented document");
        Ok(chunks)
    }
}
