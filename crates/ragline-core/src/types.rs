//! Domain types shared by the segmentation and retrieval stages.

use serde::{Deserialize, Serialize};

pub type DocId = String;

/// A document that finished ingestion. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: DocId,
    pub page_count: usize,
    pub chunk_count: usize,
}

/// A chunk of a source document that is independently retrievable.
///
/// - `doc_id`: stable document identity
/// - `seq`: position within the parent document
/// - `start`/`end`: byte offsets into the source text; strictly increasing
///   across `seq` for a given document
/// - `content`: the text payload, always `source[start..end]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub doc_id: DocId,
    pub seq: usize,
    pub start: usize,
    pub end: usize,
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Heuristic metadata derived once at chunk creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Top-10 most frequent words of length >= 4.
    pub keywords: Vec<String>,
    /// Importance signal in [0,1].
    pub importance: f32,
    /// Inter-sentence coherence in [0,1].
    pub coherence: f32,
    pub word_count: usize,
    /// First sentence, truncated.
    pub summary: String,
}

/// Indicates which retrieval path produced a candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RetrievalMethod {
    Vector,
    Lexical,
    Combined,
}

/// The minimal surface returned by either store query path.
///
/// `score` is path-specific but higher is always better; the vector path
/// reports similarity (already `1 - distance`), the lexical path reports
/// its native relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHit {
    pub doc_id: DocId,
    pub seq: usize,
    pub content: String,
    pub importance: f32,
    pub score: f32,
}

/// A store hit labelled with its origin list. Ephemeral, created per
/// retrieval call.
#[derive(Debug, Clone)]
pub struct CandidateResult {
    pub hit: StoreHit,
    pub method: RetrievalMethod,
    pub raw_score: f32,
    /// Rank within the originating list (0 = best).
    pub rank: usize,
}

/// A candidate after fusion and re-scoring. Discarded once the response
/// is built.
#[derive(Debug, Clone)]
pub struct RankedResult {
    pub candidate: CandidateResult,
    pub norm_vector: f32,
    pub norm_lexical: f32,
    pub fused: f32,
    /// Final relevance in [0,1] after re-scoring.
    pub relevance: f32,
    /// Whether the diversifier admitted this result.
    pub admitted: bool,
}

/// One role-tagged message for the text-generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}
