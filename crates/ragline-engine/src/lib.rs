//! ragline-engine
//!
//! Wires the pure stages (segmentation, fusion, ranking) to the injected
//! collaborators (store, embedder, generator) and owns the concurrency
//! model: batched embedding during ingestion, per-variant fan-out at
//! search time, and timeouts around every collaborator call.

pub mod ingest;
pub mod local;
pub mod search;
pub mod synthesis;

use ragline_core::error::{Error, Result};
use ragline_core::traits::{Embedder, TextGenerator, VectorStore};
use ragline_segment::Segmenter;
use std::future::Future;
use std::time::Duration;

pub use search::SearchResponse;

/// Collaborators get this long per call before the expiry is converted
/// into the typed failure of their class.
pub(crate) const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// The retrieval pipeline with its injected collaborators. Constructed at
/// startup and passed around; there are no ambient connection handles.
pub struct RagEngine<S: VectorStore> {
    store: S,
    embedder: Box<dyn Embedder>,
    generator: Box<dyn TextGenerator>,
    segmenter: Segmenter,
}

impl<S: VectorStore> RagEngine<S> {
    pub fn new(store: S, embedder: Box<dyn Embedder>, generator: Box<dyn TextGenerator>) -> Self {
        Self { store, embedder, generator, segmenter: Segmenter::new() }
    }

    /// Replace the default heuristic chunk scorer.
    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// The injected store, e.g. for administrative queries.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub(crate) fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    pub(crate) fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }
}

/// Await a store call, converting timeout expiry into a retrieval error.
pub(crate) async fn timed_retrieval<T, F>(what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(CALL_TIMEOUT, fut).await {
        Ok(res) => res,
        Err(_) => Err(Error::Retrieval(format!("{what} timed out"))),
    }
}

/// Await an embedder or generator call, converting timeout expiry into a
/// generation error.
pub(crate) async fn timed_generation<T, F>(what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(CALL_TIMEOUT, fut).await {
        Ok(res) => res,
        Err(_) => Err(Error::Generation(format!("{what} timed out"))),
    }
}
