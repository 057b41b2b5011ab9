//! Search orchestration: query expansion, bounded per-variant fan-out,
//! fusion pooling, ranking, and answer synthesis.

use crate::{synthesis, timed_generation, timed_retrieval, RagEngine};
use async_trait::async_trait;
use ragline_core::config::{SearchConfig, SearchMode};
use ragline_core::error::Result;
use ragline_core::traits::{TextGenerator, VectorStore};
use ragline_core::types::{CandidateResult, Message, RankedResult, RetrievalMethod};
use ragline_retrieval::{auto_vector_weight, fuse, rank, QueryExpander};
use tracing::debug;

/// What a search call hands back to the request surface. An empty
/// `results` with `Ok` means "zero matches"; a failed store call surfaces
/// as an error instead.
#[derive(Debug)]
pub struct SearchResponse {
    pub results: Vec<RankedResult>,
    /// Synthesized answer; `None` when synthesis is disabled, found
    /// nothing to ground on, or the generator failed.
    pub answer: Option<String>,
    /// All variants produced by expansion, searched or not.
    pub variants: Vec<String>,
}

impl<S: VectorStore> RagEngine<S> {
    pub async fn search(&self, query: &str, config: SearchConfig) -> Result<SearchResponse> {
        config.validate()?;

        let generator = TimedGenerator { inner: self.generator() };
        let variants = if config.expand {
            QueryExpander::new(&generator).expand(query).await
        } else {
            vec![query.to_string()]
        };

        // Only the first few variants are searched, capping collaborator
        // calls per request.
        let searched = &variants[..variants.len().min(config.max_variants.max(1))];
        debug!(query, searched = searched.len(), total = variants.len(), "search fan-out");

        let mut pool: Vec<RankedResult> = match config.mode {
            SearchMode::Fused => {
                let per_variant = searched.iter().map(|v| self.search_variant(v, &config));
                futures::future::try_join_all(per_variant)
                    .await?
                    .into_iter()
                    .flatten()
                    .collect()
            }
            SearchMode::StoreBlended => self.store_blended(query, &config).await?,
        };

        pool.sort_by(|a, b| b.fused.partial_cmp(&a.fused).unwrap_or(std::cmp::Ordering::Equal));
        pool.truncate(config.pool_cap);

        let results = rank(pool, query, &config);
        let answer = if config.synthesize {
            synthesis::synthesize(&generator, &results, query).await
        } else {
            None
        };

        Ok(SearchResponse { results, answer, variants })
    }

    /// One variant: embed, then run the vector and lexical sub-queries
    /// concurrently and join before fusing.
    async fn search_variant(&self, variant: &str, config: &SearchConfig) -> Result<Vec<RankedResult>> {
        let weight = config.vector_weight.unwrap_or_else(|| auto_vector_weight(variant));
        let embedding =
            timed_generation("query embedding", self.embedder().embed(variant)).await?;
        let k = config.pool_cap;
        let (vector_hits, lexical_hits) = tokio::try_join!(
            timed_retrieval("vector search", self.store().query_by_vector(&embedding, k)),
            timed_retrieval("keyword search", self.store().query_by_keyword(variant, k)),
        )?;
        Ok(fuse(&vector_hits, &lexical_hits, weight, k))
    }

    /// Store-side blended search: one call, one score per hit.
    async fn store_blended(&self, query: &str, config: &SearchConfig) -> Result<Vec<RankedResult>> {
        let alpha = config.vector_weight.unwrap_or_else(|| auto_vector_weight(query));
        let embedding =
            timed_generation("query embedding", self.embedder().embed(query)).await?;
        let hits = timed_retrieval(
            "hybrid search",
            self.store().query_hybrid(query, &embedding, alpha, config.pool_cap),
        )
        .await?;

        let max = hits.iter().map(|h| h.score).fold(0.0f32, f32::max);
        let divisor = if max > 0.0 { max.max(1.0) } else { 1.0 };
        Ok(hits
            .into_iter()
            .enumerate()
            .map(|(rank, hit)| {
                let norm = if max > 0.0 { hit.score / divisor } else { 0.0 };
                let raw_score = hit.score;
                RankedResult {
                    candidate: CandidateResult {
                        hit,
                        method: RetrievalMethod::Combined,
                        raw_score,
                        rank,
                    },
                    norm_vector: 0.0,
                    norm_lexical: 0.0,
                    fused: norm,
                    relevance: norm,
                    admitted: false,
                }
            })
            .collect())
    }
}

/// Wraps the injected generator so every call site inherits the
/// collaborator timeout.
pub(crate) struct TimedGenerator<'a> {
    pub(crate) inner: &'a dyn TextGenerator,
}

#[async_trait]
impl TextGenerator for TimedGenerator<'_> {
    async fn generate(
        &self,
        messages: &[Message],
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String> {
        timed_generation(
            "text generation",
            self.inner.generate(messages, max_tokens, temperature),
        )
        .await
    }
}
