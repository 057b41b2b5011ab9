//! Heuristic chunk metadata: keywords, importance, coherence, summary.
//!
//! Scoring is approximate by nature and lives behind `ChunkScorer` so a
//! model-based scorer can replace the heuristics without touching the
//! segmentation or retrieval contracts.

use ragline_core::types::ChunkMetadata;
use std::collections::{HashMap, HashSet};

use crate::policies;

const IMPORTANCE_VOCAB: &[&str] = &[
    "important",
    "critical",
    "essential",
    "key",
    "must",
    "warning",
    "caution",
    "significant",
    "required",
    "note",
];

const SUMMARY_MAX_CHARS: usize = 120;

pub trait ChunkScorer: Send + Sync {
    /// Importance signal in [0,1].
    fn importance(&self, text: &str) -> f32;
    /// Inter-sentence coherence in [0,1].
    fn coherence(&self, text: &str) -> f32;
}

/// Default scorer: additive pattern signals for importance, token-set
/// overlap of consecutive sentences for coherence.
pub struct HeuristicScorer;

impl ChunkScorer for HeuristicScorer {
    fn importance(&self, text: &str) -> f32 {
        let mut score = 0.0f32;
        if text.lines().any(heading_like) {
            score += 0.3;
        }
        if text
            .chars()
            .any(|c| c.is_ascii_digit() || matches!(c, '$' | '%' | '€' | '£'))
        {
            score += 0.2;
        }
        let lower = text.to_lowercase();
        if lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| IMPORTANCE_VOCAB.contains(&w))
        {
            score += 0.3;
        }
        if text.contains('?') {
            score += 0.2;
        }
        score.min(1.0)
    }

    fn coherence(&self, text: &str) -> f32 {
        let sets: Vec<HashSet<String>> = policies::sentence_spans(text)
            .iter()
            .map(|s| token_set(&text[s.start..s.end]))
            .filter(|set| !set.is_empty())
            .collect();
        if sets.len() < 2 {
            return 1.0;
        }
        let mut total = 0.0f32;
        let mut pairs = 0usize;
        for pair in sets.windows(2) {
            let smaller = pair[0].len().min(pair[1].len());
            let shared = pair[0].intersection(&pair[1]).count();
            total += shared as f32 / smaller as f32;
            pairs += 1;
        }
        total / pairs as f32
    }
}

/// Compute all derived metadata for one chunk.
pub(crate) fn derive(content: &str, scorer: &dyn ChunkScorer) -> ChunkMetadata {
    ChunkMetadata {
        keywords: keywords(content),
        importance: scorer.importance(content),
        coherence: scorer.coherence(content),
        word_count: content.split_whitespace().count(),
        summary: summary(content),
    }
}

/// Top-10 most frequent words of length >= 4, frequency then alphabetical.
pub fn keywords(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 4)
    {
        *counts.entry(token.to_string()).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(10);
    ranked.into_iter().map(|(word, _)| word).collect()
}

fn summary(text: &str) -> String {
    let first = policies::sentence_spans(text)
        .first()
        .map(|s| &text[s.start..s.end])
        .unwrap_or(text);
    if first.chars().count() <= SUMMARY_MAX_CHARS {
        first.to_string()
    } else {
        first.chars().take(SUMMARY_MAX_CHARS).collect()
    }
}

/// A short line that reads like a heading: ends in ':' or is fully
/// upper-case.
pub(crate) fn heading_like(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > 60 {
        return false;
    }
    if line.ends_with(':') {
        return true;
    }
    let mut has_alpha = false;
    for c in line.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if c.is_lowercase() {
                return false;
            }
        }
    }
    has_alpha
}

pub(crate) fn token_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
