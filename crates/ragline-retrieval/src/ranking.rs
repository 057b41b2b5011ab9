//! Relevance re-scoring and greedy near-duplicate diversification over the
//! pooled candidates from all query variants.

use ragline_core::config::SearchConfig;
use ragline_core::types::RankedResult;
use std::collections::HashSet;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Coarse dedup granularity: overlapping chunks share their head, so the
/// first 100 chars collapse near-duplicates to one candidate.
const DEDUP_PREFIX_CHARS: usize = 100;

const TOKEN_MATCH_WEIGHT: f32 = 0.3;
const IMPORTANCE_WEIGHT: f32 = 0.2;
const PHRASE_BONUS: f32 = 0.3;
const LENGTH_PENALTY: f32 = 0.8;
const WORD_COUNT_RANGE: std::ops::RangeInclusive<usize> = 20..=500;

/// Re-score, deduplicate, and diversify the candidate pool.
///
/// Input order is the fused ranking; output is admission order (relevance
/// descending modulo diversity exclusions), capped at `config.limit`.
pub fn rank(pool: Vec<RankedResult>, query: &str, config: &SearchConfig) -> Vec<RankedResult> {
    let mut seen_prefixes: HashSet<u64> = HashSet::new();
    let mut candidates: Vec<RankedResult> = pool
        .into_iter()
        .filter(|r| seen_prefixes.insert(prefix_key(&r.candidate.hit.content)))
        .collect();

    if config.rank {
        for r in &mut candidates {
            r.relevance = relevance(r, query);
        }
        candidates.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    if config.diversify {
        diversify(candidates, config.limit, config.diversify_threshold)
    } else {
        candidates.truncate(config.limit);
        for r in &mut candidates {
            r.admitted = true;
        }
        candidates
    }
}

/// `base_similarity + 0.3·token_overlap + 0.2·importance + 0.3·verbatim`,
/// with a x0.8 penalty outside the useful word-count band, clamped to [0,1].
fn relevance(result: &RankedResult, query: &str) -> f32 {
    let hit = &result.candidate.hit;
    let content_lower = hit.content.to_lowercase();
    let query_lower = query.to_lowercase();

    let query_tokens: HashSet<&str> = query_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let content_tokens: HashSet<&str> = content_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut score = hit.score;
    if !query_tokens.is_empty() {
        let matched = query_tokens.intersection(&content_tokens).count();
        score += TOKEN_MATCH_WEIGHT * matched as f32 / query_tokens.len() as f32;
    }
    score += IMPORTANCE_WEIGHT * hit.importance;
    let phrase = query_lower.trim();
    if !phrase.is_empty() && content_lower.contains(phrase) {
        score += PHRASE_BONUS;
    }
    let words = hit.content.split_whitespace().count();
    if !WORD_COUNT_RANGE.contains(&words) {
        score *= LENGTH_PENALTY;
    }
    score.clamp(0.0, 1.0)
}

/// Greedy selection: the top candidate is always admitted; every later one
/// must stay below the Jaccard threshold against all admitted contents.
fn diversify(candidates: Vec<RankedResult>, cap: usize, threshold: f32) -> Vec<RankedResult> {
    let mut admitted: Vec<RankedResult> = Vec::new();
    let mut admitted_tokens: Vec<HashSet<String>> = Vec::new();
    for mut candidate in candidates {
        if admitted.len() >= cap {
            break;
        }
        let tokens = token_set(&candidate.candidate.hit.content);
        let similar = admitted_tokens
            .iter()
            .any(|existing| jaccard(existing, &tokens) >= threshold);
        if admitted.is_empty() || !similar {
            candidate.admitted = true;
            admitted.push(candidate);
            admitted_tokens.push(tokens);
        }
    }
    admitted
}

/// Token-set Jaccard similarity; identical empty sets count as duplicates.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

fn token_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn prefix_key(content: &str) -> u64 {
    let prefix: String = content.chars().take(DEDUP_PREFIX_CHARS).collect();
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(prefix.as_bytes());
    hasher.finish()
}
