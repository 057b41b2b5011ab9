//! Score-normalization-and-merge of one vector list and one lexical list
//! into a single ranking, keyed by `(doc_id, seq)`.

use ragline_core::types::{CandidateResult, RankedResult, RetrievalMethod, StoreHit};
use std::collections::HashMap;

struct Entry {
    hit: StoreHit,
    norm_vector: f32,
    norm_lexical: f32,
    vec_rank: Option<usize>,
    lex_rank: Option<usize>,
    order: usize,
}

/// Fuse two already-fetched ranked lists into one.
///
/// Each list is normalized by its own maximum; similarity lists that are
/// already in [0,1] pass through untouched (the divisor is never pushed
/// below 1.0, so a certainty of 0.5 stays 0.5 rather than being inflated
/// toward the list leader). A list with a zero or absent maximum
/// contributes 0 for all its members. Fused score is
/// `w * norm_vector + (1 - w) * norm_lexical`, with 0 for the side a chunk
/// is missing from. Ties break by vector rank, then lexical rank, then
/// insertion order.
pub fn fuse(
    vector_hits: &[StoreHit],
    lexical_hits: &[StoreHit],
    vector_weight: f32,
    limit: usize,
) -> Vec<RankedResult> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut index: HashMap<(String, usize), usize> = HashMap::new();

    let v_div = divisor(vector_hits);
    for (rank, hit) in vector_hits.iter().enumerate() {
        let norm = v_div.map_or(0.0, |d| hit.score / d);
        let key = (hit.doc_id.clone(), hit.seq);
        let order = entries.len();
        let slot = *index.entry(key).or_insert(order);
        if slot == order {
            entries.push(Entry {
                hit: hit.clone(),
                norm_vector: norm,
                norm_lexical: 0.0,
                vec_rank: Some(rank),
                lex_rank: None,
                order,
            });
        }
    }

    let l_div = divisor(lexical_hits);
    for (rank, hit) in lexical_hits.iter().enumerate() {
        let norm = l_div.map_or(0.0, |d| hit.score / d);
        let key = (hit.doc_id.clone(), hit.seq);
        let order = entries.len();
        let slot = *index.entry(key).or_insert(order);
        if slot == order {
            entries.push(Entry {
                hit: hit.clone(),
                norm_vector: 0.0,
                norm_lexical: norm,
                vec_rank: None,
                lex_rank: Some(rank),
                order,
            });
        } else {
            let entry = &mut entries[slot];
            entry.norm_lexical = norm;
            if entry.lex_rank.is_none() {
                entry.lex_rank = Some(rank);
            }
        }
    }

    entries.sort_by(|a, b| {
        let fa = fused(a, vector_weight);
        let fb = fused(b, vector_weight);
        fb.partial_cmp(&fa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| rank_key(a.vec_rank).cmp(&rank_key(b.vec_rank)))
            .then_with(|| rank_key(a.lex_rank).cmp(&rank_key(b.lex_rank)))
            .then_with(|| a.order.cmp(&b.order))
    });
    entries.truncate(limit);

    entries
        .into_iter()
        .map(|e| {
            let score = fused(&e, vector_weight);
            let method = match (e.vec_rank, e.lex_rank) {
                (Some(_), Some(_)) => RetrievalMethod::Combined,
                (Some(_), None) => RetrievalMethod::Vector,
                _ => RetrievalMethod::Lexical,
            };
            let raw_score = e.hit.score;
            let rank = e.vec_rank.or(e.lex_rank).unwrap_or(0);
            RankedResult {
                candidate: CandidateResult { hit: e.hit, method, raw_score, rank },
                norm_vector: e.norm_vector,
                norm_lexical: e.norm_lexical,
                fused: score,
                relevance: score,
                admitted: false,
            }
        })
        .collect()
}

fn fused(e: &Entry, w: f32) -> f32 {
    w * e.norm_vector + (1.0 - w) * e.norm_lexical
}

fn rank_key(r: Option<usize>) -> usize {
    r.unwrap_or(usize::MAX)
}

fn divisor(hits: &[StoreHit]) -> Option<f32> {
    let max = hits.iter().map(|h| h.score).fold(f32::MIN, f32::max);
    if hits.is_empty() || max <= 0.0 {
        None
    } else {
        Some(max.max(1.0))
    }
}

/// Pick the vector share from the query shape when the caller asked for
/// automatic weighting: exact-match cues (quoted phrase, standalone number,
/// multi-letter acronym) favor the lexical path; open questions favor the
/// vector path.
pub fn auto_vector_weight(query: &str) -> f32 {
    if query.matches('"').count() >= 2 {
        return 0.3;
    }
    for token in query.split_whitespace() {
        let word: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
        if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            return 0.3;
        }
        if word.chars().count() >= 2 && word.chars().all(|c| c.is_ascii_uppercase()) {
            return 0.3;
        }
    }
    let lower = query.to_lowercase();
    if lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| matches!(w, "what" | "how" | "why"))
    {
        return 0.8;
    }
    0.7
}
