use ragline_core::config::SearchConfig;
use ragline_core::types::{CandidateResult, RankedResult, RetrievalMethod, StoreHit};
use ragline_retrieval::rank;
use ragline_retrieval::ranking::jaccard;
use std::collections::HashSet;

fn result(doc: &str, seq: usize, content: &str, score: f32, importance: f32) -> RankedResult {
    let hit = StoreHit {
        doc_id: doc.to_string(),
        seq,
        content: content.to_string(),
        importance,
        score,
    };
    RankedResult {
        candidate: CandidateResult { hit, method: RetrievalMethod::Combined, raw_score: score, rank: 0 },
        norm_vector: score,
        norm_lexical: 0.0,
        fused: score,
        relevance: score,
        admitted: false,
    }
}

fn wordy(prefix: &str) -> String {
    // Keeps word counts inside [20,500] so no length penalty applies.
    format!("{prefix} {}", "filler words keep this chunk inside the accepted length band for scoring purposes today".repeat(2))
}

#[test]
fn relevance_is_clamped_to_unit_interval() {
    let pool = vec![result("d", 0, &wordy("water filtration basics water water"), 50.0, 1.0)];
    let ranked = rank(pool, "water filtration", &SearchConfig::default());
    assert_eq!(ranked.len(), 1);
    assert!(ranked[0].relevance <= 1.0 && ranked[0].relevance >= 0.0);

    let pool = vec![result("d", 0, &wordy("nothing related"), -5.0, 0.0)];
    let ranked = rank(pool, "water filtration", &SearchConfig::default());
    assert!(ranked[0].relevance >= 0.0);
}

#[test]
fn near_duplicate_prefixes_collapse_to_first_occurrence() {
    let shared = "This exact opening paragraph repeats across overlapping chunks and runs well past one hundred characters so the prefix comparison sees identical text.";
    let pool = vec![
        result("d", 0, &format!("{shared} tail one"), 0.9, 0.0),
        result("d", 1, &format!("{shared} tail two"), 0.8, 0.0),
        result("e", 0, &wordy("a completely different passage about gardens"), 0.7, 0.0),
    ];
    let ranked = rank(pool, "anything", &SearchConfig { diversify: false, ..SearchConfig::default() });
    assert_eq!(ranked.len(), 2, "duplicate prefix dropped");
    assert_eq!(ranked.iter().filter(|r| r.candidate.hit.doc_id == "d").count(), 1);
}

#[test]
fn verbatim_phrase_outranks_token_scatter() {
    let pool = vec![
        result("scatter", 0, &wordy("filtration of water is discussed loosely here"), 0.5, 0.0),
        result("exact", 0, &wordy("the guide to water filtration explains the process"), 0.5, 0.0),
    ];
    let ranked = rank(pool, "water filtration", &SearchConfig::default());
    assert_eq!(ranked[0].candidate.hit.doc_id, "exact");
}

#[test]
fn short_chunks_are_penalized() {
    let pool = vec![
        result("short", 0, "water filtration", 0.6, 0.0),
        result("long", 0, &wordy("water filtration overview"), 0.6, 0.0),
    ];
    let ranked = rank(pool, "irrelevant query words", &SearchConfig::default());
    assert_eq!(ranked[0].candidate.hit.doc_id, "long");
}

#[test]
fn diversifier_admits_top_and_bounds_similarity() {
    let cfg = SearchConfig { limit: 10, diversify_threshold: 0.8, ..SearchConfig::default() };
    let pool = vec![
        result("a", 0, &wordy("rainwater collection from rooftops into barrels"), 0.9, 0.0),
        // Same token set as `a` modulo one word: above threshold, excluded.
        result("b", 0, &wordy("rainwater collection from rooftops into barrels again"), 0.85, 0.0),
        result("c", 0, &wordy("preserving vegetables through winter fermentation"), 0.8, 0.0),
    ];
    let ranked = rank(pool, "water storage", &cfg);
    assert!(ranked.iter().all(|r| r.admitted));
    assert!(ranked.iter().any(|r| r.candidate.hit.doc_id == "a"), "top candidate always admitted");
    let ids: Vec<&str> = ranked.iter().map(|r| r.candidate.hit.doc_id.as_str()).collect();
    assert!(!ids.contains(&"b"), "near-duplicate of an admitted result is excluded");
    assert!(ids.contains(&"c"));
}

#[test]
fn diversifier_respects_the_limit() {
    let cfg = SearchConfig { limit: 2, pool_cap: 50, ..SearchConfig::default() };
    let pool = vec![
        result("a", 0, &wordy("solar panels and battery banks for cabins"), 0.9, 0.0),
        result("b", 0, &wordy("wood stoves and chimney maintenance schedules"), 0.8, 0.0),
        result("c", 0, &wordy("root cellars keep produce cool in summer"), 0.7, 0.0),
    ];
    let ranked = rank(pool, "offgrid power", &cfg);
    assert_eq!(ranked.len(), 2);
}

#[test]
fn jaccard_matches_hand_computed_values() {
    let a: HashSet<String> = ["water", "storage", "barrel"].iter().map(|s| s.to_string()).collect();
    let b: HashSet<String> = ["water", "storage", "tank"].iter().map(|s| s.to_string()).collect();
    assert!((jaccard(&a, &b) - 0.5).abs() < 1e-6);
    let empty: HashSet<String> = HashSet::new();
    assert!((jaccard(&empty, &empty) - 1.0).abs() < 1e-6);
}
