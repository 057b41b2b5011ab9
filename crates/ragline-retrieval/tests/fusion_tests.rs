use ragline_core::types::{RetrievalMethod, StoreHit};
use ragline_retrieval::{auto_vector_weight, fuse};

fn hit(doc: &str, seq: usize, score: f32) -> StoreHit {
    StoreHit {
        doc_id: doc.to_string(),
        seq,
        content: format!("{doc} chunk {seq}"),
        importance: 0.0,
        score,
    }
}

#[test]
fn fusing_empty_lists_yields_nothing() {
    assert!(fuse(&[], &[], 0.7, 10).is_empty());
}

#[test]
fn self_fusion_at_full_vector_weight_preserves_order() {
    let hits = vec![hit("a", 0, 0.9), hit("b", 0, 0.5), hit("c", 0, 0.1)];
    let fused = fuse(&hits, &hits, 1.0, 10);
    let ids: Vec<&str> = fused.iter().map(|r| r.candidate.hit.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    for r in &fused {
        assert_eq!(r.candidate.method, RetrievalMethod::Combined);
    }
}

#[test]
fn lexical_contribution_lifts_shared_chunks() {
    // b sits in both lists; once the lexical side is added it overtakes a,
    // and c only appears when the limit leaves a third slot.
    let vector = vec![hit("a", 0, 0.9), hit("b", 0, 0.5)];
    let lexical = vec![hit("b", 0, 10.0), hit("c", 0, 5.0)];

    let top2 = fuse(&vector, &lexical, 0.7, 2);
    let ids: Vec<&str> = top2.iter().map(|r| r.candidate.hit.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let top3 = fuse(&vector, &lexical, 0.7, 3);
    let ids: Vec<&str> = top3.iter().map(|r| r.candidate.hit.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(top3[0].candidate.method, RetrievalMethod::Combined);
    assert_eq!(top3[1].candidate.method, RetrievalMethod::Vector);
    assert_eq!(top3[2].candidate.method, RetrievalMethod::Lexical);
}

#[test]
fn lexical_scores_normalize_by_list_maximum() {
    let lexical = vec![hit("x", 0, 10.0), hit("y", 0, 5.0)];
    let fused = fuse(&[], &lexical, 0.0, 10);
    assert!((fused[0].norm_lexical - 1.0).abs() < 1e-6);
    assert!((fused[1].norm_lexical - 0.5).abs() < 1e-6);
}

#[test]
fn zero_maximum_list_contributes_nothing() {
    let vector = vec![hit("a", 0, 0.0), hit("b", 0, 0.0)];
    let lexical = vec![hit("b", 0, 3.0)];
    let fused = fuse(&vector, &lexical, 0.5, 10);
    assert_eq!(fused[0].candidate.hit.doc_id, "b");
    for r in &fused {
        assert!((r.norm_vector - 0.0).abs() < f32::EPSILON);
    }
}

#[test]
fn ties_break_by_vector_rank_then_insertion() {
    let vector = vec![hit("a", 0, 0.5), hit("b", 0, 0.5)];
    let fused = fuse(&vector, &[], 1.0, 10);
    let ids: Vec<&str> = fused.iter().map(|r| r.candidate.hit.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"], "equal fused scores keep vector order");
}

#[test]
fn truncates_to_limit() {
    let vector: Vec<StoreHit> = (0..20).map(|i| hit("d", i, 1.0 - i as f32 * 0.01)).collect();
    assert_eq!(fuse(&vector, &[], 1.0, 5).len(), 5);
}

#[test]
fn auto_weight_classifies_query_shapes() {
    assert!((auto_vector_weight("\"exact phrase\" search") - 0.3).abs() < f32::EPSILON);
    assert!((auto_vector_weight("error 404 on upload") - 0.3).abs() < f32::EPSILON);
    assert!((auto_vector_weight("configure DNS records") - 0.3).abs() < f32::EPSILON);
    assert!((auto_vector_weight("how does water filtration work") - 0.8).abs() < f32::EPSILON);
    assert!((auto_vector_weight("what is a root cellar") - 0.8).abs() < f32::EPSILON);
    assert!((auto_vector_weight("storing seeds over winter") - 0.7).abs() < f32::EPSILON);
}
