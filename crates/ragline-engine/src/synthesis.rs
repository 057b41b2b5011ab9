//! Grounded answer synthesis over the final ranked results.

use ragline_core::traits::TextGenerator;
use ragline_core::types::{Message, RankedResult};
use tracing::warn;

/// Per-source context budget, in characters.
const BLOCK_MAX_CHARS: usize = 1500;
const ANSWER_MAX_TOKENS: usize = 512;
const ANSWER_TEMPERATURE: f32 = 0.2;

const INSTRUCTION: &str = "Answer the question using only the supplied context. \
If sources contradict each other, point out the disagreement and reconcile what \
can be reconciled. Cite the source identifiers you relied on in square brackets, \
and cite no identifier that is not in the context. If the context does not \
contain the answer, say so.";

/// Groups results by source document, builds a bounded context block per
/// source, and asks the generator for an answer constrained to that
/// context. `None` on empty input or collaborator failure; the caller
/// supplies any user-facing fallback text.
pub async fn synthesize(
    generator: &dyn TextGenerator,
    results: &[RankedResult],
    query: &str,
) -> Option<String> {
    if results.is_empty() {
        return None;
    }

    let mut blocks: Vec<(String, String)> = Vec::new();
    for result in results {
        let hit = &result.candidate.hit;
        let idx = match blocks.iter().position(|(id, _)| id == &hit.doc_id) {
            Some(i) => i,
            None => {
                blocks.push((hit.doc_id.clone(), String::new()));
                blocks.len() - 1
            }
        };
        let block = &mut blocks[idx].1;
        let used = block.chars().count();
        if used >= BLOCK_MAX_CHARS {
            continue;
        }
        if !block.is_empty() {
            block.push('\n');
        }
        block.extend(hit.content.chars().take(BLOCK_MAX_CHARS - used));
    }

    let mut context = String::new();
    for (doc_id, block) in &blocks {
        context.push_str(&format!("[source: {doc_id}]\n{block}\n\n"));
    }

    let messages = [
        Message::system(INSTRUCTION),
        Message::user(format!("Context:\n\n{context}Question: {query}")),
    ];
    match generator
        .generate(&messages, ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE)
        .await
    {
        Ok(answer) => {
            let answer = answer.trim();
            if answer.is_empty() {
                None
            } else {
                Some(answer.to_string())
            }
        }
        Err(e) => {
            warn!("answer synthesis failed, returning results without an answer: {e}");
            None
        }
    }
}
