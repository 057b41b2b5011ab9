//! Query expansion through the text-generation collaborator.
//!
//! Strictly advisory: any failure degrades to the original query alone and
//! must never abort the overall search.

use ragline_core::traits::TextGenerator;
use ragline_core::types::Message;

const MAX_EXTRA_VARIANTS: usize = 4;
const EXPANSION_MAX_TOKENS: usize = 256;
const EXPANSION_TEMPERATURE: f32 = 0.7;

pub struct QueryExpander<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> QueryExpander<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Returns the verbatim query first, followed by up to 4 variants,
    /// case-insensitive-deduplicated.
    pub async fn expand(&self, query: &str) -> Vec<String> {
        let mut variants = vec![query.to_string()];
        let messages = [
            Message::system(
                "You rephrase search queries. Given a query, produce up to 4 \
                 alternative phrasings that could retrieve additional relevant \
                 passages. Output one variant per line, nothing else.",
            ),
            Message::user(query.to_string()),
        ];
        match self
            .generator
            .generate(&messages, EXPANSION_MAX_TOKENS, EXPANSION_TEMPERATURE)
            .await
        {
            Ok(response) => {
                for line in response.lines() {
                    if variants.len() > MAX_EXTRA_VARIANTS {
                        break;
                    }
                    let variant = clean_variant(line);
                    if variant.is_empty() {
                        continue;
                    }
                    let lower = variant.to_lowercase();
                    if variants.iter().any(|v| v.to_lowercase() == lower) {
                        continue;
                    }
                    variants.push(variant);
                }
            }
            Err(e) => {
                tracing::warn!("query expansion failed, searching original only: {e}");
            }
        }
        variants
    }
}

/// Strip list markers ("- ", "1. ") and surrounding quotes the generator
/// tends to add.
fn clean_variant(line: &str) -> String {
    let mut s = line.trim();
    s = s.trim_start_matches(['-', '*', '•']).trim_start();
    if let Some(rest) = s.split_once(". ").and_then(|(head, rest)| {
        head.chars().all(|c| c.is_ascii_digit()).then_some(rest)
    }) {
        s = rest.trim();
    }
    s.trim_matches('"').trim().to_string()
}
