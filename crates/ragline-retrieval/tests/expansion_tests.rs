use async_trait::async_trait;
use ragline_core::error::{Error, Result};
use ragline_core::traits::TextGenerator;
use ragline_core::types::Message;
use ragline_retrieval::QueryExpander;

struct ScriptedGenerator {
    response: String,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _messages: &[Message], _max_tokens: usize, _temperature: f32) -> Result<String> {
        Ok(self.response.clone())
    }
}

struct BrokenGenerator;

#[async_trait]
impl TextGenerator for BrokenGenerator {
    async fn generate(&self, _messages: &[Message], _max_tokens: usize, _temperature: f32) -> Result<String> {
        Err(Error::Generation("model unavailable".into()))
    }
}

#[tokio::test]
async fn original_query_always_comes_first() {
    let gen = ScriptedGenerator {
        response: "how to store rain water\nrainwater storage methods".into(),
    };
    let variants = QueryExpander::new(&gen).expand("collecting rainwater").await;
    assert_eq!(variants[0], "collecting rainwater");
    assert_eq!(variants.len(), 3);
}

#[tokio::test]
async fn variants_are_capped_and_deduplicated() {
    let gen = ScriptedGenerator {
        response: "1. Storing Water\n2. storing water\n3. water storage\n4. STORING WATER\n5. keeping water\n6. water reserves\n7. extra beyond cap".into(),
    };
    let variants = QueryExpander::new(&gen).expand("storing water").await;
    // original + at most 4, case-insensitive-deduplicated against all
    assert_eq!(variants[0], "storing water");
    assert!(variants.len() <= 5);
    let mut lowered: Vec<String> = variants.iter().map(|v| v.to_lowercase()).collect();
    lowered.sort();
    lowered.dedup();
    assert_eq!(lowered.len(), variants.len(), "no case-insensitive duplicates");
}

#[tokio::test]
async fn list_markers_and_quotes_are_stripped() {
    let gen = ScriptedGenerator {
        response: "- \"drying herbs indoors\"\n* herb preservation".into(),
    };
    let variants = QueryExpander::new(&gen).expand("preserving herbs").await;
    assert!(variants.contains(&"drying herbs indoors".to_string()), "{variants:?}");
    assert!(variants.contains(&"herb preservation".to_string()));
}

#[tokio::test]
async fn collaborator_failure_degrades_to_original_only() {
    let variants = QueryExpander::new(&BrokenGenerator).expand("smoking fish").await;
    assert_eq!(variants, vec!["smoking fish".to_string()]);
}
