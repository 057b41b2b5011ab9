use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Layered configuration loader.
///
/// Merges `config.toml` + `config.<env>.toml` + `RAGLINE_*` env vars, where
/// `<env>` comes from `RUST_ENV` (default "dev").
pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("RAGLINE_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}

/// How the search entry combines the two retrieval paths.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Client-side fusion of separate vector and lexical lists.
    #[default]
    Fused,
    /// Single store-side blended query (`query_hybrid`).
    StoreBlended,
}

/// Per-call search settings. Passed by value into every call and never
/// mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Final result count cap.
    pub limit: usize,
    /// Candidate pool cap before ranking.
    pub pool_cap: usize,
    /// Vector share of the fused score. `None` selects the weight from the
    /// query shape (quoted phrase / number / acronym favor lexical).
    pub vector_weight: Option<f32>,
    /// Jaccard bound for the diversifier.
    pub diversify_threshold: f32,
    /// How many query variants are actually searched.
    pub max_variants: usize,
    pub mode: SearchMode,
    pub rank: bool,
    pub diversify: bool,
    pub expand: bool,
    pub synthesize: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            pool_cap: 50,
            vector_weight: None,
            diversify_threshold: 0.8,
            max_variants: 3,
            mode: SearchMode::Fused,
            rank: true,
            diversify: true,
            expand: true,
            synthesize: true,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidConfig("limit must be positive".into()));
        }
        if self.pool_cap < self.limit {
            return Err(Error::InvalidConfig(format!(
                "pool_cap {} is smaller than limit {}",
                self.pool_cap, self.limit
            )));
        }
        if let Some(w) = self.vector_weight {
            if !(0.0..=1.0).contains(&w) {
                return Err(Error::InvalidConfig(format!(
                    "vector_weight {w} outside [0,1]"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.diversify_threshold) {
            return Err(Error::InvalidConfig(format!(
                "diversify_threshold {} outside [0,1]",
                self.diversify_threshold
            )));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
