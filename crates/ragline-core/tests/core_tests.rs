use ragline_core::config::{expand_path, SearchConfig, SearchMode};
use ragline_core::error::Error;

#[test]
fn search_config_defaults_are_valid() {
    let cfg = SearchConfig::default();
    cfg.validate().expect("defaults validate");
    assert_eq!(cfg.limit, 10);
    assert_eq!(cfg.mode, SearchMode::Fused);
    assert!(cfg.vector_weight.is_none(), "auto weighting by default");
}

#[test]
fn search_config_rejects_zero_limit() {
    let cfg = SearchConfig { limit: 0, ..SearchConfig::default() };
    match cfg.validate() {
        Err(Error::InvalidConfig(_)) => {}
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn search_config_rejects_out_of_range_weight() {
    let cfg = SearchConfig { vector_weight: Some(1.5), ..SearchConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn search_config_rejects_pool_smaller_than_limit() {
    let cfg = SearchConfig { limit: 20, pool_cap: 5, ..SearchConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn expand_path_passes_plain_paths_through() {
    assert_eq!(expand_path("/tmp/data"), std::path::PathBuf::from("/tmp/data"));
}
