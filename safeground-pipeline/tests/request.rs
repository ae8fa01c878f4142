use std::path::PathBuf;
use std::time::Duration;

use safeground_core::{Domain, SafegroundError};
use safeground_pipeline::{ModelId, Phase, PhaseRequest, PipelineConfig, PipelineOptions};
use safeground_retrieval::AttributionSource;

fn request(phase: Phase, model: &str) -> PhaseRequest {
    PhaseRequest::new(phase, model.parse::<ModelId>().unwrap(), true)
}

fn source(name: &str) -> Option<String> {
    Some(name.to_string())
}

#[test]
fn attribution_needs_a_known_source() {
    assert!(request(Phase::Attribution, "gpt_davinci-003").validate().is_err());
    assert!(request(Phase::Attribution, "gpt_davinci-003")
        .with_attribution_source(source("bing"))
        .validate()
        .is_err());
    assert!(request(Phase::Attribution, "gpt_davinci-003")
        .with_attribution_source(source("google_vanilla"))
        .validate()
        .is_ok());
}

#[test]
fn rationalization_needs_count_and_source() {
    let base = request(Phase::Rationalization, "gpt_curie-001");
    assert!(base.clone().with_num_sources(Some(3)).validate().is_err());
    assert!(base
        .clone()
        .with_attribution_source(source("wikipedia"))
        .validate()
        .is_err());
    assert!(base
        .clone()
        .with_num_sources(Some(10))
        .with_attribution_source(source("wikipedia"))
        .validate()
        .is_err());

    let ok = base
        .with_num_sources(Some(3))
        .with_attribution_source(source("wikipedia"));
    assert!(ok.validate().is_ok());
    assert_eq!(ok.source().unwrap(), Some(AttributionSource::Wikipedia));
}

#[test]
fn chat_models_only_run_the_baseline() {
    assert!(request(Phase::Baseline, "chat_turbo").validate().is_ok());
    let err = request(Phase::Foveation, "chat_turbo").validate().unwrap_err();
    assert!(matches!(err, SafegroundError::InvalidConfig(_)));
}

#[test]
fn evaluation_options_are_optional() {
    assert!(request(Phase::Evaluation, "gpt_ada-001")
        .with_baseline(true)
        .validate()
        .is_ok());
}

#[test]
fn options_override_defaults() {
    let config = PipelineConfig::default();
    assert_eq!(config.concurrency, 1);
    assert_eq!(config.num_examples, 16);
    assert!(!config.test);

    let merged = config.merge(&PipelineOptions {
        concurrency: Some(0),
        call_timeout: Some(Duration::from_secs(30)),
        num_examples: Some(4),
        domain: Some(Domain::Medical),
        few_shot_dir: Some(PathBuf::from("/tmp/shots")),
        ..PipelineOptions::default()
    });
    assert_eq!(merged.concurrency, 1);
    assert_eq!(merged.call_timeout, Some(Duration::from_secs(30)));
    assert_eq!(merged.num_examples, 4);
    assert_eq!(merged.domain, Some(Domain::Medical));
    assert_eq!(merged.few_shot_dir, PathBuf::from("/tmp/shots"));
    assert!(!merged.test);
}

#[test]
fn phases_map_from_driver_indices() {
    assert_eq!(Phase::from_index(0), Some(Phase::Baseline));
    assert_eq!(Phase::from_index(3), Some(Phase::Rationalization));
    assert_eq!(Phase::from_index(5), None);
}
