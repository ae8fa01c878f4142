use safeground::prelude::*;

#[test]
fn prelude_names_the_pipeline_surface() {
    let model: ModelId = "gpt_babbage-001".parse().unwrap();
    let key = StoreKey::new(Phase::Attribution, model, true)
        .with_source(Some(AttributionSource::GoogleCredible));
    assert_eq!(
        key.file_stem(),
        "attribution_gpt_babbage-001_safe_google_credible"
    );
}

#[tokio::test]
async fn evaluation_without_tokenizer_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(ExampleStore::new(dir.path(), "f"), PipelineConfig::default());
    let request = PhaseRequest::new(Phase::Evaluation, "gpt_ada-001".parse().unwrap(), true)
        .with_baseline(true);

    let err = pipeline.run(&request).await.unwrap_err();
    assert!(matches!(err, SafegroundError::InvalidConfig(_)));
}
