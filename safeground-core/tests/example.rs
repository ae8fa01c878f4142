use std::collections::BTreeMap;

use safeground_core::{Candidate, Domain, ErrorRecord, Example, Outcome, Snippet};
use serde_json::json;

#[test]
fn dataset_rows_deserialize_and_keep_unknown_keys() {
    let raw = json!({
        "prompt": "You are at the beach",
        "advice": "swim during a storm",
        "domain": "nature",
        "label_source": "reddit"
    });

    let example: Example = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(example.domain, Some(Domain::Nature));
    assert!(example.explanation.is_none());
    assert_eq!(example.extra.get("label_source"), Some(&json!("reddit")));

    let back = serde_json::to_value(&example).unwrap();
    assert_eq!(back, raw);
}

#[test]
fn error_shaped_fields_decode_as_failures() {
    let raw = json!({
        "prompt": "p",
        "advice": "a",
        "attribution": {"error": "Response status 500", "google_query": "site:wikipedia.org q"}
    });

    let example: Example = serde_json::from_value(raw).unwrap();
    let record = example.attribution.as_ref().and_then(Outcome::failure).unwrap();
    assert_eq!(record.error, "Response status 500");
    assert_eq!(record.inputs.get("google_query"), Some(&json!("site:wikipedia.org q")));
}

#[test]
fn success_shaped_fields_decode_as_payloads() {
    let raw = json!({
        "prompt": "p",
        "advice": "a",
        "attribution": [{"source": "https://cdc.gov/x", "content": "c"}],
        "explanation": [{
            "completion": "No",
            "log_probability": -0.1,
            "first_token_distribution": {" No": -0.05}
        }]
    });

    let example: Example = serde_json::from_value(raw).unwrap();
    assert_eq!(
        example.attribution,
        Some(Outcome::Success(vec![Snippet {
            source: "https://cdc.gov/x".to_string(),
            content: "c".to_string(),
        }]))
    );
    let candidate = example.explanation.as_ref().unwrap().first_candidate().unwrap();
    assert_eq!(candidate.completion, "No");
    assert_eq!(candidate.first_token_distribution.get(" No"), Some(&-0.05));
}

#[test]
fn error_record_flattens_echoed_inputs() {
    let record = ErrorRecord::new("boom").with("max_tokens", 128).with("model", "text-ada-001");
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({"error": "boom", "max_tokens": 128, "model": "text-ada-001"})
    );
}

#[test]
fn foveation_text_reads_first_candidate() {
    let mut example = Example::new("p", "a");
    assert_eq!(example.foveation_text(), None);

    example.foveation = Some(Outcome::Success(vec![Candidate {
        completion: "lightning".to_string(),
        log_probability: -1.0,
        first_token_distribution: BTreeMap::new(),
    }]));
    assert_eq!(example.foveation_text(), Some("lightning"));

    example.foveation = Some(Outcome::Success(vec![]));
    assert_eq!(example.foveation_text(), None);
}
