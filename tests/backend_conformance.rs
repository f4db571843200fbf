//! Differential conformance between the default engine and the
//! alternative backend, plus backend introspection.

#![cfg(feature = "serde-backend")]

use stablejson::conformance::{Corpus, DiffHarness, DiffOutcome};
use stablejson::{
    alternative_info, is_backend_available, parse, Backend, Limits, RootShape, Value,
};

// ============================================================================
// Introspection
// ============================================================================

#[test]
fn alternative_backend_is_available_in_this_build() {
    assert!(is_backend_available(Backend::Serde));
    assert!(is_backend_available(Backend::Default));
    assert!(is_backend_available(Backend::FastestAvailable));
}

#[test]
fn info_is_present_exactly_when_available() {
    let info = alternative_info().unwrap();
    assert!(!info.implementations.is_empty());
    assert!(info.implementations.contains(&info.active));
    assert!(info.active.supported);
    assert!(!info.active.name.is_empty());
}

// ============================================================================
// Engine equivalence
// ============================================================================

#[test]
fn both_engines_agree_on_the_builtin_corpus() {
    let corpus = Corpus::builtin().unwrap();
    let report = DiffHarness::new().run(&corpus).unwrap();
    assert!(report.all_passed(), "{}", report.summary());
    // The built-in corpus is chosen to agree exactly, tolerated
    // divergences included.
    assert_eq!(report.tolerated, 0, "{}", report.summary());
}

#[test]
fn engines_build_equal_trees_for_a_nested_document() {
    let input = b"{\"z\": [1, -2, 0.5, \"s\"], \"a\": {\"k\": null}}";
    let ours = parse(input, RootShape::RequireObject, Backend::Default).unwrap();
    let alt = parse(input, RootShape::RequireObject, Backend::Serde).unwrap();
    assert_eq!(ours, alt);
}

#[test]
fn alternative_backend_honors_root_shape_policy() {
    let err = parse(b"[1]", RootShape::RequireObject, Backend::Serde).unwrap_err();
    assert_eq!(err.kind(), stablejson::ErrorKind::Shape);
}

#[test]
fn alternative_backend_failures_are_structural() {
    let err = parse(b"{\"a\":", RootShape::AcceptAnyValue, Backend::Serde).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn fastest_available_parses_like_the_default() {
    let input = b"[true, {\"k\": 1}]";
    let fast = parse(input, RootShape::RequireArray, Backend::FastestAvailable).unwrap();
    let default = parse(input, RootShape::RequireArray, Backend::Default).unwrap();
    assert_eq!(fast, default);
}

// ============================================================================
// Corpus handling
// ============================================================================

#[test]
fn corpus_round_trips_through_a_file() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("stablejson-corpus-{}.json", std::process::id()));
    let corpus = Corpus::builtin().unwrap();
    std::fs::write(
        &path,
        r#"{"format_version": "1", "vectors": [
            {"id": "only", "input": "[1]", "valid": true, "canonical": "[1]"}
        ]}"#,
    )
    .unwrap();
    let loaded = Corpus::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.vectors.len(), 1);
    assert!(loaded.vectors.len() < corpus.vectors.len());
    let report = DiffHarness::with_limits(Limits::standard()).run(&loaded).unwrap();
    assert!(report.all_passed());
    assert!(report.results[0].outcome.is_match());
}

#[test]
fn tolerated_divergence_is_recorded_not_fatal() {
    // Nesting past serde_json's own recursion ceiling: the default
    // engine accepts it, the alternative backend gives up. The boundary
    // contract records the divergence and keeps going.
    let depth = 200;
    let input = "[".repeat(depth) + &"]".repeat(depth);
    let ours = parse(
        input.as_bytes(),
        RootShape::RequireArray,
        Backend::Default,
    );
    assert!(ours.is_ok());

    let corpus_json = format!(
        r#"{{"format_version": "1", "vectors": [
            {{"id": "deep", "input": {input:?}, "valid": true}}
        ]}}"#
    );
    let corpus = Corpus::from_json(&corpus_json).unwrap();
    let report = DiffHarness::new().run(&corpus).unwrap();
    assert!(report.all_passed());
    assert_eq!(report.tolerated, 1);
    assert!(matches!(
        report.results[0].outcome,
        DiffOutcome::Tolerated { .. }
    ));
}

#[test]
fn deep_nesting_difference_shows_engine_independence() {
    // 200 levels: fine for the depth-bounded engine, beyond the black
    // box's ceiling.
    let depth = 200;
    let input = "[".repeat(depth) + &"]".repeat(depth);
    assert!(parse(input.as_bytes(), RootShape::RequireArray, Backend::Default).is_ok());
    assert!(parse(input.as_bytes(), RootShape::RequireArray, Backend::Serde).is_err());
}

#[test]
fn corpus_expected_value_trees() {
    // Spot-check a few vectors directly against the default engine.
    let corpus = Corpus::builtin().unwrap();
    for vector in &corpus.vectors {
        let parsed = parse(
            vector.input.as_bytes(),
            RootShape::AcceptAnyValue,
            Backend::Default,
        );
        assert_eq!(
            parsed.is_ok(),
            vector.valid,
            "vector '{}' disagreed with the engine",
            vector.id
        );
        if vector.id == "number-u64-max" {
            assert_eq!(parsed.unwrap(), Value::UInt(u64::MAX));
        }
    }
}
