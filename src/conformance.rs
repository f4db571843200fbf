//! Differential conformance testing between the default engine and the
//! alternative backend.
//!
//! The harness runs a corpus of test vectors through both engines and
//! compares their output as raw canonical bytes, not parsed structures.
//! Failure policy follows the backend boundary contract: a default-engine
//! failure on a vector marked valid (or an acceptance of one marked
//! invalid) aborts the run, while an alternative-backend failure on the
//! same vector is recorded as a tolerated divergence and the run
//! continues — the black-box engine is allowed to be stricter or looser
//! at the margins, this engine is not.

use serde::Deserialize;

use crate::backend::{parse_with, Backend};
use crate::limits::Limits;
use crate::serializer;
use crate::value::Value;

/// Result type for conformance operations.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors that can occur during a conformance run.
#[derive(Debug)]
pub enum ConformanceError {
    /// The corpus could not be loaded or decoded.
    CorpusLoad(String),
    /// The default engine disagreed with a corpus expectation. Always
    /// fatal to the run.
    DefaultEngine {
        /// Vector identifier.
        id: String,
        /// What went wrong.
        message: String,
    },
    /// The alternative backend is not compiled into this build.
    AlternativeUnavailable,
}

impl std::fmt::Display for ConformanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorpusLoad(msg) => write!(f, "corpus load failed: {msg}"),
            Self::DefaultEngine { id, message } => {
                write!(f, "default engine failed vector '{id}': {message}")
            }
            Self::AlternativeUnavailable => {
                write!(f, "alternative backend not available in this build")
            }
        }
    }
}

impl std::error::Error for ConformanceError {}

/// A single corpus vector.
#[derive(Debug, Clone, Deserialize)]
pub struct TestVector {
    /// Unique identifier for reporting.
    pub id: String,
    /// The JSON document under test.
    pub input: String,
    /// Whether the document is well-formed.
    pub valid: bool,
    /// Expected canonical compact serialization, for valid vectors.
    #[serde(default)]
    pub canonical: Option<String>,
}

/// A corpus of test vectors.
#[derive(Debug, Deserialize)]
pub struct Corpus {
    /// Corpus format version.
    pub format_version: String,
    /// The vectors.
    pub vectors: Vec<TestVector>,
}

impl Corpus {
    /// Decode a corpus from JSON text.
    pub fn from_json(text: &str) -> ConformanceResult<Self> {
        serde_json::from_str(text).map_err(|e| ConformanceError::CorpusLoad(e.to_string()))
    }

    /// Load a corpus from a file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> ConformanceResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConformanceError::CorpusLoad(e.to_string()))?;
        Self::from_json(&text)
    }

    /// The corpus embedded in this crate.
    pub fn builtin() -> ConformanceResult<Self> {
        Self::from_json(BUILTIN_CORPUS)
    }
}

/// Outcome of one vector.
#[derive(Debug)]
pub enum DiffOutcome {
    /// Both engines agreed with the corpus expectation.
    Match,
    /// The alternative backend diverged in a direction the boundary
    /// contract tolerates; the divergence is recorded, the run goes on.
    Tolerated {
        /// What the alternative backend did.
        reason: String,
    },
    /// Both engines produced a tree but the canonical bytes differ.
    Mismatch {
        /// Canonical bytes from the default engine.
        ours: String,
        /// Canonical bytes from the alternative backend.
        alt: String,
    },
}

impl DiffOutcome {
    /// True if this vector matched.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Per-vector record in a run report.
#[derive(Debug)]
pub struct VectorResult {
    /// Vector identifier.
    pub id: String,
    /// What happened.
    pub outcome: DiffOutcome,
}

/// Results of a full conformance run.
#[derive(Debug, Default)]
pub struct DiffReport {
    /// Vectors where both engines agreed.
    pub matched: usize,
    /// Tolerated alternative-backend divergences.
    pub tolerated: usize,
    /// Hard mismatches between the engines.
    pub mismatched: usize,
    /// Per-vector details.
    pub results: Vec<VectorResult>,
}

impl DiffReport {
    /// True if no hard mismatch was recorded.
    pub fn all_passed(&self) -> bool {
        self.mismatched == 0
    }

    /// Total vectors examined.
    pub fn total(&self) -> usize {
        self.matched + self.tolerated + self.mismatched
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} matched, {} tolerated, {} mismatched (total: {})",
            self.matched,
            self.tolerated,
            self.mismatched,
            self.total()
        )
    }

    fn record(&mut self, id: &str, outcome: DiffOutcome) {
        match &outcome {
            DiffOutcome::Match => self.matched += 1,
            DiffOutcome::Tolerated { .. } => self.tolerated += 1,
            DiffOutcome::Mismatch { .. } => self.mismatched += 1,
        }
        self.results.push(VectorResult {
            id: id.to_string(),
            outcome,
        });
    }
}

/// Differential harness comparing the default engine against the
/// alternative backend.
#[derive(Debug, Clone, Copy)]
pub struct DiffHarness {
    limits: Limits,
}

impl DiffHarness {
    /// Harness with standard limits.
    pub fn new() -> Self {
        Self {
            limits: Limits::standard(),
        }
    }

    /// Harness with custom limits applied to both engines.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Run every vector in the corpus.
    pub fn run(&self, corpus: &Corpus) -> ConformanceResult<DiffReport> {
        if !crate::backend::is_backend_available(Backend::Serde) {
            return Err(ConformanceError::AlternativeUnavailable);
        }
        let mut report = DiffReport::default();
        for vector in &corpus.vectors {
            let outcome = self.run_vector(vector)?;
            report.record(&vector.id, outcome);
        }
        Ok(report)
    }

    fn run_vector(&self, vector: &TestVector) -> ConformanceResult<DiffOutcome> {
        let input = vector.input.as_bytes();
        let ours = parse_with(input, self.limits, Backend::Default);
        let alt = parse_with(input, self.limits, Backend::Serde);

        let ours = match (vector.valid, ours) {
            (true, Err(e)) => {
                return Err(ConformanceError::DefaultEngine {
                    id: vector.id.clone(),
                    message: format!("rejected a valid document: {e}"),
                });
            }
            (false, Ok(_)) => {
                return Err(ConformanceError::DefaultEngine {
                    id: vector.id.clone(),
                    message: "accepted an invalid document".to_string(),
                });
            }
            (false, Err(_)) => {
                // Correctly rejected; the alternative backend should
                // reject too, but looseness there is tolerated.
                return Ok(match alt {
                    Err(_) => DiffOutcome::Match,
                    Ok(_) => DiffOutcome::Tolerated {
                        reason: "alternative backend accepted an invalid document".to_string(),
                    },
                });
            }
            (true, Ok(value)) => value,
        };

        let ours_text = canonical_text(&ours)?;
        if let Some(expected) = &vector.canonical {
            if &ours_text != expected {
                return Err(ConformanceError::DefaultEngine {
                    id: vector.id.clone(),
                    message: format!(
                        "canonical output '{ours_text}' differs from expected '{expected}'"
                    ),
                });
            }
        }

        match alt {
            Err(e) => Ok(DiffOutcome::Tolerated {
                reason: format!("alternative backend failed: {e}"),
            }),
            Ok(alt_value) => {
                let alt_text = canonical_text(&alt_value)?;
                if alt_text == ours_text {
                    Ok(DiffOutcome::Match)
                } else {
                    Ok(DiffOutcome::Mismatch {
                        ours: ours_text,
                        alt: alt_text,
                    })
                }
            }
        }
    }
}

impl Default for DiffHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact canonical bytes of a tree, as UTF-8 text.
fn canonical_text(value: &Value) -> ConformanceResult<String> {
    let bytes = serializer::serialize(Some(value), 0, 0)
        .map_err(|e| ConformanceError::CorpusLoad(format!("serialization failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ConformanceError::CorpusLoad(format!("non-utf8 output: {e}")))
}

/// Vectors exercised by the built-in conformance suite.
const BUILTIN_CORPUS: &str = r#"{
  "format_version": "1",
  "vectors": [
    {"id": "scalar-null", "input": "null", "valid": true, "canonical": "null"},
    {"id": "scalar-true", "input": "true", "valid": true, "canonical": "true"},
    {"id": "scalar-false", "input": "false", "valid": true, "canonical": "false"},
    {"id": "scalar-string", "input": "\"hello\"", "valid": true, "canonical": "\"hello\""},
    {"id": "number-zero", "input": "0", "valid": true, "canonical": "0"},
    {"id": "number-u64-max", "input": "18446744073709551615", "valid": true, "canonical": "18446744073709551615"},
    {"id": "number-i64-min", "input": "-9223372036854775808", "valid": true, "canonical": "-9223372036854775808"},
    {"id": "number-double-small", "input": "1.4e-07", "valid": true, "canonical": "1.4e-07"},
    {"id": "number-double-fixed", "input": "-777777.293678102", "valid": true, "canonical": "-777777.293678102"},
    {"id": "string-escapes", "input": "\"a\\n\\t\\\"b\\\\c\"", "valid": true, "canonical": "\"a\\n\\t\\\"b\\\\c\""},
    {"id": "string-surrogate-pair", "input": "\"\\uD834\\uDD1E\"", "valid": true, "canonical": "\"\ud834\udd1e\""},
    {"id": "array-empty", "input": "[]", "valid": true, "canonical": "[]"},
    {"id": "array-mixed", "input": "[1, true, null, \"x\"]", "valid": true, "canonical": "[1,true,null,\"x\"]"},
    {"id": "object-empty", "input": "{}", "valid": true, "canonical": "{}"},
    {"id": "object-key-order", "input": "{\"b\": 2, \"a\": 1}", "valid": true, "canonical": "{\"a\":1,\"b\":2}"},
    {"id": "object-nested", "input": "{\"o\": {\"x\": [1, 2]}, \"n\": -3}", "valid": true, "canonical": "{\"n\":-3,\"o\":{\"x\":[1,2]}}"},
    {"id": "invalid-leading-zero", "input": "01", "valid": false},
    {"id": "invalid-bare-minus", "input": "-", "valid": false},
    {"id": "invalid-trailing-dot", "input": "1.", "valid": false},
    {"id": "invalid-trailing-comma", "input": "[1, 2,]", "valid": false},
    {"id": "invalid-leading-comma", "input": "[,1]", "valid": false},
    {"id": "invalid-missing-colon", "input": "{\"a\" 1}", "valid": false},
    {"id": "invalid-mismatched-brackets", "input": "[1}", "valid": false},
    {"id": "invalid-trailing-content", "input": "null null", "valid": false},
    {"id": "invalid-unterminated-string", "input": "\"abc", "valid": false},
    {"id": "invalid-lone-surrogate", "input": "\"\\uD834\"", "valid": false},
    {"id": "invalid-keyword", "input": "nulla", "valid": false},
    {"id": "invalid-control-byte", "input": "\"a\u0001b\"", "valid": false}
  ]
}"#;
