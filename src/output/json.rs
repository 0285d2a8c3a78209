//! JSON serialization for evaluation results.

use crate::result::Evaluation;

/// Serialize an Evaluation to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails. A non-finite `max_t` (a zero
/// variance context with a mean difference) serializes as `"inf"` so the
/// report reads back unchanged.
pub fn to_json(evaluation: &Evaluation) -> Result<String, serde_json::Error> {
    serde_json::to_string(evaluation)
}

/// Serialize an Evaluation to a pretty-printed JSON string.
///
/// # Errors
///
/// See [`to_json`].
pub fn to_json_pretty(evaluation: &Evaluation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Metadata, SessionReport};
    use crate::types::Verdict;

    fn make_evaluation() -> Evaluation {
        Evaluation {
            dut: "insert_head".to_string(),
            constant_time: true,
            sessions: vec![
                SessionReport {
                    attempt: 0,
                    verdict: Verdict::LeakageFound,
                    rounds: 12,
                    valid_samples: 1_650,
                    dropped_samples: 0,
                    context: Some(4),
                    max_t: 14.25,
                    winning_samples: 10_400,
                },
                SessionReport {
                    attempt: 1,
                    verdict: Verdict::NoLeakageEvidenceYet,
                    rounds: 80,
                    valid_samples: 11_850,
                    dropped_samples: 0,
                    context: Some(100),
                    max_t: 1.5,
                    winning_samples: 11_850,
                },
            ],
            metadata: Metadata {
                n_measures: 150,
                drop_size: 20,
                test_tries: 10,
                enough_measure: 10_000,
                timer: "rdtsc".to_string(),
                seed: Some(7),
                runtime_secs: 0.5,
            },
        }
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_evaluation()).unwrap();
        assert!(json.contains("\"dut\":\"insert_head\""));
        assert!(json.contains("\"verdict\":\"LeakageFound\""));
        assert!(json.contains("\"max_t\":14.25"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_evaluation()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("constant_time"));
    }

    #[test]
    fn test_infinite_t_reads_back() {
        let mut evaluation = make_evaluation();
        evaluation.sessions[0].max_t = f64::INFINITY;

        let json = to_json(&evaluation).unwrap();
        assert!(json.contains("\"max_t\":\"inf\""));

        let back: Evaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sessions, evaluation.sessions);
        assert_eq!(back.max_t(), f64::INFINITY);
    }

    #[test]
    fn test_null_statistic_reads_as_infinite() {
        let json = to_json(&make_evaluation())
            .unwrap()
            .replace("\"max_t\":14.25", "\"max_t\":null");

        let back: Evaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sessions[0].max_t, f64::INFINITY);
    }

    #[test]
    fn test_parses_back() {
        let json = to_json(&make_evaluation()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sessions"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["metadata"]["seed"], 7);
    }
}
