//! Outcome of a single hashing call

use serde::Serialize;

/// Immutable record of one `hash_block` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashingResult {
    input: String,
    sanitized_input: String,
    digest: String,
    /// Lengths in forward pipeline order, earliest stage first: raw input,
    /// sanitized input, each reduction round's output, final digest
    /// (separators included). This is not a stack; consumers wanting the
    /// last round first must reverse it.
    steps: Vec<usize>,
}

impl HashingResult {
    pub(crate) fn new(
        input: String,
        sanitized_input: String,
        digest: String,
        steps: Vec<usize>,
    ) -> Self {
        Self {
            input,
            sanitized_input,
            digest,
            steps,
        }
    }

    /// Input exactly as supplied
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Input after trimming, case folding and range filtering
    pub fn sanitized_input(&self) -> &str {
        &self.sanitized_input
    }

    /// Final digest, formatted per the hasher config
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Consume the result, keeping only the digest
    pub fn into_digest(self) -> String {
        self.digest
    }

    /// Per-stage length trace, earliest stage first
    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    /// Number of reduction rounds that ran
    pub fn rounds(&self) -> usize {
        self.steps.len().saturating_sub(3)
    }

    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn digest_len(&self) -> usize {
        self.digest.chars().count()
    }

    /// Digest length over input length
    pub fn input_output_ratio(&self) -> f64 {
        let input_len = self.input_len();
        if input_len == 0 {
            return 0.0;
        }
        self.digest_len() as f64 / input_len as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let result = HashingResult::new(
            "ab cd".into(),
            "ABCD".into(),
            "XYZ".into(),
            vec![5, 4, 2, 3],
        );
        assert_eq!(result.input_len(), 5);
        assert_eq!(result.digest_len(), 3);
        assert_eq!(result.rounds(), 1);
        assert!((result.input_output_ratio() - 0.6).abs() < 1e-9);
        assert_eq!(result.into_digest(), "XYZ");
    }

    #[test]
    fn test_serializes_for_trace_output() {
        let result = HashingResult::new("in".into(), "IN".into(), "D".into(), vec![2, 2, 1, 1]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sanitized_input"], "IN");
        assert_eq!(json["steps"], serde_json::json!([2, 2, 1, 1]));
    }
}
