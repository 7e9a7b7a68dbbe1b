//! Digest pipeline
//!
//! `input -> sanitize -> reduce -> checksums -> transpose -> group`
//!
//! The hasher is immutable once built. Every call is independent, so one
//! instance can be shared across threads behind an `Arc` without locking.

use std::collections::{HashMap, HashSet};

use super::checksum::{input_checksum, payload_checksum};
use super::config::{HasherConfig, MAX_INPUT_LEN};
use super::errors::{HashError, HashResult, InputStage};
use super::format::group_glyphs;
use super::result::HashingResult;
use crate::wheel::EncodingWheel;

/// Uppercase a single character, keeping it as-is when the uppercase form is
/// not a single character.
fn fold_case(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Digest generator bound to one configuration and one wheel
#[derive(Debug, Clone)]
pub struct Hasher {
    config: HasherConfig,
    wheel: EncodingWheel,
    /// Raw wheel position of every glyph
    positions: HashMap<char, usize>,
}

impl Hasher {
    /// Build a hasher.
    ///
    /// Fails with `InvalidConfig` when the config is inconsistent, when a wheel
    /// glyph changes under uppercase folding (sanitized digests could no
    /// longer be transposed), or when the separator is a wheel glyph.
    pub fn new(config: HasherConfig, wheel: EncodingWheel) -> HashResult<Self> {
        config.validate()?;

        if let Some(&glyph) = wheel.glyphs().iter().find(|&&g| fold_case(g) != g) {
            return Err(HashError::InvalidConfig(format!(
                "wheel glyph '{}' is not stable under uppercase folding",
                glyph
            )));
        }

        if config.readable_formatting && wheel.contains(fold_case(config.separator)) {
            return Err(HashError::InvalidConfig(format!(
                "separator '{}' is also a wheel glyph",
                config.separator
            )));
        }

        let positions = wheel
            .glyphs()
            .iter()
            .enumerate()
            .map(|(i, &g)| (g, i))
            .collect();

        Ok(Self {
            config,
            wheel,
            positions,
        })
    }

    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    pub fn wheel(&self) -> &EncodingWheel {
        &self.wheel
    }

    /// Shortest accepted input, before and after sanitization
    pub fn minimum_input_size(&self) -> usize {
        self.config.minimum_input_size()
    }

    /// Run the full pipeline on `input`.
    ///
    /// Inputs are limited to 1024 characters; hash larger data in blocks and
    /// combine the digests.
    pub fn hash_block(&self, input: &str) -> HashResult<HashingResult> {
        if input.is_empty() {
            return Err(HashError::Argument("input"));
        }

        let min = self.minimum_input_size();
        let input_len = input.chars().count();
        if input_len > MAX_INPUT_LEN || input_len < min {
            return Err(HashError::Size {
                stage: InputStage::Raw,
                actual: input_len,
                min,
                max: MAX_INPUT_LEN,
            });
        }

        let mut steps = vec![input_len];

        let (sanitized, sum) = self.sanitize_with_sum(input)?;
        let sanitized_len = sanitized.chars().count();
        steps.push(sanitized_len);
        if sanitized_len < min {
            return Err(HashError::Size {
                stage: InputStage::Sanitized,
                actual: sanitized_len,
                min,
                max: MAX_INPUT_LEN,
            });
        }

        let reduced = self.reduce(&sanitized, &mut steps);

        let bits = self.wheel.encode_bits_required();
        let mut indices = Vec::with_capacity(reduced.len() + 2);
        indices.push(self.checksum_index(input_checksum(sum, bits)));
        indices.extend(reduced.iter().map(|&v| v as usize));
        indices.push(self.checksum_index(payload_checksum(&reduced, bits)));

        let glyphs = self.glyphs_for(&indices)?;
        let digest = if self.config.readable_formatting {
            group_glyphs(&glyphs, self.config.separator)
        } else {
            glyphs.into_iter().collect()
        };
        steps.push(digest.chars().count());

        Ok(HashingResult::new(
            input.to_string(),
            sanitized,
            digest,
            steps,
        ))
    }

    /// Digest of `input`; see [`Hasher::hash_block`]
    pub fn compute_hash(&self, input: &str) -> HashResult<String> {
        self.hash_block(input).map(HashingResult::into_digest)
    }

    /// Trim, optionally uppercase, and drop every character outside the
    /// accepted range
    pub fn sanitize_input(&self, input: &str) -> HashResult<String> {
        self.sanitize_with_sum(input).map(|(sanitized, _)| sanitized)
    }

    /// Sanitized input plus `Σ(c - low)` over the kept characters
    fn sanitize_with_sum(&self, input: &str) -> HashResult<(String, u32)> {
        if input.is_empty() {
            return Err(HashError::Argument("input"));
        }

        let low = self.config.input_trimming_low as u32;
        let mut sum: u32 = 0;
        let mut sanitized = String::with_capacity(input.len());

        for c in input.trim().chars() {
            let c = if self.config.ignore_casing { fold_case(c) } else { c };
            if self.config.accepts(c) {
                sum = sum.wrapping_add(c as u32 - low);
                sanitized.push(c);
            }
        }

        Ok((sanitized, sum))
    }

    /// Pairwise-difference reduction, repeated until the payload is no longer
    /// than the minimum input size. Always runs at least once.
    ///
    /// Round output length is appended to `steps`.
    fn reduce(&self, sanitized: &str, steps: &mut Vec<usize>) -> Vec<u32> {
        let base = self.wheel.glyph_count() as u32;
        let min = self.minimum_input_size();
        let mut current: Vec<u32> = sanitized.chars().map(|c| c as u32).collect();

        loop {
            let len = current.len();
            let mut next = Vec::with_capacity(len / 2 + 1);
            for i in 0..len {
                let delta = if (i + 1) % 2 == 0 {
                    current[i].abs_diff(current[i - 1])
                } else if i == len - 1 {
                    current[i]
                } else {
                    continue;
                };
                next.push(delta % base);
            }

            current = next;
            steps.push(current.len());
            if current.len() <= min {
                return current;
            }
        }
    }

    /// Map a complemented checksum onto a wheel position
    fn checksum_index(&self, checksum: u32) -> usize {
        checksum as usize % self.wheel.glyph_count()
    }

    fn glyphs_for(&self, indices: &[usize]) -> HashResult<Vec<char>> {
        indices.iter().map(|&i| self.transpose_index(i)).collect()
    }

    /// Keep only wheel glyphs (case-insensitive) and uppercase the result
    pub fn sanitize_hash(&self, digest: &str) -> HashResult<String> {
        if digest.is_empty() {
            return Err(HashError::Argument("digest"));
        }

        let glyphs: HashSet<char> = self.wheel.glyphs().iter().copied().collect();
        Ok(digest
            .chars()
            .map(fold_case)
            .filter(|c| glyphs.contains(c))
            .collect())
    }

    /// Check `digest` against its embedded trailing check glyph.
    ///
    /// Separators, whitespace and casing are ignored. Digests with fewer than
    /// three glyphs carry no payload and are reported invalid.
    pub fn validate_hash(&self, digest: &str) -> HashResult<bool> {
        let sanitized: Vec<char> = self.sanitize_hash(digest)?.chars().collect();
        if sanitized.len() < 3 {
            return Ok(false);
        }

        let last = sanitized.len() - 1;
        let payload = sanitized[1..last]
            .iter()
            .map(|&g| self.transpose_glyph(g).map(|i| i as u32))
            .collect::<HashResult<Vec<u32>>>()?;

        let expected =
            self.checksum_index(payload_checksum(&payload, self.wheel.encode_bits_required()));
        let actual = self.transpose_glyph(sanitized[last])?;

        Ok(expected == actual)
    }

    /// Compare two digests ignoring separators, whitespace and casing.
    /// Checksum validity is not considered.
    pub fn compare_hashes(&self, a: &str, b: &str) -> HashResult<bool> {
        Ok(self.sanitize_hash(a)? == self.sanitize_hash(b)?)
    }

    /// Raw wheel positions of every glyph in `input`. Case-sensitive.
    pub fn transpose_glyphs(&self, input: &str) -> HashResult<Vec<usize>> {
        if input.is_empty() {
            return Err(HashError::Argument("input"));
        }
        input.chars().map(|g| self.transpose_glyph(g)).collect()
    }

    /// Raw wheel position of `glyph`. Case-sensitive.
    pub fn transpose_glyph(&self, glyph: char) -> HashResult<usize> {
        self.positions
            .get(&glyph)
            .copied()
            .ok_or(HashError::GlyphNotFound(glyph))
    }

    /// Glyph at raw wheel position `index`
    pub fn transpose_index(&self, index: usize) -> HashResult<char> {
        self.wheel.get(index).map_err(|_| HashError::IndexOutOfRange {
            index,
            glyph_count: self.wheel.glyph_count(),
        })
    }

    /// Glyph string for a sequence of raw wheel positions
    pub fn transpose_indices(&self, indices: &[usize]) -> HashResult<String> {
        if indices.is_empty() {
            return Err(HashError::Argument("indices"));
        }
        indices.iter().map(|&i| self.transpose_index(i)).collect()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        let wheel = EncodingWheel::default();
        let positions = wheel
            .glyphs()
            .iter()
            .enumerate()
            .map(|(i, &g)| (g, i))
            .collect();
        Self {
            config: HasherConfig::default(),
            wheel,
            positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "abcdefghijklmno 1234 77765 0987654321";

    #[test]
    fn test_known_digests() {
        let hasher = Hasher::default();
        assert_eq!(hasher.compute_hash(SAMPLE).unwrap(), "X000-X21801Z");
        assert_eq!(hasher.compute_hash("HELLO WORLD 12345").unwrap(), "Y308-3811NS");
        assert_eq!(hasher.compute_hash("00000000000").unwrap(), "0000-00GY");
    }

    #[test]
    fn test_known_digest_larger_hash_size() {
        let hasher =
            Hasher::new(HasherConfig::with_min_hash_size(14), EncodingWheel::default()).unwrap();
        assert_eq!(hasher.compute_hash(SAMPLE).unwrap(), "X111-1111-Y130191-111B");
    }

    #[test]
    fn test_length_trace() {
        let hasher = Hasher::default();
        let result = hasher.hash_block(SAMPLE).unwrap();
        assert_eq!(result.steps(), &[37, 34, 17, 9, 12]);
        assert_eq!(result.rounds(), 2);
        assert_eq!(result.sanitized_input(), "ABCDEFGHIJKLMNO1234777650987654321");
        assert_eq!(result.input(), SAMPLE);
    }

    #[test]
    fn test_length_trace_is_earliest_stage_first() {
        let result = Hasher::default().hash_block(SAMPLE).unwrap();
        let steps = result.steps();
        assert_eq!(steps.first(), Some(&result.input_len()));
        assert_eq!(steps[1], result.sanitized_input().len());
        assert_eq!(steps.last(), Some(&result.digest_len()));
        // Reduction rounds only shrink
        assert!(steps[1..steps.len() - 1].windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_unformatted_digest() {
        let config = HasherConfig {
            readable_formatting: false,
            ..HasherConfig::default()
        };
        let hasher = Hasher::new(config, EncodingWheel::default()).unwrap();
        assert_eq!(hasher.compute_hash(SAMPLE).unwrap(), "X000X21801Z");
    }

    #[test]
    fn test_deterministic() {
        let hasher = Hasher::default();
        let first = hasher.compute_hash(SAMPLE).unwrap();
        for _ in 0..10 {
            assert_eq!(hasher.compute_hash(SAMPLE).unwrap(), first);
        }
    }

    #[test]
    fn test_validate_own_digests() {
        let hasher = Hasher::default();
        for input in [SAMPLE, "HELLO WORLD 12345", "00000000000", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            let digest = hasher.compute_hash(input).unwrap();
            assert!(hasher.validate_hash(&digest).unwrap(), "{}", digest);
            assert!(hasher.validate_hash(&digest.to_lowercase()).unwrap());
        }
    }

    #[test]
    fn test_validate_detects_tampering() {
        let hasher = Hasher::default();
        // Trailing check glyph of X000-X21801Z is Z; any other is wrong
        assert!(!hasher.validate_hash("X000-X21801Y").unwrap());
        assert!(!hasher.validate_hash("XZ").unwrap());
        assert!(matches!(hasher.validate_hash(""), Err(HashError::Argument(_))));
    }

    #[test]
    fn test_sanitize_hash() {
        let hasher = Hasher::default();
        assert_eq!(
            hasher.sanitize_hash("CKPPNAP-   NS   47 A s k 3 F  Ff").unwrap(),
            "CKPPNAPNS47ASK3FFF"
        );
    }

    #[test]
    fn test_compare_hashes() {
        let hasher = Hasher::default();
        assert!(hasher
            .compare_hashes("CKPPN-APNS-47ASK-3FFF", "CKPPNAP-   NS   47 A s k 3 F  Ff")
            .unwrap());
        assert!(!hasher.compare_hashes("CKPPN-APNS", "CKPPN-APNT").unwrap());
    }

    #[test]
    fn test_size_errors() {
        let hasher = Hasher::default();
        assert!(matches!(hasher.compute_hash(""), Err(HashError::Argument("input"))));
        assert!(matches!(
            hasher.compute_hash("0123456789"),
            Err(HashError::Size {
                stage: InputStage::Raw,
                actual: 10,
                ..
            })
        ));
        assert!(matches!(
            hasher.compute_hash(&"A".repeat(1025)),
            Err(HashError::Size {
                stage: InputStage::Raw,
                ..
            })
        ));
        assert!(hasher.compute_hash(&"A".repeat(1024)).is_ok());
        assert!(hasher.compute_hash("01234567890").is_ok());
    }

    #[test]
    fn test_sanitized_size_error() {
        let hasher = Hasher::default();
        assert!(matches!(
            hasher.compute_hash("!!!!!!!!!!!!!!!! 12"),
            Err(HashError::Size {
                stage: InputStage::Sanitized,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_sanitize_input() {
        let hasher = Hasher::default();
        assert_eq!(hasher.sanitize_input("  ab c_d!9 ").unwrap(), "ABCD9");

        let config = HasherConfig {
            ignore_casing: false,
            ..HasherConfig::default()
        };
        let hasher = Hasher::new(config, EncodingWheel::default()).unwrap();
        assert_eq!(hasher.sanitize_input("aBc9").unwrap(), "B9");
    }

    #[test]
    fn test_transpose() {
        let hasher = Hasher::default();
        assert_eq!(hasher.transpose_glyph('A').unwrap(), 10);
        assert_eq!(hasher.transpose_glyphs("0Z").unwrap(), vec![0, 31]);
        assert_eq!(hasher.transpose_index(31).unwrap(), 'Z');
        assert_eq!(hasher.transpose_indices(&[1, 10, 31]).unwrap(), "1AZ");
        assert!(matches!(hasher.transpose_glyph('I'), Err(HashError::GlyphNotFound('I'))));
        assert!(matches!(hasher.transpose_glyph('a'), Err(HashError::GlyphNotFound('a'))));
        assert!(matches!(
            hasher.transpose_index(32),
            Err(HashError::IndexOutOfRange { index: 32, .. })
        ));
    }

    #[test]
    fn test_rejects_separator_on_wheel() {
        let config = HasherConfig {
            separator: 'a',
            ..HasherConfig::default()
        };
        assert!(matches!(
            Hasher::new(config, EncodingWheel::default()),
            Err(HashError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_lowercase_wheel() {
        let wheel = EncodingWheel::new("abcdefgh".chars()).unwrap();
        assert!(Hasher::new(HasherConfig::default(), wheel).is_err());
    }

    #[test]
    fn test_small_odd_wheel_stays_in_range() {
        let wheel = EncodingWheel::new("ABCDEFGHJ".chars()).unwrap();
        let hasher = Hasher::new(HasherConfig::default(), wheel).unwrap();
        for input in [SAMPLE, "HELLO WORLD 12345", "99999999999999"] {
            let digest = hasher.compute_hash(input).unwrap();
            assert!(hasher.validate_hash(&digest).unwrap());
        }
    }

    #[test]
    fn test_rotation_does_not_change_digest() {
        let mut wheel = EncodingWheel::default();
        wheel.rotate(7);
        let rotated = Hasher::new(HasherConfig::default(), wheel).unwrap();
        assert_eq!(
            rotated.compute_hash(SAMPLE).unwrap(),
            Hasher::default().compute_hash(SAMPLE).unwrap()
        );
    }
}
