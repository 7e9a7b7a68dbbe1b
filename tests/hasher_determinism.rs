//! Hasher Determinism Tests
//!
//! Tests for digest invariants:
//! - Same input + same wheel + same config => same digest, across instances
//! - Every produced digest validates, in any casing or spacing
//! - Rotation does not affect digests; persisted wheels reproduce them
//! - Input size boundaries are enforced before and after sanitization

use wheelhash::hasher::{HashError, Hasher, HasherConfig, InputStage};
use wheelhash::wheel::EncodingWheel;

// =============================================================================
// Helper Functions
// =============================================================================

const SAMPLE: &str = "abcdefghijklmno 1234 77765 0987654321";
const PANGRAM: &str = "The quick brown fox jumps over the lazy dog 0123456789";

fn hasher_with(config: HasherConfig, wheel: EncodingWheel) -> Hasher {
    Hasher::new(config, wheel).unwrap()
}

// =============================================================================
// Known Digest Tests
// =============================================================================

/// Known digests for the default wheel and config.
#[test]
fn test_known_digests_default_config() {
    let hasher = Hasher::default();
    let cases = [
        (SAMPLE, "X000-X21801Z"),
        ("HELLO WORLD 12345", "Y308-3811NS"),
        ("00000000000", "0000-00GY"),
        (PANGRAM, "6475-9CSY"),
    ];
    for (input, expected) in cases {
        assert_eq!(hasher.compute_hash(input).unwrap(), expected, "{}", input);
    }
}

/// Length trace follows the pipeline in order.
#[test]
fn test_length_trace_multiple_rounds() {
    let result = Hasher::default().hash_block(PANGRAM).unwrap();
    assert_eq!(result.steps(), &[54, 45, 23, 12, 6, 9]);
    assert_eq!(result.rounds(), 3);
    assert_eq!(result.digest(), "6475-9CSY");
}

/// Two independently built hashers agree.
#[test]
fn test_fresh_instances_agree() {
    let a = hasher_with(HasherConfig::with_min_hash_size(14), EncodingWheel::default());
    let b = hasher_with(HasherConfig::with_min_hash_size(14), EncodingWheel::default());
    assert_eq!(a.compute_hash(SAMPLE).unwrap(), "X111-1111-Y130191-111B");
    assert_eq!(a.compute_hash(SAMPLE).unwrap(), b.compute_hash(SAMPLE).unwrap());
}

/// Casing is folded before hashing when ignore_casing is on.
#[test]
fn test_casing_is_ignored() {
    let hasher = Hasher::default();
    assert_eq!(
        hasher.compute_hash("hello world 12345").unwrap(),
        hasher.compute_hash("HELLO WORLD 12345").unwrap()
    );
}

// =============================================================================
// Wheel Interaction Tests
// =============================================================================

/// Rotation is a wheel-local view; transposition reads raw glyphs.
#[test]
fn test_rotation_does_not_change_digest() {
    let mut wheel = EncodingWheel::default();
    wheel.rotate(13);
    let rotated = hasher_with(HasherConfig::default(), wheel);
    assert_eq!(rotated.compute_hash(SAMPLE).unwrap(), "X000-X21801Z");
}

/// A shuffled wheel changes digests, and a persisted copy reproduces them.
#[test]
fn test_shuffled_wheel_persists_digests() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("wheel.json");

    let mut wheel = EncodingWheel::default();
    wheel.shuffle_with_seed(42);
    wheel.save(&path).unwrap();

    let original = hasher_with(HasherConfig::default(), wheel);
    let reloaded = hasher_with(HasherConfig::default(), EncodingWheel::load(&path).unwrap());

    let digest = original.compute_hash(SAMPLE).unwrap();
    assert_eq!(reloaded.compute_hash(SAMPLE).unwrap(), digest);
    assert!(reloaded.validate_hash(&digest).unwrap());
}

// =============================================================================
// Validation and Comparison Tests
// =============================================================================

/// Every digest validates regardless of formatting.
#[test]
fn test_digests_validate_in_any_format() {
    let hasher = Hasher::default();
    for input in [SAMPLE, PANGRAM, "HELLO WORLD 12345", "99999999999999"] {
        let digest = hasher.compute_hash(input).unwrap();
        let spaced: String = digest
            .chars()
            .filter(|&c| c != '-')
            .flat_map(|c| [c.to_ascii_lowercase(), ' '])
            .collect();
        assert!(hasher.validate_hash(&digest).unwrap());
        assert!(hasher.validate_hash(&spaced).unwrap());
        assert!(hasher.compare_hashes(&digest, &spaced).unwrap());
    }
}

/// Replacing the check glyph breaks validation.
#[test]
fn test_wrong_check_glyph_invalid() {
    let hasher = Hasher::default();
    assert!(hasher.validate_hash("Y308-3811NS").unwrap());
    assert!(!hasher.validate_hash("Y308-3811NT").unwrap());
}

/// Too short to carry a payload.
#[test]
fn test_short_digest_invalid() {
    let hasher = Hasher::default();
    assert!(!hasher.validate_hash("Y3").unwrap());
    assert!(!hasher.validate_hash("--").unwrap());
}

// =============================================================================
// Size Boundary Tests
// =============================================================================

/// Minimum raw input is ((h - 2) * 2) - 1.
#[test]
fn test_minimum_input_boundary() {
    let hasher = Hasher::default();
    assert_eq!(hasher.minimum_input_size(), 11);
    assert!(hasher.compute_hash("12345678901").is_ok());
    assert!(matches!(
        hasher.compute_hash("1234567890"),
        Err(HashError::Size {
            stage: InputStage::Raw,
            actual: 10,
            min: 11,
            ..
        })
    ));
}

/// Maximum raw input is 1024 characters.
#[test]
fn test_maximum_input_boundary() {
    let hasher = Hasher::default();
    assert!(hasher.compute_hash(&"7".repeat(1024)).is_ok());
    assert!(matches!(
        hasher.compute_hash(&"7".repeat(1025)),
        Err(HashError::Size {
            stage: InputStage::Raw,
            actual: 1025,
            ..
        })
    ));
}

/// Long enough raw, too short once out-of-range characters are dropped.
#[test]
fn test_sanitized_size_enforced() {
    let hasher = Hasher::default();
    let err = hasher.compute_hash("abc ~~~~ ~~~~~~").unwrap_err();
    assert!(matches!(
        err,
        HashError::Size {
            stage: InputStage::Sanitized,
            actual: 3,
            ..
        }
    ));
    assert!(err.is_input_error());
}

/// Empty input is an argument error, not a size error.
#[test]
fn test_empty_input() {
    assert!(matches!(
        Hasher::default().compute_hash(""),
        Err(HashError::Argument(_))
    ));
}
