//! Encoding wheel: an ordered, rotatable alphabet of unique glyphs
//!
//! Index `i` maps to glyph `glyphs[i]`. Rotation is an unbounded offset that is
//! only normalized (modulo the glyph count) when read. Raw accessors ignore
//! rotation entirely.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::document::WheelDocument;
use super::errors::{WheelError, WheelResult};

/// Default 32-glyph alphabet. I, L, O and V are left out to avoid misreads.
pub const DEFAULT_GLYPHS: [char; 32] = [
    '0', '1', '2', '3', '4', '5', '6', '7', //
    '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', //
    'G', 'H', 'J', 'K', 'M', 'N', 'P', 'Q', //
    'R', 'S', 'T', 'U', 'W', 'X', 'Y', 'Z',
];

/// Ordered, rotatable, shufflable alphabet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WheelDocument", into = "WheelDocument")]
pub struct EncodingWheel {
    glyphs: Vec<char>,
    rotation: i64,
}

impl EncodingWheel {
    /// Create a wheel from an ordered glyph sequence.
    ///
    /// Fails with `InvalidConfig` if the sequence is empty or repeats a glyph.
    pub fn new(glyphs: impl IntoIterator<Item = char>) -> WheelResult<Self> {
        let glyphs: Vec<char> = glyphs.into_iter().collect();
        if glyphs.is_empty() {
            return Err(WheelError::InvalidConfig(
                "alphabet must contain at least one glyph".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(glyphs.len());
        for &glyph in &glyphs {
            if !seen.insert(glyph) {
                return Err(WheelError::InvalidConfig(format!(
                    "glyph '{}' appears more than once",
                    glyph
                )));
            }
        }

        Ok(Self {
            glyphs,
            rotation: 0,
        })
    }

    /// Number of glyphs on the wheel
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Bits needed to encode one glyph index: `ceil(log2(glyph_count))`
    pub fn encode_bits_required(&self) -> u32 {
        let n = self.glyphs.len();
        if n <= 1 {
            0
        } else {
            usize::BITS - (n - 1).leading_zeros()
        }
    }

    /// Accumulated rotation, not normalized
    pub fn rotation(&self) -> i64 {
        self.rotation
    }

    /// Rotation normalized into `0..glyph_count`
    pub fn normalized_rotation(&self) -> usize {
        self.rotation.rem_euclid(self.glyphs.len() as i64) as usize
    }

    /// Raw glyph at `index`, rotation ignored
    pub fn get(&self, index: usize) -> WheelResult<char> {
        self.glyphs
            .get(index)
            .copied()
            .ok_or(WheelError::IndexOutOfRange {
                index,
                glyph_count: self.glyphs.len(),
            })
    }

    /// Replace the raw glyph at `index`, rotation ignored.
    ///
    /// A glyph already present at another position is rejected.
    pub fn set(&mut self, index: usize, glyph: char) -> WheelResult<()> {
        let glyph_count = self.glyphs.len();
        if index >= glyph_count {
            return Err(WheelError::IndexOutOfRange { index, glyph_count });
        }
        if let Some(existing) = self.position_of(glyph) {
            if existing != index {
                return Err(WheelError::InvalidConfig(format!(
                    "glyph '{}' already sits at position {}",
                    glyph, existing
                )));
            }
        }
        self.glyphs[index] = glyph;
        Ok(())
    }

    /// Glyph at `index` after applying the wheel rotation
    pub fn get_rotated(&self, index: i64) -> char {
        self.glyphs[self.rotated_address(index)]
    }

    /// Replace the glyph at `index` after applying the wheel rotation
    pub fn set_rotated(&mut self, index: i64, glyph: char) -> WheelResult<()> {
        let address = self.rotated_address(index);
        self.set(address, glyph)
    }

    fn rotated_address(&self, index: i64) -> usize {
        let n = self.glyphs.len() as i64;
        (index.wrapping_add(self.rotation)).rem_euclid(n) as usize
    }

    /// Rotate by `amount` positions in either direction
    pub fn rotate(&mut self, amount: i64) {
        self.rotation = self.rotation.wrapping_add(amount);
    }

    /// Glyph sequence as currently rotated
    pub fn state(&self) -> Vec<char> {
        let offset = self.normalized_rotation();
        self.glyphs[offset..]
            .iter()
            .chain(self.glyphs[..offset].iter())
            .copied()
            .collect()
    }

    /// Raw glyphs in storage order
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub(crate) fn into_glyphs(self) -> Vec<char> {
        self.glyphs
    }

    /// Raw index of `glyph`, if present
    pub fn position_of(&self, glyph: char) -> Option<usize> {
        self.glyphs.iter().position(|&g| g == glyph)
    }

    pub fn contains(&self, glyph: char) -> bool {
        self.glyphs.contains(&glyph)
    }

    /// Deterministic Fisher-Yates shuffle driven by `seed`.
    ///
    /// The same seed applied to the same starting order always yields the
    /// same permutation. Rotation is left untouched.
    pub fn shuffle_with_seed(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut count = self.glyphs.len();
        while count > 1 {
            count -= 1;
            let k = rng.gen_range(0..=count);
            self.glyphs.swap(k, count);
        }
    }

    /// Shuffle with a freshly drawn seed and return it so the shuffle can be
    /// reproduced with [`EncodingWheel::shuffle_with_seed`].
    pub fn shuffle(&mut self) -> u64 {
        let seed: u64 = rand::thread_rng().gen();
        self.shuffle_with_seed(seed);
        seed
    }

    /// CRC32 over the raw glyph order and the rotation.
    ///
    /// Wheels that transpose identically and share a rotation share a
    /// fingerprint.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        let mut buf = [0u8; 4];
        for glyph in &self.glyphs {
            hasher.update(glyph.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(&self.rotation.to_le_bytes());
        hasher.finalize()
    }
}

impl Default for EncodingWheel {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.to_vec(),
            rotation: 0,
        }
    }
}

impl fmt::Display for EncodingWheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for glyph in self.state() {
            write!(f, "{}", glyph)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcdef() -> EncodingWheel {
        EncodingWheel::new("ABCDEF".chars()).unwrap()
    }

    #[test]
    fn test_rotate_state() {
        let mut wheel = abcdef();
        wheel.rotate(3);
        assert_eq!(wheel.state(), vec!['D', 'E', 'F', 'A', 'B', 'C']);

        wheel.rotate(-6);
        assert_eq!(wheel.state(), vec!['D', 'E', 'F', 'A', 'B', 'C']);
        assert_eq!(wheel.to_string(), "DEFABC");
    }

    #[test]
    fn test_rotation_inverse_restores_state() {
        let original = abcdef().state();
        for n in [0i64, 1, 5, 6, 7, 13, -4, 1_000_003, -987_654_321] {
            let mut wheel = abcdef();
            wheel.rotate(n);
            wheel.rotate(-n);
            assert_eq!(wheel.state(), original, "rotation {}", n);
        }
    }

    #[test]
    fn test_raw_access_ignores_rotation() {
        let mut wheel = abcdef();
        wheel.rotate(2);
        assert_eq!(wheel.get(0).unwrap(), 'A');
        assert_eq!(wheel.get_rotated(0), 'C');
        assert_eq!(wheel.get_rotated(-1), 'B');
        assert_eq!(wheel.get_rotated(10), 'A');
    }

    #[test]
    fn test_get_out_of_range() {
        let wheel = abcdef();
        assert!(matches!(
            wheel.get(6),
            Err(WheelError::IndexOutOfRange {
                index: 6,
                glyph_count: 6
            })
        ));
    }

    #[test]
    fn test_set_and_set_rotated() {
        let mut wheel = abcdef();
        wheel.set(0, 'Z').unwrap();
        assert_eq!(wheel.get(0).unwrap(), 'Z');

        wheel.rotate(1);
        wheel.set_rotated(0, 'Y').unwrap();
        assert_eq!(wheel.get(1).unwrap(), 'Y');

        assert!(wheel.set(9, 'Q').is_err());
        assert!(matches!(wheel.set(2, 'Z'), Err(WheelError::InvalidConfig(_))));
        // Writing a glyph back onto its own slot is fine
        wheel.set(0, 'Z').unwrap();
    }

    #[test]
    fn test_invalid_alphabets() {
        assert!(matches!(
            EncodingWheel::new(std::iter::empty()),
            Err(WheelError::InvalidConfig(_))
        ));
        assert!(matches!(
            EncodingWheel::new("ABCA".chars()),
            Err(WheelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_encode_bits_required() {
        let bits = |s: &str| EncodingWheel::new(s.chars()).unwrap().encode_bits_required();
        assert_eq!(bits("A"), 0);
        assert_eq!(bits("AB"), 1);
        assert_eq!(bits("ABC"), 2);
        assert_eq!(bits("ABCD"), 2);
        assert_eq!(bits("ABCDE"), 3);
        assert_eq!(EncodingWheel::default().encode_bits_required(), 5);
    }

    #[test]
    fn test_shuffle_deterministic() {
        let mut a = abcdef();
        let mut b = abcdef();
        a.shuffle_with_seed(255_874);
        b.shuffle_with_seed(255_874);
        assert_eq!(a.state(), b.state());

        let mut sorted = a.state();
        sorted.sort();
        assert_eq!(sorted, abcdef().state());
    }

    #[test]
    fn test_shuffle_returns_reproducible_seed() {
        let mut a = EncodingWheel::default();
        let seed = a.shuffle();

        let mut b = EncodingWheel::default();
        b.shuffle_with_seed(seed);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_tracks_order_and_rotation() {
        let a = EncodingWheel::default();
        let mut b = EncodingWheel::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.rotate(1);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
