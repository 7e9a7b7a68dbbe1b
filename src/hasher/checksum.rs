//! Prime-divisibility checksums
//!
//! A checksum is a bit field: bit `k` is set when the summed input is divisible
//! by the `k`-th prime of a row, but only if the wheel needs at least `k + 1`
//! bits per glyph. The field is then complemented against `2^bits - 1`.

/// First prime row: checksum A and checksum C
pub const PRIMARY_PRIMES: [u32; 8] = [2, 3, 5, 7, 11, 13, 17, 19];

/// Second prime row: checksum B
pub const SECONDARY_PRIMES: [u32; 8] = [23, 29, 31, 37, 41, 43, 47, 53];

/// Set one bit per prime dividing `sum`, gated by `bits_required`
pub fn divisibility_bits(sum: u32, primes: &[u32; 8], bits_required: u32) -> u32 {
    primes
        .iter()
        .enumerate()
        .filter(|&(bit, &prime)| sum % prime == 0 && bits_required > bit as u32)
        .fold(0, |acc, (bit, _)| acc | (1 << bit))
}

/// Complement `value` against the `bits_required`-wide mask
pub fn complement(value: u32, bits_required: u32) -> u32 {
    let mask = if bits_required >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << bits_required) - 1
    };
    value ^ mask
}

/// Checksums A and B over the sanitized input sum, OR-ed and complemented
pub fn input_checksum(sum: u32, bits_required: u32) -> u32 {
    let a = divisibility_bits(sum, &PRIMARY_PRIMES, bits_required);
    let b = divisibility_bits(sum, &SECONDARY_PRIMES, bits_required);
    complement(a | b, bits_required)
}

/// Checksum C over the reduced payload values
pub fn payload_checksum(payload: &[u32], bits_required: u32) -> u32 {
    let sum = payload.iter().fold(0u32, |acc, &v| acc.wrapping_add(v));
    complement(
        divisibility_bits(sum, &PRIMARY_PRIMES, bits_required),
        bits_required,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sum_sets_every_allowed_bit() {
        assert_eq!(divisibility_bits(0, &PRIMARY_PRIMES, 5), 0b11111);
        assert_eq!(divisibility_bits(0, &PRIMARY_PRIMES, 8), 0xFF);
        assert_eq!(divisibility_bits(0, &PRIMARY_PRIMES, 12), 0xFF);
        assert_eq!(input_checksum(0, 5), 0);
    }

    #[test]
    fn test_bits_gate_small_wheels() {
        // 2*3*5*7 divides 210, but a 2-bit wheel only keeps the first two bits
        assert_eq!(divisibility_bits(210, &PRIMARY_PRIMES, 2), 0b11);
        assert_eq!(divisibility_bits(210, &PRIMARY_PRIMES, 0), 0);
    }

    #[test]
    fn test_input_checksum() {
        assert_eq!(input_checksum(1, 5), 0b11111);
        // 6: divisible by 2 and 3 only
        assert_eq!(input_checksum(6, 5), 0b11111 ^ 0b00011);
        // 23 * 2: bit 0 from both rows
        assert_eq!(input_checksum(46, 5), 0b11111 ^ 0b00001);
    }

    #[test]
    fn test_payload_checksum_sums_values() {
        assert_eq!(payload_checksum(&[1, 2, 3], 5), input_checksum(6, 5));
        assert_eq!(payload_checksum(&[], 5), 0);
        assert_eq!(payload_checksum(&[7], 5), 0b11111 ^ 0b01000);
    }

    #[test]
    fn test_complement_mask() {
        assert_eq!(complement(0, 0), 0);
        assert_eq!(complement(0b101, 3), 0b010);
        assert_eq!(complement(0, 32), u32::MAX);
    }
}
