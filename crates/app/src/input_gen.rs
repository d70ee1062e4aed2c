//! Sample input generation.
//!
//! `huffpack sample` writes a reproducible file whose sections have very
//! different byte distributions, so the code table and compression ratio
//! have something to show:
//! - English-like text built from a small word list (skewed, ~30 symbols)
//! - Long runs of one byte (one dominant symbol)
//! - Geometrically distributed bytes (long tail of rare symbols)
//! - Uniform random bytes (all 256 symbols, no gain)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::Path;

/// Size of each generated section.
const SECTION_BYTES: usize = 4096;

const WORDS: &[&str] = &[
    "the", "of", "and", "to", "in", "a", "is", "that", "for", "it", "as", "was", "with", "be",
    "by", "on", "not", "he", "this", "are", "or", "his", "from", "at", "which", "but", "have",
    "an", "had", "they", "you", "were", "their", "one", "all", "we", "can", "her", "has",
    "there", "been", "if", "more", "when", "will", "would", "who", "so", "no",
];

/// Generate `size_bytes` of sample data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes + SECTION_BYTES);

    while data.len() < size_bytes {
        let section = SECTION_BYTES.min(size_bytes - data.len());

        match rng.gen_range(0..10u8) {
            // 50% text
            0..=4 => push_text(&mut rng, &mut data, section),
            // 20% runs
            5..=6 => {
                let byte: u8 = rng.gen();
                let run = rng.gen_range(1..=section);
                data.extend(std::iter::repeat(byte).take(run));
            }
            // 20% geometric
            7..=8 => {
                for _ in 0..section {
                    data.push(geometric_byte(&mut rng));
                }
            }
            // 10% uniform
            _ => {
                for _ in 0..section {
                    data.push(rng.gen());
                }
            }
        }
    }

    data.truncate(size_bytes);
    data
}

/// Append roughly `len` bytes of space-separated words with occasional
/// punctuation and line breaks.
fn push_text(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, len: usize) {
    let target = data.len() + len;
    let mut capitalize = true;

    while data.len() < target {
        let word = WORDS[rng.gen_range(0..WORDS.len())].as_bytes();
        if capitalize {
            data.push(word[0].to_ascii_uppercase());
            data.extend_from_slice(&word[1..]);
            capitalize = false;
        } else {
            data.extend_from_slice(word);
        }

        match rng.gen_range(0..20u8) {
            0 => {
                data.extend_from_slice(b".\n");
                capitalize = true;
            }
            1 => data.extend_from_slice(b", "),
            _ => data.push(b' '),
        }
    }
}

/// Byte value `k` with probability 2^-(k+1).
fn geometric_byte(rng: &mut ChaCha8Rng) -> u8 {
    let mut k = 0u8;
    while k < 255 && rng.gen_bool(0.5) {
        k += 1;
    }
    k
}

/// Write generated data to a file.
pub fn write_sample_file(path: &Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_sizes() {
        for size in [0, 1, 100, 4096, 10_000, 100_000] {
            assert_eq!(generate_sample_data(999, size).len(), size);
        }
    }

    #[test]
    fn test_determinism() {
        let data1 = generate_sample_data(12345, 20_000);
        let data2 = generate_sample_data(12345, 20_000);
        assert_eq!(data1, data2);
    }

    #[test]
    fn test_different_seeds() {
        let data1 = generate_sample_data(1, 10_000);
        let data2 = generate_sample_data(2, 10_000);
        assert_ne!(data1, data2);
    }

    #[test]
    fn test_text_section_uses_word_list() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut data = Vec::new();
        push_text(&mut rng, &mut data, 500);

        assert!(data.len() >= 500);
        assert!(data[0].is_ascii_uppercase());
        assert!(data
            .iter()
            .all(|b| b.is_ascii_alphabetic() || b" .,\n".contains(b)));
    }

    #[test]
    fn test_geometric_is_skewed() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let bytes: Vec<u8> = (0..10_000).map(|_| geometric_byte(&mut rng)).collect();

        let zeros = bytes.iter().filter(|&&b| b == 0).count();
        let small = bytes.iter().filter(|&&b| b < 8).count();
        assert!(zeros > 4_000 && zeros < 6_000);
        assert!(small > 9_900);
    }
}
