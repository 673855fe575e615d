//! Sample input generation.
//!
//! When no input file is given we compress generated data whose symbol
//! distribution is skewed enough to make Huffman coding visible: English-like
//! text dominates, mixed with runs and a little noise.
//!
//! # Design
//!
//! Generated data has:
//! - Text-like sections drawn from English letter frequencies
//! - Runs of a single byte (very skewed)
//! - Small-alphabet sections (few distinct symbols)
//! - Random bytes (close to incompressible)

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Texts used by `huffcode demo` when none are given.
pub const DEMO_SAMPLES: [&str; 4] = [
    "There is a spectre haunting europe, the spectre of communism.",
    "The worker must have bread, but she must have roses, too.",
    "The history of all hitherto existing society is the history of class struggles. \
     Freeman and slave, patrician and plebeian, lord and serf, guildmaster and journeyman, \
     in a word, oppressor and oppressed, stood in constant opposition to one another, \
     carried on an uninterrupted, now hidden, now open fight, that each time ended, either \
     in the revolutionary reconstitution of society at large, or in the common ruin of the \
     contending classes.",
    "sphynx of black quartz judge my vow",
];

/// Letters with approximate per-mille English frequencies (space included).
const ENGLISH: [(u8, u32); 27] = [
    (b' ', 180),
    (b'e', 102),
    (b't', 75),
    (b'a', 65),
    (b'o', 62),
    (b'i', 57),
    (b'n', 57),
    (b's', 53),
    (b'h', 50),
    (b'r', 50),
    (b'd', 35),
    (b'l', 33),
    (b'u', 23),
    (b'c', 22),
    (b'm', 20),
    (b'w', 19),
    (b'f', 18),
    (b'g', 16),
    (b'y', 16),
    (b'p', 15),
    (b'b', 12),
    (b'v', 8),
    (b'k', 6),
    (b'j', 1),
    (b'x', 1),
    (b'q', 1),
    (b'z', 1),
];

/// Sections are at most this long before the generator picks a new kind.
const SECTION_BYTES: usize = 4096;

/// Generate sample data with a skewed symbol distribution.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `size_bytes`: exact size of generated data
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(SECTION_BYTES);

        match rng.gen_range(0..10u8) {
            // 60% English-like text
            0..=5 => push_text(&mut rng, &mut data, section),

            // 20% runs of a single byte
            6..=7 => {
                let byte: u8 = rng.gen();
                let run = rng.gen_range(1..=section);
                data.extend(std::iter::repeat(byte).take(run));
            }

            // 10% small alphabet
            8 => {
                let alphabet = b"ACGT";
                for _ in 0..section {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }

            // 10% random bytes
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

/// Generate ASCII text drawn from English letter frequencies.
pub fn generate_sample_text(seed: u64, size_chars: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_chars);
    push_text(&mut rng, &mut data, size_chars);
    // Every generated byte is ASCII
    data.into_iter().map(char::from).collect()
}

fn push_text(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, count: usize) {
    // Weights are constant and all positive
    if let Ok(dist) = WeightedIndex::new(ENGLISH.iter().map(|&(_, w)| w)) {
        for _ in 0..count {
            data.push(ENGLISH[dist.sample(rng)].0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sample_data() {
        let data = generate_sample_data(42, 1000);
        assert_eq!(data.len(), 1000);
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_sample_data(12345, 5000), generate_sample_data(12345, 5000));
        assert_eq!(generate_sample_text(7, 300), generate_sample_text(7, 300));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate_sample_data(1, 1000), generate_sample_data(2, 1000));
    }

    #[test]
    fn test_various_sizes() {
        for size in [0, 1, 100, 1000, 10000, 100000] {
            assert_eq!(generate_sample_data(999, size).len(), size);
        }
    }

    #[test]
    fn test_text_is_skewed() {
        let text = generate_sample_text(3, 10_000);
        assert_eq!(text.chars().count(), 10_000);

        let spaces = text.chars().filter(|&c| c == ' ').count();
        let zeds = text.chars().filter(|&c| c == 'z').count();
        assert!(spaces > zeds * 10);
    }
}
