//! Compression statistics.
//!
//! Compares the encoded size against two baselines:
//! - raw: every symbol stored at its alphabet's native width
//! - fixed-width: every symbol stored with `ceil(log2 u)` bits, the best a
//!   code could do if all codes had the same length
//!
//! and against the Shannon entropy of the distribution, which no prefix code
//! can beat.

use crate::bitio::EncodedMessage;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::table::CodeTable;

/// Size figures for one compressed input.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionStats {
    /// Symbols in the input
    pub symbol_count: u64,

    /// Distinct symbols (table entries)
    pub distinct_symbols: usize,

    /// Native width of one symbol in bits
    pub symbol_width_bits: u64,

    /// Meaningful bits in the encoded message
    pub encoded_bits: u64,

    /// Serialized code table size
    pub table_bytes: u64,

    /// Longest code in the table
    pub max_code_len: usize,

    /// Shannon entropy of the distribution, bits per symbol
    pub entropy_bits: f64,
}

impl CompressionStats {
    /// Gather statistics from the counts, table and encoded output.
    pub fn measure<S: Symbol>(
        freqs: &FrequencyTable<S>,
        table: &CodeTable<S>,
        message: &EncodedMessage,
    ) -> Self {
        let total = freqs.total() as f64;
        let entropy_bits = freqs
            .iter()
            .map(|(_, count)| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum::<f64>();

        Self {
            symbol_count: freqs.total(),
            distinct_symbols: freqs.distinct(),
            symbol_width_bits: S::KIND.width() as u64 * 8,
            encoded_bits: message.bit_len() as u64,
            table_bytes: table.serialize_metadata().len() as u64,
            max_code_len: table.max_code_len(),
            entropy_bits,
        }
    }

    /// Count `input` and gather statistics.
    pub fn from_input<S: Symbol>(
        input: &[S],
        table: &CodeTable<S>,
        message: &EncodedMessage,
    ) -> Result<Self> {
        Ok(Self::measure(&FrequencyTable::count(input)?, table, message))
    }

    /// Size of the input at native symbol width.
    pub fn raw_bits(&self) -> u64 {
        self.symbol_count * self.symbol_width_bits
    }

    /// Bits per symbol of the shortest equal-length code (at least 1).
    pub fn fixed_code_len(&self) -> u64 {
        if self.distinct_symbols <= 2 {
            1
        } else {
            (usize::BITS - (self.distinct_symbols - 1).leading_zeros()) as u64
        }
    }

    /// Size of the input under the shortest equal-length code.
    pub fn fixed_width_bits(&self) -> u64 {
        self.symbol_count * self.fixed_code_len()
    }

    /// Mean encoded bits per input symbol.
    pub fn average_code_len(&self) -> f64 {
        if self.symbol_count == 0 {
            0.0
        } else {
            self.encoded_bits as f64 / self.symbol_count as f64
        }
    }

    /// Compute compression ratio (encoded / raw).
    ///
    /// Returns 0.0 if nothing was compressed.
    pub fn compression_ratio(&self) -> f64 {
        ratio(self.encoded_bits, self.raw_bits())
    }

    /// Encoded size relative to the fixed-width baseline.
    pub fn fixed_width_ratio(&self) -> f64 {
        ratio(self.encoded_bits, self.fixed_width_bits())
    }

    /// Entropy bound over achieved bits per symbol (1.0 = optimal for any code).
    pub fn efficiency(&self) -> f64 {
        let avg = self.average_code_len();
        if avg == 0.0 {
            0.0
        } else {
            self.entropy_bits / avg
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Compression Summary ===");
        println!("Symbols: {} ({} distinct)", self.symbol_count, self.distinct_symbols);
        println!("Longest code: {} bits", self.max_code_len);
        println!();
        println!("Raw:         {} bits ({} per symbol)", self.raw_bits(), self.symbol_width_bits);
        println!(
            "Fixed-width: {} bits ({} per symbol)",
            self.fixed_width_bits(),
            self.fixed_code_len()
        );
        println!(
            "Encoded:     {} bits ({:.3} per symbol)",
            self.encoded_bits,
            self.average_code_len()
        );
        println!("Table:       {} bytes", self.table_bytes);
        println!();
        println!("Ratio vs raw:         {:.1}%", self.compression_ratio() * 100.0);
        println!("Ratio vs fixed-width: {:.1}%", self.fixed_width_ratio() * 100.0);
        println!(
            "Entropy: {:.3} bits/symbol (efficiency {:.1}%)",
            self.entropy_bits,
            self.efficiency() * 100.0
        );
        println!();
    }

    /// Export statistics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "symbol_count={}\n\
             distinct_symbols={}\n\
             raw_bits={}\n\
             fixed_width_bits={}\n\
             encoded_bits={}\n\
             table_bytes={}\n\
             max_code_len={}\n\
             compression_ratio={:.4}\n\
             entropy_bits={:.4}\n",
            self.symbol_count,
            self.distinct_symbols,
            self.raw_bits(),
            self.fixed_width_bits(),
            self.encoded_bits,
            self.table_bytes,
            self.max_code_len,
            self.compression_ratio(),
            self.entropy_bits,
        )
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    fn stats_for(input: &[u8]) -> CompressionStats {
        let table = CodeTable::build(input).unwrap();
        let message = encode(input, &table).unwrap();
        CompressionStats::from_input(input, &table, &message).unwrap()
    }

    #[test]
    fn test_beats_fixed_width() {
        // a:2 b:3 c:4 -> c=0 a=10 b=11 -> 4 + 4 + 6 bits
        let stats = stats_for(b"aabbbcccc");
        assert_eq!(stats.encoded_bits, 14);
        assert_eq!(stats.fixed_code_len(), 2);
        assert_eq!(stats.fixed_width_bits(), 18);
        assert!(stats.encoded_bits < stats.fixed_width_bits());
        assert_eq!(stats.raw_bits(), 72);
    }

    #[test]
    fn test_fixed_code_len() {
        let mut stats = stats_for(b"a");
        assert_eq!(stats.fixed_code_len(), 1);
        for (distinct, bits) in [(2, 1), (3, 2), (4, 2), (5, 3), (256, 8), (257, 9)] {
            stats.distinct_symbols = distinct;
            assert_eq!(stats.fixed_code_len(), bits, "distinct = {}", distinct);
        }
    }

    #[test]
    fn test_entropy_bound() {
        let stats = stats_for(b"abracadabra");
        assert!(stats.entropy_bits <= stats.average_code_len());
        assert!(stats.efficiency() > 0.9 && stats.efficiency() <= 1.0);
    }

    #[test]
    fn test_uniform_entropy() {
        let stats = stats_for(b"abcdabcd");
        assert!((stats.entropy_bits - 2.0).abs() < 1e-9);
        assert!((stats.efficiency() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_export_text() {
        let text = stats_for(b"aabbbcccc").export_text();
        assert!(text.contains("symbol_count=9"));
        assert!(text.contains("encoded_bits=14"));
        assert!(text.contains("fixed_width_bits=18"));
    }
}
