//! Configuration for the huffcode application.
//!
//! Parses command-line arguments and resolves them into a [`Config`]:
//! defaults are filled in, the sample seed is fixed (time-based unless given),
//! and conflicting options are rejected.
//!
//! # Philosophy
//!
//! `huffcode compress` works with ZERO further arguments: it compresses a
//! generated sample. The seed is printed with `--print-config` so runs are
//! reproducible.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default size of generated sample input
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

#[derive(Debug, Parser)]
#[command(name = "huffcode")]
#[command(about = "Huffman prefix-code compressor", version)]
pub struct Args {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,

    /// Don't print the compression summary
    #[arg(long, global = true)]
    pub no_stats: bool,

    /// Print the resolved configuration
    #[arg(long, global = true)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress a file (or a generated sample) into a container file
    Compress {
        /// Input file (default: generate sample)
        #[arg(long = "in")]
        input: Option<PathBuf>,

        /// Output file
        #[arg(long = "out", default_value = "./out.huf")]
        output: PathBuf,

        /// Treat input as UTF-8 text, one symbol per character
        #[arg(long)]
        chars: bool,

        /// Random seed for the generated sample
        #[arg(long)]
        seed: Option<u64>,

        /// Size of the generated sample
        #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
        sample_bytes: usize,
    },

    /// Restore the original input from a container file
    Decompress {
        /// Container file
        #[arg(long = "in")]
        input: PathBuf,

        /// Output file
        #[arg(long = "out", default_value = "./out.bin")]
        output: PathBuf,
    },

    /// Show table, bits and sizes for each text (default: built-in samples)
    Demo { texts: Vec<String> },

    /// Print the code table for a file or a text
    Table {
        /// Input file
        #[arg(long = "in", conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Literal text (one symbol per character)
        #[arg(long)]
        text: Option<String>,

        /// Treat the input file as UTF-8 text
        #[arg(long)]
        chars: bool,
    },
}

/// Which alphabet the input is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    Bytes,
    Chars,
}

/// Where input symbols come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Text(String),
    Sample { seed: u64, size_bytes: usize },
}

/// What to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Compress {
        input: InputSource,
        output: PathBuf,
        alphabet: Alphabet,
    },
    Decompress {
        input: PathBuf,
        output: PathBuf,
    },
    Demo {
        texts: Vec<String>,
    },
    Table {
        input: InputSource,
        alphabet: Alphabet,
    },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub task: Task,

    /// Log filter used when RUST_LOG is unset
    pub log_filter: String,

    /// Whether to print the compression summary
    pub print_stats: bool,

    /// Whether to print the resolved configuration
    pub print_config: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// If compressing a sample without `--seed`, a time-based seed is chosen.
    pub fn from_args(args: Args) -> Result<Self, String> {
        let task = match args.command {
            Command::Compress {
                input,
                output,
                chars,
                seed,
                sample_bytes,
            } => {
                let input = match input {
                    Some(path) => {
                        if seed.is_some() {
                            return Err("--seed only applies to generated samples".to_string());
                        }
                        InputSource::File(path)
                    }
                    None => {
                        if sample_bytes == 0 {
                            return Err("--sample-bytes must be at least 1".to_string());
                        }
                        InputSource::Sample {
                            seed: seed.unwrap_or_else(time_seed),
                            size_bytes: sample_bytes,
                        }
                    }
                };
                Task::Compress {
                    input,
                    output,
                    alphabet: if chars { Alphabet::Chars } else { Alphabet::Bytes },
                }
            }
            Command::Decompress { input, output } => Task::Decompress { input, output },
            Command::Demo { texts } => Task::Demo { texts },
            Command::Table { input, text, chars } => match (input, text) {
                (Some(path), None) => Task::Table {
                    input: InputSource::File(path),
                    alphabet: if chars { Alphabet::Chars } else { Alphabet::Bytes },
                },
                (None, Some(text)) => Task::Table {
                    input: InputSource::Text(text),
                    alphabet: Alphabet::Chars,
                },
                _ => return Err("table requires exactly one of --in or --text".to_string()),
            },
        };

        Ok(Config {
            task,
            log_filter: args.log,
            print_stats: !args.no_stats,
            print_config: args.print_config,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.task {
            Task::Compress {
                input,
                output,
                alphabet,
            } => {
                println!("Task:     compress");
                print_source(input);
                println!("Output:   {}", output.display());
                println!("Alphabet: {:?}", alphabet);
            }
            Task::Decompress { input, output } => {
                println!("Task:     decompress");
                println!("Input:    {}", input.display());
                println!("Output:   {}", output.display());
            }
            Task::Demo { texts } => {
                println!("Task:     demo");
                if texts.is_empty() {
                    println!("Texts:    (built-in samples)");
                } else {
                    println!("Texts:    {}", texts.len());
                }
            }
            Task::Table { input, alphabet } => {
                println!("Task:     table");
                print_source(input);
                println!("Alphabet: {:?}", alphabet);
            }
        }
        println!("Log filter: {}", self.log_filter);
        println!("Print stats: {}", self.print_stats);
        println!();
    }
}

fn print_source(source: &InputSource) {
    match source {
        InputSource::File(path) => println!("Input:    {}", path.display()),
        InputSource::Text(text) => println!("Input:    text ({} chars)", text.chars().count()),
        InputSource::Sample { seed, size_bytes } => {
            println!("Input:    generated sample ({} bytes)", size_bytes);
            println!("Seed:     {}", seed);
        }
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, String> {
        let args = Args::try_parse_from(argv).map_err(|e| e.to_string())?;
        Config::from_args(args)
    }

    #[test]
    fn test_compress_defaults_to_sample() {
        let config = parse(&["huffcode", "compress", "--seed", "42"]).unwrap();
        assert_eq!(
            config.task,
            Task::Compress {
                input: InputSource::Sample {
                    seed: 42,
                    size_bytes: DEFAULT_SAMPLE_BYTES
                },
                output: PathBuf::from("./out.huf"),
                alphabet: Alphabet::Bytes,
            }
        );
        assert!(config.print_stats);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_compress_file_chars() {
        let config = parse(&[
            "huffcode", "compress", "--in", "a.txt", "--out", "a.huf", "--chars", "--no-stats",
        ])
        .unwrap();
        assert_eq!(
            config.task,
            Task::Compress {
                input: InputSource::File(PathBuf::from("a.txt")),
                output: PathBuf::from("a.huf"),
                alphabet: Alphabet::Chars,
            }
        );
        assert!(!config.print_stats);
    }

    #[test]
    fn test_seed_with_file_rejected() {
        assert!(parse(&["huffcode", "compress", "--in", "a", "--seed", "1"]).is_err());
    }

    #[test]
    fn test_table_needs_one_source() {
        assert!(parse(&["huffcode", "table"]).is_err());
        assert!(parse(&["huffcode", "table", "--in", "a", "--text", "b"]).is_err());

        let config = parse(&["huffcode", "table", "--text", "abracadabra"]).unwrap();
        assert_eq!(
            config.task,
            Task::Table {
                input: InputSource::Text("abracadabra".to_string()),
                alphabet: Alphabet::Chars,
            }
        );
    }

    #[test]
    fn test_demo_texts_and_global_flags() {
        let config = parse(&["huffcode", "demo", "one", "two", "--log", "debug"]).unwrap();
        assert_eq!(
            config.task,
            Task::Demo {
                texts: vec!["one".to_string(), "two".to_string()]
            }
        );
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_decompress_requires_input() {
        assert!(parse(&["huffcode", "decompress"]).is_err());
    }
}
