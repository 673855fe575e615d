//! huffcode: compress files into self-describing Huffman containers.

mod config;
mod error;
mod input_gen;

use std::error::Error as StdError;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use huffcode_core::{
    compress, compress_str, decompress_to_string,
    framing::{decompress_frame, pack, peek_kind, unpack},
    frequency::FrequencyTable,
    stats::CompressionStats,
    CodeTable, Symbol, SymbolKind,
};
use tracing_subscriber::EnvFilter;

use config::{Alphabet, Args, Config, InputSource, Task};
use error::{AppError, AppResult};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> AppResult<()> {
    match &config.task {
        Task::Compress {
            input,
            output,
            alphabet,
        } => {
            let stats = run_compress(input, output, *alphabet)?;
            if config.print_stats {
                stats.print_summary();
            }
        }
        Task::Decompress { input, output } => {
            let written = run_decompress(input, output)?;
            println!("Restored {} bytes to {}", written, output.display());
        }
        Task::Demo { texts } => {
            let texts: Vec<&str> = if texts.is_empty() {
                input_gen::DEMO_SAMPLES.to_vec()
            } else {
                texts.iter().map(String::as_str).collect()
            };
            for text in texts {
                run_demo(text, config.print_stats)?;
            }
        }
        Task::Table { input, alphabet } => print!("{}", run_table(input, *alphabet)?),
    }
    Ok(())
}

/// Load raw input bytes for a source.
fn load(source: &InputSource, alphabet: Alphabet) -> AppResult<Vec<u8>> {
    Ok(match source {
        InputSource::File(path) => std::fs::read(path).map_err(AppError::io("read", path))?,
        InputSource::Text(text) => text.clone().into_bytes(),
        InputSource::Sample { seed, size_bytes } => match alphabet {
            Alphabet::Bytes => input_gen::generate_sample_data(*seed, *size_bytes),
            Alphabet::Chars => input_gen::generate_sample_text(*seed, *size_bytes).into_bytes(),
        },
    })
}

fn to_chars(bytes: Vec<u8>) -> AppResult<Vec<char>> {
    Ok(String::from_utf8(bytes)?.chars().collect())
}

/// Compress a source into a container file.
fn run_compress(source: &InputSource, output: &Path, alphabet: Alphabet) -> AppResult<CompressionStats> {
    let bytes = load(source, alphabet)?;
    let (frame, stats) = match alphabet {
        Alphabet::Bytes => frame_symbols(&bytes)?,
        Alphabet::Chars => frame_symbols(&to_chars(bytes)?)?,
    };

    std::fs::write(output, &frame).map_err(AppError::io("write", output))?;
    tracing::info!(
        output = %output.display(),
        frame_bytes = frame.len(),
        symbols = stats.symbol_count,
        "wrote container"
    );
    Ok(stats)
}

fn frame_symbols<S: Symbol>(symbols: &[S]) -> AppResult<(Vec<u8>, CompressionStats)> {
    let (message, table) = compress(symbols)?;
    let stats = CompressionStats::from_input(symbols, &table, &message)?;
    Ok((pack(&message, &table, symbols.len())?, stats))
}

/// Restore a container file, returning the number of bytes written.
fn run_decompress(input: &Path, output: &Path) -> AppResult<usize> {
    let frame_bytes = std::fs::read(input).map_err(AppError::io("read", input))?;

    let restored = match peek_kind(&frame_bytes)? {
        SymbolKind::Byte => decompress_frame(&unpack::<u8>(&frame_bytes)?)?,
        SymbolKind::Char => decompress_frame(&unpack::<char>(&frame_bytes)?)?
            .into_iter()
            .collect::<String>()
            .into_bytes(),
    };

    std::fs::write(output, &restored).map_err(AppError::io("write", output))?;
    tracing::info!(output = %output.display(), bytes = restored.len(), "restored input");
    Ok(restored.len())
}

/// Show every stage for one text.
fn run_demo(text: &str, print_stats: bool) -> AppResult<()> {
    let (message, table) = compress_str(text)?;
    let decoded = decompress_to_string(&message, &table)?;

    println!("\n-----------------------------------------");
    println!("\nThe original sample reads:");
    println!("{}", text);
    println!("\nThe encoding table looks like:");
    print!("{}", table);
    println!("\nThe encoded bits ({} of them) read:", message.bit_len());
    println!("{}", message);
    println!("\nAfter decoding it reads:");
    println!("{}", decoded);

    if decoded != text {
        return Err(AppError::RoundTrip);
    }

    if print_stats {
        let symbols: Vec<char> = text.chars().collect();
        CompressionStats::from_input(&symbols, &table, &message)?.print_summary();
    }
    Ok(())
}

/// Render the code table for a source, with counts.
fn run_table(source: &InputSource, alphabet: Alphabet) -> AppResult<String> {
    let bytes = load(source, alphabet)?;
    match alphabet {
        Alphabet::Bytes => render_table(&bytes),
        Alphabet::Chars => render_table(&to_chars(bytes)?),
    }
}

fn render_table<S: Symbol>(symbols: &[S]) -> AppResult<String> {
    let freqs = FrequencyTable::count(symbols)?;
    let table = CodeTable::from_frequencies(&freqs)?;

    let mut out = String::new();
    for (symbol, code) in table.sorted() {
        out.push_str(&format!(
            "{:<12} {:>8}  {}\n",
            symbol.label(),
            freqs.get(&symbol),
            code
        ));
    }
    Ok(out)
}
