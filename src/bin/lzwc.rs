//! lzwc CLI - LZW compression tool
//!
//! Compresses a raw byte stream from standard input to standard output, or
//! expands one back. The alphabet of permitted bytes comes from a text file
//! with one symbol per line; carriage return and line feed are always
//! included.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use lzwc::{compress, expand, Alphabet, CompressOptions, Policy};

/// LZW compression with selectable full-dictionary policies.
///
/// Compress: lzwc --mode compress --alphabet <file> [--minW <n>] [--maxW <n>] [--policy <name>]
/// Expand:   lzwc --mode expand
#[derive(Parser, Debug)]
#[command(name = "lzwc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Operating mode
    #[arg(long, value_enum)]
    mode: Mode,

    /// Alphabet file, one symbol per line (required for compression)
    #[arg(long, value_name = "FILE")]
    alphabet: Option<PathBuf>,

    /// Minimum codeword width in bits
    #[arg(long = "minW", default_value_t = 9, value_name = "N")]
    min_width: u32,

    /// Maximum codeword width in bits; the codebook holds 2^maxW entries
    #[arg(long = "maxW", default_value_t = 16, value_name = "N")]
    max_width: u32,

    /// Policy when the codebook fills; unknown names fall back to freeze
    #[arg(long, default_value = "freeze", value_parser = parse_policy, value_name = "NAME")]
    policy: Policy,

    /// Show timing and size statistics on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Read raw bytes from stdin, write the compressed stream to stdout
    Compress,
    /// Read a compressed stream from stdin, write raw bytes to stdout
    Expand,
}

/// Never fails: unrecognized policy names mean freeze, matching the
/// fallback the decoder applies to unknown header bytes.
fn parse_policy(name: &str) -> Result<Policy, String> {
    Ok(Policy::from_name(name))
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                // Unrecognized option tokens are distinguished from merely
                // missing or malformed arguments.
                ErrorKind::UnknownArgument => 2,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    // Diagnostics print bare, with no prefix; the error texts carry the
    // full message.
    if let Err(e) = run(&args) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.mode {
        Mode::Compress => run_compress(args),
        Mode::Expand => run_expand(args),
    }
}

fn run_compress(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.alphabet.as_ref().ok_or(
        "Missing required argument: --alphabet is required for compression mode",
    )?;

    if args.max_width > 32 {
        eprintln!(
            "Warning: --maxW ({}) is very large, may cause issues",
            args.max_width
        );
    }

    let text = fs::read(path).map_err(|_| {
        format!(
            "Failed to load alphabet: Could not read file '{}' (file may not exist or is not readable)",
            path.display()
        )
    })?;
    let alphabet = Alphabet::parse(&text);

    let options = CompressOptions {
        min_width: args.min_width,
        max_width: args.max_width,
        policy: args.policy,
    };

    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;

    let start = Instant::now();
    let output = compress(&input, &alphabet, &options)?;
    let elapsed = start.elapsed();

    io::stdout().lock().write_all(&output)?;

    if args.verbose {
        eprintln!(
            "Compressed {} bytes to {} bytes in {:.2?}",
            input.len(),
            output.len(),
            elapsed
        );
        eprintln!(
            "  Alphabet: {} symbols, policy: {}, widths: {}..{}",
            alphabet.len(),
            options.policy,
            options.min_width,
            options.max_width
        );
    }

    Ok(())
}

fn run_expand(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;

    let start = Instant::now();
    let output = expand(&input)?;
    let elapsed = start.elapsed();

    io::stdout().lock().write_all(&output)?;

    if args.verbose {
        eprintln!(
            "Expanded {} bytes to {} bytes in {:.2?}",
            input.len(),
            output.len(),
            elapsed
        );
    }

    Ok(())
}
