use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::kmer;
use crate::parsing::fasta;

#[derive(Args)]
pub struct KmersArgs {
    /// Sequence file (plain or .gz)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Window size
    #[arg(short, long)]
    pub k: usize,
}

/// Execute the kmers subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed or `k` is out of bounds.
pub fn run(args: KmersArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if let Some(msg) = crate::utils::validation::check_k(args.k) {
        anyhow::bail!("invalid parameter: {msg}");
    }

    let sequences = fasta::read_sequences(&args.input)
        .with_context(|| format!("reading sequences from {}", args.input.display()))?;
    let kmers = kmer::generate(&sequences, args.k)?;

    if verbose {
        eprintln!(
            "Generated {} k-mers from {} sequences",
            kmers.len(),
            sequences.len()
        );
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&kmers)?),
        OutputFormat::Tsv | OutputFormat::Text => {
            println!("source_name\tsource_length\tstart\tend\tkmer\tk");
            for kmer in &kmers {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    kmer.source_name, kmer.source_length, kmer.start, kmer.end, kmer.text, kmer.k
                );
            }
        }
    }
    Ok(())
}
