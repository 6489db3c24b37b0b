//! Command-line interface for motif-scan.
//!
//! Available commands:
//!
//! - **run**: execute the pipeline — find common k-mers between a query
//!   and a reference sequence set, stitch them into motifs, and (when a
//!   positional table is supplied) annotate them
//! - **kmers**: list the k-mers of a sequence file, for inspection
//!
//! ## Usage
//!
//! ```text
//! # Match and stitch only
//! motif-scan run query.fasta human.fasta -k 6
//!
//! # Full pipeline with annotation, TSV output
//! motif-scan run query.fasta human.fasta -k 6 --epitopes iedb.csv --format tsv
//!
//! # Bounded-memory join for large inputs
//! motif-scan run query.fasta human.fasta -k 6 --backend external
//!
//! # Append annotated results to a store file
//! motif-scan run query.fasta human.fasta -k 6 --epitopes iedb.csv --store results.json
//! ```

use clap::{Parser, Subcommand};

pub mod kmers;
pub mod run;

#[derive(Parser)]
#[command(name = "motif-scan")]
#[command(version)]
#[command(about = "Find, stitch, and annotate shared fixed-length motifs between sequence sets")]
#[command(
    long_about = "motif-scan locates shared substrings of fixed length k between a query sequence set and a reference sequence set, merges adjacent matches into maximal contiguous motifs, and annotates each motif against a positional reference table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the matching pipeline
    Run(run::RunArgs),

    /// List the k-mers of a sequence file
    Kmers(kmers::KmersArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
