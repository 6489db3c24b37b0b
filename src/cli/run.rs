use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::{AnnotatedMatch, StitchedMatch};
use crate::matching::Backend;
use crate::parsing::{fasta, table};
use crate::pipeline;
use crate::store::{JsonFileStore, ResultStore};

#[derive(Args)]
pub struct RunArgs {
    /// Query sequence file (plain or .gz)
    #[arg(required = true)]
    pub query: PathBuf,

    /// Reference ("hit") sequence file (plain or .gz)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Window size
    #[arg(short, long)]
    pub k: usize,

    /// Positional reference table (CSV, or TSV by extension); enables annotation
    #[arg(long)]
    pub epitopes: Option<PathBuf>,

    /// Common-substring search strategy
    #[arg(long, value_enum, default_value = "auto")]
    pub backend: BackendChoice,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Append annotated results to a JSON store file (requires --epitopes)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum BackendChoice {
    Auto,
    Index,
    Scan,
    External,
}

impl From<BackendChoice> for Backend {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Auto => Backend::Auto,
            BackendChoice::Index => Backend::Index,
            BackendChoice::Scan => Backend::Scan,
            BackendChoice::External => Backend::External,
        }
    }
}

/// Execute the run subcommand
///
/// # Errors
///
/// Returns an error if any input cannot be parsed or the pipeline fails.
pub fn run(args: RunArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.store.is_some() && args.epitopes.is_none() {
        anyhow::bail!("--store requires --epitopes (only annotated results are stored)");
    }

    // Parameter errors come before any file is touched
    if let Some(msg) = crate::utils::validation::check_k(args.k) {
        anyhow::bail!("invalid parameter: {msg}");
    }

    let queries = fasta::read_sequences(&args.query)
        .with_context(|| format!("reading query sequences from {}", args.query.display()))?;
    let hits = fasta::read_sequences(&args.reference)
        .with_context(|| format!("reading reference sequences from {}", args.reference.display()))?;

    if verbose {
        eprintln!(
            "Parsed {} query and {} reference sequences",
            queries.len(),
            hits.len()
        );
    }

    let backend = Backend::from(args.backend);
    let output = match &args.epitopes {
        Some(table_path) => {
            let reference = table::parse_table_file(table_path)
                .with_context(|| format!("reading reference table from {}", table_path.display()))?;
            let annotated = pipeline::run(&queries, &hits, &reference, args.k, backend)?;

            if let Some(store_path) = &args.store {
                let mut store = JsonFileStore::new(store_path);
                let written = store.append(&annotated)?;
                if verbose {
                    eprintln!("Appended {written} rows to {}", store_path.display());
                }
            }

            render_annotated(&annotated, format)?
        }
        None => {
            let stitched = pipeline::run_matching(&queries, &hits, args.k, backend)?;
            render_stitched(&stitched, format)?
        }
    };

    match &args.out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("writing output to {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}

const STITCHED_COLUMNS: &[&str] = &[
    "merged_motif",
    "query_protein_name",
    "query_protein_length",
    "motif_length",
    "query_start",
    "query_end",
    "hit_protein_name",
    "hit_protein_length",
    "hit_start",
    "hit_end",
];

const COUNTER_COLUMNS: &[&str] = &[
    "substring_count",
    "reference_data_count",
    "fully_contained_count",
    "partial_overlap_count",
];

fn stitched_row(m: &StitchedMatch) -> Vec<String> {
    vec![
        m.merged_text.clone(),
        m.query_protein.clone(),
        m.query_length.to_string(),
        m.length.to_string(),
        m.query_start.to_string(),
        m.query_end.to_string(),
        m.hit_protein.clone(),
        m.hit_length.to_string(),
        m.hit_start.to_string(),
        m.hit_end.to_string(),
    ]
}

fn render_stitched(matches: &[StitchedMatch], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(matches)? + "\n"),
        OutputFormat::Tsv => Ok(render_tsv(
            STITCHED_COLUMNS.iter().copied(),
            matches.iter().map(stitched_row),
        )),
        OutputFormat::Text => {
            let mut out = format!("{} stitched motif(s)\n", matches.len());
            for m in matches {
                out.push_str(&format!(
                    "{}  {} [{}..{}] ~ {} [{}..{}]  len={}\n",
                    m.merged_text,
                    m.query_protein,
                    m.query_start,
                    m.query_end,
                    m.hit_protein,
                    m.hit_start,
                    m.hit_end,
                    m.length
                ));
            }
            Ok(out)
        }
    }
}

fn render_annotated(matches: &[AnnotatedMatch], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(matches)? + "\n"),
        OutputFormat::Tsv => Ok(render_tsv(
            STITCHED_COLUMNS.iter().chain(COUNTER_COLUMNS).copied(),
            matches.iter().map(|m| {
                let mut row = stitched_row(&m.motif);
                row.push(m.substring_count.to_string());
                row.push(m.reference_data_count.to_string());
                row.push(m.fully_contained_count.to_string());
                row.push(m.partial_overlap_count.to_string());
                row
            }),
        )),
        OutputFormat::Text => {
            let mut out = format!("{} annotated motif(s)\n", matches.len());
            for m in matches {
                out.push_str(&format!(
                    "{}  {} [{}..{}] ~ {} [{}..{}]  substr={} data={} full={} overlap={}\n",
                    m.motif.merged_text,
                    m.motif.query_protein,
                    m.motif.query_start,
                    m.motif.query_end,
                    m.motif.hit_protein,
                    m.motif.hit_start,
                    m.motif.hit_end,
                    m.substring_count,
                    m.reference_data_count,
                    m.fully_contained_count,
                    m.partial_overlap_count
                ));
            }
            Ok(out)
        }
    }
}

fn render_tsv<'a>(
    columns: impl Iterator<Item = &'a str>,
    rows: impl Iterator<Item = Vec<String>>,
) -> String {
    let mut out = columns.collect::<Vec<_>>().join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}
