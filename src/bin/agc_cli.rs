use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use agc_rs::align::nw_aligner::{DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN};
use agc_rs::cluster::{DEFAULT_CHUNK_SIZE, DEFAULT_KMER_SIZE, IDENTITY_THRESHOLD};
use agc_rs::fasta::check_input_file;
use agc_rs::{cluster_amplicons, ClusterParams, ClusteringOptions};

/// OTU clustering: abundance-ordered greedy clustering of amplicon reads.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Amplicon file in FASTA format, gzip-compressed if it ends with .gz
    #[arg(short = 'i', long, alias = "amplicon_file", env = "AGC_AMPLICON_FILE",
          value_name = "FILE", value_parser = existing_file)]
    amplicon_file: PathBuf,

    /// Minimum sequence length for dereplication
    #[arg(short = 's', long, env = "AGC_MINSEQLEN", default_value_t = agc_rs::DEFAULT_MIN_SEQ_LEN)]
    minseqlen: usize,

    /// Minimum count for dereplication
    #[arg(short = 'm', long, env = "AGC_MINCOUNT", default_value_t = agc_rs::DEFAULT_MIN_COUNT)]
    mincount: usize,

    /// Output file
    #[arg(short = 'o', long, alias = "output_file", env = "AGC_OUTPUT_FILE",
          value_name = "FILE", default_value = agc_rs::DEFAULT_OUTPUT_FILE)]
    output_file: PathBuf,

    /// Chunk size (accepted, currently unused)
    #[arg(short = 'c', long, alias = "chunk_size", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// K-mer size (accepted, currently unused)
    #[arg(short = 'k', long, alias = "kmer_size", default_value_t = DEFAULT_KMER_SIZE)]
    kmer_size: usize,

    /// Substitution matrix in NCBI format (default: bundled MATCH)
    #[arg(long, env = "AGC_MATRIX", value_name = "FILE")]
    matrix: Option<PathBuf>,

    /// Score added when a gap opens (negative to penalise)
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_GAP_OPEN)]
    gap_open: i32,

    /// Score added for each further gap column
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_GAP_EXTEND)]
    gap_extend: i32,

    /// Identity (percent) at which a sequence joins an existing OTU
    #[arg(long, default_value_t = IDENTITY_THRESHOLD)]
    identity: f64,

    /// Compare each sequence against the OTUs on all cores
    #[arg(long)]
    parallel: bool,
}

fn existing_file(path: &str) -> Result<PathBuf, String> {
    check_input_file(path).map_err(|e| e.to_string())
}

fn spinner(color: &str, message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&format!("{{spinner:.{color}}} {{msg}}"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = ClusteringOptions {
        min_seq_len: args.minseqlen,
        min_count: args.mincount,
        matrix_path: args.matrix,
        gap_open: args.gap_open,
        gap_extend: args.gap_extend,
        params: ClusterParams {
            identity_threshold: args.identity,
            chunk_size: args.chunk_size,
            kmer_size: args.kmer_size,
            parallel: args.parallel,
        },
    };

    // 1. Dereplicate and cluster
    let progress = spinner("green", "Clustering amplicons...");
    let results = match cluster_amplicons(&args.amplicon_file, &options) {
        Ok(results) => results,
        Err(e) => {
            progress.abandon_with_message("Clustering failed.");
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    progress.finish_with_message(format!(
        "{} OTUs from {} dereplicated sequences.",
        results.otus.len(),
        results.dereplicated_count
    ));

    // 2. Write the OTUs
    let progress = spinner("yellow", "Writing OTU file...");
    if let Err(e) = results.write(&args.output_file) {
        progress.abandon_with_message("Writing failed.");
        log::error!("{}: {}", args.output_file.display(), e);
        return ExitCode::FAILURE;
    }
    progress.finish_with_message(format!("Wrote {}", args.output_file.display()));

    ExitCode::SUCCESS
}
