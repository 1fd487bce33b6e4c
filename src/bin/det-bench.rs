use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use det_verify::{
    public_key_from_file_contents, run_benchmark, samples, BenchConfig, BenchmarkError,
    BenchmarkReport, Comparison, Corruption, Crypto, DatasetSpec, PhaseSummary,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_SUBSYSTEM_INIT: u8 = 3;
const EXIT_SELF_TEST: u8 = 4;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CorruptionKind {
    FlipByte,
    FlipBit,
    Truncate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Csv,
}

/// Verify a signed DET wrapper, then benchmark batch verification
/// sequentially and on a worker pool.
#[derive(Debug, Parser)]
#[command(version)]
struct Arguments {
    /// Expected Ed25519 public key (64 hex characters). Defaults to the bundled sample key.
    #[arg(long, conflicts_with = "public_key_file")]
    public_key: Option<String>,

    /// File holding the public key, as 64 hex characters or 32 raw bytes.
    /// A file consisting only of hex digits is always read as hex.
    #[arg(long)]
    public_key_file: Option<PathBuf>,

    /// Expected identity token (32 hex characters, any case).
    #[arg(long, default_value = samples::DET_HEX)]
    expected_token: String,

    /// Canonical wrapper, hex encoded.
    #[arg(long, default_value = samples::WRAPPER_HEX)]
    wrapper: String,

    /// Number of genuine copies in the dataset.
    #[arg(long, default_value_t = 1000)]
    valid: usize,

    /// Number of corrupted copies in the dataset.
    #[arg(long, default_value_t = 500)]
    corrupted: usize,

    #[arg(long, value_enum, default_value_t = CorruptionKind::FlipByte)]
    corruption: CorruptionKind,

    /// Byte offset (flip-byte), bit index (flip-bit) or kept length (truncate).
    #[arg(long, default_value_t = 10)]
    corrupt_offset: usize,

    /// XOR mask for flip-byte.
    #[arg(long, default_value_t = 0xff)]
    corrupt_mask: u8,

    /// Parallel worker count; 0 uses every available CPU.
    #[arg(long, default_value_t = 0)]
    workers: usize,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

impl Arguments {
    fn corruption(&self) -> Corruption {
        match self.corruption {
            CorruptionKind::FlipByte => Corruption::FlipByte {
                offset: self.corrupt_offset,
                mask: self.corrupt_mask,
            },
            CorruptionKind::FlipBit => Corruption::FlipBit {
                bit: self.corrupt_offset,
            },
            CorruptionKind::Truncate => Corruption::Truncate {
                len: self.corrupt_offset,
            },
        }
    }

    fn config(&self) -> anyhow::Result<BenchConfig> {
        let mut config = BenchConfig::from_hex(
            self.public_key.as_deref().unwrap_or(samples::PUBLIC_KEY_HEX),
            &self.expected_token,
            &self.wrapper,
        )?;
        if let Some(path) = &self.public_key_file {
            let contents =
                fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            config.public_key = public_key_from_file_contents(&contents)?;
        }
        config.dataset = DatasetSpec {
            valid: self.valid,
            corrupted: self.corrupted,
            corruption: self.corruption(),
        };
        config.workers = NonZeroUsize::new(self.workers);
        Ok(config)
    }
}

#[derive(Debug)]
struct Record<'a> {
    phase: &'a str,
    mode: &'a str,
    workers: usize,
    summary: PhaseSummary,
}

impl Record<'_> {
    fn print_csv_header<W: io::Write>(out: &mut W) -> io::Result<()> {
        writeln!(out, "phase,mode,workers,items,valid,invalid,wall_ms,per_sec")
    }

    fn print_csv<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{},{},{},{},{},{},{:.3},{}",
            self.phase,
            self.mode,
            self.workers,
            self.summary.items(),
            self.summary.tally.valid,
            self.summary.tally.invalid,
            self.summary.wall.as_secs_f64() * 1e3,
            self.summary
                .throughput()
                .map_or_else(String::new, |rate| format!("{rate:.1}")),
        )
    }
}

fn print_csv<W: io::Write>(report: &BenchmarkReport, out: &mut W) -> io::Result<()> {
    Record::print_csv_header(out)?;
    let phases: [(&str, &Comparison); 2] =
        [("full", &report.full), ("corrupted-only", &report.corrupted_only)];
    for (phase, comparison) in phases {
        for (mode, workers, summary) in [
            ("sequential", 1, comparison.sequential),
            ("parallel", report.workers, comparison.parallel),
        ] {
            Record {
                phase,
                mode,
                workers,
                summary,
            }
            .print_csv(out)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Arguments::parse();
    let config = match args.config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {err:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let crypto = match Crypto::init() {
        Ok(crypto) => crypto,
        Err(err) => {
            tracing::error!(%err, "crypto subsystem initialization failed");
            return ExitCode::from(EXIT_SUBSYSTEM_INIT);
        }
    };

    let report = match run_benchmark(&crypto, &config) {
        Ok(report) => report,
        Err(err @ BenchmarkError::SelfTest(_)) => {
            tracing::error!(%err, "single wrapper verification failed");
            return ExitCode::from(EXIT_SELF_TEST);
        }
        Err(err @ (BenchmarkError::PublicKey(_) | BenchmarkError::Dataset(_))) => {
            tracing::error!(%err, "invalid configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
        Err(err) => {
            tracing::error!(%err, "benchmark failed");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let mut out = io::stdout().lock();
    let written = match args.format {
        Format::Text => {
            use std::io::Write as _;
            write!(out, "{report}")
        }
        Format::Csv => print_csv(&report, &mut out),
    };
    if let Err(err) = written {
        tracing::error!(%err, "writing report");
        return ExitCode::from(EXIT_FAILURE);
    }
    ExitCode::SUCCESS
}
