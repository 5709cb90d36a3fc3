//! song-adder - provenance records for MP3 files
//!
//! Fingerprints the audio payload of a file, validates the operator's
//! metadata, and writes a tagged copy carrying a canonical provenance
//! record in an ID3 comment frame.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use songmark::build_info;
use songmark::config::AdderConfig;
use songmark::models::{FieldName, FieldSet};
use songmark::services::{self, tag_writer, PayloadValidator};
use songmark::workflow::AdderSession;
use songmark_common::time;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line arguments for song-adder
#[derive(Parser, Debug)]
#[command(name = "song-adder")]
#[command(about = "Embed content-addressed provenance records in MP3 files")]
#[command(version = build_info::LONG_VERSION)]
struct Cli {
    /// Config file (overrides SONGMARK_CONFIG and the per-user file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the content fingerprint of a file
    Hash { file: PathBuf },

    /// Print the embedded record, tags and audio properties of a file
    Show { file: PathBuf },

    /// Check field values against every rule and list all violations
    Check {
        #[command(flatten)]
        fields: FieldArgs,

        /// Fingerprint to check alongside the fields (not required when omitted)
        #[arg(long)]
        hash: Option<String>,
    },

    /// Build the record and show what would be written
    Preview {
        file: PathBuf,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Write a tagged copy of FILE carrying the record
    Engrave {
        file: PathBuf,

        /// Directory for the output file
        #[arg(long)]
        out_dir: PathBuf,

        /// Front cover image (JPEG or PNG)
        #[arg(long)]
        cover: Option<PathBuf>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Check every MP3 below DIR against its embedded record
    Verify { dir: PathBuf },
}

/// Record fields; omitted flags keep the value already embedded in the file,
/// an empty value clears it
#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Release date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    artist: Option<String>,

    #[arg(long)]
    cover_artist: Option<String>,

    /// Model version (MAJOR or MAJOR.MINOR)
    #[arg(long = "model-version")]
    version: Option<String>,

    #[arg(long)]
    disc: Option<String>,

    /// Track number, N or X/Y
    #[arg(long)]
    track: Option<String>,

    #[arg(long)]
    comment: Option<String>,

    #[arg(long)]
    special: Option<String>,
}

impl FieldArgs {
    /// Fields given on the command line, empty values included
    fn values(&self) -> impl Iterator<Item = (FieldName, &str)> {
        [
            (FieldName::Date, &self.date),
            (FieldName::Title, &self.title),
            (FieldName::Artist, &self.artist),
            (FieldName::CoverArtist, &self.cover_artist),
            (FieldName::Version, &self.version),
            (FieldName::Discnumber, &self.disc),
            (FieldName::Track, &self.track),
            (FieldName::Comment, &self.comment),
            (FieldName::Special, &self.special),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AdderConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    songmark_common::logging::init_logging(&config.logging, cli.verbose)
        .context("Failed to initialize logging")?;

    info!(
        version = build_info::VERSION,
        git = build_info::GIT_HASH,
        built = build_info::BUILD_TIMESTAMP,
        profile = build_info::BUILD_PROFILE,
        started = %time::now(),
        "Starting song-adder"
    );

    match cli.command {
        Command::Hash { file } => cmd_hash(&file),
        Command::Show { file } => cmd_show(&file),
        Command::Check { fields, hash } => cmd_check(&config, &fields, hash),
        Command::Preview { file, fields } => cmd_preview(&config, &file, &fields),
        Command::Engrave {
            file,
            out_dir,
            cover,
            fields,
        } => cmd_engrave(&config, &file, &out_dir, cover.as_deref(), &fields),
        Command::Verify { dir } => cmd_verify(&dir),
    }
}

fn cmd_hash(file: &Path) -> Result<()> {
    let fingerprint = services::fingerprint_file(file)?;
    println!("{}", fingerprint);
    Ok(())
}

fn cmd_show(file: &Path) -> Result<()> {
    println!("File: {}", file.display());

    match tag_writer::read_record(file)? {
        Some(record) => {
            println!("Record:");
            for (key, value) in record.entries() {
                println!("  {:<12} {}", key, value);
            }
        }
        None => println!("Record: none"),
    }

    if let Some(tags) = tag_writer::read_descriptive_tags(file)? {
        println!("Tags:");
        for (id, value) in tags.frames() {
            if !value.is_empty() {
                println!("  {:<12} {}", id, value);
            }
        }
    }

    if let Some(props) = tag_writer::probe_audio_properties(file) {
        println!("Audio:");
        println!("  {:<12} {:.1}s", "duration", props.duration_seconds);
        if let Some(kbps) = props.bitrate_kbps {
            println!("  {:<12} {} kbps", "bitrate", kbps);
        }
        if let Some(rate) = props.sample_rate {
            println!("  {:<12} {} Hz", "sample rate", rate);
        }
        if let Some(channels) = props.channels {
            println!("  {:<12} {}", "channels", channels);
        }
    }

    Ok(())
}

fn cmd_check(config: &AdderConfig, fields: &FieldArgs, hash: Option<String>) -> Result<()> {
    let validator = PayloadValidator::with_policy(config.validation.clone());
    let fields = FieldSet::default().apply(fields.values());

    let today = time::today();
    let violations = validator.collect_field_violations(&fields, hash.as_deref(), today);
    if violations.is_empty() {
        println!("All fields valid (as of {})", time::format_record_date(today));
        return Ok(());
    }

    for violation in &violations {
        println!("  {:<12} {}", violation.field().key(), violation);
    }
    bail!("{} rule violation(s)", violations.len());
}

/// Load `file` into a session and preview the merged fields
fn prepare(config: &AdderConfig, file: &Path, fields: &FieldArgs) -> Result<AdderSession> {
    let mut session = AdderSession::new(config);
    let prefill = session
        .load_file(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let merged = prefill.apply(fields.values());

    let preview = session.preview(&merged, time::today())?;
    for (id, value) in preview.lines() {
        println!("  {:<9} {}", id, value);
    }

    Ok(session)
}

fn cmd_preview(config: &AdderConfig, file: &Path, fields: &FieldArgs) -> Result<()> {
    prepare(config, file, fields)?;
    Ok(())
}

fn cmd_engrave(
    config: &AdderConfig,
    file: &Path,
    out_dir: &Path,
    cover: Option<&Path>,
    fields: &FieldArgs,
) -> Result<()> {
    let mut session = prepare(config, file, fields)?;
    let output = session.generate(out_dir, cover)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn cmd_verify(dir: &Path) -> Result<()> {
    let report = services::verify_library(dir)?;

    for (path, outcome) in &report.entries {
        println!("{}  {}", outcome, path.display());
    }
    println!(
        "{} files: {} verified, {} mismatched, {} without record, {} unreadable",
        report.entries.len(),
        report.verified(),
        report.mismatched(),
        report.missing(),
        report.unreadable()
    );

    if !report.all_verified() {
        bail!("Library verification found problems");
    }
    Ok(())
}
