//! deckvoice - pronunciation audio batch generator
//!
//! Walks every record in a flashcard collection, renders the term field as
//! speech through an external synthesizer, transcodes it to MP3 in the
//! collection's media directory, and writes a `[sound:...]` reference into
//! the record's audio field.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckvoice::batch::BatchRunner;
use deckvoice::config::{Config, ConfigOverrides};
use deckvoice::db::Collection;
use deckvoice::pipeline::MediaPipeline;
use deckvoice::services::{AudioTranscoder, SpeechSynthesizer};

/// Command-line arguments for deckvoice
#[derive(Parser, Debug)]
#[command(name = "deckvoice")]
#[command(about = "Batch pronunciation audio generator for flashcard collections")]
#[command(version)]
struct Args {
    /// Path to the SQLite collection file
    #[arg(env = "DECKVOICE_COLLECTION")]
    collection: PathBuf,

    /// Media directory (default: <collection-stem>.media beside the collection)
    #[arg(short, long, env = "DECKVOICE_MEDIA_DIR")]
    media_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/deckvoice/config.toml)
    #[arg(short, long, env = "DECKVOICE_CONFIG")]
    config: Option<PathBuf>,

    /// Name of the record field holding the term
    #[arg(long, env = "DECKVOICE_TERM_FIELD")]
    term_field: Option<String>,

    /// Synthesizer voice
    #[arg(long, env = "DECKVOICE_VOICE")]
    voice: Option<String>,

    /// Regenerate assets that already exist, without prompting
    #[arg(long, conflicts_with = "keep_existing")]
    replace: bool,

    /// Keep assets that already exist, without prompting
    #[arg(long)]
    keep_existing: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(
        args.collection,
        args.config.as_deref(),
        ConfigOverrides {
            media_dir: args.media_dir,
            term_field: args.term_field,
            voice: args.voice,
        },
    )
    .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting deckvoice {}", env!("CARGO_PKG_VERSION"));
    info!("Collection: {}", config.collection_path.display());
    info!("Voice: {}", config.synthesizer.voice);

    let replace_existing = if args.replace {
        true
    } else if args.keep_existing {
        false
    } else {
        confirm_replace().context("Failed to read answer")?
    };

    let collection = Collection::open(&config.collection_path, config.media_dir.clone())
        .await
        .context("Failed to open collection")?;

    let synthesizer = SpeechSynthesizer::new(config.synthesizer.clone())
        .await
        .context("Speech synthesizer unavailable")?;
    let transcoder = AudioTranscoder::new(config.transcoder.clone())
        .await
        .context("Audio transcoder unavailable")?;

    let pipeline = MediaPipeline::new(
        collection.media_dir().to_path_buf(),
        synthesizer,
        transcoder,
    );
    let runner = BatchRunner::new(&collection, &pipeline, config.term_field.clone());

    let summary = runner
        .run(replace_existing)
        .await
        .context("Batch failed to start")?;

    println!(
        "Processed {} records: {} generated, {} reused, {} skipped, {} failed",
        summary.records_seen, summary.generated, summary.reused, summary.skipped, summary.failed
    );

    Ok(())
}

/// Ask whether existing assets should be regenerated. Defaults to no on
/// empty input or EOF, so non-interactive runs keep existing assets.
fn confirm_replace() -> Result<bool> {
    print!("Replace existing audio files? [y/N]: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase().starts_with('y'))
}
