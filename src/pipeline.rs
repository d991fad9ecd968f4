//! Media asset pipeline
//!
//! Turns a normalized term into an MP3 asset in the shared media directory
//! and hands back the reference to store in the record. Generation runs in
//! two external steps (synthesize to a waveform, transcode to MP3) with a
//! temp-file protocol that never leaves partial output at the final path.

use crate::error::Result;
use crate::services::{AudioTranscoder, SpeechSynthesizer};
use crate::term::Term;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Reference to a media asset, stored verbatim in the record's audio field.
///
/// The host application resolves `[sound:<filename>]` markup against the
/// shared media directory, so the format must not vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReference {
    stem: String,
}

impl AudioReference {
    pub fn for_term(term: &Term) -> Self {
        Self { stem: term.stem() }
    }

    /// Asset filename within the media directory.
    pub fn filename(&self) -> String {
        format!("{}.mp3", self.stem)
    }

    /// Value written to the record's audio field.
    pub fn field_value(&self) -> String {
        format!("[sound:{}.mp3]", self.stem)
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }
}

/// How `ensure_audio` satisfied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetAction {
    /// The asset already existed and was reused without invoking any tool.
    Reused,
    /// The asset was (re)generated.
    Generated,
}

/// Result of ensuring a term's audio asset exists.
#[derive(Debug, Clone)]
pub struct EnsureOutcome {
    pub reference: AudioReference,
    pub action: AssetAction,
}

/// Generates pronunciation assets into one shared media directory.
pub struct MediaPipeline {
    media_dir: PathBuf,
    synthesizer: SpeechSynthesizer,
    transcoder: AudioTranscoder,
}

impl MediaPipeline {
    pub fn new(
        media_dir: PathBuf,
        synthesizer: SpeechSynthesizer,
        transcoder: AudioTranscoder,
    ) -> Self {
        Self {
            media_dir,
            synthesizer,
            transcoder,
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Ensure an MP3 asset exists for `term` and return its reference.
    ///
    /// Idempotent: if the asset already exists and `replace_existing` is
    /// false, it is reused without invoking any external tool. Otherwise
    /// the pipeline synthesizes a waveform to a uniquely named temp file,
    /// transcodes it to a staging file, and renames the staging file over
    /// the final path, so a failure part-way never damages an asset that
    /// already existed. Temp files are removed on success and failure
    /// alike.
    pub async fn ensure_audio(
        &self,
        term: &Term,
        replace_existing: bool,
    ) -> Result<EnsureOutcome> {
        let reference = AudioReference::for_term(term);
        let final_path = self.media_dir.join(reference.filename());

        if !replace_existing && is_existing_asset(&final_path).await {
            debug!(term = %term, file = %final_path.display(), "Reusing existing audio asset");
            return Ok(EnsureOutcome {
                reference,
                action: AssetAction::Reused,
            });
        }

        // Unique token keeps concurrent or crashed runs from colliding on
        // temp names. The token alphabet is filename-safe.
        let token = Uuid::new_v4();
        let intermediate = self
            .media_dir
            .join(format!("{}_{}.aiff", reference.stem(), token));
        let staging = self
            .media_dir
            .join(format!("{}_{}.mp3", reference.stem(), token));

        let result = self
            .generate(term, &intermediate, &staging, &final_path)
            .await;

        // Both temp files are removed whether generation succeeded or not.
        // After a successful rename the staging file is already gone.
        let _ = tokio::fs::remove_file(&intermediate).await;
        let _ = tokio::fs::remove_file(&staging).await;

        result?;

        info!(term = %term, file = %final_path.display(), "Generated audio asset");
        Ok(EnsureOutcome {
            reference,
            action: AssetAction::Generated,
        })
    }

    async fn generate(
        &self,
        term: &Term,
        intermediate: &Path,
        staging: &Path,
        final_path: &Path,
    ) -> Result<()> {
        self.synthesizer.synthesize(term, intermediate).await?;
        self.transcoder.transcode(term, intermediate, staging).await?;
        tokio::fs::rename(staging, final_path).await?;
        Ok(())
    }
}

/// A usable existing asset is a non-empty regular file. A zero-length file
/// is treated as absent: a crashed transcoder may have left it behind.
async fn is_existing_asset(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}
