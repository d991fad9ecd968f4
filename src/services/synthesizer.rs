//! Speech synthesizer invocation
//!
//! Wraps the external text-to-speech tool (macOS `say` by default). One
//! invocation renders one term to an uncompressed waveform file, which the
//! transcoder then turns into the final asset.

use crate::config::SynthesizerConfig;
use crate::error::{Error, Result};
use crate::services::{resolve_program, run_tool};
use crate::term::Term;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// External speech synthesizer.
pub struct SpeechSynthesizer {
    config: SynthesizerConfig,
}

impl SpeechSynthesizer {
    /// Create the synthesizer, verifying the configured program is
    /// invocable. Fails before any record is processed if it is not.
    pub async fn new(config: SynthesizerConfig) -> Result<Self> {
        resolve_program(&config.program).await?;
        Ok(Self { config })
    }

    /// Render `term` as speech into the waveform file at `output`.
    ///
    /// Invocation shape: `<program> -v <voice> -o <output>
    /// --data-format=LEF32@<rate> <term>`. Non-zero exit, spawn failure,
    /// and timeout all map to `Error::Synthesis` carrying the term and the
    /// tool's stderr.
    pub async fn synthesize(&self, term: &Term, output: &Path) -> Result<()> {
        debug!(term = %term, output = %output.display(), "Synthesizing speech");

        let args = self.build_args(term, output);
        run_tool(
            &self.config.program,
            &args,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await
        .map_err(|message| Error::Synthesis {
            term: term.as_str().to_string(),
            message,
        })
    }

    fn build_args(&self, term: &Term, output: &Path) -> Vec<OsString> {
        vec![
            OsString::from("-v"),
            OsString::from(&self.config.voice),
            OsString::from("-o"),
            output.as_os_str().to_owned(),
            OsString::from(format!("--data-format=LEF32@{}", self.config.sample_rate)),
            OsString::from(term.as_str()),
        ]
    }
}
