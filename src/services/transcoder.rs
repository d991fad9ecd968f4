//! Audio transcoder invocation
//!
//! Wraps the external transcoder (ffmpeg by default) that compresses the
//! synthesizer's waveform output into the final MP3 asset.

use crate::config::TranscoderConfig;
use crate::error::{Error, Result};
use crate::services::{resolve_program, run_tool};
use crate::term::Term;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// External audio transcoder.
pub struct AudioTranscoder {
    config: TranscoderConfig,
}

impl AudioTranscoder {
    /// Create the transcoder, verifying the configured program is
    /// invocable. Fails before any record is processed if it is not.
    pub async fn new(config: TranscoderConfig) -> Result<Self> {
        resolve_program(&config.program).await?;
        Ok(Self { config })
    }

    /// Transcode the waveform at `input` into a compressed file at
    /// `output`, overwriting it if present.
    ///
    /// Invocation shape: `<program> -y -i <input> -codec:a <codec>
    /// -qscale:a <quality> <output>`. Failures map to `Error::Transcode`
    /// carrying the term and the tool's stderr.
    pub async fn transcode(&self, term: &Term, input: &Path, output: &Path) -> Result<()> {
        debug!(
            input = %input.display(),
            output = %output.display(),
            "Transcoding audio"
        );

        let args = self.build_args(input, output);
        run_tool(
            &self.config.program,
            &args,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await
        .map_err(|message| Error::Transcode {
            term: term.as_str().to_string(),
            message,
        })
    }

    fn build_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            OsString::from("-y"),
            OsString::from("-i"),
            input.as_os_str().to_owned(),
            OsString::from("-codec:a"),
            OsString::from(&self.config.codec),
            OsString::from("-qscale:a"),
            OsString::from(self.config.quality.to_string()),
            output.as_os_str().to_owned(),
        ]
    }
}
