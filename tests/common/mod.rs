//! Shared fixtures for integration tests
//!
//! Generation is exercised end to end against fake synthesizer and
//! transcoder executables: small shell scripts that append each invocation
//! to a log file so tests can assert how often (and whether) the external
//! tools ran.

#![allow(dead_code)]

use deckvoice::config::{SynthesizerConfig, TranscoderConfig};
use deckvoice::pipeline::MediaPipeline;
use deckvoice::services::{AudioTranscoder, SpeechSynthesizer};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Write an executable script to `path`.
pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).unwrap();
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

/// Synthesizer stand-in: logs the call and writes fake waveform bytes to
/// the `-o` argument.
pub fn synth_ok_script(log: &Path) -> String {
    format!(
        r#"#!/bin/sh
echo "synth $*" >> "{log}"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
printf 'AIFFDATA' > "$out"
"#,
        log = log.display()
    )
}

/// Synthesizer stand-in that always fails with stderr output.
pub fn synth_fail_script(log: &Path) -> String {
    format!(
        r#"#!/bin/sh
echo "synth $*" >> "{log}"
echo "voice module crashed" >&2
exit 1
"#,
        log = log.display()
    )
}

/// Synthesizer stand-in that fails only when the argv contains `marker`.
pub fn synth_fail_on_script(log: &Path, marker: &str) -> String {
    format!(
        r#"#!/bin/sh
echo "synth $*" >> "{log}"
case "$*" in
  *{marker}*)
    echo "cannot pronounce" >&2
    exit 1
    ;;
esac
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
printf 'AIFFDATA' > "$out"
"#,
        log = log.display(),
        marker = marker
    )
}

/// Transcoder stand-in: logs the call and writes the `-i` input's bytes,
/// prefixed, to the last argument.
pub fn transcode_ok_script(log: &Path) -> String {
    format!(
        r#"#!/bin/sh
echo "transcode $*" >> "{log}"
in=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-i" ]; then in="$a"; fi
  prev="$a"
done
for a in "$@"; do out="$a"; done
printf 'MP3:' > "$out"
cat "$in" >> "$out"
"#,
        log = log.display()
    )
}

/// Transcoder stand-in that writes a partial output file and then fails,
/// the way a crashed encoder would.
pub fn transcode_fail_script(log: &Path) -> String {
    format!(
        r#"#!/bin/sh
echo "transcode $*" >> "{log}"
for a in "$@"; do out="$a"; done
printf 'PARTIAL' > "$out"
echo "encoder exploded" >&2
exit 2
"#,
        log = log.display()
    )
}

pub fn synth_config(program: &Path) -> SynthesizerConfig {
    SynthesizerConfig {
        program: program.to_str().unwrap().to_string(),
        ..SynthesizerConfig::default()
    }
}

pub fn transcoder_config(program: &Path) -> TranscoderConfig {
    TranscoderConfig {
        program: program.to_str().unwrap().to_string(),
        ..TranscoderConfig::default()
    }
}

pub async fn build_pipeline(
    media_dir: &Path,
    synth_script: &Path,
    transcode_script: &Path,
) -> MediaPipeline {
    let synthesizer = SpeechSynthesizer::new(synth_config(synth_script))
        .await
        .unwrap();
    let transcoder = AudioTranscoder::new(transcoder_config(transcode_script))
        .await
        .unwrap();
    MediaPipeline::new(media_dir.to_path_buf(), synthesizer, transcoder)
}

/// Lines logged by the fake tools, oldest first. Empty if no tool ran.
pub fn read_calls(log: &Path) -> Vec<String> {
    match std::fs::read_to_string(log) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

/// Sorted file names in a directory.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
