//! External process services
//!
//! Speech synthesis and audio transcoding are delegated to external
//! command-line tools. Each service validates its executable once at
//! startup, then runs one child process per invocation with a time limit.

pub mod synthesizer;
pub mod transcoder;

pub use synthesizer::SpeechSynthesizer;
pub use transcoder::AudioTranscoder;

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Verify that a configured tool can be invoked.
///
/// A bare program name is probed with `which`; an explicit path must exist
/// on disk. Runs before any record is processed, so a missing tool fails
/// the whole run immediately instead of failing every record.
pub(crate) async fn resolve_program(program: &str) -> Result<()> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        if path.exists() {
            return Ok(());
        }
        return Err(Error::ExecutableNotFound {
            program: program.to_string(),
        });
    }

    let result = Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    let available = result.map(|status| status.success()).unwrap_or(false);

    debug!(program, available, "Tool availability check");

    if available {
        Ok(())
    } else {
        Err(Error::ExecutableNotFound {
            program: program.to_string(),
        })
    }
}

/// Run an external tool to completion.
///
/// stderr is captured and returned in the failure message; stdout is
/// discarded. The child is killed if it outlives `timeout`. The returned
/// `Err` is a plain message so each service can wrap it in its own error
/// variant with term context attached.
pub(crate) async fn run_tool(
    program: &str,
    args: &[OsString],
    timeout: Duration,
) -> std::result::Result<(), String> {
    debug!(program, ?args, "Running external tool");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, command.output()).await {
        Err(_) => Err(format!("timed out after {:?}", timeout)),
        Ok(Err(e)) => Err(format!("failed to execute: {}", e)),
        Ok(Ok(output)) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => "killed by signal".to_string(),
            };
            Err(format!("{}: {}", reason, stderr.trim()))
        }
        Ok(Ok(_)) => Ok(()),
    }
}
