//! External decoder adapter: subprocess invocation behind a trait seam.
//!
//! The render strategies never touch `std::process` directly; they go
//! through [`ToolRunner`] so tests can substitute a fake runner. Tool
//! availability is probed once at startup via [`Toolchain::probe`].

use std::ffi::OsString;
use std::process::{Command, Stdio};

use crate::error::{RenderError, RenderResult, StartupError};

/// Executes one external process per call.
///
/// `run_discard` is for tools that write directly to a destination path
/// (transcode); `run_capture` returns the tool's stdout for in-process
/// decoding (raw decode). Non-zero exit status is an error in both cases.
pub trait ToolRunner: Send + Sync {
    /// Run a tool, capturing its stdout as a byte stream.
    fn run_capture(&self, program: &str, args: &[OsString]) -> RenderResult<Vec<u8>>;

    /// Run a tool for its side effects, discarding stdout.
    fn run_discard(&self, program: &str, args: &[OsString]) -> RenderResult<()>;
}

/// [`ToolRunner`] backed by real subprocesses.
pub struct SystemRunner;

impl SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> RenderResult<std::process::Output> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| RenderError::Tool {
                program: program.to_string(),
                message: format!("failed to spawn: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Tool {
                program: program.to_string(),
                message: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }
        Ok(output)
    }
}

impl ToolRunner for SystemRunner {
    fn run_capture(&self, program: &str, args: &[OsString]) -> RenderResult<Vec<u8>> {
        Ok(self.run(program, args)?.stdout)
    }

    fn run_discard(&self, program: &str, args: &[OsString]) -> RenderResult<()> {
        self.run(program, args).map(|_| ())
    }
}

/// The video transcoder found on PATH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transcoder {
    Ffmpeg,
    Avconv,
}

impl Transcoder {
    /// Program name to invoke.
    pub fn program(&self) -> &'static str {
        match self {
            Transcoder::Ffmpeg => "ffmpeg",
            Transcoder::Avconv => "avconv",
        }
    }
}

/// External tools resolved once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Toolchain {
    /// Mandatory video transcoder
    pub transcoder: Transcoder,

    /// Optional CR2 raw decoder; when absent, raw inputs fail as decode
    /// errors instead of aborting the run
    pub raw_decoder: Option<&'static str>,
}

impl Toolchain {
    /// Probe PATH for the supported tools.
    ///
    /// Fails fast when neither ffmpeg nor avconv is available, since video
    /// support is mandatory. A missing dcraw only disables raw decoding.
    pub fn probe() -> Result<Self, StartupError> {
        let transcoder = if tool_exists("ffmpeg") {
            Transcoder::Ffmpeg
        } else if tool_exists("avconv") {
            Transcoder::Avconv
        } else {
            return Err(StartupError::NoTranscoder);
        };

        let raw_decoder = if tool_exists("dcraw") {
            Some("dcraw")
        } else {
            tracing::warn!("dcraw not found on PATH; CR2 inputs will fail to decode");
            None
        };

        Ok(Self {
            transcoder,
            raw_decoder,
        })
    }
}

/// Existence check: can the program be spawned at all?
///
/// Exit status is irrelevant here; most of these tools exit non-zero when
/// invoked without arguments.
fn tool_exists(name: &str) -> bool {
    Command::new(name)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_does_not_exist() {
        assert!(!tool_exists("synothumb-no-such-tool-on-path"));
    }

    #[test]
    fn test_run_capture_collects_stdout() {
        let runner = SystemRunner;
        let args = vec![OsString::from("hello")];
        let out = runner.run_capture("echo", &args).unwrap();
        assert_eq!(String::from_utf8_lossy(&out).trim(), "hello");
    }

    #[test]
    fn test_run_discard_missing_program_is_tool_error() {
        let runner = SystemRunner;
        let err = runner
            .run_discard("synothumb-no-such-tool-on-path", &[])
            .unwrap_err();
        assert!(matches!(err, RenderError::Tool { .. }));
    }

    #[test]
    fn test_transcoder_program_names() {
        assert_eq!(Transcoder::Ffmpeg.program(), "ffmpeg");
        assert_eq!(Transcoder::Avconv.program(), "avconv");
    }
}
