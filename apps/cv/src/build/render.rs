//! External renderers turning JSON outputs into HTML and PDF.
//!
//! The pipeline only writes JSON. Rendering is delegated to whatever command
//! line tools are configured; a missing tool means the step is skipped.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{CvError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Rendered,
    Skipped,
}

/// Produces presentation files from already-written JSON documents.
pub trait Renderer {
    /// Exports a resume JSON to `output`; the extension selects HTML or PDF.
    fn render_resume(&self, resume_json: &Path, output: &Path, theme: &str) -> Result<RenderStatus>;

    fn render_letter(&self, letter_json: &Path, output: &Path) -> Result<RenderStatus>;
}

/// Writes nothing. Used when no export tools are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render_resume(&self, _: &Path, _: &Path, _: &str) -> Result<RenderStatus> {
        Ok(RenderStatus::Skipped)
    }

    fn render_letter(&self, _: &Path, _: &Path) -> Result<RenderStatus> {
        Ok(RenderStatus::Skipped)
    }
}

pub const HTML_TIMEOUT: Duration = Duration::from_secs(30);
pub const PDF_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spawns the configured resume/cover-letter CLIs.
///
/// Resume: `<resume_cli> export <output> --resume <json> --theme <theme>`
/// Letter: `<cover_letter_cli> <json> --pdf <output>`
///
/// A child still running after its timeout is killed and reported as a
/// render error. PDF exports (resume or letter) get `pdf_timeout`, anything
/// else `html_timeout`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    pub resume_cli: Option<String>,
    pub cover_letter_cli: Option<String>,
    pub chromium_path: String,
    pub html_timeout: Duration,
    pub pdf_timeout: Duration,
}

impl CommandRenderer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            resume_cli: config.resume_cli.clone(),
            cover_letter_cli: config.cover_letter_cli.clone(),
            chromium_path: config.chromium_path.clone(),
            html_timeout: HTML_TIMEOUT,
            pdf_timeout: PDF_TIMEOUT,
        }
    }

    fn timeout_for(&self, output: &Path) -> Duration {
        match output.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => self.pdf_timeout,
            _ => self.html_timeout,
        }
    }

    fn run(&self, program: &str, args: &[&OsStr], timeout: Duration) -> Result<RenderStatus> {
        debug!(program, ?args, ?timeout, "Running renderer");
        let mut child = Command::new(program)
            .args(args)
            .env("PUPPETEER_EXECUTABLE_PATH", &self.chromium_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CvError::Render(format!("failed to spawn {program}: {e}")))?;

        // Drained on its own thread so a chatty child cannot fill the pipe and stall.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    warn!(program, ?timeout, "Renderer timed out, killing it");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CvError::Render(format!(
                        "{program} timed out after {}s",
                        timeout.as_secs_f32()
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(CvError::Render(format!("failed to wait for {program}: {e}")));
                }
            }
        };

        if !status.success() {
            let stderr = stderr_reader
                .and_then(|handle| handle.join().ok())
                .unwrap_or_default();
            return Err(CvError::Render(format!(
                "{program} exited with {status}: {}",
                stderr.trim()
            )));
        }
        Ok(RenderStatus::Rendered)
    }
}

impl Renderer for CommandRenderer {
    fn render_resume(&self, resume_json: &Path, output: &Path, theme: &str) -> Result<RenderStatus> {
        let Some(program) = self.resume_cli.as_deref() else {
            return Ok(RenderStatus::Skipped);
        };
        self.run(
            program,
            &[
                OsStr::new("export"),
                output.as_os_str(),
                OsStr::new("--resume"),
                resume_json.as_os_str(),
                OsStr::new("--theme"),
                OsStr::new(theme),
            ],
            self.timeout_for(output),
        )
    }

    fn render_letter(&self, letter_json: &Path, output: &Path) -> Result<RenderStatus> {
        let Some(program) = self.cover_letter_cli.as_deref() else {
            return Ok(RenderStatus::Skipped);
        };
        self.run(
            program,
            &[letter_json.as_os_str(), OsStr::new("--pdf"), output.as_os_str()],
            self.pdf_timeout,
        )
    }
}
