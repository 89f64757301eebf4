use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use cadenza_core::{FailureKind, HandlerFailure};
use regex::Regex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// osascript reports failures as `... (-1743)` at the end of a stderr line.
static ERROR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\((-\d+)\)[ \t]*\r?$").expect("error number pattern is valid"));

/// Local media-player automation. Returns the script's stdout.
#[async_trait]
pub trait Automation: Send + Sync {
    async fn run(&self, script: &str) -> Result<String, HandlerFailure>;
}

/// Runs AppleScript through `osascript -`, feeding the script on stdin.
#[derive(Debug, Clone)]
pub struct OsaScript {
    program: String,
    timeout: Duration,
}

impl OsaScript {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Automation for OsaScript {
    async fn run(&self, script: &str) -> Result<String, HandlerFailure> {
        let mut child = Command::new(&self.program)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| spawn_failure(&self.program, err))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes()).await.map_err(|err| {
                HandlerFailure::new(
                    FailureKind::AutomationFailed,
                    format!("Failed to send script to {}: {err}", self.program),
                )
            })?;
        }

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|err| {
                HandlerFailure::new(
                    FailureKind::AutomationFailed,
                    format!("Failed to collect {} output: {err}", self.program),
                )
            })?,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "automation timed out");
                return Err(HandlerFailure::new(
                    FailureKind::AutomationTimeout,
                    format!(
                        "Music automation did not finish within {} seconds.",
                        self.timeout.as_secs()
                    ),
                )
                .with_hint("Check whether Music is showing a dialog, or raise CADENZA_AUTOMATION_TIMEOUT_SECS."));
            }
        };

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Ok(stdout.trim_end_matches(['\r', '\n']).to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(status = ?output.status.code(), stderr = %stderr.trim(), "automation failed");
        Err(classify_failure(&stderr, output.status.code()))
    }
}

fn spawn_failure(program: &str, err: std::io::Error) -> HandlerFailure {
    if err.kind() == std::io::ErrorKind::NotFound {
        return HandlerFailure::new(
            FailureKind::ApplicationUnreachable,
            format!("'{program}' is not available on this system."),
        )
        .with_hint("Music automation requires macOS; set CADENZA_OSASCRIPT if osascript lives elsewhere.");
    }
    HandlerFailure::new(
        FailureKind::AutomationFailed,
        format!("Failed to start '{program}': {err}"),
    )
}

/// Map osascript stderr onto a failure kind.
pub fn classify_failure(stderr: &str, status: Option<i32>) -> HandlerFailure {
    let trimmed = stderr.trim();
    let lower = trimmed.to_ascii_lowercase();
    let number = ERROR_NUMBER
        .captures_iter(trimmed)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok());

    if number == Some(-1743)
        || lower.contains("not authorized")
        || lower.contains("not allowed assistive access")
    {
        return HandlerFailure::new(
            FailureKind::AutomationPermissionDenied,
            "Automation permission for Music was denied.",
        )
        .with_hint(
            "Allow this app to control Music in System Settings > Privacy & Security > Automation.",
        );
    }

    if matches!(number, Some(-600 | -609 | -10810)) || lower.contains("isn't running") {
        return HandlerFailure::new(
            FailureKind::ApplicationUnreachable,
            "The Music app is not reachable.",
        )
        .with_hint("Make sure Music is installed and can be launched.");
    }

    if matches!(number, Some(-2740 | -2741)) || lower.contains("syntax error") {
        return HandlerFailure::new(
            FailureKind::MalformedCommand,
            "The automation command was rejected as malformed.",
        )
        .with_hint(first_line(trimmed));
    }

    let detail = if trimmed.is_empty() {
        match status {
            Some(code) => format!("osascript exited with status {code}."),
            None => "osascript was terminated by a signal.".to_string(),
        }
    } else {
        first_line(trimmed)
    };
    HandlerFailure::new(FailureKind::AutomationFailed, "Music automation failed.").with_hint(detail)
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}
