//! Cancellable child-process runner shared by the external tool adapters.

use crate::cancel::CancelToken;
use crate::error::{Result, ScanError};
use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_BUF: usize = 8192;

/// Captured standard output of a finished tool.
#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
}

/// Run `command` to completion, polling `cancel` while it runs.
///
/// Stdout is drained on a reader thread and capped at `max_output` bytes.
/// Exceeding the cap or cancellation kills the tool; a non-zero exit fails
/// it. Stderr is discarded.
pub fn run_tool(
    tool: &str,
    mut command: Command,
    max_output: usize,
    cancel: &CancelToken,
) -> Result<ToolOutput> {
    cancel.check()?;
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = command
        .spawn()
        .map_err(|e| ScanError::collaborator(tool, format!("spawn: {e}")))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ScanError::collaborator(tool, "stdout not captured"))?;
    let overflowed = Arc::new(AtomicBool::new(false));
    let reader = {
        let overflowed = Arc::clone(&overflowed);
        thread::spawn(move || drain_capped(stdout, max_output, &overflowed))
    };

    let status = loop {
        if let Err(err) = cancel.check() {
            debug!(tool, "killing tool on cancellation");
            // A grandchild may still hold the pipe; the reader is left to finish on its own.
            reap(&mut child);
            return Err(err);
        }
        if overflowed.load(Ordering::SeqCst) {
            warn!(tool, max_output, "tool output exceeded cap, killing tool");
            reap(&mut child);
            return Err(output_overflow(tool, max_output));
        }
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                reap(&mut child);
                return Err(ScanError::collaborator(tool, format!("wait: {e}")));
            }
        }
    };

    let stdout = reader
        .join()
        .map_err(|_| ScanError::collaborator(tool, "stdout reader panicked"))?
        .map_err(|e| ScanError::collaborator(tool, format!("reading stdout: {e}")))?;
    if overflowed.load(Ordering::SeqCst) {
        warn!(tool, max_output, "tool output exceeded cap");
        return Err(output_overflow(tool, max_output));
    }
    if !status.success() {
        return Err(ScanError::collaborator(tool, format!("exited with {status}")));
    }
    debug!(tool, bytes = stdout.len(), "tool finished");
    Ok(ToolOutput { stdout })
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn output_overflow(tool: &str, max_output: usize) -> ScanError {
    ScanError::collaborator(tool, format!("output exceeded {max_output} bytes"))
}

/// Read `stdout` to EOF, keeping at most `max_bytes`. Reading stops and
/// `overflowed` is set as soon as the tool writes more than that.
fn drain_capped(
    mut stdout: ChildStdout,
    max_bytes: usize,
    overflowed: &AtomicBool,
) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = [0u8; READ_BUF];
    loop {
        let n = match stdout.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if n > max_bytes.saturating_sub(out.len()) {
            overflowed.store(true, Ordering::SeqCst);
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    Ok(out)
}
