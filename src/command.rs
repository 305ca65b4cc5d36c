//! External process execution with captured, live-forwarded output.
//!
//! Both streams are captured for error reporting and URL extraction while
//! still being teed to the parent's own stdout/stderr, so a human watching
//! the CI log sees the tool's output in real time.

use crate::error::Error;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// Run `program args...` to completion with the given extra environment.
///
/// Returns trimmed stdout on a zero exit. A non-zero exit is `CommandFailed`
/// carrying the captured stderr, or a synthesized message when stderr was
/// empty.
pub fn execute(program: &Path, args: &[String], env: &[(&str, &str)]) -> Result<String, Error> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (name, value) in env {
        command.env(name, value);
    }

    let mut child = command.spawn().map_err(|err| Error::CommandFailed {
        exit_code: None,
        message: format!("Failed to start {}: {err}", program.display()),
    })?;

    let stdout_tee = spawn_tee(child.stdout.take(), std::io::stdout());
    let stderr_tee = spawn_tee(child.stderr.take(), std::io::stderr());

    let status = child.wait().map_err(|err| Error::CommandFailed {
        exit_code: None,
        message: format!("Failed to wait for {}: {err}", program.display()),
    })?;

    let stdout = String::from_utf8_lossy(&join_tee(stdout_tee)).into_owned();
    let stderr = String::from_utf8_lossy(&join_tee(stderr_tee)).into_owned();

    if !status.success() {
        let message = if stderr.trim().is_empty() {
            format!(
                "Command failed with exit code {}: {} {}",
                exit_status_string(&status),
                program.display(),
                args.join(" ")
            )
        } else {
            stderr.trim_end().to_string()
        };
        return Err(Error::CommandFailed {
            exit_code: status.code(),
            message,
        });
    }

    Ok(stdout.trim().to_string())
}

fn spawn_tee<R, W>(source: Option<R>, mut sink: W) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    let mut source = source?;
    Some(thread::spawn(move || {
        let mut captured = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            match source.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(read) => {
                    captured.extend_from_slice(&buf[..read]);
                    let _ = sink.write_all(&buf[..read]);
                    let _ = sink.flush();
                }
            }
        }
        captured
    }))
}

fn join_tee(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn exit_status_string(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        format!("{code}")
    } else {
        "terminated by signal".to_string()
    }
}
