//! Child process runner with a bounded stdout.

use crate::error::ToolError;
use std::ffi::OsStr;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Only the head of stderr is kept for error messages.
const STDERR_KEEP_BYTES: u64 = 64 * 1024;

#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Keep the first `keep` bytes, discard the rest so the child never blocks on
/// a full pipe.
async fn read_head<R: AsyncRead + Unpin>(mut reader: R, keep: u64) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    (&mut reader).take(keep).read_to_end(&mut buf).await?;
    tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    Ok(buf)
}

/// Run `program` to completion.
///
/// Fails with [`ToolError::OutputTooLarge`] (and kills the child) once stdout
/// grows past `max_stdout` bytes; fails with [`ToolError::Failed`] on a
/// non-zero exit, carrying stderr.
pub async fn run_tool<I, S>(
    tool: &'static str,
    program: &str,
    args: I,
    max_stdout: usize,
) -> Result<ToolOutput, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let io_err = |source| ToolError::Io { tool, source };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ToolError::Spawn { tool, source })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io_err(std::io::Error::other("stdout not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io_err(std::io::Error::other("stderr not captured")))?;

    let stderr_task = tokio::spawn(read_head(stderr, STDERR_KEEP_BYTES));

    let mut out = Vec::new();
    stdout
        .take(max_stdout as u64 + 1)
        .read_to_end(&mut out)
        .await
        .map_err(io_err)?;

    if out.len() > max_stdout {
        let _ = child.kill().await;
        stderr_task.abort();
        tracing::warn!(tool = tool, limit = max_stdout, "Tool output exceeded limit; process killed");
        return Err(ToolError::OutputTooLarge {
            tool,
            limit: max_stdout,
        });
    }

    let status = child.wait().await.map_err(io_err)?;
    let stderr = match stderr_task.await {
        Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).trim().to_string(),
        _ => String::new(),
    };

    if !status.success() {
        return Err(ToolError::Failed {
            tool,
            status: status.to_string(),
            stderr,
        });
    }

    Ok(ToolOutput { stdout: out, stderr })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let output = run_tool("sh", "sh", ["-c", "printf hello"], 1024).await.unwrap();
        assert_eq!(output.stdout, b"hello");
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let err = run_tool("sh", "sh", ["-c", "echo broken >&2; exit 3"], 1024)
            .await
            .unwrap_err();
        match err {
            ToolError::Failed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stdout_ceiling() {
        let err = run_tool("sh", "sh", ["-c", "head -c 4096 /dev/zero"], 100)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::OutputTooLarge { limit: 100, .. }));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let err = run_tool("nope", "/nonexistent/tool-binary", Vec::<String>::new(), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
