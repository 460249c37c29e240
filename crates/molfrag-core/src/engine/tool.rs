//! Invocation of the external fragment-partitioning tool.
//!
//! The tool is an opaque black box behind a narrow contract: one process
//! call per reference molecule, with the shell size, the reference id,
//! the query exchange artifact and the reference's own exchange file as
//! arguments. Success means no bytes on stderr and a stdout that parses
//! as one [`MoleculeFragmentSet`]; anything else fails that invocation.
//! The trait seam exists so builds can be driven by a test double.

use super::error::GeneratorError;
use crate::core::models::fragment::MoleculeFragmentSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default per-invocation timeout. The tool is a separate process that
/// could hang; a stuck reference must not stall the whole build forever.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(5);

/// One request/response exchange with the partitioning tool.
pub trait FragmentTool: Sync {
    /// Decomposes one reference molecule into fragments anchored on the
    /// query molecule described by `query_artifact`.
    fn partition(
        &self,
        shell_size: u32,
        reference_id: &str,
        query_artifact: &Path,
        reference_file: &Path,
    ) -> Result<MoleculeFragmentSet, GeneratorError>;
}

/// The production implementation: spawns the tool binary once per
/// reference molecule.
#[derive(Debug, Clone)]
pub struct PartitionProcess {
    binary: PathBuf,
    timeout: Duration,
}

impl PartitionProcess {
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Waits for the child under the configured deadline and returns
    /// the collected (stdout, stderr) bytes.
    ///
    /// Both pipes are drained on background threads for the whole wait.
    /// A child whose output exceeds the OS pipe buffer blocks on write
    /// until someone reads; polling `try_wait` alone would deadlock
    /// there and misreport a perfectly valid large response as a
    /// timeout.
    fn wait_with_timeout(
        &self,
        mut child: std::process::Child,
        reference_id: &str,
    ) -> Result<(Vec<u8>, Vec<u8>), GeneratorError> {
        let stdout_drain = drain(child.stdout.take());
        let stderr_drain = drain(child.stderr.take());

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) => {
                    if started.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        // Killing the child closes its ends of the
                        // pipes, so the drains see EOF and finish.
                        let _ = stdout_drain.join();
                        let _ = stderr_drain.join();
                        return Err(GeneratorError::Timeout {
                            reference_id: reference_id.to_string(),
                            seconds: self.timeout.as_secs(),
                        });
                    }
                    thread::sleep(Duration::from_millis(10));
                }
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_drain.join();
                    let _ = stderr_drain.join();
                    return Err(GeneratorError::Spawn {
                        reference_id: reference_id.to_string(),
                        source,
                    });
                }
            }
        }

        let stdout = stdout_drain.join().unwrap_or_default();
        let stderr = stderr_drain.join().unwrap_or_default();
        Ok((stdout, stderr))
    }
}

/// Reads a child pipe to completion on its own thread, keeping whatever
/// was received if the stream errors mid-way.
fn drain(pipe: Option<impl Read + Send + 'static>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

impl FragmentTool for PartitionProcess {
    fn partition(
        &self,
        shell_size: u32,
        reference_id: &str,
        query_artifact: &Path,
        reference_file: &Path,
    ) -> Result<MoleculeFragmentSet, GeneratorError> {
        debug!(
            reference_id = %reference_id,
            shell_size = shell_size,
            tool = %self.binary.display(),
            "Invoking fragment tool"
        );

        let child = Command::new(&self.binary)
            .arg("-s")
            .arg(shell_size.to_string())
            .arg("-atb_id")
            .arg(reference_id)
            .arg(query_artifact)
            .arg(reference_file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GeneratorError::Spawn {
                reference_id: reference_id.to_string(),
                source,
            })?;

        let (stdout, stderr) = self.wait_with_timeout(child, reference_id)?;

        // Any diagnostic output is fatal for this invocation, regardless
        // of the exit code.
        if !stderr.is_empty() {
            return Err(GeneratorError::Tool {
                reference_id: reference_id.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim_end().to_string(),
            });
        }

        serde_json::from_slice(&stdout).map_err(|source| GeneratorError::InvalidOutput {
            reference_id: reference_id.to_string(),
            source,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn script_tool(dir: &Path, body: &str) -> PartitionProcess {
        let path = dir.join("tool.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        PartitionProcess::new(path)
    }

    fn paths(dir: &Path) -> (PathBuf, PathBuf) {
        let query = dir.join("query.lgf");
        let reference = dir.join("7.lgf");
        fs::write(&query, "@nodes\n").unwrap();
        fs::write(&reference, "@nodes\n").unwrap();
        (query, reference)
    }

    #[test]
    fn successful_invocation_parses_stdout_as_fragment_set() {
        let dir = tempfile::tempdir().unwrap();
        let tool = script_tool(
            dir.path(),
            r#"echo '{"referenceId":"7","fragments":[{"pairs":[{"id1":1,"charge":0.1}]}]}'"#,
        );
        let (query, reference) = paths(dir.path());

        let set = tool.partition(1, "7", &query, &reference).unwrap();
        assert_eq!(set.reference_id, "7");
        assert_eq!(set.fragments[0].pairs[0].id2, 1);
    }

    #[test]
    fn output_larger_than_the_pipe_buffer_is_drained_not_timed_out() {
        let dir = tempfile::tempdir().unwrap();
        // Roughly 150 KB of valid JSON, well past the ~64 KB a Linux
        // pipe holds. The child blocks on write until the parent reads.
        let tool = script_tool(
            dir.path(),
            r#"printf '{"referenceId":"7","fragments":[{"pairs":['
i=0
while [ $i -lt 6000 ]; do
  [ $i -gt 0 ] && printf ','
  printf '{"id1":%d,"charge":0.1}' $i
  i=$((i+1))
done
printf ']}]}'"#,
        )
        .with_timeout(Duration::from_secs(30));
        let (query, reference) = paths(dir.path());

        let set = tool.partition(1, "7", &query, &reference).unwrap();
        assert_eq!(set.reference_id, "7");
        assert_eq!(set.fragments[0].pairs.len(), 6000);
    }

    #[test]
    fn any_stderr_output_fails_the_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let tool = script_tool(
            dir.path(),
            r#"echo '{"referenceId":"7","fragments":[]}'; echo 'boom' >&2"#,
        );
        let (query, reference) = paths(dir.path());

        let err = tool.partition(1, "7", &query, &reference).unwrap_err();
        match err {
            GeneratorError::Tool { reference_id, stderr } => {
                assert_eq!(reference_id, "7");
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected tool error, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_stdout_is_invalid_output() {
        let dir = tempfile::tempdir().unwrap();
        let tool = script_tool(dir.path(), "echo 'not json'");
        let (query, reference) = paths(dir.path());

        let err = tool.partition(1, "7", &query, &reference).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidOutput { .. }));
    }

    #[test]
    fn hanging_tool_is_killed_after_the_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let tool = script_tool(dir.path(), "sleep 30").with_timeout(Duration::from_millis(100));
        let (query, reference) = paths(dir.path());

        let started = Instant::now();
        let err = tool.partition(1, "7", &query, &reference).unwrap_err();
        assert!(matches!(err, GeneratorError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let tool = PartitionProcess::new(PathBuf::from("/nonexistent/fragment-tool"));
        let dir = tempfile::tempdir().unwrap();
        let (query, reference) = paths(dir.path());

        let err = tool.partition(1, "7", &query, &reference).unwrap_err();
        assert!(matches!(err, GeneratorError::Spawn { .. }));
    }
}
