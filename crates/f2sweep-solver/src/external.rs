//! External-process solver
//!
//! Runs a solver program once per document as `program [args..] <document>`
//! and maps its exit status and output into a [`Verdict`]. The default
//! configuration runs the reference Gröbner-basis solver with
//! `go run main.go <document>`.
//!
//! Standard output is copied into the caller's transcript as it arrives.
//! On unix the solver runs in its own process group so that a timeout kills
//! everything it started, not just the direct child (`go run` compiles and
//! execs the real solver as a grandchild).

use crate::report::SolverReport;
use crate::traits::{HealthStatus, Solver, SolverError, SolverOutcome, Verdict};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, trace, warn};

/// Lines of stderr kept in a failure verdict
const DIAGNOSTIC_LINES: usize = 5;

/// Read size for the solver's standard output
const CHUNK_SIZE: usize = 8192;

/// Configuration for an external solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalSolverConfig {
    /// Program to run. A bare name is looked up on `PATH`; a relative path
    /// is taken relative to `working_dir` when one is set.
    pub program: PathBuf,
    /// Arguments placed before the document path
    pub args: Vec<String>,
    /// Working directory for the solver process
    pub working_dir: Option<PathBuf>,
    /// Per-document time limit (no limit if None)
    pub timeout: Option<Duration>,
}

impl Default for ExternalSolverConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("go"),
            args: vec!["run".to_string(), "main.go".to_string()],
            working_dir: None,
            timeout: None,
        }
    }
}

/// Solver that runs a program as a subprocess for every document
pub struct ExternalSolver {
    config: ExternalSolverConfig,
    name: String,
}

impl Default for ExternalSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalSolver {
    /// Create with the default `go run main.go` configuration
    pub fn new() -> Self {
        Self::with_config(ExternalSolverConfig::default())
    }

    pub fn with_config(config: ExternalSolverConfig) -> Self {
        let name = std::iter::once(config.program.display().to_string())
            .chain(config.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        Self { config, name }
    }

    /// Create with the default configuration if the program can be found
    pub fn detect() -> Option<Self> {
        let solver = Self::new();
        solver.resolve_program().ok()?;
        Some(solver)
    }

    pub fn config(&self) -> &ExternalSolverConfig {
        &self.config
    }

    /// Absolute path of the program to run
    pub fn resolve_program(&self) -> Result<PathBuf, SolverError> {
        let program = &self.config.program;
        let is_path = program.is_absolute() || program.components().count() > 1;
        if is_path {
            let located = match &self.config.working_dir {
                Some(dir) if program.is_relative() => dir.join(program),
                _ => program.clone(),
            };
            return std::fs::canonicalize(&located)
                .map_err(|e| SolverError::NotFound(format!("{}: {}", located.display(), e)));
        }
        which::which(program)
            .map_err(|e| SolverError::NotFound(format!("{}: {}", program.display(), e)))
    }

    fn build_command(&self, program: &Path, document: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(&self.config.args)
            .arg(document)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Map a finished process into a verdict
    fn parse_output(&self, stdout: &str, stderr: &str, exit_code: Option<i32>) -> Verdict {
        match exit_code {
            Some(0) => match SolverReport::parse(stdout) {
                Some(report) => Verdict::Success(report),
                None => Verdict::Indeterminate {
                    reason: "solver exited successfully without a summary".to_string(),
                },
            },
            code => Verdict::Failure {
                exit_code: code,
                diagnostics: Self::tail_diagnostics(stderr),
            },
        }
    }

    fn tail_diagnostics(stderr: &str) -> Vec<String> {
        let lines: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let skip = lines.len().saturating_sub(DIAGNOSTIC_LINES);
        lines[skip..].iter().map(|l| (*l).to_string()).collect()
    }
}

/// Drain both pipes, copying stdout into `transcript` as it arrives, then
/// reap the child.
async fn collect_output(
    child: &mut Child,
    transcript: &mut (dyn Write + Send),
) -> Result<(Vec<u8>, Vec<u8>, ExitStatus), SolverError> {
    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("solver stdout was not captured"))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("solver stderr was not captured"))?;

    let stdout_task = async {
        let mut captured = Vec::new();
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            let read = stdout_pipe.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            transcript
                .write_all(&chunk[..read])
                .map_err(SolverError::Transcript)?;
            transcript.flush().map_err(SolverError::Transcript)?;
            captured.extend_from_slice(&chunk[..read]);
        }
        Ok::<_, SolverError>(captured)
    };
    let stderr_task = async {
        let mut captured = Vec::new();
        stderr_pipe.read_to_end(&mut captured).await?;
        Ok::<_, SolverError>(captured)
    };

    let (stdout, stderr) = tokio::try_join!(stdout_task, stderr_task)?;
    let status = child.wait().await?;
    Ok((stdout, stderr, status))
}

/// Kill the solver and everything it started, then reap it
async fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child leads its own process group, so its pid is the group id
        let group = pid as libc::pid_t;
        // SAFETY: killpg only sends a signal; no memory is shared with the callee
        if unsafe { libc::killpg(group, libc::SIGKILL) } != 0 {
            warn!(group, error = %std::io::Error::last_os_error(), "Failed to kill solver process group");
        }
    }
    if let Err(e) = child.kill().await {
        debug!(error = %e, "Solver already exited");
    }
}

#[async_trait]
impl Solver for ExternalSolver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(
        &self,
        document: &Path,
        transcript: &mut (dyn Write + Send),
    ) -> Result<SolverOutcome, SolverError> {
        if !document.is_file() {
            return Err(SolverError::InvalidInput(format!(
                "document not found: {}",
                document.display()
            )));
        }
        let program = self.resolve_program()?;
        let mut cmd = self.build_command(&program, document);

        debug!(solver = %self.name, document = %document.display(), "Running solver");
        let start = Instant::now();

        let mut child = cmd.spawn().map_err(|source| SolverError::Spawn {
            program: program.display().to_string(),
            source,
        })?;

        let collected = match self.config.timeout {
            Some(limit) => {
                let waited = tokio::time::timeout(limit, collect_output(&mut child, transcript)).await;
                match waited {
                    Ok(collected) => collected,
                    Err(_) => {
                        kill_process_tree(&mut child).await;
                        return Err(SolverError::Timeout(limit));
                    }
                }
            }
            None => collect_output(&mut child, transcript).await,
        };
        let (stdout, stderr, status) = match collected {
            Ok(collected) => collected,
            Err(e) => {
                kill_process_tree(&mut child).await;
                return Err(e);
            }
        };

        let duration = start.elapsed();
        let stderr = String::from_utf8_lossy(&stderr).into_owned();
        let exit_code = status.code();
        let verdict = self.parse_output(&String::from_utf8_lossy(&stdout), &stderr, exit_code);

        trace!(stderr = %stderr, "Solver diagnostics");
        debug!(?exit_code, ?duration, verdict = verdict.label(), "Solver finished");

        Ok(SolverOutcome {
            verdict,
            stdout,
            stderr,
            exit_code,
            duration,
        })
    }

    async fn health_check(&self) -> HealthStatus {
        match self.resolve_program() {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ExternalSolverConfig::default();
        assert_eq!(config.program, PathBuf::from("go"));
        assert_eq!(config.args, vec!["run", "main.go"]);
        assert!(config.working_dir.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn name_includes_args() {
        assert_eq!(ExternalSolver::new().name(), "go run main.go");
        let solver = ExternalSolver::with_config(ExternalSolverConfig {
            program: PathBuf::from("/opt/gb/solver"),
            args: vec![],
            ..Default::default()
        });
        assert_eq!(solver.name(), "/opt/gb/solver");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ExternalSolverConfig =
            serde_json::from_str(r#"{"program": "gbsolve", "timeout": {"secs": 5, "nanos": 0}}"#)
                .unwrap();
        assert_eq!(config.program, PathBuf::from("gbsolve"));
        assert_eq!(config.args, vec!["run", "main.go"]);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn parse_success() {
        let solver = ExternalSolver::new();
        let verdict = solver.parse_output("N = 3\nEqual: true\n", "", Some(0));
        assert!(verdict.is_success());
    }

    #[test]
    fn parse_success_without_summary_is_indeterminate() {
        let solver = ExternalSolver::new();
        let verdict = solver.parse_output("hello\n", "", Some(0));
        assert!(verdict.is_indeterminate());
    }

    #[test]
    fn parse_nonzero_exit_is_failure() {
        let solver = ExternalSolver::new();
        let verdict = solver.parse_output("", "Order: [1 2 3]\nFailed to parse N: bad\n", Some(2));
        assert_eq!(
            verdict,
            Verdict::Failure {
                exit_code: Some(2),
                diagnostics: vec![
                    "Order: [1 2 3]".to_string(),
                    "Failed to parse N: bad".to_string()
                ],
            }
        );
    }

    #[test]
    fn parse_signal_is_failure_without_code() {
        let solver = ExternalSolver::new();
        let verdict = solver.parse_output("partial", "", None);
        assert!(matches!(verdict, Verdict::Failure { exit_code: None, .. }));
    }

    #[test]
    fn diagnostics_keep_last_lines() {
        let stderr = (1..=8).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let tail = ExternalSolver::tail_diagnostics(&stderr);
        assert_eq!(tail.len(), DIAGNOSTIC_LINES);
        assert_eq!(tail.first().map(String::as_str), Some("line 4"));
        assert_eq!(tail.last().map(String::as_str), Some("line 8"));
    }

    #[test]
    fn missing_program_path_is_not_found() {
        let solver = ExternalSolver::with_config(ExternalSolverConfig {
            program: PathBuf::from("/nonexistent/f2sweep/solver"),
            ..Default::default()
        });
        assert!(matches!(
            solver.resolve_program(),
            Err(SolverError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn check_rejects_missing_document() {
        let solver = ExternalSolver::new();
        let err = solver
            .check(Path::new("/nonexistent/f2sweep/input.txt"), &mut std::io::sink())
            .await
            .unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn relative_program_resolves_against_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin").join("solver"), "").unwrap();

        let solver = ExternalSolver::with_config(ExternalSolverConfig {
            program: PathBuf::from("bin/solver"),
            args: vec![],
            working_dir: Some(dir.path().to_path_buf()),
            timeout: None,
        });
        let resolved = solver.resolve_program().unwrap();
        assert_eq!(
            resolved,
            std::fs::canonicalize(dir.path().join("bin").join("solver")).unwrap()
        );

        let without_dir = ExternalSolver::with_config(ExternalSolverConfig {
            working_dir: None,
            ..solver.config().clone()
        });
        assert!(matches!(
            without_dir.resolve_program(),
            Err(SolverError::NotFound(_))
        ));
    }

    #[test]
    fn detect_follows_path_lookup() {
        let detected = ExternalSolver::detect();
        assert_eq!(detected.is_some(), which::which("go").is_ok());
        if let Some(solver) = detected {
            assert_eq!(solver.config(), &ExternalSolverConfig::default());
        }
    }

    #[tokio::test]
    async fn health_check_reports_missing_program() {
        let solver = ExternalSolver::with_config(ExternalSolverConfig {
            program: PathBuf::from("f2sweep-no-such-solver-binary"),
            ..Default::default()
        });
        assert!(!solver.health_check().await.is_healthy());
    }
}
