//! End-to-end tests for the external-process solver
//!
//! Each test writes a small shell script standing in for the real solver
//! and runs it through `/bin/sh`, so these tests are unix only.

#![cfg(unix)]

use f2sweep_solver::{ExternalSolver, ExternalSolverConfig, Solver, SolverError, Verdict};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn write_document(dir: &Path) -> PathBuf {
    let path = dir.join("input.txt");
    std::fs::write(&path, "3\nx3 + x1*x2\nx2 + x1*x3 + 1\n").unwrap();
    path
}

fn sh_solver(script: &Path, timeout: Option<Duration>) -> ExternalSolver {
    ExternalSolver::with_config(ExternalSolverConfig {
        program: PathBuf::from("/bin/sh"),
        args: vec![script.display().to_string()],
        working_dir: None,
        timeout,
    })
}

#[tokio::test]
async fn successful_run_yields_report_and_transcript() {
    let dir = TempDir::new().unwrap();
    // Echo the document back, then print a summary block
    let script = write_script(
        dir.path(),
        "solver.sh",
        "cat \"$1\"\necho 'Equal: true'\necho 'Is minimal: false'\necho 'noise' >&2\n",
    );
    let document = write_document(dir.path());

    let mut transcript: Vec<u8> = Vec::new();
    let outcome = sh_solver(&script, None)
        .check(&document, &mut transcript)
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, Some(0));
    assert_eq!(transcript, outcome.stdout);
    match &outcome.verdict {
        Verdict::Success(report) => {
            // The echoed document has no "N =" line
            assert_eq!(report.n, None);
            assert!(report.equal);
            assert_eq!(report.minimal, Some(false));
        }
        other => panic!("expected success, got {other:?}"),
    }
    let text = outcome.stdout_text();
    assert!(text.starts_with("3\nx3 + x1*x2\n"));
    assert!(!text.contains("noise"));
    assert!(outcome.stderr.contains("noise"));
}

#[tokio::test]
async fn nonzero_exit_yields_failure_with_diagnostics() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "solver.sh",
        "echo 'Failed to parse N: invalid syntax' >&2\nexit 2\n",
    );
    let document = write_document(dir.path());

    let outcome = sh_solver(&script, None)
        .check(&document, &mut std::io::sink())
        .await
        .unwrap();

    assert_eq!(
        outcome.verdict,
        Verdict::Failure {
            exit_code: Some(2),
            diagnostics: vec!["Failed to parse N: invalid syntax".to_string()],
        }
    );
    assert!(!outcome.is_invocation_failure());
}

#[tokio::test]
async fn slow_solver_times_out() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "solver.sh", "sleep 5\necho 'Equal: true'\n");
    let document = write_document(dir.path());

    let err = sh_solver(&script, Some(Duration::from_millis(200)))
        .check(&document, &mut std::io::sink())
        .await
        .unwrap_err();

    assert!(matches!(err, SolverError::Timeout(limit) if limit == Duration::from_millis(200)));
}

#[tokio::test]
async fn working_dir_is_applied() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "solver.sh", "pwd\necho 'Equal: false'\n");
    let document = write_document(dir.path());

    let solver = ExternalSolver::with_config(ExternalSolverConfig {
        program: PathBuf::from("/bin/sh"),
        args: vec![script.display().to_string()],
        working_dir: Some(dir.path().to_path_buf()),
        timeout: None,
    });
    let outcome = solver.check(&document, &mut std::io::sink()).await.unwrap();

    let expected = std::fs::canonicalize(dir.path()).unwrap();
    let printed = outcome.stdout_text();
    let first_line = printed.lines().next().unwrap();
    assert_eq!(std::fs::canonicalize(first_line).unwrap(), expected);
    assert!(matches!(outcome.verdict, Verdict::Success(ref r) if !r.equal));
}

#[tokio::test]
async fn timeout_kills_processes_started_by_the_solver() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("marker");
    let script = write_script(
        dir.path(),
        "solver.sh",
        &format!("sh -c 'sleep 1; echo late > {}'\n", marker.display()),
    );
    let document = write_document(dir.path());

    let err = sh_solver(&script, Some(Duration::from_millis(200)))
        .check(&document, &mut std::io::sink())
        .await
        .unwrap_err();
    assert!(matches!(err, SolverError::Timeout(_)));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists());
}

#[tokio::test]
async fn partial_transcript_is_kept_on_timeout() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "solver.sh", "echo 'N = 3'\nsleep 5\n");
    let document = write_document(dir.path());

    let mut transcript: Vec<u8> = Vec::new();
    let err = sh_solver(&script, Some(Duration::from_millis(500)))
        .check(&document, &mut transcript)
        .await
        .unwrap_err();

    assert!(matches!(err, SolverError::Timeout(_)));
    assert_eq!(transcript, b"N = 3\n");
}

#[tokio::test]
async fn relative_program_is_found_in_working_dir() {
    let dir = TempDir::new().unwrap();
    let solver_dir = dir.path().join("solverdir");
    std::fs::create_dir(&solver_dir).unwrap();
    std::os::unix::fs::symlink("/bin/sh", solver_dir.join("run-sh")).unwrap();
    let script = write_script(&solver_dir, "solver.sh", "echo 'Equal: true'\n");
    let document = write_document(dir.path());

    let solver = ExternalSolver::with_config(ExternalSolverConfig {
        program: PathBuf::from("./run-sh"),
        args: vec!["solver.sh".to_string()],
        working_dir: Some(solver_dir.clone()),
        timeout: None,
    });
    assert!(solver.health_check().await.is_healthy());

    let outcome = solver
        .check(&document, &mut std::io::sink())
        .await
        .unwrap();
    assert!(outcome.verdict.is_success());
    assert!(script.exists());
}
