use kiln::Outcome;

use super::{fixture_source, submit, test_sandbox};

#[tokio::test]
async fn test_exit_code_is_reported_as_data() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("exit_code.c"), None))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::Completed(report) => {
            assert_eq!(report.exit_code, 42);
            assert!(!report.is_success());
            assert_eq!(report.stdout, "");
        }
        other => panic!("a non-zero exit is still a completion, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stderr_is_captured_separately_from_stdout() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("stderr_only.c"), None))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::Completed(report) => {
            assert_eq!(report.stdout, "");
            assert_eq!(report.stderr, "diagnostic line\n");
            assert_eq!(report.exit_code, 0);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

#[tokio::test]
async fn test_supplied_stdin_reaches_scanf() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("read_int.c"), Some("42\n")))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::Completed(report) => {
            assert_eq!(report.stdout, "doubled: 84\n");
            assert_eq!(report.exit_code, 0);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

#[tokio::test]
async fn test_absent_stdin_is_immediate_eof_not_a_hang() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let started = std::time::Instant::now();
    let outcome = sandbox
        .submit(submit(fixture_source("read_int.c"), None))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::Completed(report) => {
            assert_eq!(report.stdout, "no input\n");
            assert_eq!(report.exit_code, 1);
        }
        other => panic!("expected completion, got {other:?}"),
    }
    // Nowhere near the 5s run budget
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
}
