use kiln::Outcome;

use super::{fixture_source, submit, test_sandbox};

#[tokio::test]
async fn test_valid_source_compiles_and_completes() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("hello.c"), None))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::Completed(report) => {
            assert_eq!(report.exit_code, 0);
            assert_eq!(report.stdout, "Hello, World!\n");
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unterminated_source_yields_diagnostics_and_never_runs() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("compile_error.c"), None))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::CompileFailed { diagnostics, .. } => {
            assert!(!diagnostics.is_empty());
            assert!(diagnostics.contains("error"));
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_compile_time_is_recorded_on_success() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("hello.c"), None))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::Completed(report) => {
            assert!(report.compile_elapsed > std::time::Duration::ZERO);
            assert!(report.compile_elapsed < std::time::Duration::from_secs(10));
        }
        other => panic!("expected completion, got {other:?}"),
    }
}
