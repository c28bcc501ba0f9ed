use kiln::Outcome;

use super::{fixture_source, submit, test_sandbox};

#[tokio::test]
async fn test_workspace_is_gone_after_success() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    sandbox
        .submit(submit(fixture_source("hello.c"), None))
        .await
        .expect("submission failed");

    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_workspace_is_gone_after_compile_failure() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("compile_error.c"), None))
        .await
        .expect("submission failed");

    assert!(matches!(outcome, Outcome::CompileFailed { .. }));
    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_files_created_by_the_program_do_not_persist() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = test_sandbox(base.path());

    let outcome = sandbox
        .submit(submit(fixture_source("create_file.c"), None))
        .await
        .expect("submission failed");

    match outcome {
        Outcome::Completed(report) => assert_eq!(report.stdout, "wrote artifact.txt\n"),
        other => panic!("expected completion, got {other:?}"),
    }

    // The program's file lived in its workspace and died with it
    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_results_and_clean_up() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = std::sync::Arc::new(test_sandbox(base.path()));

    let hello = {
        let sandbox = sandbox.clone();
        tokio::spawn(async move {
            sandbox
                .submit(submit(fixture_source("hello.c"), None))
                .await
        })
    };
    let doubled = {
        let sandbox = sandbox.clone();
        tokio::spawn(async move {
            sandbox
                .submit(submit(fixture_source("read_int.c"), Some("7\n")))
                .await
        })
    };

    let hello = hello.await.unwrap().expect("hello submission failed");
    let doubled = doubled.await.unwrap().expect("read_int submission failed");

    match (hello, doubled) {
        (Outcome::Completed(a), Outcome::Completed(b)) => {
            assert_eq!(a.stdout, "Hello, World!\n");
            assert_eq!(b.stdout, "doubled: 14\n");
        }
        other => panic!("expected two completions, got {other:?}"),
    }

    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}
