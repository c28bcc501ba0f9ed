use std::time::{Duration, Instant};

use kiln::{Config, Limits, Outcome, Phase, Sandbox};

use super::{fixture_source, submit};

#[tokio::test]
async fn test_infinite_loop_trips_the_run_timeout() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = Sandbox::new(Config {
        workspace_root: Some(base.path().to_path_buf()),
        limits: Limits::new().with_run_timeout(1.0),
        ..Default::default()
    });

    let started = Instant::now();
    let outcome = sandbox
        .submit(submit(fixture_source("infinite_loop.c"), None))
        .await
        .expect("submission failed");

    assert_eq!(outcome, Outcome::TimedOut { phase: Phase::Run });

    // Roughly the configured bound: over 1s, but with only scheduling slack
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(8), "took {elapsed:?}");
}

#[tokio::test]
async fn test_run_timeout_leaves_no_workspace_behind() {
    let base = tempfile::tempdir().unwrap();
    let sandbox = Sandbox::new(Config {
        workspace_root: Some(base.path().to_path_buf()),
        limits: Limits::new().with_run_timeout(0.5),
        ..Default::default()
    });

    let outcome = sandbox
        .submit(submit(fixture_source("infinite_loop.c"), None))
        .await
        .expect("submission failed");

    assert_eq!(outcome, Outcome::TimedOut { phase: Phase::Run });
    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}
