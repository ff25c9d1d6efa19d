//! Builder failures surface through result and output

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn throwing_builder_fails_the_run_after_the_forced_running_state() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:throws",
        create_builder(|_, _| Err(ArchitectError::builder_runtime("cannot read tsconfig.json"))),
    );

    let run = architect(&host)
        .schedule_builder("pkg:throws", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let progress = run.progress();

    assert_eq!(
        run.result().await,
        Err(ArchitectError::BuilderRuntime("cannot read tsconfig.json".into()))
    );
    assert_eq!(states(progress).await, vec![running(0, 1, None)]);
}

#[tokio::test]
async fn failing_future_rejects_result_and_output() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:async-fail",
        create_builder(|_, _| {
            Ok(BuilderOutputLike::future(async {
                tokio::task::yield_now().await;
                Err(ArchitectError::builder_runtime("compilation aborted"))
            }))
        }),
    );

    let run = architect(&host)
        .schedule_builder("pkg:async-fail", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let mut outputs = run.output();

    let expected = ArchitectError::BuilderRuntime("compilation aborted".into());
    assert_eq!(outputs.recv().await, Some(Err(expected.clone())));
    assert_eq!(outputs.recv().await, None);
    assert_eq!(run.result().await, Err(expected));
}

#[tokio::test]
async fn unsuccessful_output_is_not_a_run_failure() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:lint",
        create_builder(|_, _| Ok(BuilderOutput::failure("3 lint errors").into())),
    );

    let run = architect(&host)
        .schedule_builder("pkg:lint", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let progress = run.progress();

    let output = run.result().await.unwrap();
    assert!(!output.success);
    assert_eq!(output.error.as_deref(), Some("3 lint errors"));
    assert_eq!(states(progress).await.last(), Some(&ProgressState::Stopped));
}

#[tokio::test]
async fn host_failures_surface_when_scheduling() {
    let host = workspace();
    host.fail_resolution("pkg:remote", "registry unreachable");

    let err = architect(&host)
        .schedule_builder("pkg:remote", JsonObject::new(), ScheduleOptions::default())
        .await
        .err()
        .unwrap();

    assert_eq!(
        err,
        ArchitectError::Host("workspace error: registry unreachable".into())
    );
}
