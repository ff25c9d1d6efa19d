//! Progress reporting from inside a builder

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn reported_progress_is_observed_in_order() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:steps",
        create_builder(|_, context| {
            context.report_running();
            context.report_progress(1, Some(2), Some("half"));
            Ok(BuilderOutput::success().into())
        }),
    );

    let run = architect(&host)
        .schedule_builder("pkg:steps", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let progress = run.progress();
    run.result().await.unwrap();

    assert_eq!(
        states(progress).await,
        vec![
            running(0, 1, None),
            running(0, 1, None),
            running(1, 2, Some("half")),
            running(2, 2, Some("half")),
            ProgressState::Stopped,
        ]
    );
}

#[tokio::test]
async fn status_updates_keep_current_and_total() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:status",
        create_builder(|_, context| {
            context.report_status("preparing");
            context.report_running();
            context.report_progress(3, Some(10), None);
            context.report_status("linking");
            Ok(BuilderOutput::success().into())
        }),
    );

    let run = architect(&host)
        .schedule_builder("pkg:status", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let progress = run.progress();
    run.result().await.unwrap();

    assert_eq!(
        states(progress).await,
        vec![
            running(0, 1, None),
            running(0, 1, Some("preparing")),
            running(3, 10, Some("preparing")),
            running(3, 10, Some("linking")),
            running(10, 10, Some("linking")),
            ProgressState::Stopped,
        ]
    );
}

#[tokio::test]
async fn builders_may_report_progress_without_reporting_running() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:quiet",
        create_builder(|_, context| {
            context.report_status("compiling");
            context.report_progress(1, Some(2), Some("half"));
            Ok(BuilderOutput::success().into())
        }),
    );

    let run = architect(&host)
        .schedule_builder("pkg:quiet", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let progress = run.progress();
    run.result().await.unwrap();

    assert_eq!(
        states(progress).await,
        vec![
            running(0, 1, None),
            running(0, 1, Some("compiling")),
            running(1, 2, Some("half")),
            running(2, 2, Some("half")),
            ProgressState::Stopped,
        ]
    );
}

#[tokio::test]
async fn late_subscribers_see_the_latest_report() {
    let architect = architect(&workspace());

    let run = architect
        .schedule_builder("pkg:echo", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    run.result().await.unwrap();

    let mut late = run.progress();
    let report = late.recv().await.unwrap();
    assert_eq!(report.state, ProgressState::Stopped);
    assert_eq!(report.id, run.id());
    assert_eq!(report.builder, Some(echo_info()));
}

#[tokio::test]
async fn streaming_builders_report_completion_per_output() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:watch",
        create_builder(|_, _| {
            Ok(BuilderOutputLike::stream(futures::stream::iter(vec![
                Ok(BuilderOutput::success().with_info("rebuild", json!(1))),
                Ok(BuilderOutput::success().with_info("rebuild", json!(2))),
            ])))
        }),
    );

    let run = architect(&host)
        .schedule_builder("pkg:watch", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let progress = run.progress();
    let mut outputs = run.output();

    let mut rebuilds = Vec::new();
    while let Some(output) = outputs.recv().await {
        rebuilds.push(output.unwrap().info["rebuild"].clone());
    }
    assert_eq!(rebuilds, vec![json!(1), json!(2)]);
    assert_eq!(
        states(progress).await,
        vec![
            running(0, 1, None),
            running(1, 1, None),
            ProgressState::Stopped,
            running(1, 1, None),
            ProgressState::Stopped,
        ]
    );
}
