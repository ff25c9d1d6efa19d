//! Stopping runs and builder teardown

use arch_core::{BuilderInput, ChannelFilter, ChannelKind, RunId};
use crate::prelude::*;
use similar_asserts::assert_eq;
use std::time::Duration;

/// Builder that registers two teardowns and never completes on its own
fn server(teardowns: Arc<AtomicUsize>, fail_second: bool) -> Builder {
    create_builder(move |_, context| {
        let first = Arc::clone(&teardowns);
        context.add_teardown(move || async move {
            first.fetch_add(1, Ordering::SeqCst);
            Ok::<(), String>(())
        });
        let second = Arc::clone(&teardowns);
        context.add_teardown(move || async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            second.fetch_add(1, Ordering::SeqCst);
            if fail_second {
                Err("socket still open".to_string())
            } else {
                Ok(())
            }
        });
        context.report_running();
        Ok(BuilderOutputLike::stream(futures::stream::pending()))
    })
}

/// Wait until the builder has been invoked
async fn started(run: &Run) {
    let mut progress = run.progress();
    while let Some(report) = progress.recv().await {
        if report.state == running(0, 1, None) {
            return;
        }
    }
}

#[tokio::test]
async fn stop_runs_every_teardown_once_then_completes() {
    let host = workspace();
    let teardowns = Arc::new(AtomicUsize::new(0));
    add_builder(&host, "pkg:server", server(Arc::clone(&teardowns), false));

    let run = architect(&host)
        .schedule_builder("pkg:server", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    started(&run).await;
    let mut outputs = run.output();

    assert_eq!(run.stop().await, Ok(()));
    assert_eq!(teardowns.load(Ordering::SeqCst), 2);
    assert_eq!(outputs.recv().await, None);
    assert_eq!(
        run.result().await,
        Err(ArchitectError::NoOutput("pkg:server".into()))
    );
}

#[tokio::test]
async fn failing_teardown_fails_stop() {
    let host = workspace();
    let teardowns = Arc::new(AtomicUsize::new(0));
    add_builder(&host, "pkg:server", server(Arc::clone(&teardowns), true));

    let run = architect(&host)
        .schedule_builder("pkg:server", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    started(&run).await;

    assert_eq!(
        run.stop().await,
        Err(ArchitectError::TeardownFailure("socket still open".into()))
    );
    assert_eq!(teardowns.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn inputs_after_stop_are_not_processed() {
    let host = workspace();
    let teardowns = Arc::new(AtomicUsize::new(0));
    add_builder(&host, "pkg:server", server(Arc::clone(&teardowns), false));
    let architect = architect(&host);

    let job = architect
        .scheduler()
        .schedule("pkg:server", Value::Object(JsonObject::new()));
    let info = job.description().await.unwrap().info.unwrap();
    let input = |id: RunId| {
        serde_json::to_value(BuilderInput {
            id,
            info: info.clone(),
            options: JsonObject::new(),
            target: None,
            workspace_root: "/workspace".into(),
            current_directory: "/workspace".into(),
        })
        .unwrap()
    };
    let mut outputs = job.output();
    let mut progress = job.subscribe(ChannelFilter::Channel(ChannelKind::Progress));

    assert!(job.input(input(job.id())));
    progress.recv().await.unwrap();
    job.stop().await.unwrap();

    assert!(!job.input(input(job.id())));
    assert_eq!(outputs.recv().await, None);
    assert_eq!(teardowns.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn stopping_a_finished_run_resolves_immediately() {
    let architect = architect(&workspace());

    let run = architect
        .schedule_builder("pkg:echo", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    run.result().await.unwrap();

    assert_eq!(run.stop().await, Ok(()));
}

/// Builder that counts ticks every few milliseconds until stopped
fn ticker(ticks: Arc<AtomicUsize>, teardowns: Arc<AtomicUsize>) -> Builder {
    create_builder(move |_, context| {
        let teardowns = Arc::clone(&teardowns);
        context.add_teardown(move || async move {
            teardowns.fetch_add(1, Ordering::SeqCst);
            Ok::<(), String>(())
        });
        let ticks = Arc::clone(&ticks);
        Ok(BuilderOutputLike::future(async move {
            while ticks.fetch_add(1, Ordering::SeqCst) < usize::MAX {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            Ok(BuilderOutput::success())
        }))
    })
}

#[tokio::test]
async fn dropping_every_run_handle_stops_the_job() {
    let host = workspace();
    let ticks = Arc::new(AtomicUsize::new(0));
    let teardowns = Arc::new(AtomicUsize::new(0));
    add_builder(
        &host,
        "pkg:ticker",
        ticker(Arc::clone(&ticks), Arc::clone(&teardowns)),
    );

    let run = architect(&host)
        .schedule_builder("pkg:ticker", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let clone = run.clone();
    let mut outputs = run.output();
    started(&run).await;

    // A remaining clone keeps the run alive
    drop(run);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(teardowns.load(Ordering::SeqCst), 0);

    drop(clone);
    assert_eq!(outputs.recv().await, None);
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);

    let stopped_at = ticks.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), stopped_at);
}
