//! Name resolution: `has`, name syntax and resolution caching

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn declared_targets_and_known_builders_resolve() {
    let host = workspace();
    let architect = architect(&host);

    assert!(architect.has("{app:build}").await);
    assert!(architect.has("{app:build:prod}").await);
    assert!(architect.has("pkg:echo").await);
}

#[tokio::test]
async fn unknown_names_do_not_resolve() {
    let architect = architect(&workspace());

    assert!(!architect.has("{app:deploy}").await);
    assert!(!architect.has("foo:bar").await);
    assert!(!architect.has("no-colon").await);
}

#[tokio::test]
async fn malformed_builder_name_fails_before_any_resolution() {
    let host = workspace();
    let architect = architect(&host);

    let err = architect
        .schedule_builder("not-a-valid-name", JsonObject::new(), ScheduleOptions::default())
        .await
        .err()
        .unwrap();

    assert_eq!(err, ArchitectError::NameSyntax("not-a-valid-name".into()));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn unknown_builder_is_not_found_and_runs_nothing() {
    let host = workspace();
    let invoked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invoked);
    add_builder(
        &host,
        "pkg:counted",
        create_builder(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(BuilderOutput::success().into())
        }),
    );
    let architect = architect(&host);

    let err = architect
        .schedule_builder("foo:bar", JsonObject::new(), ScheduleOptions::default())
        .await
        .err()
        .unwrap();

    assert_eq!(err, ArchitectError::NotFound("foo:bar".into()));
    assert_eq!(err.to_string(), "Job 'foo:bar' cannot be resolved.");
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
    assert_eq!(host.count_calls(|c| matches!(c, HostCall::LoadBuilder { .. })), 0);
}

#[tokio::test]
async fn scheduling_a_target_twice_reuses_cached_resolution() {
    let host = workspace();
    let architect = architect(&host);
    let target = Target::new("app", "build");

    let first = architect
        .schedule_target(&target, JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let second = architect
        .schedule_target(&target, JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    first.result().await.unwrap();
    second.result().await.unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(
        host.count_calls(|c| matches!(c, HostCall::GetBuilderNameForTarget { .. })),
        1
    );
    assert_eq!(
        host.count_calls(|c| matches!(c, HostCall::GetOptionsForTarget { .. })),
        1
    );
    assert_eq!(host.resolve_count("pkg:echo"), 1);
    assert_eq!(host.load_count("pkg:echo"), 1);
}

#[tokio::test]
async fn architects_do_not_share_caches() {
    let host = workspace();

    for _ in 0..2 {
        let architect = architect(&host);
        architect
            .schedule_builder("pkg:echo", JsonObject::new(), ScheduleOptions::default())
            .await
            .unwrap()
            .result()
            .await
            .unwrap();
    }

    assert_eq!(host.resolve_count("pkg:echo"), 2);
}

#[tokio::test]
async fn traced_host_resolves_like_the_host_it_wraps() {
    let host = workspace();
    let architect = Architect::new(
        arch_adapters::TracedHost::new(host.clone()),
        Arc::new(FakeSchemaRegistry::new()),
    );

    let run = architect
        .schedule_target(
            &Target::new("app", "build"),
            JsonObject::new(),
            ScheduleOptions::with_logger(Arc::new(arch_adapters::TracingLogSink)),
        )
        .await
        .unwrap();

    assert!(run.result().await.unwrap().success);
    assert_eq!(host.resolve_count("pkg:echo"), 1);
}
