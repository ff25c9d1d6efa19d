//! Option merging and validation before a builder runs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn scheduled_options_override_target_options() {
    let architect = architect(&workspace());

    let run = architect
        .schedule_target(
            &Target::new("app", "build"),
            object(json!({"b": 3, "c": 4})),
            ScheduleOptions::default(),
        )
        .await
        .unwrap();

    let output = run.result().await.unwrap();
    assert_eq!(output.info["options"], json!({"a": 1, "b": 3, "c": 4}));
}

#[tokio::test]
async fn schema_defaults_are_applied() {
    let host = workspace();
    host.add_builder(
        BuilderInfo::new(
            "pkg:serve",
            "",
            json!({"properties": {"port": {"type": "number", "default": 4200}}}),
        ),
        echo(),
    );

    let run = architect(&host)
        .schedule_builder("pkg:serve", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();

    assert_eq!(run.result().await.unwrap().info["options"], json!({"port": 4200}));
}

#[tokio::test]
async fn invalid_options_fail_with_every_error_before_the_builder_runs() {
    let host = workspace();
    let invoked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invoked);
    host.add_builder(
        BuilderInfo::new(
            "pkg:typed",
            "",
            json!({
                "properties": {"port": {"type": "number"}},
                "required": ["host"],
            }),
        ),
        create_builder(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(BuilderOutput::success().into())
        }),
    );

    let run = architect(&host)
        .schedule_builder(
            "pkg:typed",
            object(json!({"port": "eighty"})),
            ScheduleOptions::default(),
        )
        .await
        .unwrap();
    let progress = run.progress();

    let err = run.result().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Schema validation failed with the following errors:\n  \
         /port must be number\n  \
         must have required property 'host'"
    );
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
    assert!(states(progress).await.is_empty());
}
