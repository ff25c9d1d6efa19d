//! Scheduling runs: outputs, logs, configuration and nesting

use arch_core::AnalyticsReport;
use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn target_runs_tag_outputs_with_the_target() {
    let architect = architect(&workspace());
    let target = Target::new("app", "build").with_configuration("prod");

    let run = architect
        .schedule_target(&target, JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let output = run.result().await.unwrap();

    assert!(output.success);
    assert_eq!(output.target, Some(target));
    assert_eq!(output.info["options"], json!({"a": 1, "b": 5}));
}

#[tokio::test]
async fn builder_logs_reach_the_schedule_logger() {
    let architect = architect(&workspace());
    let logs = CollectingLogSink::new();

    let run = architect
        .schedule_target(
            &Target::new("app", "build"),
            JsonObject::new(),
            ScheduleOptions::with_logger(Arc::new(logs.clone())),
        )
        .await
        .unwrap();
    let mut outputs = run.output();
    while outputs.recv().await.is_some() {}

    assert_eq!(logs.messages(), vec!["echo 2"]);
    assert_eq!(logs.entries()[0].logger, "app:build");
}

#[tokio::test]
async fn builders_see_the_host_directories() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:where",
        create_builder(|_, context| {
            Ok(BuilderOutput::success()
                .with_info("root", json!(context.workspace_root()))
                .with_info("cwd", json!(context.current_directory()))
                .into())
        }),
    );

    let output = architect(&host)
        .schedule_builder("pkg:where", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap()
        .result()
        .await
        .unwrap();

    assert_eq!(output.info["root"], json!("/workspace"));
    assert_eq!(output.info["cwd"], json!("/workspace/apps/app"));
}

#[tokio::test]
async fn configuration_turns_off_validation_and_analytics() {
    let host = workspace();
    host.add_builder(
        BuilderInfo::new("pkg:strict", "", json!({"required": ["name"]})),
        create_builder(|_, context| {
            context.report_analytics(AnalyticsReport::event("build", "done"));
            Ok(BuilderOutput::success().into())
        }),
    );
    let config = ArchitectConfig::from_toml_str(
        r#"
validate_options = false
analytics = false
log_level = "warn"
"#,
    )
    .unwrap();
    let architect = Architect::with_config(host, Arc::new(FakeSchemaRegistry::new()), config);

    let run = architect
        .schedule_builder("pkg:strict", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let mut analytics = run.analytics();

    assert!(run.result().await.unwrap().success);
    assert_eq!(analytics.recv().await, None);
}

#[tokio::test]
async fn concurrent_runs_of_one_builder_are_independent() {
    let host = workspace();
    let architect = architect(&host);

    let runs = futures::future::join_all((0..5).map(|n| {
        let architect = architect.clone();
        async move {
            architect
                .schedule_builder("pkg:echo", object(json!({"n": n})), ScheduleOptions::default())
                .await
                .unwrap()
        }
    }))
    .await;

    for (n, run) in runs.iter().enumerate() {
        let output = run.result().await.unwrap();
        assert_eq!(output.info["options"], json!({"n": n}));
    }
    assert_eq!(host.resolve_count("pkg:echo"), 1);
}

#[tokio::test]
async fn nested_target_progress_is_visible_to_the_parent() {
    let host = workspace();
    add_builder(
        &host,
        "pkg:parent",
        create_builder(|_, context| {
            Ok(BuilderOutputLike::future(async move {
                let child = context
                    .schedule_target(
                        &Target::new("app", "build"),
                        JsonObject::new(),
                        ScheduleOptions::default(),
                    )
                    .await?;
                let mut child_progress = child.progress();
                let output = child.result().await?;
                while child_progress.recv().await.is_some() {}
                tokio::task::yield_now().await;
                Ok(BuilderOutput::success().with_info("child", json!(output.success)))
            }))
        }),
    );
    let architect = architect(&host);

    let run = architect
        .schedule_builder("pkg:parent", JsonObject::new(), ScheduleOptions::default())
        .await
        .unwrap();
    let mut progress = run.progress();
    assert_eq!(run.result().await.unwrap().info["child"], json!(true));

    let mut child_targets = Vec::new();
    while let Some(report) = progress.recv().await {
        if report.id != run.id() {
            child_targets.push(report.target);
        }
    }
    assert!(!child_targets.is_empty());
    assert!(child_targets
        .iter()
        .all(|target| target == &Some(Target::new("app", "build"))));
}
