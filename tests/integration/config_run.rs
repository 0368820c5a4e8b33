// tests/integration/config_run.rs

use std::error::Error;
use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use tokio::sync::mpsc;

use fandag::config::{ConfiguredGraph, build_graph, load_and_validate, parse_str};
use fandag::engine::{Scheduler, SchedulerEvent};
use fandag::exec::Operation;
use fandag::types::{FailurePolicy, TerminationMode};
use fandag_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};
use fandag_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const DOUBLING: &str = r#"
[config]
workers = 3
concurrency = 2
poll_interval_ms = 10

[task.double]
action = "multiply"
factor = 2
triggers = ["inc", "report"]

[task.inc]
action = "add"
amount = 1
triggers = ["report"]

[task.report]

[[seed]]
task = "double"
payload = 5
"#;

#[test]
fn config_section_fills_scheduler_options() -> TestResult {
    let cfg = parse_str(DOUBLING)?;
    let options = cfg.config.scheduler_options();

    assert_eq!(options.workers, 3);
    assert_eq!(options.effective_concurrency(), 2);
    assert_eq!(options.termination, TerminationMode::Drain);
    assert_eq!(options.failure_policy, FailurePolicy::Isolate);
    assert_eq!(options.poll_interval.as_millis(), 10);
    Ok(())
}

#[test]
fn defaults_apply_when_config_section_is_absent() -> TestResult {
    let cfg = parse_str("[task.A]\n[[seed]]\ntask = \"A\"\n")?;
    let options = cfg.config.scheduler_options();

    assert_eq!(options.workers, 4);
    assert_eq!(options.effective_concurrency(), 4);
    assert_eq!(cfg.seed[0].payload, 0);
    Ok(())
}

#[test]
fn string_modes_are_parsed() -> TestResult {
    let cfg = parse_str(
        r#"
[config]
termination = "daemon"
failure_policy = "fail_fast"

[task.A]
"#,
    )?;
    assert_eq!(cfg.config.termination, TerminationMode::Daemon);
    assert_eq!(cfg.config.failure_policy, FailurePolicy::FailFast);
    Ok(())
}

#[test]
fn build_graph_wires_actions_triggers_and_seeds() -> TestResult {
    let cfg = parse_str(DOUBLING)?;
    let ConfiguredGraph { graph, seeds } = build_graph(&cfg)?;

    assert_eq!(graph.len(), 3);
    let double = graph.find("double").expect("double");
    let inc = graph.find("inc").expect("inc");
    let report = graph.find("report").expect("report");

    assert_eq!(graph.triggers_of(double), &[inc, report]);
    assert_eq!(graph.triggers_of(inc), &[report]);
    assert!(graph.triggers_of(report).is_empty());
    assert_eq!(seeds, vec![(double, 5)]);

    // double, inc, report (via double), report (via inc)
    assert_eq!(graph.unrolled_count(&[double]), Some(4));
    Ok(())
}

#[test]
fn cyclic_config_has_no_finite_invocation_count() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_task("ping", TaskConfigBuilder::identity().trigger("pong").build())
        .with_task("pong", TaskConfigBuilder::identity().trigger("ping").build())
        .with_task("lone", TaskConfigBuilder::identity().build())
        .with_seed("ping", 0)
        .build();
    let ConfiguredGraph { graph, .. } = build_graph(&cfg)?;

    let ping = graph.find("ping").expect("ping");
    let lone = graph.find("lone").expect("lone");
    assert_eq!(graph.unrolled_count(&[ping]), None);
    assert_eq!(graph.unrolled_count(&[lone]), Some(1));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn config_driven_run_propagates_builtin_results() -> TestResult {
    init_tracing();

    let mut file = NamedTempFile::new()?;
    write!(file, "{DOUBLING}")?;
    let cfg = load_and_validate(file.path())?;
    let ConfiguredGraph { graph, seeds } = build_graph(&cfg)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let scheduler =
        Scheduler::new(Arc::new(graph), cfg.config.scheduler_options()).with_events(tx);
    for (task, payload) in seeds {
        scheduler.seed(task, payload)?;
    }

    let report = with_timeout(scheduler.run()).await?;
    assert_eq!(report.completed, 4);
    assert_eq!(report.failed, 0);
    assert_eq!(report.max_depth, Some(2));

    let mut completed = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SchedulerEvent::ActivityCompleted {
            task,
            depth,
            result,
        } = event
        {
            completed.push((task, depth, result));
        }
    }
    completed.sort();
    assert_eq!(
        completed,
        vec![
            ("double".to_string(), 0, 10),
            ("inc".to_string(), 1, 11),
            ("report".to_string(), 1, 10),
            ("report".to_string(), 2, 11),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn fail_action_counts_as_a_failure_and_stops_its_branch() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .workers(1)
        .with_task(
            "broken",
            TaskConfigBuilder::fail()
                .message("disk on fire")
                .trigger("after")
                .build(),
        )
        .with_task("after", TaskConfigBuilder::identity().build())
        .with_task("ok", TaskConfigBuilder::add(3).delay_ms(10).build())
        .with_seed("broken", 1)
        .with_seed("ok", 1)
        .build();
    let ConfiguredGraph { graph, seeds } = build_graph(&cfg)?;

    let scheduler = Scheduler::new(Arc::new(graph), cfg.config.scheduler_options());
    for (task, payload) in seeds {
        scheduler.seed(task, payload)?;
    }
    let report = with_timeout(scheduler.run()).await?;

    assert_eq!(report.failed, 1);
    assert_eq!(report.completed, 1);
    Ok(())
}

#[test]
fn builtin_operations_are_built_from_task_config() -> TestResult {
    use fandag::exec::BuiltinAction;

    let multiply = BuiltinAction::from_config("m", &TaskConfigBuilder::multiply(3).build())?;
    assert_eq!(multiply.operation(), &Operation::Multiply(3));

    let add = BuiltinAction::from_config("a", &TaskConfigBuilder::add(-2).build())?;
    assert_eq!(add.operation(), &Operation::Add(-2));

    let fail = BuiltinAction::from_config("f", &TaskConfigBuilder::fail().build())?;
    match fail.operation() {
        Operation::Fail(msg) => assert!(msg.contains("'f'")),
        other => panic!("expected Fail, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn builtin_overflow_is_an_action_error() -> TestResult {
    use fandag::exec::{Action, BuiltinAction};

    let action = BuiltinAction::new("big", Operation::Multiply(2), None);
    assert!(action.call(i64::MAX).await.is_err());
    assert_eq!(action.call(21).await?, 42);
    Ok(())
}
