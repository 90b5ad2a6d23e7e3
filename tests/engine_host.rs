// tests/engine_host.rs

//! Host-mode execution through recording fake hosts: dispatch, source
//! rendering, error mapping and the process-wide serialization guarantee.

use std::sync::Arc;
use std::time::Duration;

use scripter::command::ScriptCommand;
use scripter::errors::{InvalidReason, ScriptError};
use scripter::exec::{Engine, ScriptHost};
use scripter::types::Mode;
use scripter_test_utils::builders::CommandBuilder;
use scripter_test_utils::fake_host::RecordingHost;
use scripter_test_utils::{init_tracing, with_timeout};

fn engine_with(host: &Arc<RecordingHost>) -> Engine {
    Engine::with_host(Arc::clone(host) as Arc<dyn ScriptHost>)
}

fn which_git() -> ScriptCommand {
    CommandBuilder::new("which").arg("git").build_host(false)
}

#[tokio::test]
async fn host_result_is_passed_through() {
    init_tracing();
    let host = Arc::new(RecordingHost::succeeding("/usr/bin/git"));
    let engine = engine_with(&host);

    let result = with_timeout(engine.execute(&which_git())).await;
    assert_eq!(result, Ok(Some("/usr/bin/git".to_string())));

    let calls = host.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].source, "do shell script \"which git\"");
}

#[tokio::test]
async fn privileged_commands_request_administrator_privileges() {
    init_tracing();
    let host = Arc::new(RecordingHost::succeeding("ok"));
    let engine = engine_with(&host);

    let cmd = CommandBuilder::new("which").arg("git").build_host(true);
    with_timeout(engine.execute(&cmd)).await.unwrap();

    assert_eq!(
        host.calls()[0].source,
        "do shell script \"which git\" with administrator privileges"
    );
}

#[tokio::test]
async fn empty_path_is_rejected_before_the_host_is_called() {
    init_tracing();
    let host = Arc::new(RecordingHost::succeeding("never"));
    let engine = engine_with(&host);

    let cmd = CommandBuilder::without_path().build_host(false);
    assert_eq!(
        engine.execute(&cmd).await,
        Err(ScriptError::InvalidCommand(InvalidReason::PathEmpty))
    );
    assert_eq!(host.call_count(), 0);
}

#[tokio::test]
async fn clean_non_zero_exit_becomes_success_none() {
    init_tracing();
    // The host decorates the message; the translation matches the literal
    // anywhere inside it.
    let host = Arc::new(RecordingHost::failing(
        "execution error: The command exited with a non-zero status. (1)",
        Some(1),
    ));
    let engine = engine_with(&host);

    let result = with_timeout(engine.execute(&which_git())).await;
    assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn host_errors_map_to_execute_failed() {
    init_tracing();
    let host = Arc::new(RecordingHost::failing("syntax error near line 1", Some(-2741)));
    let engine = engine_with(&host);

    let err = with_timeout(engine.execute(&which_git())).await.unwrap_err();
    let ScriptError::ExecuteFailed { command_line, reason } = err else {
        panic!("expected ExecuteFailed");
    };
    assert_eq!(command_line, "do shell script \"which git\"");
    assert!(reason.contains("syntax error near line 1"), "reason: {reason}");
    assert!(reason.contains("[code: -2741]"), "reason: {reason}");
}

#[tokio::test]
async fn empty_host_messages_fall_back_to_a_placeholder() {
    init_tracing();
    let host = Arc::new(RecordingHost::failing("", None));
    let engine = engine_with(&host);

    let err = with_timeout(engine.execute(&which_git())).await.unwrap_err();
    let ScriptError::ExecuteFailed { reason, .. } = err else {
        panic!("expected ExecuteFailed");
    };
    assert_eq!(reason, "unknown error");
}

#[tokio::test]
async fn unknown_mode_falls_through_to_unsupported() {
    init_tracing();
    let host = Arc::new(RecordingHost::succeeding("never"));
    let engine = engine_with(&host);

    let cmd = ScriptCommand::new(Some("which".to_string()), vec![], Mode::Unknown);
    assert_eq!(
        engine.execute(&cmd).await,
        Err(ScriptError::UnsupportedMode)
    );
    assert_eq!(host.call_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_host_calls_never_overlap() {
    init_tracing();
    let host = Arc::new(
        RecordingHost::succeeding("ok").with_delay(Duration::from_millis(100)),
    );
    let engine = engine_with(&host);

    let first = engine.clone();
    let second = engine.clone();
    let cmd_a = which_git();
    let cmd_b = CommandBuilder::new("which").arg("pod").build_host(false);

    let (a, b) = tokio::join!(
        tokio::spawn(async move { first.execute(&cmd_a).await }),
        tokio::spawn(async move { second.execute(&cmd_b).await }),
    );
    a.unwrap().unwrap();
    b.unwrap().unwrap();

    let calls = host.calls();
    assert_eq!(calls.len(), 2);
    // One call fully finishes before the other starts, in either order.
    let serialized =
        calls[0].exited <= calls[1].entered || calls[1].exited <= calls[0].entered;
    assert!(serialized, "host calls overlapped: {calls:?}");
}

#[tokio::test]
async fn interrupt_does_not_disturb_host_calls() {
    init_tracing();
    let host = Arc::new(
        RecordingHost::succeeding("ok").with_delay(Duration::from_millis(200)),
    );
    let engine = engine_with(&host);

    let worker = engine.clone();
    let cmd = which_git();
    let task = tokio::spawn(async move { worker.execute(&cmd).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.interrupt();

    // Host calls are not preemptible; the call completes normally.
    let result = with_timeout(task).await.unwrap();
    assert_eq!(result, Ok(Some("ok".to_string())));
}
