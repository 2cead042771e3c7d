//! Bootstrap Integration Tests
//!
//! End-to-end tests for the full mechanism: mode detection, provisional
//! intake, early-event queuing across the initialization suspension, and
//! the single ordered handoff. Driven with a gated mock module so the
//! suspension window is under test control.

use futures::poll;

use forebay_core::{Bootstrap, BootstrapError, BootstrapPhase, ExecutionMode};
use forebay_harness::{ClientId, InitScript, MockModule, MockScope, SimEvent, SimEventKind};

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn payloads(events: &[SimEvent]) -> Vec<&str> {
    events.iter().map(SimEvent::payload).collect()
}

// ----------------------------------------------------------------------------
// Ordered Exactly-Once Handoff
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_dedicated_backlog_replayed_in_order_exactly_once() {
    let scope = MockScope::new(ExecutionMode::Dedicated);
    let (module, gate) = MockModule::gated(&scope);
    let probe = module.probe();

    let bootstrap = Bootstrap::new(scope.clone(), module);
    let phases = bootstrap.phase_observer();
    let mut run = Box::pin(bootstrap.run());

    // Registration happens synchronously at first poll, then the run
    // suspends in the initialization await.
    assert!(poll!(run.as_mut()).is_pending());
    assert_eq!(phases.phase(), BootstrapPhase::Queuing);

    scope.emit_message("a");
    scope.emit_message("b");
    scope.emit_message("c");
    assert!(!probe.started());

    gate.open();
    let report = run.await.expect("bootstrap succeeds");

    assert_eq!(report.mode, ExecutionMode::Dedicated);
    assert_eq!(report.replayed, 3);
    assert_eq!(probe.init_calls(), 1);

    let batches = probe.batches();
    assert_eq!(batches.len(), 1, "handoff happens exactly once");
    assert_eq!(payloads(&batches[0]), vec!["a", "b", "c"]);
    assert!(probe.handle_matches());
    assert_eq!(phases.phase(), BootstrapPhase::HandedOff);
}

#[tokio::test]
async fn test_empty_backlog_is_handed_off_as_empty_batch() {
    let scope = MockScope::new(ExecutionMode::Dedicated);
    let module = MockModule::new(&scope, InitScript::Ready);
    let probe = module.probe();

    let report = Bootstrap::new(scope, module)
        .run()
        .await
        .expect("bootstrap succeeds");

    assert_eq!(report.replayed, 0);
    assert_eq!(probe.batches(), vec![Vec::<SimEvent>::new()]);
}

#[tokio::test]
async fn test_shared_connections_queue_in_arrival_order_across_clients() {
    let scope = MockScope::new(ExecutionMode::Shared);
    let (module, gate) = MockModule::gated(&scope);
    let probe = module.probe();

    let bootstrap = Bootstrap::new(scope.clone(), module);
    let mut run = Box::pin(bootstrap.run());
    assert!(poll!(run.as_mut()).is_pending());

    // Two distinct clients, interleaved. Ordering follows arrival only.
    let first = ClientId::random();
    let second = ClientId::random();
    scope.emit_connection(first, "one");
    scope.emit_connection(second, "two");
    scope.emit_connection(first, "three");

    gate.open();
    let report = run.await.expect("bootstrap succeeds");
    assert_eq!(report.mode, ExecutionMode::Shared);

    let batches = probe.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(payloads(&batches[0]), vec!["one", "two", "three"]);
    assert_eq!(
        batches[0][1].kind,
        SimEventKind::Connection { client: second }
    );
}

// ----------------------------------------------------------------------------
// Live Takeover
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_no_live_delivery_until_after_the_batch() {
    let scope = MockScope::new(ExecutionMode::Dedicated);
    let (module, gate) = MockModule::gated(&scope);
    let probe = module.probe();

    let bootstrap = Bootstrap::new(scope.clone(), module);
    let mut run = Box::pin(bootstrap.run());
    assert!(poll!(run.as_mut()).is_pending());

    scope.emit_message("queued");
    assert!(probe.live_events().is_empty());

    gate.open();
    run.await.expect("bootstrap succeeds");

    // The module's own handler is active now; the provisional intake is gone.
    assert!(scope.is_live());
    scope.emit_message("after");

    assert_eq!(payloads(&probe.batches()[0]), vec!["queued"]);
    assert_eq!(payloads(&probe.live_events()), vec!["after"]);
    assert!(scope.rejected_events().is_empty());
}

#[tokio::test]
async fn test_intake_registration_matches_detected_mode() {
    for mode in [ExecutionMode::Shared, ExecutionMode::Dedicated] {
        let scope = MockScope::new(mode);
        let module = MockModule::new(&scope, InitScript::Ready);

        Bootstrap::new(scope.clone(), module)
            .run()
            .await
            .expect("bootstrap succeeds");

        assert_eq!(scope.registered_intake_mode(), Some(mode));
    }
}

// ----------------------------------------------------------------------------
// Unresolved and Failed Initialization
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_unresolved_init_keeps_queuing_without_loss() {
    let scope = MockScope::new(ExecutionMode::Dedicated);
    let module = MockModule::new(&scope, InitScript::Never);
    let probe = module.probe();

    let bootstrap = Bootstrap::new(scope.clone(), module);
    let queue = bootstrap.queue_observer();
    let phases = bootstrap.phase_observer();
    let mut run = Box::pin(bootstrap.run());

    assert!(poll!(run.as_mut()).is_pending());
    for n in 0..5 {
        scope.emit_message(&format!("event-{n}"));
    }
    assert!(poll!(run.as_mut()).is_pending());

    // Everything stays queued and queryable; nothing reaches the module.
    assert_eq!(queue.len(), 5);
    assert!(!queue.is_consumed());
    assert_eq!(phases.phase(), BootstrapPhase::Queuing);
    assert!(!probe.started());
    assert!(scope.unrouted_events().is_empty());
    assert!(scope.rejected_events().is_empty());
}

#[tokio::test]
async fn test_failed_init_never_delivers_the_backlog() {
    let scope = MockScope::new(ExecutionMode::Dedicated);
    let (module, gate) = MockModule::gated(&scope);
    let probe = module.probe();

    let bootstrap = Bootstrap::new(scope.clone(), module);
    let queue = bootstrap.queue_observer();
    let phases = bootstrap.phase_observer();
    let mut run = Box::pin(bootstrap.run());

    assert!(poll!(run.as_mut()).is_pending());
    scope.emit_message("never-delivered");

    gate.fail("wasm compile rejected");
    let err = run.await.expect_err("bootstrap fails");

    assert!(matches!(
        err,
        BootstrapError::InitializationFailed { ref reason }
            if reason.contains("wasm compile rejected")
    ));
    assert_eq!(phases.phase(), BootstrapPhase::InitFailed);
    assert!(!probe.started());
    // The backlog built up so far is dropped undelivered, never handed off.
    assert!(!queue.is_consumed());
    assert_eq!(queue.len(), 1);
}

// ----------------------------------------------------------------------------
// Post-Handoff Gap
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_events_in_the_handoff_gap_are_rejected_not_lost() {
    let scope = MockScope::new(ExecutionMode::Dedicated);
    let (module, gate) = MockModule::gated(&scope);
    let module = module.without_live_handler();
    let probe = module.probe();

    let bootstrap = Bootstrap::new(scope.clone(), module);
    let mut run = Box::pin(bootstrap.run());
    assert!(poll!(run.as_mut()).is_pending());
    scope.emit_message("queued");

    gate.open();
    run.await.expect("bootstrap succeeds");

    // The module never took over, so the provisional intake is still the
    // active handler; its queue is consumed and must reject, not drop.
    assert!(scope.has_provisional_intake());
    scope.emit_message("gap");

    assert_eq!(payloads(&probe.batches()[0]), vec!["queued"]);
    assert_eq!(payloads(&scope.rejected_events()), vec!["gap"]);
    assert!(probe.live_events().is_empty());
}
