//! Basic Harness Usage Example
//!
//! Walks the bootstrap through its whole lifecycle against the in-memory
//! doubles: events arrive while the module is still initializing, then the
//! gate opens and the backlog is handed off in order.

use forebay_core::{Bootstrap, ExecutionMode};
use forebay_harness::{MockModule, MockScope};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = tracing_subscriber::fmt::try_init();

    let scope = MockScope::new(ExecutionMode::Dedicated);
    let (module, gate) = MockModule::gated(&scope);
    let probe = module.probe();

    let bootstrap = Bootstrap::new(scope.clone(), module);
    let queue = bootstrap.queue_observer();

    // The driver runs once the bootstrap has suspended in initialization:
    // both messages land in the queue, then the gate lets init resolve.
    let driver = async {
        scope.emit_message("hello");
        scope.emit_message("world");
        println!("queued while initializing: {}", queue.len());
        gate.open();
    };

    let (report, ()) = tokio::join!(bootstrap.run(), driver);
    let report = report.expect("bootstrap succeeds");

    println!(
        "bootstrap finished: mode={}, replayed={}",
        report.mode, report.replayed
    );
    println!(
        "module received batch: {:?}",
        probe
            .batches()
            .first()
            .map(|batch| batch.iter().map(|e| e.payload().to_string()).collect::<Vec<_>>())
    );
}
