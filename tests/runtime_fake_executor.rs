// tests/runtime_fake_executor.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::event::{AccessKind, DataChange, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tokio::time::{sleep, Duration};

use reloader::engine::{CoreRuntime, Runtime, Trigger};
use reloader::fs::mock::MockFileSystem;
use reloader::watch::{EventForwarder, FingerprintStore, RuleTable, SkipList, WatchRule};
use reloader_test_utils::fake_executor::FakeExecutor;
use reloader_test_utils::{init_tracing, wait_for_dispatches, with_timeout};

struct Harness {
    fs: MockFileSystem,
    forwarder: EventForwarder,
    executor: FakeExecutor,
    runtime: Runtime<FakeExecutor>,
}

fn harness(rules: Vec<WatchRule>, skip: &[&str]) -> Harness {
    init_tracing();

    let fs = MockFileSystem::new();
    let skip: Vec<String> = skip.iter().map(|s| s.to_string()).collect();
    let (forwarder, streams) = EventForwarder::channel(SkipList::new("/proj", &skip));
    let executor = FakeExecutor::new();

    let core = CoreRuntime::new(
        Arc::new(RuleTable::new(rules)),
        FingerprintStore::new(Arc::new(fs.clone())),
    );
    let runtime = Runtime::new(core, streams, executor.clone());

    Harness {
        fs,
        forwarder,
        executor,
        runtime,
    }
}

fn write_event(path: &str) -> notify::Result<Event> {
    Ok(Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(PathBuf::from(path)))
}

/// Drop the forwarder (closing both streams) and run the loop to completion.
async fn run_to_end(h: Harness) -> (MockFileSystem, FakeExecutor) {
    let Harness {
        fs,
        forwarder,
        executor,
        runtime,
    } = h;
    drop(forwarder);
    with_timeout(runtime.run()).await;
    (fs, executor)
}

#[tokio::test]
async fn startup_rules_run_without_any_file_event() {
    let h = harness(
        vec![
            WatchRule::new("*.rs", "cargo build").with_run_at_startup(true),
            WatchRule::new("*.md", "mdbook build"),
        ],
        &[],
    );

    let (fs, executor) = run_to_end(h).await;

    let dispatched = executor.dispatched();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].command, "cargo build");
    assert_eq!(dispatched[0].trigger, Trigger::Startup);
    assert_eq!(fs.read_count(), 0);
}

#[tokio::test]
async fn modified_matching_file_dispatches_its_rule() {
    let h = harness(vec![WatchRule::new("*.txt", "echo hi")], &[]);
    h.fs.add_file("/proj/a.txt", "hello");
    h.fs.add_file("/proj/b.md", "# title");

    h.forwarder.forward(write_event("/proj/a.txt"));
    h.forwarder.forward(write_event("/proj/b.md"));

    let (_fs, executor) = run_to_end(h).await;

    let dispatched = executor.dispatched();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].pattern, "*.txt");
    assert_eq!(dispatched[0].trigger, Trigger::FileChange("/proj/a.txt".into()));
}

#[tokio::test]
async fn events_in_skipped_folders_never_reach_the_core() {
    let h = harness(vec![WatchRule::new("*.txt", "echo hi")], &["node_modules"]);
    h.fs.add_file("/proj/node_modules/pkg/a.txt", "x");

    h.forwarder.forward(write_event("/proj/node_modules/pkg/a.txt"));

    let (fs, executor) = run_to_end(h).await;

    assert!(executor.dispatched().is_empty());
    assert_eq!(fs.read_count(), 0);
}

#[tokio::test]
async fn non_modify_events_are_ignored() {
    let h = harness(vec![WatchRule::new("*.txt", "echo hi")], &[]);
    h.fs.add_file("/proj/a.txt", "x");

    h.forwarder.forward(Ok(
        Event::new(EventKind::Access(AccessKind::Any)).add_path(PathBuf::from("/proj/a.txt"))
    ));
    h.forwarder.forward(Ok(
        Event::new(EventKind::Remove(RemoveKind::File)).add_path(PathBuf::from("/proj/a.txt"))
    ));

    let (fs, executor) = run_to_end(h).await;

    assert!(executor.dispatched().is_empty());
    assert_eq!(fs.read_count(), 0);
}

#[tokio::test]
async fn watcher_errors_do_not_stop_the_loop() {
    let h = harness(vec![WatchRule::new("*.txt", "echo hi")], &[]);
    h.fs.add_file("/proj/a.txt", "x");

    h.forwarder.forward(Err(notify::Error::generic("inotify queue overflow")));
    h.forwarder.forward(write_event("/proj/a.txt"));

    let (_fs, executor) = run_to_end(h).await;

    assert_eq!(executor.commands(), vec!["echo hi".to_string()]);
}

#[tokio::test]
async fn unreadable_file_does_not_dispatch() {
    let h = harness(vec![WatchRule::new("*.txt", "echo hi")], &[]);

    // Deleted between the notification and the read.
    h.forwarder.forward(write_event("/proj/gone.txt"));

    let (fs, executor) = run_to_end(h).await;

    assert!(executor.dispatched().is_empty());
    assert_eq!(fs.read_count(), 1);
}

#[tokio::test]
async fn repeated_saves_with_same_content_dispatch_once() {
    let h = harness(vec![WatchRule::new("*.txt", "echo hi")], &[]);
    h.fs.add_file("/proj/a.txt", "same");

    for _ in 0..3 {
        h.forwarder.forward(write_event("/proj/a.txt"));
    }

    let (_fs, executor) = run_to_end(h).await;

    assert_eq!(executor.dispatched().len(), 1);
}

#[tokio::test]
async fn path_matching_two_rules_dispatches_both() {
    let h = harness(
        vec![
            WatchRule::new("*.rs", "cargo build"),
            WatchRule::new("main.rs", "cargo run"),
            WatchRule::new("*.md", "mdbook build"),
        ],
        &[],
    );
    h.fs.add_file("/proj/src/main.rs", "fn main() {}");

    h.forwarder.forward(write_event("/proj/src/main.rs"));

    let (_fs, executor) = run_to_end(h).await;

    let mut commands = executor.commands();
    commands.sort();
    assert_eq!(commands, vec!["cargo build".to_string(), "cargo run".to_string()]);
}

#[tokio::test]
async fn debounce_window_suppresses_then_allows() {
    let Harness {
        fs,
        forwarder,
        executor,
        runtime,
    } = harness(
        vec![WatchRule::new("*.txt", "echo hi").with_debounce(Duration::from_millis(300))],
        &[],
    );
    let handle = tokio::spawn(runtime.run());

    fs.add_file("/proj/a.txt", "one");
    forwarder.forward(write_event("/proj/a.txt"));
    wait_for_dispatches(&executor, 1).await;

    fs.add_file("/proj/a.txt", "two");
    forwarder.forward(write_event("/proj/a.txt"));
    sleep(Duration::from_millis(50)).await;
    assert_eq!(executor.dispatched().len(), 1);

    sleep(Duration::from_millis(350)).await;
    fs.add_file("/proj/a.txt", "three");
    forwarder.forward(write_event("/proj/a.txt"));
    wait_for_dispatches(&executor, 2).await;

    drop(forwarder);
    with_timeout(handle).await.unwrap();
    assert_eq!(executor.dispatched().len(), 2);
}
