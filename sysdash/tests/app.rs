//! Coordinator: events flow into the store and out to the sink; commands steer both.

use std::{cell::RefCell, io, rc::Rc};

use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::StreamExt;

use sysdash::app::{App, Command, Flow, InputSource};
use sysdash::codec::decode;
use sysdash::connection::{
    Channel, ConnectionEvent, ConnectionManager, ConnectionState, Connector, RetryPolicy,
};
use sysdash::error::TransportError;
use sysdash::sink::{RenderSink, SeriesKind, ViewCommand};
use sysdash::status::StatusIndicator;
use sysdash::store::MetricsStore;
use sysdash::view::{CoreBar, MemoryGauge, ProcessRowView, ProcessSort, ProjectionPolicy};

const SNAPSHOT: &str = r#"{
    "cpu_usage": [10, 0, 30],
    "memory": {"total": 1000, "used": 500},
    "processes": [
        {"pid": 7, "name": "idle", "cpu_usage": 1, "memory_usage": 40},
        {"pid": 9, "name": "busy", "cpu_usage": 60, "memory_usage": 5}
    ]
}"#;

/// Hands out one pre-made channel, then hangs.
#[derive(Clone, Default)]
struct OneShot(Rc<RefCell<Option<UnboundedReceiver<Result<String, TransportError>>>>>);

impl Connector for OneShot {
    fn open(&self) -> LocalBoxFuture<'static, Result<Channel, TransportError>> {
        match self.0.borrow_mut().take() {
            Some(rx) => future::ready(Ok(rx.boxed_local())).boxed_local(),
            None => future::pending::<Result<Channel, TransportError>>().boxed_local(),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    statuses: Vec<StatusIndicator>,
    cpu: Vec<f64>,
    mem_labels: Vec<String>,
    cores: Vec<usize>,
    rows: Vec<u32>,
    sort: Option<ProcessSort>,
    last_seen: Option<String>,
    view_cmds: Vec<ViewCommand>,
    redraws: usize,
}

impl RenderSink for RecordingSink {
    fn update_series(&mut self, kind: SeriesKind, labels: &[String], values: &[f64], max_len: usize) {
        assert_eq!(labels.len(), values.len());
        assert!(values.len() <= max_len);
        match kind {
            SeriesKind::Cpu => self.cpu = values.to_vec(),
            SeriesKind::Memory => self.mem_labels = labels.to_vec(),
        }
    }

    fn update_cores(&mut self, bars: &[CoreBar]) {
        self.cores = bars.iter().map(|b| b.index).collect();
    }

    fn update_gauge(&mut self, _gauge: &MemoryGauge) {}

    fn update_table(&mut self, rows: &[ProcessRowView], sort: ProcessSort) {
        self.rows = rows.iter().map(|r| r.pid).collect();
        self.sort = Some(sort);
    }

    fn update_status(&mut self, status: &StatusIndicator) {
        self.statuses.push(status.clone());
    }

    fn update_last_seen(&mut self, label: Option<&str>) {
        self.last_seen = label.map(str::to_string);
    }

    fn view_command(&mut self, cmd: ViewCommand) {
        self.view_cmds.push(cmd);
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.redraws += 1;
        Ok(())
    }
}

/// Yields the scripted batches in order, then nothing.
struct Scripted(Vec<Vec<Command>>);

impl InputSource for Scripted {
    fn poll_commands(&mut self) -> io::Result<Vec<Command>> {
        if self.0.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(self.0.remove(0))
        }
    }
}

fn app(connector: OneShot) -> App<OneShot> {
    App::new(
        ConnectionManager::new(connector, RetryPolicy::default()),
        MetricsStore::new(50),
        ProjectionPolicy::default(),
    )
}

#[test]
fn snapshot_is_stored_and_rendered() {
    let mut app = app(OneShot::default());
    let mut sink = RecordingSink::default();

    let snap = decode(SNAPSHOT).unwrap();
    app.handle_event(ConnectionEvent::Snapshot(snap), &mut sink)
        .unwrap();

    assert_eq!(app.store().snapshot().ingested(), 1);
    assert_eq!(sink.cpu, vec![40.0 / 3.0]);
    assert_eq!(sink.mem_labels.len(), 1);
    assert_eq!(sink.cores, vec![0, 1, 2]);
    assert_eq!(sink.rows, vec![9, 7]);
    assert_eq!(sink.sort, Some(ProcessSort::CpuDesc));
    assert!(sink.last_seen.is_some());
    assert_eq!(sink.redraws, 1);
}

#[test]
fn state_changes_update_status() {
    let mut app = app(OneShot::default());
    let mut sink = RecordingSink::default();

    app.handle_event(
        ConnectionEvent::StateChanged(ConnectionState::Connecting { attempt: 2 }),
        &mut sink,
    )
    .unwrap();
    app.handle_event(
        ConnectionEvent::TransportError(TransportError::ExhaustedRetries { attempts: 5 }),
        &mut sink,
    )
    .unwrap();
    app.handle_event(
        ConnectionEvent::StateChanged(ConnectionState::Disconnected),
        &mut sink,
    )
    .unwrap();

    let texts: Vec<&str> = sink.statuses.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Connecting (attempt 2/5)", "Disconnected (retries exhausted)"]
    );
    assert_eq!(app.status().current().text, "Disconnected (retries exhausted)");
}

#[test]
fn transport_errors_leave_the_store_alone() {
    let mut app = app(OneShot::default());
    let mut sink = RecordingSink::default();
    app.handle_event(
        ConnectionEvent::TransportError(TransportError::Open("refused".into())),
        &mut sink,
    )
    .unwrap();
    assert_eq!(app.store().snapshot().ingested(), 0);
    assert_eq!(sink.redraws, 0);
}

#[test]
fn sort_and_idle_core_commands_reproject() {
    let mut app = app(OneShot::default());
    let mut sink = RecordingSink::default();
    app.handle_event(ConnectionEvent::Snapshot(decode(SNAPSHOT).unwrap()), &mut sink)
        .unwrap();

    let flow = app
        .handle_command(Command::SortBy(ProcessSort::MemDesc), &mut sink)
        .unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(sink.rows, vec![7, 9]);
    assert_eq!(sink.sort, Some(ProcessSort::MemDesc));
    assert_eq!(app.policy().sort, ProcessSort::MemDesc);

    app.handle_command(Command::ToggleIdleCores, &mut sink)
        .unwrap();
    assert!(app.policy().hide_idle_cores);
    assert_eq!(sink.cores, vec![0, 2]);

    // the store was not touched by either
    assert_eq!(app.store().snapshot().ingested(), 1);
}

#[test]
fn view_commands_go_to_the_sink() {
    let mut app = app(OneShot::default());
    let mut sink = RecordingSink::default();
    app.handle_command(Command::View(ViewCommand::ToggleHelp), &mut sink)
        .unwrap();
    app.handle_command(Command::View(ViewCommand::SelectBy(3)), &mut sink)
        .unwrap();
    assert_eq!(
        sink.view_cmds,
        vec![ViewCommand::ToggleHelp, ViewCommand::SelectBy(3)]
    );
    assert_eq!(sink.redraws, 2);
}

#[test]
fn connect_disconnect_and_quit() {
    let mut app = app(OneShot::default());
    let mut sink = RecordingSink::default();

    app.handle_command(Command::Connect, &mut sink).unwrap();
    assert_eq!(
        app.connection().state(),
        ConnectionState::Connecting { attempt: 1 }
    );
    app.handle_command(Command::Disconnect, &mut sink).unwrap();
    assert_eq!(app.connection().state(), ConnectionState::Disconnected);

    assert_eq!(app.handle_command(Command::Quit, &mut sink).unwrap(), Flow::Quit);
}

#[tokio::test(start_paused = true)]
async fn run_connects_renders_and_quits_on_command() {
    let (tx, rx) = unbounded();
    tx.unbounded_send(Ok(SNAPSHOT.to_string())).unwrap();
    let connector = OneShot(Rc::new(RefCell::new(Some(rx))));

    let mut app = app(connector);
    let mut sink = RecordingSink::default();
    let mut input = Scripted(vec![vec![], vec![], vec![Command::Quit]]);

    app.run(&mut sink, &mut input).await.unwrap();

    let texts: Vec<&str> = sink.statuses.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Disconnected", "Connecting (attempt 1/5)", "Connected"]
    );
    assert_eq!(app.store().snapshot().ingested(), 1);
    assert_eq!(sink.rows, vec![9, 7]);
    assert_eq!(app.connection().state(), ConnectionState::Connected);
    drop(tx);
}
