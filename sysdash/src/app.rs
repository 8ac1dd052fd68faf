//! App state and main loop: owns the store, the connection and the status reporter,
//! and runs every ingest -> project -> render cycle on one event loop.

use std::{io, time::Duration};

use anyhow::{Context, Result};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::connection::{ConnectionEvent, ConnectionManager, Connector};
use crate::error::TransportError;
use crate::sink::{RenderSink, ViewCommand};
use crate::status::StatusReporter;
use crate::store::MetricsStore;
use crate::view::{project, ProcessSort, ProjectionPolicy};

const INPUT_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Connect,
    Disconnect,
    SortBy(ProcessSort),
    ToggleIdleCores,
    View(ViewCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Source of user commands, polled without blocking between connection events.
pub trait InputSource {
    fn poll_commands(&mut self) -> io::Result<Vec<Command>>;
}

/// For headless runs: nothing but Ctrl-C.
pub struct NoInput;

impl InputSource for NoInput {
    fn poll_commands(&mut self) -> io::Result<Vec<Command>> {
        Ok(Vec::new())
    }
}

pub struct App<C> {
    store: MetricsStore,
    connection: ConnectionManager<C>,
    status: StatusReporter,
    policy: ProjectionPolicy,
}

impl<C: Connector> App<C> {
    pub fn new(connection: ConnectionManager<C>, store: MetricsStore, policy: ProjectionPolicy) -> Self {
        let status = StatusReporter::new(connection.policy().max_attempts);
        Self {
            store,
            connection,
            status,
            policy,
        }
    }

    pub fn store(&self) -> &MetricsStore {
        &self.store
    }

    pub fn connection(&self) -> &ConnectionManager<C> {
        &self.connection
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    pub fn policy(&self) -> &ProjectionPolicy {
        &self.policy
    }

    pub async fn run<S, I>(&mut self, sink: &mut S, input: &mut I) -> Result<()>
    where
        S: RenderSink,
        I: InputSource,
    {
        sink.update_status(self.status.current());
        sink.redraw().context("initial draw")?;
        self.connection.start();

        let mut tick = interval(INPUT_POLL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                ev = self.connection.next_event() => self.handle_event(ev, sink)?,
                _ = tick.tick() => {
                    for cmd in input.poll_commands().context("reading input")? {
                        if self.handle_command(cmd, sink)? == Flow::Quit {
                            return Ok(());
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => return Ok(()),
            }
        }
    }

    /// One event, fully handled (store updated, view projected and drawn) before returning.
    pub fn handle_event<S: RenderSink>(&mut self, ev: ConnectionEvent, sink: &mut S) -> Result<()> {
        match ev {
            ConnectionEvent::StateChanged(state) => {
                sink.update_status(self.status.observe(state));
                sink.redraw().context("drawing status")?;
            }
            ConnectionEvent::Snapshot(snapshot) => {
                self.store.ingest(snapshot);
                self.render(sink)?;
            }
            ConnectionEvent::TransportError(e) => {
                if let TransportError::ExhaustedRetries { .. } = e {
                    self.status.note_exhausted();
                }
                warn!(error = %e, "transport error");
            }
        }
        Ok(())
    }

    pub fn handle_command<S: RenderSink>(&mut self, cmd: Command, sink: &mut S) -> Result<Flow> {
        debug!(?cmd, "command");
        match cmd {
            Command::Quit => return Ok(Flow::Quit),
            Command::Connect => self.connection.start(),
            Command::Disconnect => self.connection.stop(),
            Command::SortBy(sort) => {
                self.policy.sort = sort;
                self.render(sink)?;
            }
            Command::ToggleIdleCores => {
                self.policy.hide_idle_cores = !self.policy.hide_idle_cores;
                self.render(sink)?;
            }
            Command::View(v) => {
                sink.view_command(v);
                sink.redraw().context("redrawing view")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn render<S: RenderSink>(&self, sink: &mut S) -> Result<()> {
        let view = project(self.store.snapshot(), &self.policy);
        sink.render(&view).context("rendering view")
    }
}
