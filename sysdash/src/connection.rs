//! Connection lifecycle for the single live-data channel.
//!
//! [`transition`] is the whole state machine as a pure function. [`ConnectionManager`]
//! drives it against a [`Connector`], owns the retry deadline, the in-flight open and
//! the open channel, and hands events upward one at a time from [`next_event`].
//!
//! `next_event` is cancel-safe: every await point keeps its progress on the manager,
//! so dropping the future inside `tokio::select!` never loses or repeats a transition.
//!
//! [`next_event`]: ConnectionManager::next_event

use std::collections::VecDeque;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::stream::{LocalBoxStream, StreamExt};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::TransportError;
use crate::types::MetricsSnapshot;

/// Inbound text messages; the stream ending means the peer closed.
pub type Channel = LocalBoxStream<'static, Result<String, TransportError>>;

/// Opens the underlying channel. Implemented by the WebSocket transport and by test fakes.
pub trait Connector {
    fn open(&self) -> LocalBoxFuture<'static, Result<Channel, TransportError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting { attempt: u32 },
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Linear backoff: attempt `n` waits `base_delay * n`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_attempts: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Start,
    Opened,
    OpenFailed,
    Lost,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    OpenNow,
    OpenAfter(Duration),
    GiveUp,
    Teardown,
}

pub fn transition(
    state: ConnectionState,
    input: Input,
    policy: &RetryPolicy,
) -> (ConnectionState, Effect) {
    use ConnectionState::*;
    match (state, input) {
        (_, Input::Stop) => (Disconnected, Effect::Teardown),
        (Disconnected, Input::Start) => (Connecting { attempt: 1 }, Effect::OpenNow),
        (Connecting { .. }, Input::Opened) => (Connected, Effect::None),
        (Connecting { attempt }, Input::OpenFailed | Input::Lost) => {
            if attempt >= policy.max_attempts {
                (Disconnected, Effect::GiveUp)
            } else {
                let next = attempt + 1;
                (
                    Connecting { attempt: next },
                    Effect::OpenAfter(policy.delay_before(next)),
                )
            }
        }
        (Connected, Input::Lost) => (
            Connecting { attempt: 1 },
            Effect::OpenAfter(policy.delay_before(1)),
        ),
        // start while active, or a stale open/close result
        (s, _) => (s, Effect::None),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    StateChanged(ConnectionState),
    Snapshot(MetricsSnapshot),
    TransportError(TransportError),
}

pub struct ConnectionManager<C> {
    connector: C,
    policy: RetryPolicy,
    state: ConnectionState,
    retry_at: Option<Instant>,
    opening: Option<LocalBoxFuture<'static, Result<Channel, TransportError>>>,
    channel: Option<Channel>,
    pending: VecDeque<ConnectionEvent>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, policy: RetryPolicy) -> Self {
        Self {
            connector,
            policy,
            state: ConnectionState::Disconnected,
            retry_at: None,
            opening: None,
            channel: None,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// No-op unless disconnected.
    pub fn start(&mut self) {
        self.apply(Input::Start);
    }

    /// Force `Disconnected`: cancels a pending retry or open, closes the channel and
    /// discards anything not yet handed out.
    pub fn stop(&mut self) {
        self.apply(Input::Stop);
    }

    /// Wait for the next event. Pends forever while disconnected with nothing queued.
    pub async fn next_event(&mut self) -> ConnectionEvent {
        loop {
            if let Some(ev) = self.pending.pop_front() {
                return ev;
            }
            match self.state {
                ConnectionState::Disconnected => std::future::pending::<()>().await,
                ConnectionState::Connecting { attempt } => {
                    if let Some(at) = self.retry_at {
                        sleep_until(at).await;
                        self.retry_at = None;
                    }
                    let connector = &self.connector;
                    let fut = self.opening.get_or_insert_with(|| {
                        debug!(attempt, "opening channel");
                        connector.open()
                    });
                    let res = fut.await;
                    self.opening = None;
                    match res {
                        Ok(ch) => {
                            self.channel = Some(ch);
                            self.apply(Input::Opened);
                        }
                        Err(e) => {
                            warn!(attempt, error = %e, "connection attempt failed");
                            self.pending.push_back(ConnectionEvent::TransportError(e));
                            self.apply(Input::OpenFailed);
                        }
                    }
                }
                ConnectionState::Connected => {
                    let Some(ch) = self.channel.as_mut() else {
                        self.apply(Input::Lost);
                        continue;
                    };
                    match ch.next().await {
                        Some(Ok(text)) => match codec::decode(&text) {
                            Ok(snapshot) => return ConnectionEvent::Snapshot(snapshot),
                            Err(e) => debug!(error = %e, "dropping undecodable message"),
                        },
                        Some(Err(e)) => {
                            warn!(error = %e, "channel error");
                            self.channel = None;
                            self.pending.push_back(ConnectionEvent::TransportError(e));
                            self.apply(Input::Lost);
                        }
                        None => {
                            info!("channel closed by peer");
                            self.channel = None;
                            self.apply(Input::Lost);
                        }
                    }
                }
            }
        }
    }

    fn apply(&mut self, input: Input) {
        let (next, effect) = transition(self.state, input, &self.policy);
        match effect {
            Effect::None => {}
            Effect::OpenNow => self.retry_at = None,
            Effect::OpenAfter(delay) => {
                debug!(delay_ms = delay.as_millis() as u64, "scheduling reconnect");
                self.retry_at = Some(Instant::now() + delay);
            }
            Effect::GiveUp => {
                let attempts = self.policy.max_attempts;
                warn!(attempts, "retries exhausted, staying disconnected");
                self.retry_at = None;
                self.pending
                    .push_back(ConnectionEvent::TransportError(TransportError::ExhaustedRetries {
                        attempts,
                    }));
            }
            Effect::Teardown => {
                self.pending.clear();
                self.retry_at = None;
                self.opening = None;
                // dropping the stream closes the socket
                self.channel = None;
            }
        }
        if next != self.state {
            info!(from = ?self.state, to = ?next, "connection state changed");
            self.state = next;
            self.pending.push_back(ConnectionEvent::StateChanged(next));
        }
    }
}
