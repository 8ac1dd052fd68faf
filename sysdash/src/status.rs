//! Maps connection state to the user-visible status indicator.

use crate::connection::ConnectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Connected,
    Connecting,
    Disconnected,
}

impl StatusKind {
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Connected => "connected",
            StatusKind::Connecting => "connecting",
            StatusKind::Disconnected => "disconnected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug)]
pub struct StatusReporter {
    max_attempts: u32,
    exhausted: bool,
    current: StatusIndicator,
}

impl StatusReporter {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            exhausted: false,
            current: StatusIndicator {
                kind: StatusKind::Disconnected,
                text: "Disconnected".into(),
            },
        }
    }

    pub fn current(&self) -> &StatusIndicator {
        &self.current
    }

    /// The manager gave up; the following `Disconnected` is terminal.
    pub fn note_exhausted(&mut self) {
        self.exhausted = true;
    }

    /// Record a state change and return the indicator to show for it.
    pub fn observe(&mut self, state: ConnectionState) -> &StatusIndicator {
        let (kind, text) = match state {
            ConnectionState::Connected => (StatusKind::Connected, "Connected".to_string()),
            ConnectionState::Connecting { attempt } => (
                StatusKind::Connecting,
                format!("Connecting (attempt {attempt}/{})", self.max_attempts),
            ),
            ConnectionState::Disconnected => {
                let text = if self.exhausted {
                    "Disconnected (retries exhausted)"
                } else {
                    "Disconnected"
                };
                (StatusKind::Disconnected, text.to_string())
            }
        };
        if state != ConnectionState::Disconnected {
            self.exhausted = false;
        }
        self.current = StatusIndicator { kind, text };
        &self.current
    }
}
