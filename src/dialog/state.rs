//! Per-session dialog state.

/// Step of the certificate-issuance flow a session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingSum,
    AwaitingNumber,
}

/// State tracked for one conversing chat.
///
/// `captured_sum` is only ever `Some` while the session is in
/// [`SessionState::AwaitingNumber`]; the serial number is never stored here
/// because the flow ends on the message that supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    state: SessionState,
    captured_sum: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn captured_sum(&self) -> Option<&str> {
        self.captured_sum.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Enter the flow, discarding anything left from a previous run.
    pub fn begin(&mut self) {
        self.state = SessionState::AwaitingSum;
        self.captured_sum = None;
    }

    /// Record the denomination and move on to the serial number.
    pub fn capture_sum(&mut self, sum: String) {
        self.state = SessionState::AwaitingNumber;
        self.captured_sum = Some(sum);
    }

    /// Leave the flow. Used for completion, failure and cancellation alike.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.captured_sum = None;
    }
}
