use core_types::{ByteSession, SessionBuilder};

/// Collects the bytes of one receive tick into a session.
///
/// A clear requested from the UI is deferred to the start of the next receive
/// tick so it never lands in the middle of a session.
#[derive(Debug, Default)]
pub struct LogBuffer {
    current: Option<SessionBuilder>,
    clear_requested: bool,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a receive session stamped with the current time. An unfinished
    /// session is discarded.
    pub fn session_begin(&mut self) {
        self.current = Some(SessionBuilder::new_rx());
    }

    /// Start a session with a prepared builder.
    pub fn session_begin_with(&mut self, builder: SessionBuilder) {
        self.current = Some(builder);
    }

    /// Append to the open session; ignored when none is open.
    pub fn append(&mut self, bytes: &[u8]) {
        if let Some(builder) = self.current.as_mut() {
            builder.append(bytes);
        }
    }

    pub fn in_session(&self) -> bool {
        self.current.is_some()
    }

    /// Finish the open session. Empty sessions are dropped.
    pub fn session_end(&mut self) -> Option<ByteSession> {
        let builder = self.current.take()?;
        if builder.is_empty() {
            return None;
        }
        Some(builder.finish())
    }

    pub fn clear_later(&mut self) {
        self.clear_requested = true;
    }

    /// Returns whether a clear was pending, and forgets it.
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_requested)
    }
}
