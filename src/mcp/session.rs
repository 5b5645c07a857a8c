//! Per-server session state.
//!
//! A session starts [`SessionState::Uninitialized`] and moves to
//! [`SessionState::Initialized`] on the first successful `initialize`. There is
//! no way back: the state lives exactly as long as the server instance.

use std::sync::atomic::{AtomicBool, Ordering};

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for an `initialize` request.
    Uninitialized,
    /// Handshake complete, tool traffic allowed.
    Initialized,
}

/// The single mutable bit of a server.
///
/// The flag is atomic so a server can be shared between tasks; the
/// transition is idempotent, so a racing second `initialize` is harmless.
#[derive(Debug, Default)]
pub struct Session {
    initialized: AtomicBool,
}

impl Session {
    /// Creates an uninitialized session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.initialized.load(Ordering::Acquire) {
            SessionState::Initialized
        } else {
            SessionState::Uninitialized
        }
    }

    /// Returns `true` once the handshake has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state() == SessionState::Initialized
    }

    /// Moves the session to [`SessionState::Initialized`].
    ///
    /// Returns `true` if this call performed the transition.
    pub fn mark_initialized(&self) -> bool {
        !self.initialized.swap(true, Ordering::AcqRel)
    }
}
