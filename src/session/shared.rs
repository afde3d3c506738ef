//! Lock-protected session handle
//!
//! For callers that need one session reachable from several threads. Each
//! call takes the lock for its whole duration; use [`SharedSession::with`]
//! to keep a full add/run sequence under a single lock.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Session, SessionResult};

#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn add(
        &self,
        text: impl Into<String>,
    ) -> SessionResult<()> {
        self.inner.lock().add(text)
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    pub fn run(&self) -> SessionResult<bool> {
        self.inner.lock().run()
    }

    pub fn last_diagnostic(&self) -> Option<String> {
        self.inner.lock().last_diagnostic().map(str::to_string)
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut session = self.inner.lock();
        f(&mut *session)
    }
}

impl From<Session> for SharedSession {
    fn from(session: Session) -> Self {
        Self::new(session)
    }
}
