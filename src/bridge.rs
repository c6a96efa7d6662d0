//! Process-wide registration and the readiness helpers built on it.
//!
//! Code that cannot be handed a [`ToastHandle`] directly waits for one to be
//! registered here. The helpers never fail towards their caller: problems
//! are logged and a sentinel comes back instead.

use crate::constants::{DEFAULT_READY_TIMEOUT, READY_POLL_INTERVAL};
use crate::request::{ToastId, ToastRequest};
use crate::subscriptions::toasts::ToastHandle;
use std::{fmt, sync::OnceLock, time::Duration};
use tokio::time::Instant;

static GLOBAL: OnceLock<ToastHandle> = OnceLock::new();

/// Error type for readiness waits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyError {
    /// Nothing was registered before the deadline
    Timeout(Duration),
    /// The registered handle cannot draw anything
    NotInteractive,
}

impl fmt::Display for ReadyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadyError::Timeout(timeout) => {
                write!(f, "toast API not registered within {}ms", timeout.as_millis())
            }
            ReadyError::NotInteractive => {
                write!(f, "toast API registered without an interactive surface")
            }
        }
    }
}

impl std::error::Error for ReadyError {}

/// Install `handle` as the global instance. Only the first call wins.
pub fn register_global(handle: ToastHandle) -> bool {
    let installed = GLOBAL.set(handle).is_ok();
    if installed {
        tracing::debug!("Global toast handle registered");
    } else {
        tracing::trace!("Global toast handle already registered");
    }
    installed
}

/// The registered instance, if any, without waiting.
pub fn instance() -> Option<&'static ToastHandle> {
    GLOBAL.get()
}

/// Wait until a global instance is registered, polling at a short fixed
/// interval. Resolves at once when one already exists.
pub async fn ensure_ready(timeout: Duration) -> Result<&'static ToastHandle, ReadyError> {
    let start = Instant::now();
    let mut poll = tokio::time::interval(READY_POLL_INTERVAL);
    loop {
        poll.tick().await;
        if let Some(handle) = GLOBAL.get() {
            if !handle.is_interactive() {
                return Err(ReadyError::NotInteractive);
            }
            return Ok(handle);
        }
        if start.elapsed() >= timeout {
            return Err(ReadyError::Timeout(timeout));
        }
    }
}

/// [`ensure_ready`] with the default timeout.
pub async fn get_instance() -> Result<&'static ToastHandle, ReadyError> {
    ensure_ready(DEFAULT_READY_TIMEOUT).await
}

/// Show a toast through the global instance once it is ready.
pub async fn show_toast(request: impl Into<ToastRequest>) -> Option<ToastId> {
    match get_instance().await {
        Ok(handle) => handle.show(request).await,
        Err(err) => {
            tracing::error!("show_toast failed: {err}");
            None
        }
    }
}

pub async fn close_all_toasts() {
    match get_instance().await {
        Ok(handle) => handle.close_all().await,
        Err(err) => tracing::error!("close_all_toasts failed: {err}"),
    }
}

pub async fn close_toast_by_id(id: ToastId) {
    match get_instance().await {
        Ok(handle) => handle.close_by_id(id).await,
        Err(err) => tracing::error!("close_toast_by_id failed: {err}"),
    }
}
