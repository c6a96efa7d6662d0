use crate::clock::{Clock, TokioClock};
use crate::constants::CHANNEL_BUFFER_SIZE;
use crate::coordinator::ToastCoordinator;
use crate::handlers::{Message, Task};
use crate::request::{ToastId, ToastRequest};
use crate::surface::Surface;
use robot_toast_config::ToastConfig;
use robot_toast_util::ToastType;
use serde::Serialize;
use tokio::{
    sync::{
        mpsc::{Receiver, Sender, WeakSender, channel},
        oneshot,
    },
    task::JoinHandle,
};
use tracing::error;

#[derive(Debug)]
pub enum Input {
    Show(ToastId, ToastRequest),
    CloseAll,
    CloseById(ToastId),
    /// Host event or a scheduled wakeup.
    Message(Message),
    State {
        tx: oneshot::Sender<StackState>,
    },
}

/// Snapshot of the coordinator's bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackState {
    pub active: Vec<ToastId>,
    pub queued: Vec<ToastId>,
}

/// Cloneable front door to a running driver.
#[derive(Debug, Clone)]
pub struct ToastHandle {
    tx: Sender<Input>,
    interactive: bool,
}

impl ToastHandle {
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Queue a toast for display. The id is known before the driver sees it.
    pub async fn show(&self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        if !self.interactive {
            return None;
        }
        let id = ToastId::next();
        if let Err(err) = self.tx.send(Input::Show(id, request.into())).await {
            error!("Failed to send toast {id} to the driver: {err}");
            return None;
        }
        Some(id)
    }

    pub async fn success(&self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Success)).await
    }

    pub async fn error(&self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Error)).await
    }

    pub async fn info(&self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Info)).await
    }

    pub async fn warning(&self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Warning)).await
    }

    pub async fn close_all(&self) {
        if !self.interactive {
            return;
        }
        if let Err(err) = self.tx.send(Input::CloseAll).await {
            error!("Failed to send close-all to the driver: {err}");
        }
    }

    pub async fn close_by_id(&self, id: ToastId) {
        if !self.interactive {
            return;
        }
        if let Err(err) = self.tx.send(Input::CloseById(id)).await {
            error!("Failed to send close for toast {id} to the driver: {err}");
        }
    }

    /// Forward a host event such as an animation end or pointer input.
    pub async fn dispatch(&self, message: Message) {
        if let Err(err) = self.tx.send(Input::Message(message)).await {
            error!("Failed to dispatch message to the driver: {err}");
        }
    }

    /// Non-blocking [`dispatch`](Self::dispatch) for synchronous callers.
    pub fn try_dispatch(&self, message: Message) -> bool {
        match self.tx.try_send(Input::Message(message)) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Dropped host event: {err}");
                false
            }
        }
    }

    pub async fn state(&self) -> Option<StackState> {
        let (tx, rx) = oneshot::channel();
        if let Err(err) = self.tx.send(Input::State { tx }).await {
            error!("Failed to request toast state: {err}");
            return None;
        }
        match rx.await {
            Ok(state) => Some(state),
            Err(err) => {
                error!("Driver dropped the state request: {err}");
                None
            }
        }
    }
}

/// Start a driver task that owns `surface` and every toast drawn on it.
///
/// Each call creates an independent coordinator with its own queue and
/// limits. Code that needs the single process-wide instance installs one
/// handle with [`register_global`](crate::bridge::register_global) and
/// reaches it through [`instance`](crate::bridge::instance) from then on.
///
/// The task ends once every [`ToastHandle`] is dropped.
pub fn spawn<S>(surface: S, config: ToastConfig) -> (ToastHandle, JoinHandle<()>)
where
    S: Surface + Send + 'static,
{
    let (tx, rx) = channel(CHANNEL_BUFFER_SIZE);
    let handle = ToastHandle {
        interactive: surface.is_interactive(),
        tx,
    };
    let wakeups = handle.tx.downgrade();
    let coordinator = ToastCoordinator::with_clock(surface, TokioClock, config);
    let task = tokio::spawn(run(coordinator, rx, wakeups));
    (handle, task)
}

async fn run<S: Surface, C: Clock>(
    mut coordinator: ToastCoordinator<S, C>,
    mut rx: Receiver<Input>,
    wakeups: WeakSender<Input>,
) {
    loop {
        if let Some(next) = rx.recv().await {
            match next {
                Input::Show(id, request) => coordinator.show_with_id(id, request),
                Input::CloseAll => coordinator.close_all(),
                Input::CloseById(id) => coordinator.close_by_id(id),
                Input::Message(message) => coordinator.update(message),
                Input::State { tx } => {
                    let state = StackState {
                        active: coordinator.active_ids(),
                        queued: coordinator.queued_ids(),
                    };
                    if tx.send(state).is_err() {
                        tracing::warn!("State requester went away");
                    }
                }
            }
            for task in coordinator.drain_tasks() {
                schedule(&wakeups, task);
            }
        } else {
            tracing::debug!("All toast handles dropped, driver stopping");
            return;
        }
    }
}

/// Deliver a task's message back into the driver once it is due.
fn schedule(wakeups: &WeakSender<Input>, task: Task) {
    let wakeups = wakeups.clone();
    tokio::spawn(async move {
        tokio::time::sleep(task.delay()).await;
        let Some(tx) = wakeups.upgrade() else {
            return;
        };
        if tx.send(Input::Message(task.into_message())).await.is_err() {
            tracing::trace!("Driver stopped before a wakeup was delivered");
        }
    });
}
