use crate::clock::{Clock, SystemClock};
use crate::constants::INITIAL_ACTIVE_CAPACITY;
use crate::handlers::{Message, Task};
use crate::request::{ToastId, ToastRequest};
use crate::surface::Surface;
use crate::toast::{Ctx, Lifecycle, ToastInstance};
use robot_toast_config::ToastConfig;
use robot_toast_util::{TOAST_POSITIONS, ToastType};
use std::collections::VecDeque;

/// A request held back by the concurrency limit.
#[derive(Debug)]
pub struct QueueEntry {
    pub id: ToastId,
    pub request: ToastRequest,
}

/// Registry of every live toast plus the pending queue.
///
/// The coordinator owns the surface. Deferred work is buffered as [`Task`]s
/// which the host drains with [`ToastCoordinator::drain_tasks`] and feeds
/// back through [`ToastCoordinator::update`] once due.
pub struct ToastCoordinator<S, C = SystemClock> {
    surface: S,
    clock: C,
    config: ToastConfig,
    /// Visual stacking order within each position zone
    active: Vec<ToastInstance>,
    queue: VecDeque<QueueEntry>,
    tasks: Vec<Task>,
}

impl<S: Surface> ToastCoordinator<S, SystemClock> {
    pub fn new(surface: S, config: ToastConfig) -> Self {
        Self::with_clock(surface, SystemClock, config)
    }
}

impl<S: Surface, C: Clock> ToastCoordinator<S, C> {
    pub fn with_clock(surface: S, clock: C, config: ToastConfig) -> Self {
        Self {
            surface,
            clock,
            config,
            active: Vec::with_capacity(INITIAL_ACTIVE_CAPACITY),
            queue: VecDeque::new(),
            tasks: Vec::new(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.surface.is_interactive()
    }

    /// Show a toast now, or queue it when its limit is reached.
    ///
    /// Returns `None` without side effects when the surface cannot draw.
    pub fn show(&mut self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        if !self.is_interactive() {
            tracing::trace!("Surface is not interactive, toast dropped");
            return None;
        }
        let id = ToastId::next();
        self.show_with_id(id, request.into());
        Some(id)
    }

    /// [`show`](Self::show) with an id allocated by the caller.
    pub fn show_with_id(&mut self, id: ToastId, request: ToastRequest) {
        if !self.is_interactive() {
            return;
        }
        let limit = self.limit_for(&request);
        if limit > 0 && self.active.len() >= limit {
            tracing::debug!(
                "Toast {} queued, {} of {} slots in use",
                id,
                self.active.len(),
                limit
            );
            self.queue.push_back(QueueEntry { id, request });
            return;
        }
        self.spawn(id, request);
    }

    pub fn success(&mut self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Success))
    }

    pub fn error(&mut self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Error))
    }

    pub fn info(&mut self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Info))
    }

    pub fn warning(&mut self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        self.show(request.into().kind(ToastType::Warning))
    }

    /// Drop the queue and start the exit of every active toast.
    pub fn close_all(&mut self) {
        if !self.queue.is_empty() {
            tracing::debug!("Discarding {} queued toasts", self.queue.len());
            self.queue.clear();
        }
        let mut ctx = Ctx {
            surface: &mut self.surface,
            clock: &self.clock,
            config: &self.config,
            tasks: &mut self.tasks,
        };
        for toast in self.active.iter_mut() {
            toast.close(&mut ctx);
        }
    }

    /// Close an active toast or forget a queued one. Unknown ids are ignored.
    pub fn close_by_id(&mut self, id: ToastId) {
        let mut ctx = Ctx {
            surface: &mut self.surface,
            clock: &self.clock,
            config: &self.config,
            tasks: &mut self.tasks,
        };
        if let Some(toast) = self.active.iter_mut().find(|t| t.id() == id) {
            toast.close(&mut ctx);
        }
        let queued = self.queue.len();
        self.queue.retain(|entry| entry.id != id);
        if self.queue.len() != queued {
            tracing::debug!("Toast {} removed from the queue", id);
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::AdmitNext => self.admit_next(),
            Message::WindowFocus(focused) => {
                let mut ctx = Ctx {
                    surface: &mut self.surface,
                    clock: &self.clock,
                    config: &self.config,
                    tasks: &mut self.tasks,
                };
                for toast in self.active.iter_mut() {
                    toast.update(Message::WindowFocus(focused), &mut ctx);
                }
            }
            message => {
                let Some(id) = message.target() else {
                    return;
                };
                let Some(pos) = self.active.iter().position(|t| t.id() == id) else {
                    tracing::trace!("Dropping {:?} for a toast that is gone", message);
                    return;
                };
                let mut ctx = Ctx {
                    surface: &mut self.surface,
                    clock: &self.clock,
                    config: &self.config,
                    tasks: &mut self.tasks,
                };
                if self.active[pos].update(message, &mut ctx) == Lifecycle::Removed {
                    self.remove_at(pos);
                }
            }
        }
    }

    /// Recompute every stacked toast's distance from its anchor edge.
    ///
    /// Zones never mix. Within a zone offsets start at the edge margin and
    /// grow by each toast's height plus the gap. Dragged toasts sit where
    /// they were dropped and take no part.
    pub fn restack(&mut self) {
        let mut ctx = Ctx {
            surface: &mut self.surface,
            clock: &self.clock,
            config: &self.config,
            tasks: &mut self.tasks,
        };
        for position in TOAST_POSITIONS {
            let mut offset = self.config.edge_margin;
            for toast in self
                .active
                .iter_mut()
                .filter(|t| t.position() == position && !t.is_detached())
            {
                toast.place(offset, &mut ctx);
                let height = ctx
                    .surface
                    .bounds(toast.id())
                    .map(|rect| rect.height)
                    .filter(|h| *h > 0.0)
                    .unwrap_or(self.config.fallback_height);
                offset += height + self.config.stack_gap;
            }
        }
    }

    /// Take every task scheduled since the last drain.
    pub fn drain_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.tasks)
    }

    pub fn active_ids(&self) -> Vec<ToastId> {
        self.active.iter().map(ToastInstance::id).collect()
    }

    pub fn queued_ids(&self) -> Vec<ToastId> {
        self.queue.iter().map(|entry| entry.id).collect()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn instance(&self, id: ToastId) -> Option<&ToastInstance> {
        self.active.iter().find(|t| t.id() == id)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    fn limit_for(&self, request: &ToastRequest) -> usize {
        request.limit.unwrap_or(self.config.limit)
    }

    fn spawn(&mut self, id: ToastId, request: ToastRequest) {
        let mut toast = ToastInstance::new(id, request, &self.config);
        let mut ctx = Ctx {
            surface: &mut self.surface,
            clock: &self.clock,
            config: &self.config,
            tasks: &mut self.tasks,
        };
        toast.mount(&mut ctx);

        if toast.options().newest_on_top {
            self.active.insert(0, toast);
        } else {
            self.active.push(toast);
        }
        tracing::debug!("Toast {} admitted, {} active", id, self.active.len());
        self.restack();
    }

    fn remove_at(&mut self, pos: usize) {
        let toast = self.active.remove(pos);
        tracing::debug!("Toast {} gone, {} active", toast.id(), self.active.len());
        self.restack();

        if !self.queue.is_empty() {
            self.tasks
                .push(Task::After(self.config.admit_delay(), Message::AdmitNext));
        }
    }

    /// Admit the oldest queued request if its limit still allows.
    fn admit_next(&mut self) {
        let Some(front) = self.queue.front() else {
            return;
        };
        let limit = self.limit_for(&front.request);
        if limit > 0 && self.active.len() >= limit {
            tracing::debug!("Toast {} stays queued, no free slot", front.id);
            return;
        }
        if let Some(QueueEntry { id, request }) = self.queue.pop_front() {
            self.spawn(id, request);
        }
    }
}
