//! Deterministic virtual-time host.
//!
//! The simulator plays the part of the browser event loop: it delivers
//! scheduled tasks when their time comes and reports the end of every
//! finite animation the toasts start, using the catalog durations.

use crate::clock::{Clock, ManualClock};
use crate::coordinator::ToastCoordinator;
use crate::handlers::{Message, PointerEvent, PointerKind};
use crate::headless::HeadlessSurface;
use crate::request::{ToastId, ToastRequest};
use crate::surface::Patch;
use robot_toast_config::ToastConfig;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Guard against a runaway schedule in [`Simulator::settle`].
const MAX_SETTLE_STEPS: usize = 100_000;

pub struct Simulator {
    coordinator: ToastCoordinator<HeadlessSurface, ManualClock>,
    clock: ManualClock,
    origin: Instant,
    elapsed: Duration,
    /// Keyed by due time then insertion order.
    pending: BTreeMap<(Duration, u64), Message>,
    seq: u64,
    seen: usize,
}

impl Simulator {
    pub fn new(config: ToastConfig) -> Self {
        Self::with_surface(HeadlessSurface::new(), config)
    }

    pub fn with_surface(surface: HeadlessSurface, config: ToastConfig) -> Self {
        let clock = ManualClock::new();
        let origin = clock.now();
        Self {
            coordinator: ToastCoordinator::with_clock(surface, clock.clone(), config),
            clock,
            origin,
            elapsed: Duration::ZERO,
            pending: BTreeMap::new(),
            seq: 0,
            seen: 0,
        }
    }

    /// Virtual time since construction.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn coordinator(&self) -> &ToastCoordinator<HeadlessSurface, ManualClock> {
        &self.coordinator
    }

    pub fn surface(&self) -> &HeadlessSurface {
        self.coordinator.surface()
    }

    pub fn surface_mut(&mut self) -> &mut HeadlessSurface {
        self.coordinator.surface_mut()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn show(&mut self, request: impl Into<ToastRequest>) -> Option<ToastId> {
        let id = self.coordinator.show(request);
        self.pump();
        id
    }

    pub fn close_all(&mut self) {
        self.coordinator.close_all();
        self.pump();
    }

    pub fn close_by_id(&mut self, id: ToastId) {
        self.coordinator.close_by_id(id);
        self.pump();
    }

    /// Deliver a host event right now.
    pub fn dispatch(&mut self, message: Message) {
        self.coordinator.update(message);
        self.pump();
    }

    pub fn hover(&mut self, id: ToastId, inside: bool) {
        self.dispatch(Message::Hover { id, inside });
    }

    pub fn pointer(&mut self, id: ToastId, kind: PointerKind, x: f32, y: f32) {
        let event = PointerEvent::new(kind, x, y);
        self.dispatch(Message::Pointer { id, event });
    }

    /// Run every event due within `by`, then move the clock to the end.
    pub fn advance(&mut self, by: Duration) {
        let target = self.elapsed + by;
        while let Some(entry) = self.pending.first_entry() {
            let (at, _) = *entry.key();
            if at > target {
                break;
            }
            let message = entry.remove();
            self.set_elapsed(at);
            self.coordinator.update(message);
            self.pump();
        }
        self.set_elapsed(target);
    }

    /// Run until nothing is scheduled.
    pub fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_STEPS {
            let Some(&(at, _)) = self.pending.keys().next() else {
                return;
            };
            self.advance(at.saturating_sub(self.elapsed));
        }
        tracing::warn!("Simulator did not settle after {} steps", MAX_SETTLE_STEPS);
    }

    fn set_elapsed(&mut self, at: Duration) {
        self.elapsed = self.elapsed.max(at);
        self.clock.set(self.origin + self.elapsed);
    }

    fn schedule(&mut self, delay: Duration, message: Message) {
        self.seq += 1;
        self.pending.insert((self.elapsed + delay, self.seq), message);
    }

    /// Turn fresh patches into animation ends and fresh tasks into
    /// scheduled messages.
    fn pump(&mut self) {
        let fresh: Vec<(ToastId, Patch)> = self.coordinator.surface().log()[self.seen..].to_vec();
        self.seen += fresh.len();
        for (id, patch) in fresh {
            match patch {
                Patch::Play(animation) => {
                    if let Some(duration) = animation.duration() {
                        self.schedule(duration, Message::AnimationEnd { id, animation });
                    }
                }
                Patch::Stop(animation) => {
                    let end = Message::AnimationEnd { id, animation };
                    self.pending.retain(|_, message| *message != end);
                }
                Patch::Unmount => {
                    self.pending.retain(|_, message| {
                        !matches!(message, Message::AnimationEnd { id: target, .. } if *target == id)
                    });
                }
                _ => {}
            }
        }
        for task in self.coordinator.drain_tasks() {
            self.schedule(task.delay(), task.into_message());
        }
    }
}
