//! One toast's full lifecycle.
//!
//! A [`ToastInstance`] is a plain state machine. It never owns a timer or a
//! widget: every visual change goes out as a [`Patch`] on the surface and
//! every delayed step comes back as a [`Message`] scheduled through a
//! [`Task`].

mod drag;
mod timer;

pub use drag::{Grab, Snap, clamp_to_viewport, snap};
pub use timer::{Countdown, TimerState};

use crate::clock::Clock;
use crate::handlers::{Message, PointerEvent, PointerKind, Task};
use crate::request::{Callback, ToastId, ToastRequest};
use crate::surface::{Cursor, Patch, Rect, Surface, ToastView, Watcher};
use robot_toast_config::ToastConfig;
use robot_toast_util::{
    Animation, CharacterSource, Part, Position, ResolvedStyle, Side, Theme, ToastType, Transition,
};
use std::time::{Duration, Instant};

/// Where a toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mounted, waiting for the first frame.
    Pending,
    CharacterEnter,
    MessageEnter,
    Typing,
    /// Fully shown; the dismissal countdown may run.
    Resting,
    MessageExit,
    CharacterExit,
    /// Container fading out before removal.
    Fading,
    Removed,
}

impl Phase {
    pub fn is_exiting(self) -> bool {
        matches!(
            self,
            Phase::MessageExit | Phase::CharacterExit | Phase::Fading | Phase::Removed
        )
    }
}

/// Outcome of feeding a message to an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    /// Exit finished and the visual tree is gone. The owner must drop the
    /// instance.
    Removed,
}

/// Request fields with every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastOptions {
    pub message: String,
    /// `None` = never dismiss on its own.
    pub auto_close: Option<Duration>,
    pub position: Position,
    pub kind: ToastType,
    pub theme: Theme,
    pub style: ResolvedStyle,
    pub type_speed: Duration,
    pub character: CharacterSource,
    pub show_progress: bool,
    pub pause_on_hover: bool,
    pub pause_on_focus_loss: bool,
    pub draggable: bool,
    pub near_screen: bool,
    pub newest_on_top: bool,
    pub rtl: bool,
    pub transition: Transition,
}

/// Everything an instance may touch while handling one message.
pub(crate) struct Ctx<'a, S, C> {
    pub surface: &'a mut S,
    pub clock: &'a C,
    pub config: &'a ToastConfig,
    pub tasks: &'a mut Vec<Task>,
}

impl<S: Surface, C: Clock> Ctx<'_, S, C> {
    fn apply(&mut self, id: ToastId, patch: Patch) {
        self.surface.apply(id, patch);
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn schedule(&mut self, task: Task) {
        self.tasks.push(task);
    }
}

/// A single on-screen toast.
pub struct ToastInstance {
    id: ToastId,
    options: ToastOptions,
    side: Side,
    phase: Phase,
    countdown: Countdown,
    /// Typing finished; the countdown may start.
    armed: bool,
    hovered: bool,
    focus_lost: bool,
    dragging: bool,
    grab: Option<Grab>,
    last_rect: Option<Rect>,
    /// Left the stack flow after a drag.
    detached: bool,
    closed: bool,
    watchers: Vec<Watcher>,
    char_count: usize,
    typed: usize,
    typing_alive: bool,
    /// Finite character animation whose end is awaited.
    character_anim: Option<Animation>,
    message_anim: Option<Animation>,
    idle: bool,
    progress_running: bool,
    stack_offset: Option<f32>,
    on_open: Option<Callback>,
    on_close: Option<Callback>,
}

impl ToastInstance {
    /// Resolve every optional field of `request` against `config`.
    pub fn new(id: ToastId, request: ToastRequest, config: &ToastConfig) -> Self {
        let ToastRequest {
            message,
            auto_close,
            position,
            kind,
            theme,
            style,
            type_speed,
            character,
            hide_progress_bar,
            pause_on_hover,
            pause_on_focus_loss,
            draggable,
            near_screen,
            limit: _,
            newest_on_top,
            rtl,
            transition,
            on_open,
            on_close,
        } = request;

        let auto_close = auto_close.resolve(config.default_auto_close());
        let options = ToastOptions {
            message,
            auto_close,
            position,
            kind,
            theme,
            style: ResolvedStyle::resolve(theme, kind, &style),
            type_speed: type_speed.unwrap_or_else(|| config.type_speed()),
            character: CharacterSource::resolve(&character),
            show_progress: !hide_progress_bar,
            pause_on_hover,
            pause_on_focus_loss,
            draggable,
            near_screen,
            newest_on_top,
            rtl,
            transition,
        };

        let mut watchers = Vec::with_capacity(3);
        if options.draggable {
            watchers.push(Watcher::Drag);
        }
        if options.pause_on_focus_loss {
            watchers.push(Watcher::FocusLoss);
        }
        if options.pause_on_hover {
            watchers.push(Watcher::Hover);
        }

        Self {
            id,
            side: Side::initial(options.position, options.near_screen),
            phase: Phase::Pending,
            countdown: Countdown::new(options.auto_close),
            armed: false,
            hovered: false,
            focus_lost: false,
            dragging: false,
            grab: None,
            last_rect: None,
            detached: false,
            closed: false,
            watchers,
            char_count: options.message.chars().count(),
            typed: 0,
            typing_alive: false,
            character_anim: None,
            message_anim: None,
            idle: false,
            progress_running: false,
            stack_offset: None,
            on_open,
            on_close,
            options,
        }
    }

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn options(&self) -> &ToastOptions {
        &self.options
    }

    pub fn position(&self) -> Position {
        self.options.position
    }

    /// Current character side. Changes only after a drag snap.
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Any pause source is active.
    pub fn is_paused(&self) -> bool {
        self.hovered || self.focus_lost || self.dragging
    }

    pub fn timer(&self, now: Instant) -> TimerState {
        self.countdown.state(now)
    }

    /// Portion of the message revealed so far.
    pub fn revealed_text(&self) -> String {
        self.options.message.chars().take(self.typed).collect()
    }

    /// Offset last assigned by a restack, `None` before the first one.
    pub fn stack_offset(&self) -> Option<f32> {
        self.stack_offset
    }

    pub fn is_listening(&self, watcher: Watcher) -> bool {
        self.watchers.contains(&watcher)
    }

    fn character_first(&self) -> bool {
        self.options.rtl ^ (self.side == Side::Left)
    }

    fn view(&self) -> ToastView {
        ToastView {
            position: self.options.position,
            kind: self.options.kind,
            theme: self.options.theme,
            rtl: self.options.rtl,
            character: self.options.character.clone(),
            character_first: self.character_first(),
            style: self.options.style.clone(),
            show_progress: self.options.show_progress,
            cursor: if self.options.draggable {
                Cursor::Grab
            } else {
                Cursor::Default
            },
        }
    }

    /// Build and attach the visual tree, wire watchers, and ask for the
    /// first frame. Nothing moves until that frame arrives.
    pub(crate) fn mount<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        ctx.apply(self.id, Patch::Mount(Box::new(self.view())));
        for watcher in &self.watchers {
            ctx.apply(self.id, Patch::Listen(*watcher));
        }
        ctx.schedule(Task::NextFrame(Message::Frame(self.id)));
        tracing::trace!("Toast {} mounted on the {} side", self.id, self.side.as_str());
    }

    /// Assign the distance from the anchor edge.
    pub(crate) fn place<S: Surface, C: Clock>(&mut self, offset: f32, ctx: &mut Ctx<'_, S, C>) {
        if self.stack_offset == Some(offset) {
            return;
        }
        self.stack_offset = Some(offset);
        ctx.apply(
            self.id,
            Patch::Offset {
                edge: self.options.position.anchor_edge(),
                px: offset,
            },
        );
    }

    pub(crate) fn update<S: Surface, C: Clock>(
        &mut self,
        message: Message,
        ctx: &mut Ctx<'_, S, C>,
    ) -> Lifecycle {
        match message {
            Message::Frame(_) => self.begin_entrance(ctx),
            Message::AnimationEnd { animation, .. } => self.animation_ended(animation, ctx),
            Message::TypeTick(_) => self.type_tick(ctx),
            Message::Timeout { generation, .. } => {
                if self.countdown.fire(generation) {
                    tracing::debug!("Toast {} timed out", self.id);
                    self.close(ctx);
                }
            }
            Message::FadeDone(_) => return self.finish(ctx),
            Message::GlideSettled(_) => {
                if !self.phase.is_exiting() {
                    ctx.apply(self.id, Patch::EndGlide);
                }
            }
            Message::Hover { inside, .. } => self.hover(inside, ctx),
            Message::WindowFocus(focused) => self.window_focus(focused, ctx),
            Message::Pointer { event, .. } => self.pointer(event, ctx),
            Message::CloseClicked(_) => self.close(ctx),
            Message::AdmitNext => {}
        }
        Lifecycle::Alive
    }

    // Entrance

    fn begin_entrance<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if self.closed || self.phase != Phase::Pending {
            return;
        }
        ctx.apply(self.id, Patch::Visible(true));
        if self.options.character.is_hidden() {
            self.show_message(ctx);
            return;
        }
        let enter = Animation::CharacterEnter(self.side, self.options.transition);
        self.phase = Phase::CharacterEnter;
        self.play_character(enter, ctx);
    }

    fn show_message<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        self.phase = Phase::MessageEnter;
        let enter = Animation::MessageEnter(self.options.transition);
        self.message_anim = Some(enter);
        ctx.apply(self.id, Patch::Play(enter));
    }

    fn play_character<S: Surface, C: Clock>(&mut self, animation: Animation, ctx: &mut Ctx<'_, S, C>) {
        self.character_anim = Some(animation);
        ctx.apply(self.id, Patch::Play(animation));
    }

    fn settle_character<S: Surface, C: Clock>(&mut self, finished: Animation, ctx: &mut Ctx<'_, S, C>) {
        ctx.apply(self.id, Patch::Stop(finished));
        ctx.apply(self.id, Patch::CharacterShown);
        ctx.apply(self.id, Patch::Play(Animation::CharacterIdle));
        self.idle = true;
    }

    fn animation_ended<S: Surface, C: Clock>(&mut self, animation: Animation, ctx: &mut Ctx<'_, S, C>) {
        let awaited = match animation.part() {
            Part::Character => &mut self.character_anim,
            Part::Message => &mut self.message_anim,
            Part::Progress => return,
        };
        if *awaited != Some(animation) {
            tracing::trace!("Toast {} ignoring stale end of {:?}", self.id, animation);
            return;
        }
        *awaited = None;

        match animation {
            Animation::CharacterEnter(..) => {
                self.settle_character(animation, ctx);
                if self.phase == Phase::CharacterEnter {
                    self.show_message(ctx);
                }
            }
            Animation::CharacterSnap(_) => self.settle_character(animation, ctx),
            Animation::MessageEnter(_) => {
                ctx.apply(self.id, Patch::Stop(animation));
                ctx.apply(self.id, Patch::MessageSettled);
                if let Some(on_open) = self.on_open.take() {
                    on_open();
                }
                self.start_typing(ctx);
            }
            Animation::MessageExit => {
                if self.options.character.is_hidden() {
                    self.fade(ctx);
                } else {
                    self.exit_character(ctx);
                }
            }
            Animation::CharacterExit(..) => self.fade(ctx),
            Animation::CharacterIdle | Animation::ProgressCountdown => {}
        }
    }

    // Typing

    fn start_typing<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        self.phase = Phase::Typing;
        if self.options.type_speed.is_zero() {
            self.typed = self.char_count;
            ctx.apply(self.id, Patch::Text(self.options.message.clone()));
            self.typing_complete(ctx);
            return;
        }
        self.typed = 0;
        self.typing_alive = true;
        self.type_tick(ctx);
    }

    fn type_tick<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if !self.typing_alive || self.closed {
            return;
        }
        if self.typed < self.char_count {
            self.typed += 1;
            ctx.apply(self.id, Patch::Text(self.revealed_text()));
            ctx.schedule(Task::After(self.options.type_speed, Message::TypeTick(self.id)));
        } else {
            self.typing_alive = false;
            self.typing_complete(ctx);
        }
    }

    fn typing_complete<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        self.phase = Phase::Resting;
        self.armed = true;
        tracing::trace!("Toast {} finished typing", self.id);

        match self.options.auto_close {
            Some(duration) if self.options.show_progress => {
                // Duration must be in place before the animation starts
                ctx.apply(self.id, Patch::ProgressDuration(duration));
                ctx.apply(self.id, Patch::FlushLayout);
                ctx.apply(self.id, Patch::Play(Animation::ProgressCountdown));
                self.progress_running = true;
                if self.is_paused() {
                    ctx.apply(self.id, Patch::ProgressPaused(true));
                }
            }
            _ => {}
        }

        if !self.is_paused() {
            self.start_timer(ctx);
        }
    }

    // Timer

    fn start_timer<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if !self.armed {
            return;
        }
        if let Some((delay, generation)) = self.countdown.start(ctx.now()) {
            tracing::trace!("Toast {} dismissal in {:?}", self.id, delay);
            ctx.schedule(Task::After(
                delay,
                Message::Timeout {
                    id: self.id,
                    generation,
                },
            ));
        }
    }

    fn pause<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if self.countdown.pause(ctx.now()) {
            tracing::trace!("Toast {} paused", self.id);
        }
        if self.progress_running {
            ctx.apply(self.id, Patch::ProgressPaused(true));
        }
    }

    /// Restart the countdown unless some pause source is still active.
    fn resume<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if self.is_paused() {
            return;
        }
        if self.progress_running {
            ctx.apply(self.id, Patch::ProgressPaused(false));
        }
        self.start_timer(ctx);
    }

    // Watchers

    fn hover<S: Surface, C: Clock>(&mut self, inside: bool, ctx: &mut Ctx<'_, S, C>) {
        if !self.is_listening(Watcher::Hover) || self.hovered == inside {
            return;
        }
        self.hovered = inside;
        if inside {
            self.pause(ctx);
        } else {
            self.resume(ctx);
        }
    }

    fn window_focus<S: Surface, C: Clock>(&mut self, focused: bool, ctx: &mut Ctx<'_, S, C>) {
        if !self.is_listening(Watcher::FocusLoss) || self.focus_lost == !focused {
            return;
        }
        self.focus_lost = !focused;
        if focused {
            self.resume(ctx);
        } else {
            self.pause(ctx);
        }
    }

    // Drag

    fn pointer<S: Surface, C: Clock>(&mut self, event: PointerEvent, ctx: &mut Ctx<'_, S, C>) {
        if !self.is_listening(Watcher::Drag) {
            return;
        }
        match event.kind {
            PointerKind::Down => self.drag_start(event, ctx),
            PointerKind::Move => self.drag_move(event, ctx),
            PointerKind::Up | PointerKind::Cancel => self.drag_end(ctx),
        }
    }

    fn current_rect<S: Surface, C: Clock>(&self, ctx: &Ctx<'_, S, C>) -> Option<Rect> {
        ctx.surface.bounds(self.id).or(self.last_rect)
    }

    fn drag_start<S: Surface, C: Clock>(&mut self, event: PointerEvent, ctx: &mut Ctx<'_, S, C>) {
        if self.dragging || event.on_close_control || event.button != 0 {
            return;
        }
        let Some(rect) = self.current_rect(ctx) else {
            tracing::warn!("Toast {} has no bounds, drag ignored", self.id);
            return;
        };

        self.dragging = true;
        self.pause(ctx);

        ctx.apply(self.id, Patch::Dragging(true));
        ctx.apply(
            self.id,
            Patch::Detach {
                left: rect.x,
                top: rect.y,
            },
        );
        self.detached = true;
        self.last_rect = Some(rect);
        self.grab = Some(Grab::new(event.x, event.y, rect));
        ctx.apply(self.id, Patch::Cursor(Cursor::Grabbing));
        tracing::trace!("Toast {} drag started at ({}, {})", self.id, rect.x, rect.y);
    }

    fn drag_move<S: Surface, C: Clock>(&mut self, event: PointerEvent, ctx: &mut Ctx<'_, S, C>) {
        let (true, Some(grab)) = (self.dragging, self.grab) else {
            return;
        };
        let Some(rect) = self.current_rect(ctx) else {
            return;
        };
        let (left, top) = grab.place(event.x, event.y, rect.size(), ctx.surface.viewport());
        self.last_rect = Some(Rect::new(left, top, rect.width, rect.height));
        ctx.apply(self.id, Patch::MoveTo { left, top });
    }

    fn drag_end<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if !self.dragging {
            return;
        }
        self.release(ctx);

        let Some(rect) = self.current_rect(ctx) else {
            self.resume(ctx);
            return;
        };
        let target = snap(rect, ctx.surface.viewport(), ctx.config.snap_margin);
        ctx.apply(
            self.id,
            Patch::Glide {
                left: target.left,
                top: target.top,
            },
        );
        self.last_rect = Some(Rect::new(target.left, target.top, rect.width, rect.height));
        ctx.schedule(Task::After(
            ctx.config.glide_settle(),
            Message::GlideSettled(self.id),
        ));

        let side = Side::for_edge(target.edge, self.options.near_screen);
        if side != self.side {
            tracing::debug!(
                "Toast {} character moves to the {} side",
                self.id,
                side.as_str()
            );
            self.side = side;
            ctx.apply(
                self.id,
                Patch::Order {
                    character_first: self.character_first(),
                },
            );
            self.play_snap(side, ctx);
        }

        self.resume(ctx);
    }

    /// Leave the dragging state without snapping.
    fn release<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        self.dragging = false;
        self.grab = None;
        ctx.apply(self.id, Patch::Dragging(false));
        if !self.closed {
            ctx.apply(self.id, Patch::Cursor(Cursor::Grab));
        }
    }

    fn play_snap<S: Surface, C: Clock>(&mut self, side: Side, ctx: &mut Ctx<'_, S, C>) {
        if self.options.character.is_hidden() || self.phase.is_exiting() {
            return;
        }
        // The entrance is still running; it settles into idle on its own
        let snapping = matches!(self.character_anim, Some(Animation::CharacterSnap(_)));
        if !self.idle && !snapping {
            return;
        }
        if let Some(previous @ Animation::CharacterSnap(_)) = self.character_anim.take() {
            ctx.apply(self.id, Patch::Stop(previous));
        }
        if self.idle {
            ctx.apply(self.id, Patch::Stop(Animation::CharacterIdle));
            self.idle = false;
        }
        self.play_character(Animation::CharacterSnap(side), ctx);
    }

    // Exit

    /// Begin the exit sequence. Safe to call any number of times.
    pub(crate) fn close<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if self.closed {
            return;
        }
        self.closed = true;
        tracing::debug!("Closing toast {}", self.id);

        self.countdown.stop();
        self.typing_alive = false;
        for watcher in std::mem::take(&mut self.watchers) {
            ctx.apply(self.id, Patch::Unlisten(watcher));
        }
        if self.dragging {
            self.release(ctx);
        }

        if self.phase == Phase::Pending {
            // Never shown, nothing to animate out
            self.fade(ctx);
            return;
        }

        if let Some(current) = self.message_anim.take() {
            ctx.apply(self.id, Patch::Stop(current));
        }
        self.phase = Phase::MessageExit;
        self.message_anim = Some(Animation::MessageExit);
        ctx.apply(self.id, Patch::Play(Animation::MessageExit));
    }

    fn exit_character<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        if let Some(current) = self.character_anim.take() {
            ctx.apply(self.id, Patch::Stop(current));
        }
        if self.idle {
            ctx.apply(self.id, Patch::Stop(Animation::CharacterIdle));
            self.idle = false;
        }
        self.phase = Phase::CharacterExit;
        self.play_character(
            Animation::CharacterExit(self.side, self.options.transition),
            ctx,
        );
    }

    fn fade<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) {
        self.phase = Phase::Fading;
        ctx.apply(self.id, Patch::Visible(false));
        ctx.schedule(Task::After(ctx.config.exit_fade(), Message::FadeDone(self.id)));
    }

    fn finish<S: Surface, C: Clock>(&mut self, ctx: &mut Ctx<'_, S, C>) -> Lifecycle {
        if self.phase != Phase::Fading {
            return Lifecycle::Alive;
        }
        self.phase = Phase::Removed;
        ctx.apply(self.id, Patch::Unmount);
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
        tracing::debug!("Toast {} removed", self.id);
        Lifecycle::Removed
    }
}

impl std::fmt::Debug for ToastInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastInstance")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("side", &self.side)
            .field("position", &self.options.position)
            .field("closed", &self.closed)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::headless::HeadlessSurface;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    struct Rig {
        surface: HeadlessSurface,
        clock: ManualClock,
        config: ToastConfig,
        tasks: Vec<Task>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                surface: HeadlessSurface::new(),
                clock: ManualClock::new(),
                config: ToastConfig::default(),
                tasks: Vec::new(),
            }
        }

        fn send(&mut self, toast: &mut ToastInstance, message: Message) -> Lifecycle {
            let mut ctx = Ctx {
                surface: &mut self.surface,
                clock: &self.clock,
                config: &self.config,
                tasks: &mut self.tasks,
            };
            toast.update(message, &mut ctx)
        }

        fn mount(&mut self, toast: &mut ToastInstance) {
            let mut ctx = Ctx {
                surface: &mut self.surface,
                clock: &self.clock,
                config: &self.config,
                tasks: &mut self.tasks,
            };
            toast.mount(&mut ctx);
        }

        fn close(&mut self, toast: &mut ToastInstance) {
            let mut ctx = Ctx {
                surface: &mut self.surface,
                clock: &self.clock,
                config: &self.config,
                tasks: &mut self.tasks,
            };
            toast.close(&mut ctx);
        }

        fn end(&mut self, toast: &mut ToastInstance, animation: Animation) -> Lifecycle {
            let id = toast.id();
            self.send(toast, Message::AnimationEnd { id, animation })
        }
    }

    fn quick(message: &str) -> ToastRequest {
        ToastRequest::new(message).type_speed(Duration::ZERO)
    }

    /// Drive a toast from mount to resting.
    fn rest(rig: &mut Rig, toast: &mut ToastInstance) {
        rig.mount(toast);
        let id = toast.id();
        rig.send(toast, Message::Frame(id));
        let transition = toast.options().transition;
        if !toast.options().character.is_hidden() {
            rig.end(toast, Animation::CharacterEnter(toast.side(), transition));
        }
        rig.end(toast, Animation::MessageEnter(transition));
    }

    #[test]
    fn test_defaults_resolved() {
        let config = ToastConfig::default();
        let toast = ToastInstance::new(ToastId::next(), ToastRequest::new("Hi"), &config);
        let opts = toast.options();
        assert_eq!(opts.auto_close, Some(Duration::from_millis(5000)));
        assert_eq!(opts.type_speed, Duration::from_millis(30));
        assert_eq!(opts.character, CharacterSource::Default);
        assert!(opts.show_progress);
        assert_eq!(toast.side(), Side::Right, "bottom-right starts on the right");
        assert_eq!(toast.phase(), Phase::Pending);
        assert!(toast.is_listening(Watcher::Drag));
        assert!(toast.is_listening(Watcher::Hover));
        assert!(toast.is_listening(Watcher::FocusLoss));
    }

    #[test]
    fn test_near_screen_false_flips_initial_side() {
        let config = ToastConfig::default();
        let req = ToastRequest::new("x")
            .position(Position::TopLeft)
            .near_screen(false);
        let toast = ToastInstance::new(ToastId::next(), req, &config);
        assert_eq!(toast.side(), Side::Right);
    }

    #[test]
    fn test_mount_defers_entrance_to_next_frame() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rig.mount(&mut toast);

        let patches = rig.surface.patches(toast.id());
        assert!(matches!(patches[0], Patch::Mount(_)));
        assert!(!patches.contains(&Patch::Visible(true)), "nothing moves during mount");
        assert_eq!(rig.tasks, vec![Task::NextFrame(Message::Frame(toast.id()))]);
    }

    #[test]
    fn test_entrance_order() {
        let mut rig = Rig::new();
        let opened = Arc::new(AtomicUsize::new(0));
        let counter = opened.clone();
        let req = quick("Hi").on_open(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut toast = ToastInstance::new(ToastId::next(), req, &rig.config);
        rig.mount(&mut toast);
        let id = toast.id();

        rig.send(&mut toast, Message::Frame(id));
        assert_eq!(toast.phase(), Phase::CharacterEnter);

        // Message enter before the character finished is not awaited
        rig.end(&mut toast, Animation::MessageEnter(Transition::Bounce));
        assert_eq!(opened.load(Ordering::SeqCst), 0);

        rig.end(&mut toast, Animation::CharacterEnter(Side::Right, Transition::Bounce));
        assert_eq!(toast.phase(), Phase::MessageEnter);

        rig.end(&mut toast, Animation::MessageEnter(Transition::Bounce));
        assert_eq!(opened.load(Ordering::SeqCst), 1, "open fires once");
        assert_eq!(toast.phase(), Phase::Resting);
        assert_eq!(toast.revealed_text(), "Hi");
    }

    #[test]
    fn test_hidden_character_skips_character_steps() {
        let mut rig = Rig::new();
        let mut toast =
            ToastInstance::new(ToastId::next(), quick("Hi").character("none"), &rig.config);
        rig.mount(&mut toast);
        let id = toast.id();
        rig.send(&mut toast, Message::Frame(id));
        assert_eq!(toast.phase(), Phase::MessageEnter);

        let patches = rig.surface.patches(id);
        assert!(
            !patches
                .iter()
                .any(|p| matches!(p, Patch::Play(Animation::CharacterEnter(..))))
        );
    }

    #[test]
    fn test_typing_reveals_one_char_per_tick() {
        let mut rig = Rig::new();
        let req = ToastRequest::new("abc").type_speed(Duration::from_millis(30));
        let mut toast = ToastInstance::new(ToastId::next(), req, &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();

        assert_eq!(toast.phase(), Phase::Typing);
        assert_eq!(toast.revealed_text(), "a", "first character shows at once");
        rig.send(&mut toast, Message::TypeTick(id));
        rig.send(&mut toast, Message::TypeTick(id));
        assert_eq!(toast.revealed_text(), "abc");
        assert_eq!(toast.phase(), Phase::Typing);
        rig.send(&mut toast, Message::TypeTick(id));
        assert_eq!(toast.phase(), Phase::Resting);
    }

    #[test]
    fn test_typing_stops_on_close() {
        let mut rig = Rig::new();
        let req = ToastRequest::new("abcdef").type_speed(Duration::from_millis(30));
        let mut toast = ToastInstance::new(ToastId::next(), req, &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();

        rig.close(&mut toast);
        let before = rig.surface.patches(id).len();
        rig.send(&mut toast, Message::TypeTick(id));
        assert_eq!(rig.surface.patches(id).len(), before, "no text after close");
        assert_eq!(toast.revealed_text(), "a");
    }

    #[test]
    fn test_progress_patch_order() {
        let mut rig = Rig::new();
        let req = quick("Hi").auto_close(Duration::from_millis(1000));
        let mut toast = ToastInstance::new(ToastId::next(), req, &rig.config);
        rest(&mut rig, &mut toast);

        let patches = rig.surface.patches(toast.id());
        let at = patches
            .iter()
            .position(|p| *p == Patch::ProgressDuration(Duration::from_millis(1000)))
            .expect("progress duration set");
        assert_eq!(patches[at + 1], Patch::FlushLayout);
        assert_eq!(patches[at + 2], Patch::Play(Animation::ProgressCountdown));
    }

    #[test]
    fn test_hidden_progress_bar_never_counts_down() {
        let mut rig = Rig::new();
        let req = quick("Hi").hide_progress_bar(true);
        let mut toast = ToastInstance::new(ToastId::next(), req, &rig.config);
        rest(&mut rig, &mut toast);
        assert!(
            !rig.surface
                .patches(toast.id())
                .contains(&Patch::Play(Animation::ProgressCountdown))
        );
        assert!(toast.timer(rig.clock.now()) != TimerState::Stopped);
    }

    #[test]
    fn test_hover_before_typing_done_holds_timer() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rig.mount(&mut toast);
        let id = toast.id();
        rig.send(&mut toast, Message::Hover { id, inside: true });
        rig.send(&mut toast, Message::Frame(id));
        rig.end(&mut toast, Animation::CharacterEnter(Side::Right, Transition::Bounce));
        rig.end(&mut toast, Animation::MessageEnter(Transition::Bounce));

        assert_eq!(
            toast.timer(rig.clock.now()),
            TimerState::Paused {
                remaining: Duration::from_millis(5000)
            }
        );
        assert!(rig.surface.patches(id).contains(&Patch::ProgressPaused(true)));

        rig.send(&mut toast, Message::Hover { id, inside: false });
        assert!(matches!(toast.timer(rig.clock.now()), TimerState::Running { .. }));
    }

    #[test]
    fn test_resume_checks_every_pause_source() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();

        rig.send(&mut toast, Message::Hover { id, inside: true });
        rig.send(&mut toast, Message::WindowFocus(false));
        rig.send(&mut toast, Message::Hover { id, inside: false });
        assert!(
            matches!(toast.timer(rig.clock.now()), TimerState::Paused { .. }),
            "focus loss still pauses"
        );
        rig.send(&mut toast, Message::WindowFocus(true));
        assert!(matches!(toast.timer(rig.clock.now()), TimerState::Running { .. }));
    }

    #[test]
    fn test_stale_timeout_ignored() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();

        rig.send(&mut toast, Message::Hover { id, inside: true });
        rig.send(&mut toast, Message::Hover { id, inside: false });
        rig.send(&mut toast, Message::Timeout { id, generation: 1 });
        assert!(!toast.is_closed(), "first run was cancelled by the pause");
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut rig = Rig::new();
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = closed.clone();
        let req = quick("Hi").on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut toast = ToastInstance::new(ToastId::next(), req, &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();

        rig.close(&mut toast);
        rig.close(&mut toast);
        let exits = rig
            .surface
            .patches(id)
            .iter()
            .filter(|p| **p == Patch::Play(Animation::MessageExit))
            .count();
        assert_eq!(exits, 1);

        rig.end(&mut toast, Animation::MessageExit);
        assert_eq!(toast.phase(), Phase::CharacterExit);
        rig.end(&mut toast, Animation::CharacterExit(Side::Right, Transition::Bounce));
        assert_eq!(toast.phase(), Phase::Fading);
        assert_eq!(rig.send(&mut toast, Message::FadeDone(id)), Lifecycle::Removed);
        assert_eq!(rig.send(&mut toast, Message::FadeDone(id)), Lifecycle::Alive);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_tears_down_watchers_first() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();

        rig.close(&mut toast);
        let patches = rig.surface.patches(id);
        let exit = patches
            .iter()
            .position(|p| *p == Patch::Play(Animation::MessageExit))
            .unwrap();
        let unlistened = patches[..exit]
            .iter()
            .filter(|p| matches!(p, Patch::Unlisten(_)))
            .count();
        assert_eq!(unlistened, 3);
        assert_eq!(toast.timer(rig.clock.now()), TimerState::Stopped);

        // Watchers are gone, hover no longer pauses anything
        rig.send(&mut toast, Message::Hover { id, inside: true });
        assert!(!toast.is_paused());
    }

    #[test]
    fn test_close_before_first_frame_fades_directly() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rig.mount(&mut toast);
        let id = toast.id();
        rig.close(&mut toast);
        assert_eq!(toast.phase(), Phase::Fading);

        rig.send(&mut toast, Message::Frame(id));
        assert_eq!(toast.phase(), Phase::Fading, "late frame does not restart entrance");
    }

    #[test]
    fn test_close_during_character_entrance() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rig.mount(&mut toast);
        let id = toast.id();
        rig.send(&mut toast, Message::Frame(id));
        rig.close(&mut toast);

        let enter = Animation::CharacterEnter(Side::Right, Transition::Bounce);
        rig.end(&mut toast, enter);
        assert_eq!(toast.phase(), Phase::MessageExit, "message never enters");

        rig.end(&mut toast, Animation::MessageExit);
        assert_eq!(toast.phase(), Phase::CharacterExit);
    }

    #[test]
    fn test_drag_ignores_close_control_and_secondary_button() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();

        let mut on_close = PointerEvent::new(PointerKind::Down, 1000.0, 650.0);
        on_close.on_close_control = true;
        rig.send(&mut toast, Message::Pointer { id, event: on_close });
        assert!(!toast.is_dragging());

        let mut secondary = PointerEvent::new(PointerKind::Down, 1000.0, 650.0);
        secondary.button = 2;
        rig.send(&mut toast, Message::Pointer { id, event: secondary });
        assert!(!toast.is_dragging());
    }

    #[test]
    fn test_drag_pauses_and_snap_flips_side() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();
        let rect = rig.surface.bounds(id).unwrap();

        let down = PointerEvent::new(PointerKind::Down, rect.x + 10.0, rect.y + 10.0);
        rig.send(&mut toast, Message::Pointer { id, event: down });
        assert!(toast.is_dragging());
        assert!(toast.is_detached());
        assert!(matches!(toast.timer(rig.clock.now()), TimerState::Paused { .. }));

        let moved = PointerEvent::new(PointerKind::Move, 110.0, 310.0);
        rig.send(&mut toast, Message::Pointer { id, event: moved });
        let up = PointerEvent::new(PointerKind::Up, 110.0, 310.0);
        rig.send(&mut toast, Message::Pointer { id, event: up });

        assert!(!toast.is_dragging());
        assert_eq!(toast.side(), Side::Left);
        let patches = rig.surface.patches(id);
        assert!(patches.contains(&Patch::Glide {
            left: 20.0,
            top: 300.0
        }));
        assert!(patches.contains(&Patch::Order {
            character_first: true
        }));
        assert!(patches.contains(&Patch::Play(Animation::CharacterSnap(Side::Left))));
        assert!(matches!(toast.timer(rig.clock.now()), TimerState::Running { .. }));
    }

    #[test]
    fn test_close_while_dragging_leaves_cursor_alone() {
        let mut rig = Rig::new();
        let mut toast = ToastInstance::new(ToastId::next(), quick("Hi"), &rig.config);
        rest(&mut rig, &mut toast);
        let id = toast.id();
        let rect = rig.surface.bounds(id).unwrap();
        let down = PointerEvent::new(PointerKind::Down, rect.x + 10.0, rect.y + 10.0);
        rig.send(&mut toast, Message::Pointer { id, event: down });

        let before = rig.surface.patches(id).len();
        rig.close(&mut toast);
        let after = &rig.surface.patches(id)[before..];
        assert!(!toast.is_dragging());
        assert!(after.contains(&Patch::Dragging(false)));
        assert!(!after.iter().any(|p| matches!(p, Patch::Cursor(_))));
    }
}
