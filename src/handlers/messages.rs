use crate::constants::FRAME_INTERVAL;
use crate::request::ToastId;
use robot_toast_util::Animation;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer input on a toast, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    /// 0 = primary button / first touch.
    pub button: u16,
    /// The pointer is over the close control.
    pub on_close_control: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            button: 0,
            on_close_control: false,
        }
    }
}

/// Toast state machine messages
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Next animation frame after construction; starts the entrance
    Frame(ToastId),
    /// A named animation finished on a toast
    AnimationEnd { id: ToastId, animation: Animation },
    /// Reveal the next character of the message
    TypeTick(ToastId),
    /// Dismissal timer fired
    Timeout { id: ToastId, generation: u64 },
    /// Wrapper fade-out finished
    FadeDone(ToastId),
    /// Snap glide finished
    GlideSettled(ToastId),
    /// Grace delay after a removal elapsed; admit the oldest queued toast
    AdmitNext,
    /// Pointer entered or left a toast
    Hover { id: ToastId, inside: bool },
    /// Window gained or lost input focus
    WindowFocus(bool),
    Pointer { id: ToastId, event: PointerEvent },
    /// Close control clicked
    CloseClicked(ToastId),
}

impl Message {
    /// The toast a message is addressed to, if any.
    pub fn target(&self) -> Option<ToastId> {
        match self {
            Message::Frame(id)
            | Message::TypeTick(id)
            | Message::FadeDone(id)
            | Message::GlideSettled(id)
            | Message::CloseClicked(id) => Some(*id),
            Message::AnimationEnd { id, .. }
            | Message::Timeout { id, .. }
            | Message::Hover { id, .. }
            | Message::Pointer { id, .. } => Some(*id),
            Message::AdmitNext | Message::WindowFocus(_) => None,
        }
    }
}

/// Deferred delivery of a message, requested by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Deliver on the next animation frame.
    NextFrame(Message),
    After(Duration, Message),
}

impl Task {
    pub fn delay(&self) -> Duration {
        match self {
            Task::NextFrame(_) => FRAME_INTERVAL,
            Task::After(delay, _) => *delay,
        }
    }

    pub fn message(&self) -> &Message {
        match self {
            Task::NextFrame(message) | Task::After(_, message) => message,
        }
    }

    pub fn into_message(self) -> Message {
        match self {
            Task::NextFrame(message) | Task::After(_, message) => message,
        }
    }
}
