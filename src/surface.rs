//! Presentation seam between the toast state machine and whatever draws it.
//!
//! The core never touches a widget tree directly. It describes every visual
//! change as a [`Patch`] and reads back only what it needs for layout
//! decisions: the viewport and each toast's bounding box.

use crate::request::ToastId;
use robot_toast_util::{Animation, CharacterSource, Edge, Position, ResolvedStyle, Theme, ToastType};
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Screen rectangle, origin at the top-left of the viewport.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Input sources a toast subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Watcher {
    /// Pointer down / move / up on the toast body.
    Drag,
    /// Pointer enter / leave on the toast bounds.
    Hover,
    /// Window focus gain / loss.
    FocusLoss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

/// Fully resolved description of a toast's visual tree: container,
/// character slot, message box with close control, text area, progress bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    pub position: Position,
    pub kind: ToastType,
    pub theme: Theme,
    pub rtl: bool,
    pub character: CharacterSource,
    /// Character drawn before the message in layout order.
    pub character_first: bool,
    pub style: ResolvedStyle,
    pub show_progress: bool,
    pub cursor: Cursor,
}

/// One visual change to a toast.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Build the visual tree and attach it to the screen.
    Mount(Box<ToastView>),
    /// Detach and drop the visual tree.
    Unmount,
    /// Container opacity transition.
    Visible(bool),
    Play(Animation),
    Stop(Animation),
    /// Character stays visible once its entrance finished.
    CharacterShown,
    /// Message box rests fully opaque with no transform.
    MessageSettled,
    /// Replace the message text.
    Text(String),
    /// Distance from the anchor edge while the toast is in the stack flow.
    Offset { edge: Edge, px: f32 },
    /// Leave the stack flow and sit at explicit coordinates.
    Detach { left: f32, top: f32 },
    MoveTo { left: f32, top: f32 },
    /// Animated move to explicit coordinates.
    Glide { left: f32, top: f32 },
    EndGlide,
    Dragging(bool),
    /// Reorder character and message without rebuilding either.
    Order { character_first: bool },
    ProgressDuration(Duration),
    /// Force a style/layout flush so the next animation picks up new values.
    FlushLayout,
    ProgressPaused(bool),
    Cursor(Cursor),
    Listen(Watcher),
    Unlisten(Watcher),
}

/// Where toasts are drawn.
///
/// Implementations report animation completion back through
/// [`Message::AnimationEnd`](crate::Message::AnimationEnd) for every
/// animation whose [`Animation::reports_end`] is true.
pub trait Surface {
    /// Whether anything can be drawn at all. Non-interactive surfaces turn
    /// every public operation into a no-op.
    fn is_interactive(&self) -> bool {
        true
    }

    fn viewport(&self) -> Size;

    /// Current bounding box of a mounted toast.
    fn bounds(&self, id: ToastId) -> Option<Rect>;

    fn apply(&mut self, id: ToastId, patch: Patch);
}
