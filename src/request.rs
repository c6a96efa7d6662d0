use robot_toast_util::{Position, StyleOverrides, Theme, ToastType, Transition};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a toast, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(u64);

impl ToastId {
    /// Allocate the next id. Ids are never reused.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Open and close hooks. Each fires at most once.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// When a toast dismisses itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AutoClose {
    /// Use the configured default duration.
    #[default]
    Default,
    /// Dismiss after the duration; zero disables auto-close.
    After(Duration),
    Never,
}

impl AutoClose {
    pub fn millis(ms: u64) -> Self {
        AutoClose::After(Duration::from_millis(ms))
    }

    pub(crate) fn resolve(self, default: Duration) -> Option<Duration> {
        match self {
            AutoClose::Default => Some(default).filter(|d| !d.is_zero()),
            AutoClose::After(d) if d.is_zero() => None,
            AutoClose::After(d) => Some(d),
            AutoClose::Never => None,
        }
    }
}

impl From<bool> for AutoClose {
    fn from(enabled: bool) -> Self {
        if enabled { AutoClose::Default } else { AutoClose::Never }
    }
}

impl From<Duration> for AutoClose {
    fn from(d: Duration) -> Self {
        AutoClose::After(d)
    }
}

/// Everything a caller can ask of a toast.
pub struct ToastRequest {
    pub message: String,
    pub auto_close: AutoClose,
    pub position: Position,
    pub kind: ToastType,
    pub theme: Theme,
    /// Inline overrides applied over the theme palette.
    pub style: StyleOverrides,
    /// Per-character typing interval; zero shows the text at once.
    pub type_speed: Option<Duration>,
    /// Built-in name, custom image path, `"none"`, or empty for the default.
    pub character: String,
    pub hide_progress_bar: bool,
    pub pause_on_hover: bool,
    pub pause_on_focus_loss: bool,
    pub draggable: bool,
    /// Character between the screen edge and the message when true.
    pub near_screen: bool,
    /// Concurrency limit override, 0 = unlimited.
    pub limit: Option<usize>,
    pub newest_on_top: bool,
    pub rtl: bool,
    pub transition: Transition,
    pub on_open: Option<Callback>,
    pub on_close: Option<Callback>,
}

impl Default for ToastRequest {
    fn default() -> Self {
        Self {
            message: String::new(),
            auto_close: AutoClose::Default,
            position: Position::default(),
            kind: ToastType::default(),
            theme: Theme::default(),
            style: StyleOverrides::default(),
            type_speed: None,
            character: String::new(),
            hide_progress_bar: false,
            pause_on_hover: true,
            pause_on_focus_loss: true,
            draggable: true,
            near_screen: true,
            limit: None,
            newest_on_top: false,
            rtl: false,
            transition: Transition::default(),
            on_open: None,
            on_close: None,
        }
    }
}

impl ToastRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn auto_close(mut self, auto_close: impl Into<AutoClose>) -> Self {
        self.auto_close = auto_close.into();
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn kind(mut self, kind: ToastType) -> Self {
        self.kind = kind;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn style(mut self, style: StyleOverrides) -> Self {
        self.style = style;
        self
    }

    pub fn type_speed(mut self, speed: Duration) -> Self {
        self.type_speed = Some(speed);
        self
    }

    pub fn character(mut self, selector: impl Into<String>) -> Self {
        self.character = selector.into();
        self
    }

    pub fn hide_progress_bar(mut self, hide: bool) -> Self {
        self.hide_progress_bar = hide;
        self
    }

    pub fn pause_on_hover(mut self, pause: bool) -> Self {
        self.pause_on_hover = pause;
        self
    }

    pub fn pause_on_focus_loss(mut self, pause: bool) -> Self {
        self.pause_on_focus_loss = pause;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Put the character between the screen edge and the message.
    pub fn near_screen(mut self, near_screen: bool) -> Self {
        self.near_screen = near_screen;
        self
    }

    /// Mirror the character/message order.
    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn newest_on_top(mut self, newest_on_top: bool) -> Self {
        self.newest_on_top = newest_on_top;
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn on_open(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

impl From<&str> for ToastRequest {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ToastRequest {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl fmt::Debug for ToastRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastRequest")
            .field("message", &self.message)
            .field("auto_close", &self.auto_close)
            .field("position", &self.position)
            .field("kind", &self.kind)
            .field("theme", &self.theme)
            .field("style", &self.style)
            .field("type_speed", &self.type_speed)
            .field("character", &self.character)
            .field("hide_progress_bar", &self.hide_progress_bar)
            .field("pause_on_hover", &self.pause_on_hover)
            .field("pause_on_focus_loss", &self.pause_on_focus_loss)
            .field("draggable", &self.draggable)
            .field("near_screen", &self.near_screen)
            .field("limit", &self.limit)
            .field("newest_on_top", &self.newest_on_top)
            .field("rtl", &self.rtl)
            .field("transition", &self.transition)
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let a = ToastId::next();
        let b = ToastId::next();
        assert!(b > a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_auto_close_resolve() {
        let default = Duration::from_millis(5000);
        assert_eq!(AutoClose::Default.resolve(default), Some(default));
        assert_eq!(AutoClose::from(true).resolve(default), Some(default));
        assert_eq!(AutoClose::from(false).resolve(default), None);
        assert_eq!(AutoClose::millis(0).resolve(default), None);
        assert_eq!(
            AutoClose::millis(1200).resolve(default),
            Some(Duration::from_millis(1200))
        );
        assert_eq!(AutoClose::Default.resolve(Duration::ZERO), None);
    }

    #[test]
    fn test_request_defaults() {
        let req = ToastRequest::from("Hi");
        assert_eq!(req.message, "Hi");
        assert_eq!(req.position, Position::BottomRight);
        assert!(req.pause_on_hover);
        assert!(req.pause_on_focus_loss);
        assert!(req.draggable);
        assert!(req.near_screen);
        assert!(!req.newest_on_top);
        assert_eq!(req.limit, None);
    }

    #[test]
    fn test_flag_builders() {
        let req = ToastRequest::new("x")
            .hide_progress_bar(true)
            .pause_on_hover(false)
            .pause_on_focus_loss(false)
            .draggable(false)
            .near_screen(false)
            .rtl(true);
        assert!(req.hide_progress_bar);
        assert!(!req.pause_on_hover);
        assert!(!req.pause_on_focus_loss);
        assert!(!req.draggable);
        assert!(!req.near_screen);
        assert!(req.rtl);
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let req = ToastRequest::new("x").on_open(|| {});
        let dbg = format!("{:?}", req);
        assert!(dbg.contains("on_open: true"));
        assert!(dbg.contains("on_close: false"));
    }
}
