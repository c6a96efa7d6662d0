//! Toast notifications with an animated character.
//!
//! [`ToastCoordinator`] tracks every live [`ToastInstance`] plus a pending
//! queue, sequences entrance and exit animations, runs pausable dismissal
//! countdowns, handles drag with edge-snap and restacks each screen zone.
//! Drawing is delegated to a [`Surface`]. The [`subscriptions::toasts`]
//! driver runs a coordinator on tokio and [`bridge`] exposes it globally.

pub mod bridge;
pub mod clock;
pub mod constants;
pub mod coordinator;
pub mod handlers;
pub mod headless;
pub mod request;
pub mod sim;
pub mod subscriptions;
pub mod surface;
pub mod toast;

pub use bridge::{
    ReadyError, close_all_toasts, close_toast_by_id, ensure_ready, get_instance, instance,
    register_global, show_toast,
};
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use coordinator::{QueueEntry, ToastCoordinator};
pub use handlers::{Message, PointerEvent, PointerKind, Task};
pub use headless::HeadlessSurface;
pub use request::{AutoClose, Callback, ToastId, ToastRequest};
pub use sim::Simulator;
pub use subscriptions::toasts::{StackState, ToastHandle};
pub use surface::{Cursor, Patch, Rect, Size, Surface, ToastView, Watcher};
pub use toast::{Lifecycle, Phase, TimerState, ToastInstance, ToastOptions};

pub use robot_toast_config::ToastConfig;
pub use robot_toast_util as util;
