// Constants module for robot-toast
// Centralizes magic numbers that are not part of ToastConfig

use std::time::Duration;

// ============================================================================
// Scheduling Constants
// ============================================================================

/// Delay hosts use for a next-animation-frame request
pub(crate) const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Buffer size for the driver input channel
pub(crate) const CHANNEL_BUFFER_SIZE: usize = 100;

/// Initial capacity for the active toast list
pub(crate) const INITIAL_ACTIVE_CAPACITY: usize = 8;

// ============================================================================
// Readiness Constants
// ============================================================================

/// Poll interval while waiting for the global API to be registered
pub(crate) const READY_POLL_INTERVAL: Duration = Duration::from_millis(80);

/// Default wait used by the bridging helpers
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_millis(5000);

// ============================================================================
// Headless Layout Constants
// ============================================================================

/// Viewport of a headless surface (pixels)
pub(crate) const HEADLESS_VIEWPORT: (f32, f32) = (1280.0, 720.0);

/// Toast box size of a headless surface (pixels)
pub(crate) const HEADLESS_TOAST_SIZE: (f32, f32) = (360.0, 90.0);

/// Horizontal inset of a resting toast from its anchor edge (pixels)
pub(crate) const HEADLESS_SIDE_INSET: f32 = 20.0;
