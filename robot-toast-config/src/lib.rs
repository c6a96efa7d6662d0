use std::time::Duration;

/// Library-wide timing and layout settings.
///
/// Every field has a serde default so older or partial documents load.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ToastConfig {
    /// Auto-close duration used when a request enables auto-close without a duration.
    #[serde(default = "default_auto_close_ms")]
    pub default_auto_close_ms: u64,
    /// Typing interval per character when a request does not set one.
    #[serde(default = "default_type_speed_ms")]
    pub type_speed_ms: u64,
    /// Maximum concurrently visible toasts, 0 = unlimited. Requests may override.
    #[serde(default)]
    pub limit: usize,
    /// Vertical gap between stacked toasts in pixels.
    #[serde(default = "default_stack_gap")]
    pub stack_gap: f32,
    /// Distance of the first stacked toast from its anchor edge in pixels.
    #[serde(default = "default_margin")]
    pub edge_margin: f32,
    /// Distance kept from the viewport edges after a drag snap in pixels.
    #[serde(default = "default_margin")]
    pub snap_margin: f32,
    /// Grace delay before a queued toast is admitted into a freed slot.
    #[serde(default = "default_admit_delay_ms")]
    pub admit_delay_ms: u64,
    /// Time the wrapper fade-out is given before the toast is removed.
    #[serde(default = "default_exit_fade_ms")]
    pub exit_fade_ms: u64,
    /// Time after a snap before the glide transition is cleared.
    #[serde(default = "default_glide_settle_ms")]
    pub glide_settle_ms: u64,
    /// Height assumed for a toast the surface cannot measure.
    #[serde(default = "default_fallback_height")]
    pub fallback_height: f32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            default_auto_close_ms: default_auto_close_ms(),
            type_speed_ms: default_type_speed_ms(),
            limit: 0,
            stack_gap: default_stack_gap(),
            edge_margin: default_margin(),
            snap_margin: default_margin(),
            admit_delay_ms: default_admit_delay_ms(),
            exit_fade_ms: default_exit_fade_ms(),
            glide_settle_ms: default_glide_settle_ms(),
            fallback_height: default_fallback_height(),
        }
    }
}

impl ToastConfig {
    pub fn default_auto_close(&self) -> Duration {
        Duration::from_millis(self.default_auto_close_ms)
    }

    pub fn type_speed(&self) -> Duration {
        Duration::from_millis(self.type_speed_ms)
    }

    pub fn admit_delay(&self) -> Duration {
        Duration::from_millis(self.admit_delay_ms)
    }

    pub fn exit_fade(&self) -> Duration {
        Duration::from_millis(self.exit_fade_ms)
    }

    pub fn glide_settle(&self) -> Duration {
        Duration::from_millis(self.glide_settle_ms)
    }
}

// Default value helpers for serde
const fn default_auto_close_ms() -> u64 {
    5000
}

const fn default_type_speed_ms() -> u64 {
    30
}

const fn default_stack_gap() -> f32 {
    16.0
}

const fn default_margin() -> f32 {
    20.0
}

const fn default_admit_delay_ms() -> u64 {
    120
}

const fn default_exit_fade_ms() -> u64 {
    260
}

const fn default_glide_settle_ms() -> u64 {
    500
}

const fn default_fallback_height() -> f32 {
    90.0
}
