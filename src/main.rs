use anyhow::Context;
use robot_toast::subscriptions::toasts;
use robot_toast::util::{Position, Transition};
use robot_toast::{
    HeadlessSurface, Message, Patch, Rect, Size, Surface, ToastConfig, ToastId, ToastRequest,
    close_all_toasts, register_global, show_toast,
};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Headless surface that logs every patch and reports animation ends on
/// the wall clock, the way a compositor would.
struct DemoSurface {
    inner: HeadlessSurface,
    events: UnboundedSender<Message>,
}

impl Surface for DemoSurface {
    fn viewport(&self) -> Size {
        self.inner.viewport()
    }

    fn bounds(&self, id: ToastId) -> Option<Rect> {
        self.inner.bounds(id)
    }

    fn apply(&mut self, id: ToastId, patch: Patch) {
        match &patch {
            Patch::Mount(view) => tracing::info!(
                "toast {id}: mount at {} ({}), css: {}",
                view.position,
                view.kind,
                view.style.to_css()
            ),
            Patch::Text(text) => tracing::trace!("toast {id}: text {text:?}"),
            Patch::Play(animation) => {
                tracing::debug!("toast {id}: play {}", animation.class_name());
                if let Some(duration) = animation.duration() {
                    let events = self.events.clone();
                    let animation = *animation;
                    tokio::spawn(async move {
                        tokio::time::sleep(duration).await;
                        _ = events.send(Message::AnimationEnd { id, animation });
                    });
                }
            }
            other => tracing::debug!("toast {id}: {other:?}"),
        }
        self.inner.apply(id, patch);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("robot_toast=debug"));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    #[cfg(feature = "systemd")]
    let registry = registry.with(tracing_journald::layer().ok());

    registry.init();
}

fn load_config() -> anyhow::Result<ToastConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ToastConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config file {path}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    init_logging();

    let config = load_config()?;
    tracing::info!("Starting robot-toast demo with {:?}", config);

    let (events_tx, mut events_rx) = unbounded_channel();
    let surface = DemoSurface {
        inner: HeadlessSurface::new(),
        events: events_tx,
    };
    let (handle, _driver) = toasts::spawn(surface, config);

    let forward = handle.clone();
    tokio::spawn(async move {
        while let Some(message) = events_rx.recv().await {
            forward.dispatch(message).await;
        }
    });

    register_global(handle.clone());

    handle.show("Hello from the robot").await;
    handle
        .success(
            ToastRequest::new("Saved!")
                .position(Position::TopRight)
                .limit(1),
        )
        .await;
    let queued = handle
        .warning(
            ToastRequest::new("Waiting for a free slot")
                .position(Position::TopRight)
                .limit(1)
                .character("think"),
        )
        .await;
    show_toast(
        ToastRequest::new("Sent through the global bridge")
            .transition(Transition::Slide)
            .on_close(|| tracing::info!("bridge toast closed")),
    )
    .await;

    tokio::time::sleep(Duration::from_secs(4)).await;
    if let Some(state) = handle.state().await {
        tracing::info!("Stack: {}", serde_json::to_string(&state)?);
    }
    tracing::info!("Queued toast: {:?}", queued);

    tokio::time::sleep(Duration::from_secs(6)).await;
    close_all_toasts().await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    Ok(())
}
