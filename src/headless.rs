//! In-memory surface that records every patch and keeps just enough layout
//! to answer bounds queries. Used by tests, the simulator and the demo.

use crate::constants::{HEADLESS_SIDE_INSET, HEADLESS_TOAST_SIZE, HEADLESS_VIEWPORT};
use crate::request::ToastId;
use crate::surface::{Cursor, Patch, Rect, Size, Surface, ToastView, Watcher};
use robot_toast_util::{Animation, Position};
use std::collections::HashMap;
use std::time::Duration;

/// Materialised state of one mounted toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub view: ToastView,
    pub size: Size,
    pub visible: bool,
    /// Distance from the anchor edge while stacked.
    pub offset: Option<f32>,
    /// Explicit top-left after a drag.
    pub absolute: Option<(f32, f32)>,
    pub gliding: bool,
    pub dragging: bool,
    pub character_first: bool,
    pub character_shown: bool,
    pub message_settled: bool,
    pub text: String,
    /// Animations currently applied, in start order.
    pub playing: Vec<Animation>,
    pub progress_duration: Option<Duration>,
    pub progress_paused: bool,
    pub cursor: Cursor,
    pub listening: Vec<Watcher>,
}

impl Node {
    fn new(view: ToastView, size: Size) -> Self {
        Self {
            character_first: view.character_first,
            cursor: view.cursor,
            view,
            size,
            visible: false,
            offset: None,
            absolute: None,
            gliding: false,
            dragging: false,
            character_shown: false,
            message_settled: false,
            text: String::new(),
            playing: Vec::new(),
            progress_duration: None,
            progress_paused: false,
            listening: Vec::new(),
        }
    }

    pub fn is_playing(&self, animation: Animation) -> bool {
        self.playing.contains(&animation)
    }

    fn apply(&mut self, patch: &Patch) {
        match patch {
            Patch::Mount(_) | Patch::Unmount | Patch::FlushLayout => {}
            Patch::Visible(visible) => self.visible = *visible,
            Patch::Play(animation) => {
                if !self.playing.contains(animation) {
                    self.playing.push(*animation);
                }
            }
            Patch::Stop(animation) => self.playing.retain(|a| a != animation),
            Patch::CharacterShown => self.character_shown = true,
            Patch::MessageSettled => self.message_settled = true,
            Patch::Text(text) => self.text.clone_from(text),
            Patch::Offset { px, .. } => self.offset = Some(*px),
            Patch::Detach { left, top } | Patch::MoveTo { left, top } => {
                self.absolute = Some((*left, *top));
            }
            Patch::Glide { left, top } => {
                self.absolute = Some((*left, *top));
                self.gliding = true;
            }
            Patch::EndGlide => self.gliding = false,
            Patch::Dragging(dragging) => self.dragging = *dragging,
            Patch::Order { character_first } => self.character_first = *character_first,
            Patch::ProgressDuration(duration) => self.progress_duration = Some(*duration),
            Patch::ProgressPaused(paused) => self.progress_paused = *paused,
            Patch::Cursor(cursor) => self.cursor = *cursor,
            Patch::Listen(watcher) => {
                if !self.listening.contains(watcher) {
                    self.listening.push(*watcher);
                }
            }
            Patch::Unlisten(watcher) => self.listening.retain(|w| w != watcher),
        }
    }
}

/// Surface with no pixels.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    interactive: bool,
    viewport: Size,
    default_size: Size,
    sizes: HashMap<ToastId, Size>,
    nodes: HashMap<ToastId, Node>,
    log: Vec<(ToastId, Patch)>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            interactive: true,
            viewport: Size::new(HEADLESS_VIEWPORT.0, HEADLESS_VIEWPORT.1),
            default_size: Size::new(HEADLESS_TOAST_SIZE.0, HEADLESS_TOAST_SIZE.1),
            sizes: HashMap::new(),
            nodes: HashMap::new(),
            log: Vec::new(),
        }
    }

    /// A surface that cannot draw anything.
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            ..Self::new()
        }
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_toast_size(mut self, size: Size) -> Self {
        self.default_size = size;
        self
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Measured size of one toast; applies now and to a later mount.
    pub fn set_size(&mut self, id: ToastId, size: Size) {
        self.sizes.insert(id, size);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.size = size;
        }
    }

    pub fn node(&self, id: ToastId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn is_mounted(&self, id: ToastId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn mounted_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every patch applied to one toast, oldest first.
    pub fn patches(&self, id: ToastId) -> Vec<Patch> {
        self.log
            .iter()
            .filter(|(target, _)| *target == id)
            .map(|(_, patch)| patch.clone())
            .collect()
    }

    pub fn log(&self) -> &[(ToastId, Patch)] {
        &self.log
    }

    fn stacked_rect(&self, node: &Node) -> Rect {
        let Size { width, height } = node.size;
        let x = match node.view.position {
            Position::TopLeft | Position::BottomLeft => HEADLESS_SIDE_INSET,
            Position::TopCenter | Position::BottomCenter => (self.viewport.width - width) / 2.0,
            Position::TopRight | Position::BottomRight => {
                self.viewport.width - width - HEADLESS_SIDE_INSET
            }
        };
        let offset = node.offset.unwrap_or_default();
        let y = if node.view.position.is_top() {
            offset
        } else {
            self.viewport.height - offset - height
        };
        Rect::new(x, y, width, height)
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for HeadlessSurface {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn bounds(&self, id: ToastId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        Some(match node.absolute {
            Some((left, top)) => Rect::new(left, top, node.size.width, node.size.height),
            None => self.stacked_rect(node),
        })
    }

    fn apply(&mut self, id: ToastId, patch: Patch) {
        match &patch {
            Patch::Mount(view) => {
                let size = self.sizes.get(&id).copied().unwrap_or(self.default_size);
                self.nodes.insert(id, Node::new((**view).clone(), size));
            }
            Patch::Unmount => {
                self.nodes.remove(&id);
            }
            other => match self.nodes.get_mut(&id) {
                Some(node) => node.apply(other),
                None => tracing::warn!("Patch {:?} for unmounted toast {}", other, id),
            },
        }
        self.log.push((id, patch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_toast_util::{CharacterSource, ResolvedStyle, StyleOverrides, Theme, ToastType};

    fn view(position: Position) -> ToastView {
        ToastView {
            position,
            kind: ToastType::Default,
            theme: Theme::Light,
            rtl: false,
            character: CharacterSource::Default,
            character_first: false,
            style: ResolvedStyle::resolve(Theme::Light, ToastType::Default, &StyleOverrides::new()),
            show_progress: true,
            cursor: Cursor::Grab,
        }
    }

    #[test]
    fn test_stacked_bounds_per_zone() {
        let mut surface = HeadlessSurface::new();
        let a = ToastId::next();
        let b = ToastId::next();
        let c = ToastId::next();
        surface.apply(a, Patch::Mount(Box::new(view(Position::BottomRight))));
        surface.apply(b, Patch::Mount(Box::new(view(Position::TopLeft))));
        surface.apply(c, Patch::Mount(Box::new(view(Position::TopCenter))));
        surface.apply(a, Patch::Offset { edge: robot_toast_util::Edge::Bottom, px: 20.0 });
        surface.apply(b, Patch::Offset { edge: robot_toast_util::Edge::Top, px: 20.0 });

        assert_eq!(surface.bounds(a), Some(Rect::new(900.0, 610.0, 360.0, 90.0)));
        assert_eq!(surface.bounds(b), Some(Rect::new(20.0, 20.0, 360.0, 90.0)));
        assert_eq!(surface.bounds(c).map(|r| r.x), Some(460.0));
    }

    #[test]
    fn test_absolute_bounds_after_detach() {
        let mut surface = HeadlessSurface::new();
        let id = ToastId::next();
        surface.apply(id, Patch::Mount(Box::new(view(Position::BottomRight))));
        surface.apply(id, Patch::Detach { left: 300.0, top: 200.0 });
        assert_eq!(surface.bounds(id), Some(Rect::new(300.0, 200.0, 360.0, 90.0)));
    }

    #[test]
    fn test_unmount_drops_node_but_keeps_log() {
        let mut surface = HeadlessSurface::new();
        let id = ToastId::next();
        surface.apply(id, Patch::Mount(Box::new(view(Position::TopRight))));
        surface.apply(id, Patch::Play(Animation::MessageExit));
        surface.apply(id, Patch::Unmount);
        assert!(!surface.is_mounted(id));
        assert_eq!(surface.bounds(id), None);
        assert_eq!(surface.patches(id).len(), 3);
    }

    #[test]
    fn test_custom_geometry_and_resize() {
        let mut surface = HeadlessSurface::new()
            .with_viewport(Size::new(800.0, 600.0))
            .with_toast_size(Size::new(300.0, 80.0));
        let id = ToastId::next();
        surface.apply(id, Patch::Mount(Box::new(view(Position::BottomRight))));
        surface.apply(id, Patch::Offset { edge: robot_toast_util::Edge::Bottom, px: 20.0 });
        assert_eq!(surface.bounds(id), Some(Rect::new(480.0, 500.0, 300.0, 80.0)));

        surface.set_viewport(Size::new(1000.0, 700.0));
        assert_eq!(surface.viewport(), Size::new(1000.0, 700.0));
        assert_eq!(surface.bounds(id), Some(Rect::new(680.0, 600.0, 300.0, 80.0)));
    }

    #[test]
    fn test_set_size_before_mount() {
        let mut surface = HeadlessSurface::new();
        let id = ToastId::next();
        surface.set_size(id, Size::new(200.0, 140.0));
        surface.apply(id, Patch::Mount(Box::new(view(Position::TopLeft))));
        assert_eq!(surface.bounds(id).map(|r| r.height), Some(140.0));
    }
}
