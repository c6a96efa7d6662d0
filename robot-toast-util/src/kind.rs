use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// All screen zones a toast can be anchored to.
pub const TOAST_POSITIONS: [Position; 6] = [
    Position::TopRight,
    Position::TopLeft,
    Position::TopCenter,
    Position::BottomRight,
    Position::BottomLeft,
    Position::BottomCenter,
];

pub const TOAST_TYPES: [ToastType; 5] = [
    ToastType::Default,
    ToastType::Info,
    ToastType::Success,
    ToastType::Warning,
    ToastType::Error,
];

pub const TOAST_THEMES: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Colored];

pub const TOAST_TRANSITIONS: [Transition; 4] = [
    Transition::Bounce,
    Transition::Slide,
    Transition::Zoom,
    Transition::Flip,
];

/// Returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown toast {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseError {}

/// Screen zone a toast is anchored to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopRight,
    TopLeft,
    TopCenter,
    #[default]
    BottomRight,
    BottomLeft,
    BottomCenter,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
            Position::TopCenter => "top-center",
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomCenter => "bottom-center",
        }
    }

    /// Top-anchored zones stack downward from the top edge.
    pub fn is_top(self) -> bool {
        matches!(
            self,
            Position::TopRight | Position::TopLeft | Position::TopCenter
        )
    }

    pub fn is_left(self) -> bool {
        matches!(self, Position::TopLeft | Position::BottomLeft)
    }

    /// The vertical edge stack offsets are measured from.
    pub fn anchor_edge(self) -> Edge {
        if self.is_top() { Edge::Top } else { Edge::Bottom }
    }

    pub fn class_name(self) -> String {
        format!("robot-toast-{}", self.as_str())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TOAST_POSITIONS
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseError {
                kind: "position",
                value: s.to_string(),
            })
    }
}

/// Vertical edge of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
}

/// Visual type of a toast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastType {
    #[default]
    Default,
    Info,
    Success,
    Warning,
    Error,
}

impl ToastType {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastType::Default => "default",
            ToastType::Info => "info",
            ToastType::Success => "success",
            ToastType::Warning => "warning",
            ToastType::Error => "error",
        }
    }
}

impl fmt::Display for ToastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TOAST_TYPES
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError {
                kind: "type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Colored,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Colored => "colored",
        }
    }
}

impl FromStr for Theme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TOAST_THEMES
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError {
                kind: "theme",
                value: s.to_string(),
            })
    }
}

/// Entry / exit transition style.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    Bounce,
    Slide,
    Zoom,
    Flip,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::Bounce => "bounce",
            Transition::Slide => "slide",
            Transition::Zoom => "zoom",
            Transition::Flip => "flip",
        }
    }

    /// Class-name suffix; bounce is the unsuffixed base animation.
    pub fn suffix(self) -> &'static str {
        match self {
            Transition::Bounce => "",
            Transition::Slide => "-slide",
            Transition::Zoom => "-zoom",
            Transition::Flip => "-flip",
        }
    }
}

impl FromStr for Transition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TOAST_TRANSITIONS
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError {
                kind: "transition",
                value: s.to_string(),
            })
    }
}

/// Horizontal side the character sits on relative to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Character side for a toast resting against `edge`.
    ///
    /// With `near_screen` the character sits between the edge and the
    /// message, otherwise the message is closer to the edge.
    pub fn for_edge(edge: Side, near_screen: bool) -> Self {
        if near_screen { edge } else { edge.opposite() }
    }

    /// Initial side from the anchor zone. Center zones count as right.
    pub fn initial(position: Position, near_screen: bool) -> Self {
        let edge = if position.is_left() { Side::Left } else { Side::Right };
        Self::for_edge(edge, near_screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse() {
        for p in TOAST_POSITIONS {
            assert_eq!(p.as_str().parse::<Position>(), Ok(p));
        }
        let err = "middle".parse::<Position>().unwrap_err();
        assert_eq!(err.kind, "position");
        assert_eq!(err.to_string(), "unknown toast position: 'middle'");
    }

    #[test]
    fn test_position_edges() {
        assert_eq!(Position::TopCenter.anchor_edge(), Edge::Top);
        assert_eq!(Position::BottomLeft.anchor_edge(), Edge::Bottom);
        assert!(Position::TopLeft.is_left());
        assert!(!Position::TopCenter.is_left());
        assert_eq!(Position::default(), Position::BottomRight);
    }

    #[test]
    fn test_initial_side() {
        assert_eq!(Side::initial(Position::TopLeft, true), Side::Left);
        assert_eq!(Side::initial(Position::TopLeft, false), Side::Right);
        assert_eq!(Side::initial(Position::BottomRight, true), Side::Right);
        assert_eq!(Side::initial(Position::BottomCenter, false), Side::Left);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Position::BottomCenter).unwrap();
        assert_eq!(json, "\"bottom-center\"");
        let t: Transition = serde_json::from_str("\"flip\"").unwrap();
        assert_eq!(t, Transition::Flip);
        let kind: ToastType = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(kind, ToastType::Warning);
    }

    #[test]
    fn test_transition_suffix() {
        assert_eq!(Transition::Bounce.suffix(), "");
        assert_eq!(Transition::Zoom.suffix(), "-zoom");
        assert_eq!("slide".parse::<Transition>(), Ok(Transition::Slide));
        assert!("spin".parse::<Transition>().is_err());
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("error".parse::<ToastType>(), Ok(ToastType::Error));
    }
}
