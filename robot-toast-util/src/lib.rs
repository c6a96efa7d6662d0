pub mod animation;
pub mod character;
pub mod kind;
pub mod style;

pub use animation::{Animation, Part};
pub use character::{
    ALLOWED_EXTENSIONS, BUILTIN_CHARACTERS, CHARACTER_SIZE, CharacterSource, HIDDEN_VARIANT,
};
pub use kind::{
    Edge, ParseError, Position, Side, TOAST_POSITIONS, TOAST_THEMES, TOAST_TRANSITIONS,
    TOAST_TYPES, Theme, ToastType, Transition,
};
pub use style::{Background, Color, Palette, ResolvedStyle, StyleError, StyleOverrides, StyleProperty};
