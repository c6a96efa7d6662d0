//! Character image catalog.
//!
//! Built-in images are addressed by short name. Custom images are accepted
//! by path when the extension is one the renderer can draw; anything else
//! falls back to the default built-in robot.

use std::path::Path;

/// Rendered size of the character slot in pixels (width, height).
pub const CHARACTER_SIZE: (u16, u16) = (65, 70);

/// Selector value that hides the character entirely.
pub const HIDDEN_VARIANT: &str = "none";

pub const BUILTIN_CHARACTERS: [&str; 16] = [
    "wave",
    "base",
    "base2",
    "success",
    "error",
    "angry",
    "angry2",
    "shock",
    "think",
    "search",
    "loading",
    "sleep",
    "head-palm",
    "type",
    "validation",
    "validation2",
];

pub const ALLOWED_EXTENSIONS: [&str; 6] = ["svg", "png", "jpg", "jpeg", "gif", "webp"];

/// Where the character image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterSource {
    /// No character is drawn and its animations are skipped.
    Hidden,
    /// The default built-in robot.
    Default,
    Builtin(&'static str),
    Custom(String),
}

impl CharacterSource {
    /// Resolve a caller-supplied selector.
    pub fn resolve(variant: &str) -> Self {
        if variant.is_empty() {
            return CharacterSource::Default;
        }
        if variant == HIDDEN_VARIANT {
            return CharacterSource::Hidden;
        }
        if let Some(name) = BUILTIN_CHARACTERS.iter().find(|name| **name == variant) {
            return CharacterSource::Builtin(name);
        }
        if has_allowed_extension(variant) {
            CharacterSource::Custom(variant.to_string())
        } else {
            tracing::debug!("Unsupported character image '{}', using default", variant);
            CharacterSource::Default
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, CharacterSource::Hidden)
    }

    /// Source to use when this one fails to load.
    pub fn fallback(&self) -> Self {
        match self {
            CharacterSource::Hidden => CharacterSource::Hidden,
            _ => CharacterSource::Default,
        }
    }

    /// Asset key the renderer looks up; `None` when hidden.
    pub fn asset(&self) -> Option<String> {
        match self {
            CharacterSource::Hidden => None,
            CharacterSource::Default => Some("robots/default.svg".to_string()),
            CharacterSource::Builtin(name) => Some(format!("robots/{name}.svg")),
            CharacterSource::Custom(path) => Some(path.clone()),
        }
    }
}

fn has_allowed_extension(variant: &str) -> bool {
    Path::new(variant)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
