use crate::kind::{Theme, ToastType};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// RGBA color (values 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb8(0xff, 0xff, 0xff);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// `#rrggbb`, alpha is dropped.
    pub fn to_hex(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// 135 degree linear gradient.
    Gradient(Color, Color),
}

impl Background {
    pub fn to_css(self) -> String {
        match self {
            Background::Solid(c) => c.to_hex(),
            Background::Gradient(from, to) => format!(
                "linear-gradient(135deg, {} 0%, {} 100%)",
                from.to_hex(),
                to.to_hex()
            ),
        }
    }
}

/// Colour scheme selected by theme and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Background,
    pub foreground: Color,
    pub border: Option<Color>,
    /// Type accent used for the left border stripe and the progress bar.
    pub accent: Option<Color>,
}

mod presets {
    use super::Color;

    pub const INFO: Color = Color::rgb8(0x21, 0x93, 0xb0);
    pub const INFO_BRIGHT: Color = Color::rgb8(0x6d, 0xd5, 0xed);
    pub const SUCCESS: Color = Color::rgb8(0x11, 0x99, 0x8e);
    pub const SUCCESS_BRIGHT: Color = Color::rgb8(0x38, 0xef, 0x7d);
    pub const WARNING: Color = Color::rgb8(0xfb, 0x6e, 0x3b);
    pub const WARNING_BRIGHT: Color = Color::rgb8(0xf5, 0xa6, 0x23);
    pub const ERROR: Color = Color::rgb8(0xeb, 0x33, 0x49);
    pub const ERROR_BRIGHT: Color = Color::rgb8(0xf4, 0x5c, 0x43);
    pub const DEFAULT_FROM: Color = Color::rgb8(0x66, 0x7e, 0xea);
    pub const DEFAULT_TO: Color = Color::rgb8(0x76, 0x4b, 0xa2);

    pub const LIGHT_BG: Color = Color::rgb8(0xff, 0xff, 0xff);
    pub const LIGHT_FG: Color = Color::rgb8(0x33, 0x33, 0x33);
    pub const LIGHT_BORDER: Color = Color::rgb8(0xe0, 0xe0, 0xe0);
    pub const DARK_BG: Color = Color::rgb8(0x2d, 0x2d, 0x2d);
    pub const DARK_FG: Color = Color::rgb8(0xf0, 0xf0, 0xf0);
    pub const DARK_BORDER: Color = Color::rgb8(0x44, 0x44, 0x44);
}

impl Palette {
    pub fn new(theme: Theme, kind: ToastType) -> Self {
        use presets::*;

        match theme {
            Theme::Light => Palette {
                background: Background::Solid(LIGHT_BG),
                foreground: LIGHT_FG,
                border: Some(LIGHT_BORDER),
                accent: match kind {
                    ToastType::Default => None,
                    ToastType::Info => Some(INFO),
                    ToastType::Success => Some(SUCCESS),
                    ToastType::Warning => Some(WARNING),
                    ToastType::Error => Some(ERROR),
                },
            },
            Theme::Dark => Palette {
                background: Background::Solid(DARK_BG),
                foreground: DARK_FG,
                border: Some(DARK_BORDER),
                accent: match kind {
                    ToastType::Default => None,
                    ToastType::Info => Some(INFO_BRIGHT),
                    ToastType::Success => Some(SUCCESS_BRIGHT),
                    ToastType::Warning => Some(WARNING_BRIGHT),
                    ToastType::Error => Some(ERROR_BRIGHT),
                },
            },
            Theme::Colored => {
                let (from, to) = match kind {
                    ToastType::Default => (DEFAULT_FROM, DEFAULT_TO),
                    ToastType::Info => (INFO, INFO_BRIGHT),
                    ToastType::Success => (SUCCESS, SUCCESS_BRIGHT),
                    ToastType::Warning => (WARNING, WARNING_BRIGHT),
                    ToastType::Error => (ERROR, ERROR_BRIGHT),
                };
                Palette {
                    background: Background::Gradient(from, to),
                    foreground: Color::WHITE,
                    border: None,
                    accent: None,
                }
            }
        }
    }

    /// Progress bar colour; falls back to the text colour.
    pub fn progress_color(&self) -> Color {
        self.accent.unwrap_or(self.foreground)
    }

    fn declarations(&self) -> BTreeMap<StyleProperty, String> {
        let mut decls = BTreeMap::new();
        decls.insert(StyleProperty::Background, self.background.to_css());
        decls.insert(StyleProperty::Color, self.foreground.to_hex());
        if let Some(border) = self.border {
            decls.insert(StyleProperty::Border, format!("1px solid {}", border.to_hex()));
        }
        if let Some(accent) = self.accent {
            decls.insert(StyleProperty::BorderLeft, format!("4px solid {}", accent.to_hex()));
        }
        decls
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    UnknownProperty(String),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::UnknownProperty(key) => write!(f, "Unknown style property: {}", key),
        }
    }
}

impl std::error::Error for StyleError {}

/// Style properties a caller may override on the message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleProperty {
    Background,
    BackgroundColor,
    Color,
    Border,
    BorderColor,
    BorderLeft,
    BorderRadius,
    BoxShadow,
    FontFamily,
    FontSize,
    FontWeight,
    Padding,
    Width,
    MinWidth,
    MaxWidth,
    Opacity,
}

/// Properties in one family shadow each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Background,
    Border,
    Own(StyleProperty),
}

impl StyleProperty {
    const ALL: [StyleProperty; 16] = [
        StyleProperty::Background,
        StyleProperty::BackgroundColor,
        StyleProperty::Color,
        StyleProperty::Border,
        StyleProperty::BorderColor,
        StyleProperty::BorderLeft,
        StyleProperty::BorderRadius,
        StyleProperty::BoxShadow,
        StyleProperty::FontFamily,
        StyleProperty::FontSize,
        StyleProperty::FontWeight,
        StyleProperty::Padding,
        StyleProperty::Width,
        StyleProperty::MinWidth,
        StyleProperty::MaxWidth,
        StyleProperty::Opacity,
    ];

    pub fn css_name(self) -> &'static str {
        match self {
            StyleProperty::Background => "background",
            StyleProperty::BackgroundColor => "background-color",
            StyleProperty::Color => "color",
            StyleProperty::Border => "border",
            StyleProperty::BorderColor => "border-color",
            StyleProperty::BorderLeft => "border-left",
            StyleProperty::BorderRadius => "border-radius",
            StyleProperty::BoxShadow => "box-shadow",
            StyleProperty::FontFamily => "font-family",
            StyleProperty::FontSize => "font-size",
            StyleProperty::FontWeight => "font-weight",
            StyleProperty::Padding => "padding",
            StyleProperty::Width => "width",
            StyleProperty::MinWidth => "min-width",
            StyleProperty::MaxWidth => "max-width",
            StyleProperty::Opacity => "opacity",
        }
    }

    fn family(self) -> Family {
        match self {
            StyleProperty::Background | StyleProperty::BackgroundColor => Family::Background,
            StyleProperty::Border | StyleProperty::BorderColor | StyleProperty::BorderLeft => {
                Family::Border
            }
            other => Family::Own(other),
        }
    }
}

impl FromStr for StyleProperty {
    type Err = StyleError;

    /// Accepts `font-size` as well as `fontSize`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut kebab = String::with_capacity(s.len() + 4);
        for c in s.trim().chars() {
            if c.is_ascii_uppercase() {
                kebab.push('-');
                kebab.push(c.to_ascii_lowercase());
            } else {
                kebab.push(c);
            }
        }
        StyleProperty::ALL
            .into_iter()
            .find(|p| p.css_name() == kebab)
            .ok_or_else(|| StyleError::UnknownProperty(s.to_string()))
    }
}

/// Caller-supplied inline style, applied over the palette.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOverrides(BTreeMap<StyleProperty, String>);

impl StyleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StyleError> {
        let prop = key.parse::<StyleProperty>()?;
        self.0.insert(prop, value.into());
        Ok(())
    }

    /// Build from loose key/value pairs, skipping unknown keys.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut overrides = Self::new();
        for (key, value) in pairs {
            if let Err(err) = overrides.set(key.as_ref(), value) {
                tracing::warn!("Ignoring style override: {}", err);
            }
        }
        overrides
    }

    pub fn get(&self, prop: StyleProperty) -> Option<&str> {
        self.0.get(&prop).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Final per-property declarations for the message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    declarations: BTreeMap<StyleProperty, String>,
    pub progress_color: String,
}

impl ResolvedStyle {
    /// Merge palette defaults with overrides; an override replaces every
    /// palette declaration of the same family.
    pub fn resolve(theme: Theme, kind: ToastType, overrides: &StyleOverrides) -> Self {
        let palette = Palette::new(theme, kind);
        let mut declarations = palette.declarations();
        for (prop, value) in &overrides.0 {
            let family = prop.family();
            declarations.retain(|existing, _| existing.family() != family);
            declarations.insert(*prop, value.clone());
        }
        Self {
            declarations,
            progress_color: palette.progress_color().to_hex(),
        }
    }

    pub fn get(&self, prop: StyleProperty) -> Option<&str> {
        self.declarations.get(&prop).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &str)> {
        self.declarations.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Inline `style` attribute text.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(prop, value)| format!("{}: {};", prop.css_name(), value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
