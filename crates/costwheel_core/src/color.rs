//! Colors and the name-keyed color scale.

use indexmap::IndexSet;
use std::fmt;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates a color from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_u32(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional).
    ///
    /// Returns `None` on anything else.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let v = u16::from_str_radix(hex, 16).ok()?;
                let expand = |n: u16| ((n & 0xF) as u8) * 17;
                Some(Self::rgb(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            6 => u32::from_str_radix(hex, 16).ok().map(Self::from_u32),
            _ => None,
        }
    }

    /// Interpolates channel-wise in RGB space.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::rgb(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Assigns colors to record names.
///
/// The chart calls `set_domain` with the current names in store order at
/// the start of every cycle, then `color_of` for each element.
pub trait ColorScale {
    /// Returns the color for a name.
    fn color_of(&mut self, name: &str) -> Color;

    /// Replaces the known names.
    fn set_domain(&mut self, _names: &[&str]) {}
}

/// The nine-color "Set1" categorical palette.
pub const SET1: [Color; 9] = [
    Color::from_u32(0xe41a1c),
    Color::from_u32(0x377eb8),
    Color::from_u32(0x4daf4a),
    Color::from_u32(0x984ea3),
    Color::from_u32(0xff7f00),
    Color::from_u32(0xffff33),
    Color::from_u32(0xa65628),
    Color::from_u32(0xf781bf),
    Color::from_u32(0x999999),
];

/// Ordinal scale: the i-th name in the domain gets the i-th palette color,
/// cycling when the palette runs out.
///
/// Names not in the domain are appended on first lookup.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    domain: IndexSet<String>,
    range: Vec<Color>,
}

impl OrdinalScale {
    /// Creates a scale over the given palette.
    ///
    /// An empty palette falls back to [`SET1`].
    pub fn new(range: Vec<Color>) -> Self {
        let range = if range.is_empty() { SET1.to_vec() } else { range };
        Self {
            domain: IndexSet::new(),
            range,
        }
    }

    /// Returns the domain in order.
    pub fn domain(&self) -> impl Iterator<Item = &str> + '_ {
        self.domain.iter().map(String::as_str)
    }

    /// Returns the palette.
    pub fn range(&self) -> &[Color] {
        &self.range
    }
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self::new(SET1.to_vec())
    }
}

impl ColorScale for OrdinalScale {
    fn color_of(&mut self, name: &str) -> Color {
        let index = match self.domain.get_index_of(name) {
            Some(index) => index,
            None => self.domain.insert_full(name.to_string()).0,
        };
        self.range[index % self.range.len()]
    }

    fn set_domain(&mut self, names: &[&str]) {
        self.domain.clear();
        for name in names {
            self.domain.insert((*name).to_string());
        }
    }
}

/// A scale that returns one color for every name.
#[derive(Debug, Clone, Copy)]
pub struct FixedColor(pub Color);

impl ColorScale for FixedColor {
    fn color_of(&mut self, _name: &str) -> Color {
        self.0
    }
}
