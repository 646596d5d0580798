use std::{fmt, str::FromStr};

/// Pixel format (u32):
///
/// 00000000RRRRRRRRGGGGGGGGBBBBBBBB
///
/// 0: Bit is 0
/// R: Red channel
/// G: Green channel
/// B: Blue channel
///
/// This is the same format used by [softbuffer](https://docs.rs/softbuffer).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    #[error("unknown color name {0:?}")]
    UnknownName(String),

    #[error("malformed hex color {0:?}, expected #rrggbb")]
    MalformedHex(String),
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    #[inline]
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self((red as u32) << 16 | (green as u32) << 8 | (blue as u32))
    }

    /// Build a color from floating point components in `[0, 1]`.
    ///
    /// Components outside that range are clamped.
    #[must_use]
    pub fn from_rgb_f32(red: f32, green: f32, blue: f32) -> Self {
        let channel = |value: f32| (value.clamp(0., 1.) * 255.).round() as u8;
        Self::rgb(channel(red), channel(green), channel(blue))
    }

    /// Look up one of the common SVG color names (case insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let color = match name.as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "lime" => Self::GREEN,
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::BLUE,
            "cyan" | "aqua" => Self::CYAN,
            "magenta" | "fuchsia" => Self::MAGENTA,
            "yellow" => Self::YELLOW,
            "gray" | "grey" => Self::GRAY,
            "darkgray" | "darkgrey" => Self::rgb(169, 169, 169),
            "lightgray" | "lightgrey" => Self::rgb(211, 211, 211),
            "silver" => Self::rgb(192, 192, 192),
            "darkred" => Self::rgb(139, 0, 0),
            "maroon" => Self::rgb(128, 0, 0),
            "darkgreen" => Self::rgb(0, 100, 0),
            "olive" => Self::rgb(128, 128, 0),
            "darkblue" => Self::rgb(0, 0, 139),
            "navy" => Self::rgb(0, 0, 128),
            "darkcyan" => Self::rgb(0, 139, 139),
            "teal" => Self::rgb(0, 128, 128),
            "darkmagenta" => Self::rgb(139, 0, 139),
            "purple" => Self::rgb(128, 0, 128),
            "orange" => Self::rgb(255, 165, 0),
            "darkorange" => Self::rgb(255, 140, 0),
            "brown" => Self::rgb(165, 42, 42),
            "pink" => Self::rgb(255, 192, 203),
            "gold" => Self::rgb(255, 215, 0),
            "violet" => Self::rgb(238, 130, 238),
            "indigo" => Self::rgb(75, 0, 130),
            "skyblue" => Self::rgb(135, 206, 235),
            "lightblue" => Self::rgb(173, 216, 230),
            "lightgreen" => Self::rgb(144, 238, 144),
            "darkyellow" => Self::rgb(128, 128, 0),
            _ => return None,
        };
        Some(color)
    }

    #[inline]
    #[must_use]
    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    #[must_use]
    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }

    #[inline]
    #[must_use]
    pub const fn inverted(&self) -> Self {
        Self::rgb(
            u8::MAX - self.red(),
            u8::MAX - self.green(),
            u8::MAX - self.blue(),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for u32 {
    fn from(value: Color) -> Self {
        value.0
    }
}

/// Packed `0xRRGGBB` colors. Bits above the blue, green and red channels are ignored.
impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::rgb(red, green, blue)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts either a color name or a `#rrggbb` hex triplet
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(ParseColorError::MalformedHex(s.to_string()));
            }
            return u32::from_str_radix(hex, 16)
                .map(Self::from)
                .map_err(|_| ParseColorError::MalformedHex(s.to_string()));
        }

        Self::from_name(s).ok_or_else(|| ParseColorError::UnknownName(s.to_string()))
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.red(), self.green(), self.blue())
    }
}
