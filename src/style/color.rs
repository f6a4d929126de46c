use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{CaptyteError, CaptyteResult};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    ///
    /// Template colors are only parsed when they are painted, so a bad value surfaces as a
    /// paint error on the first frame that uses it.
    pub fn parse_hex(s: &str) -> CaptyteResult<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        fn hex_byte(pair: &str, whole: &str) -> CaptyteResult<u8> {
            u8::from_str_radix(pair, 16).map_err(|_| {
                CaptyteError::paint(format!("invalid hex byte \"{pair}\" in color \"{whole}\""))
            })
        }

        if !hex.is_ascii() {
            return Err(CaptyteError::paint(format!(
                "invalid hex color \"{trimmed}\""
            )));
        }
        match hex.len() {
            6 => Ok(Self {
                r: hex_byte(&hex[0..2], trimmed)?,
                g: hex_byte(&hex[2..4], trimmed)?,
                b: hex_byte(&hex[4..6], trimmed)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: hex_byte(&hex[0..2], trimmed)?,
                g: hex_byte(&hex[2..4], trimmed)?,
                b: hex_byte(&hex[4..6], trimmed)?,
                a: hex_byte(&hex[6..8], trimmed)?,
            }),
            _ => Err(CaptyteError::paint(format!(
                "hex color must be #RRGGBB or #RRGGBBAA, got \"{trimmed}\""
            ))),
        }
    }

    /// Scale alpha by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
