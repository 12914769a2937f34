//! Hex colour values.

use std::{fmt, str::FromStr};

/// An 8-bit RGBA colour written as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

/// Why a colour string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid colour '{}', expected #RRGGBB or #RRGGBBAA",
            self.0
        )
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self {
            red: channel(0)?,
            green: channel(2)?,
            blue: channel(4)?,
            alpha: if hex.len() == 8 { channel(6)? } else { 0xFF },
        })
    }
}

impl Color {
    /// Channels as fractions of 1, formatted for a UIColor initialiser.
    pub fn components(&self) -> [String; 4] {
        [self.red, self.green, self.blue, self.alpha].map(|c| format!("{:.3}", c as f64 / 255.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        let color: Color = "#FF8800".parse().unwrap();
        assert_eq!(
            color,
            Color {
                red: 255,
                green: 136,
                blue: 0,
                alpha: 255
            }
        );
    }

    #[test]
    fn test_parse_rgba_lowercase() {
        let color: Color = "#00ff0080".parse().unwrap();
        assert_eq!(color.green, 255);
        assert_eq!(color.alpha, 128);
    }

    #[test]
    fn test_reject_malformed() {
        for bad in ["FF8800", "#FF88", "#GG8800", "#FF8800A", ""] {
            assert!(bad.parse::<Color>().is_err(), "{bad}");
        }
        assert_eq!(
            "red".parse::<Color>().unwrap_err().to_string(),
            "invalid colour 'red', expected #RRGGBB or #RRGGBBAA"
        );
    }

    #[test]
    fn test_components() {
        let color: Color = "#FF8800".parse().unwrap();
        assert_eq!(color.components(), ["1.000", "0.533", "0.000", "1.000"]);
    }
}
