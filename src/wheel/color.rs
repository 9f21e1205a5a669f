use super::error::{ColorRole, WheelError};
use palette::Srgb;

/// Parses a strict `#RRGGBB` string. Short forms and named colors are rejected.
pub fn parse_hex(role: ColorRole, value: &str) -> Result<Srgb<u8>, WheelError> {
    let invalid = || WheelError::InvalidColor {
        role,
        value: value.to_string(),
    };

    let digits = value.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

fn shade_channel(fg: u8, bg: u8, percent: f64) -> u8 {
    let fg = f64::from(fg);
    let bg = f64::from(bg);
    (fg + (bg - fg) * percent).floor().clamp(0.0, 255.0) as u8
}

/// Linear blend from `fg` (percent 0) to `bg` (percent 1), floored per channel.
pub fn shade(fg: Srgb<u8>, bg: Srgb<u8>, percent: f64) -> Srgb<u8> {
    Srgb::new(
        shade_channel(fg.red, bg.red, percent),
        shade_channel(fg.green, bg.green, percent),
        shade_channel(fg.blue, bg.blue, percent),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub foreground: Srgb<u8>,
    pub background: Srgb<u8>,
}

impl Palette {
    pub fn new(foreground: Srgb<u8>, background: Srgb<u8>) -> Self {
        Self {
            foreground,
            background,
        }
    }

    pub fn parse(foreground: &str, background: &str) -> Result<Self, WheelError> {
        Ok(Self::new(
            parse_hex(ColorRole::Foreground, foreground)?,
            parse_hex(ColorRole::Background, background)?,
        ))
    }

    /// Depth percent for a stack depth: 0 at the front edge, 1 at the back.
    pub fn depth_percent(stack_depth: i32, radius: f64) -> f64 {
        1.0 - f64::from(stack_depth) / (2.0 * radius)
    }

    pub fn tint(&self, stack_depth: i32, radius: f64) -> Srgb<u8> {
        shade(
            self.foreground,
            self.background,
            Self::depth_percent(stack_depth, radius),
        )
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Srgb::new(0xEE, 0xEE, 0xEE), Srgb::new(0x99, 0x99, 0x99))
    }
}
