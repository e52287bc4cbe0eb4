use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color – a plain sRGB triple shared by both renderers
// ---------------------------------------------------------------------------

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 191, 191);
    pub const MAGENTA: Color = Color::rgb(191, 0, 191);
    pub const YELLOW: Color = Color::rgb(191, 191, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0x1f77b4` style constant.
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// A gray level in `0.0..=1.0`, where `0.5` is half-way between black and white.
    pub fn gray(level: f64) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0) as u8;
        Self::rgb(v, v, v)
    }

    /// Single-letter color codes used in format strings (`"k--"`).
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'b' => Some(Self::BLUE),
            'g' => Some(Self::GREEN),
            'r' => Some(Self::RED),
            'c' => Some(Self::CYAN),
            'm' => Some(Self::MAGENTA),
            'y' => Some(Self::YELLOW),
            'k' => Some(Self::BLACK),
            'w' => Some(Self::WHITE),
            _ => None,
        }
    }
}

impl From<Color> for RGBColor {
    fn from(c: Color) -> Self {
        RGBColor(c.r, c.g, c.b)
    }
}

impl From<Color> for Color32 {
    fn from(c: Color) -> Self {
        Color32::from_rgb(c.r, c.g, c.b)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color::rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn hex_and_gray() {
        assert_eq!(Color::hex(0x1f77b4), Color::rgb(0x1f, 0x77, 0xb4));
        assert_eq!(Color::gray(0.5), Color::rgb(127, 127, 127));
        assert_eq!(Color::gray(2.0), Color::WHITE);
        assert_eq!(Color::from_code('k'), Some(Color::BLACK));
        assert_eq!(Color::from_code('z'), None);
    }
}
