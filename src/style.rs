//! Series styling: line styles, markers and the style cycle that hands a new
//! look to every series plotted without an explicit style.

use std::str::FromStr;

use crate::color::{generate_palette, Color};
use crate::error::Error;

/// How the segments between points are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
    /// Points only, no connecting line.
    None,
}

/// Marker drawn at every data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    None,
    Point,
    Circle,
    Square,
    Cross,
    Triangle,
}

impl Marker {
    /// Marker radius in pixels.
    pub fn size(self) -> u32 {
        match self {
            Marker::None => 0,
            Marker::Point => 2,
            _ => 4,
        }
    }
}

/// Complete look of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Color,
    pub line: LineStyle,
    pub marker: Marker,
    pub width: f32,
}

impl SeriesStyle {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            line: LineStyle::Solid,
            marker: Marker::None,
            width: 1.5,
        }
    }

    pub fn line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self::new(Color::hex(0x1f77b4))
    }
}

// ---------------------------------------------------------------------------
// Format strings ("k--", "ro", ":")
// ---------------------------------------------------------------------------

/// Partial style parsed from a short format string.
///
/// A format string combines at most one color letter, one marker and one
/// line style in any order. A marker without a line style draws points only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormatSpec {
    pub color: Option<Color>,
    pub line: Option<LineStyle>,
    pub marker: Option<Marker>,
}

impl FormatSpec {
    /// Overlay the parsed parts on a base style.
    pub fn apply(&self, base: SeriesStyle) -> SeriesStyle {
        let mut style = base;
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(marker) = self.marker {
            style.marker = marker;
        }
        match (self.line, self.marker) {
            (Some(line), _) => style.line = line,
            (None, Some(_)) => style.line = LineStyle::None,
            (None, None) => {}
        }
        style
    }
}

impl FromStr for FormatSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidFormat(s.to_string());
        let mut spec = FormatSpec::default();
        let mut rest = s;

        while !rest.is_empty() {
            let (line, consumed) = if rest.starts_with("--") {
                (Some(LineStyle::Dashed), 2)
            } else if rest.starts_with("-.") {
                (Some(LineStyle::DashDot), 2)
            } else if rest.starts_with('-') {
                (Some(LineStyle::Solid), 1)
            } else if rest.starts_with(':') {
                (Some(LineStyle::Dotted), 1)
            } else {
                (None, 0)
            };
            if let Some(line) = line {
                if spec.line.replace(line).is_some() {
                    return Err(invalid());
                }
                rest = &rest[consumed..];
                continue;
            }

            let mut chars = rest.chars();
            let Some(c) = chars.next() else { break };
            let marker = match c {
                '.' => Some(Marker::Point),
                'o' => Some(Marker::Circle),
                's' => Some(Marker::Square),
                'x' => Some(Marker::Cross),
                '^' => Some(Marker::Triangle),
                _ => None,
            };
            if let Some(marker) = marker {
                if spec.marker.replace(marker).is_some() {
                    return Err(invalid());
                }
            } else if let Some(color) = Color::from_code(c) {
                if spec.color.replace(color).is_some() {
                    return Err(invalid());
                }
            } else {
                return Err(invalid());
            }
            rest = chars.as_str();
        }

        Ok(spec)
    }
}

// ---------------------------------------------------------------------------
// Style cycle
// ---------------------------------------------------------------------------

/// Repeating sequence of styles assigned to successive series on an axes.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleCycle {
    styles: Vec<SeriesStyle>,
}

impl StyleCycle {
    /// A cycle over the given styles. An empty list falls back to the default cycle.
    pub fn new(styles: Vec<SeriesStyle>) -> Self {
        if styles.is_empty() {
            return Self::tableau();
        }
        Self { styles }
    }

    /// The ten Tableau colors with solid lines.
    pub fn tableau() -> Self {
        const TAB10: [u32; 10] = [
            0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f,
            0xbcbd22, 0x17becf,
        ];
        Self {
            styles: TAB10
                .iter()
                .map(|&hex| SeriesStyle::new(Color::hex(hex)))
                .collect(),
        }
    }

    /// Black and gray lines for print: markers (none, point) x colors
    /// (black, 50% gray) x line styles (solid, dashed, dotted, dash-dot),
    /// with the marker varying slowest.
    pub fn monochrome() -> Self {
        let markers = [Marker::None, Marker::Point];
        let colors = [Color::BLACK, Color::gray(0.5)];
        let lines = [
            LineStyle::Solid,
            LineStyle::Dashed,
            LineStyle::Dotted,
            LineStyle::DashDot,
        ];
        let mut styles = Vec::with_capacity(markers.len() * colors.len() * lines.len());
        for &marker in &markers {
            for &color in &colors {
                for &line in &lines {
                    styles.push(SeriesStyle::new(color).marker(marker).line(line));
                }
            }
        }
        Self { styles }
    }

    /// `n` evenly spaced hues with solid lines.
    pub fn hues(n: usize) -> Self {
        Self::new(generate_palette(n).into_iter().map(SeriesStyle::new).collect())
    }

    /// Style for the `i`-th series.
    pub fn nth(&self, i: usize) -> SeriesStyle {
        self.styles[i % self.styles.len()]
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleCycle {
    fn default() -> Self {
        Self::tableau()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monochrome_varies_line_fastest_and_marker_slowest() {
        let cycle = StyleCycle::monochrome();
        assert_eq!(cycle.len(), 16);

        let first = cycle.nth(0);
        assert_eq!(first.color, Color::BLACK);
        assert_eq!(first.line, LineStyle::Solid);
        assert_eq!(first.marker, Marker::None);

        assert_eq!(cycle.nth(1).line, LineStyle::Dashed);
        assert_eq!(cycle.nth(4).color, Color::gray(0.5));
        assert_eq!(cycle.nth(4).line, LineStyle::Solid);
        assert_eq!(cycle.nth(8).marker, Marker::Point);
        assert_eq!(cycle.nth(16), first);
    }

    #[test]
    fn empty_cycle_falls_back_to_tableau() {
        assert_eq!(StyleCycle::new(Vec::new()), StyleCycle::tableau());
        assert_eq!(StyleCycle::hues(3).len(), 3);
    }

    #[test]
    fn parses_format_strings() {
        let spec: FormatSpec = "k--".parse().unwrap();
        assert_eq!(spec.color, Some(Color::BLACK));
        assert_eq!(spec.line, Some(LineStyle::Dashed));
        assert_eq!(spec.marker, None);

        let spec: FormatSpec = "ro".parse().unwrap();
        let style = spec.apply(SeriesStyle::default());
        assert_eq!(style.color, Color::RED);
        assert_eq!(style.marker, Marker::Circle);
        assert_eq!(style.line, LineStyle::None);

        let spec: FormatSpec = "-.^".parse().unwrap();
        assert_eq!(spec.line, Some(LineStyle::DashDot));
        assert_eq!(spec.marker, Some(Marker::Triangle));

        assert_eq!("".parse::<FormatSpec>().unwrap(), FormatSpec::default());
    }

    #[test]
    fn rejects_bad_format_strings() {
        assert!("q".parse::<FormatSpec>().is_err());
        assert!("rk".parse::<FormatSpec>().is_err());
        assert!("--:".parse::<FormatSpec>().is_err());
    }
}
