use std::ops::Range;

use crate::error::{Error, Result};
use crate::style::{FormatSpec, Marker, SeriesStyle, StyleCycle, LineStyle};

/// Default figure size in inches.
pub const FIGSIZE: (f64, f64) = (6.0, 6.0);

/// Default resolution in dots per inch.
pub const DPI: u32 = 100;

/// Largest figure width or height in pixels.
pub const MAX_PIXELS: u32 = 1 << 15;

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// One plotted 2-D data series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series2d {
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
    pub label: Option<String>,
}

/// One plotted 3-D data series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series3d {
    pub points: Vec<(f64, f64, f64)>,
    pub style: SeriesStyle,
    pub label: Option<String>,
}

macro_rules! series_setters {
    ($ty:ty) => {
        impl $ty {
            pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
                self.label = Some(label.into());
                self
            }

            pub fn style(&mut self, style: SeriesStyle) -> &mut Self {
                self.style = style;
                self
            }

            pub fn color(&mut self, color: crate::color::Color) -> &mut Self {
                self.style.color = color;
                self
            }

            pub fn line(&mut self, line: LineStyle) -> &mut Self {
                self.style.line = line;
                self
            }

            pub fn marker(&mut self, marker: Marker) -> &mut Self {
                self.style.marker = marker;
                self
            }

            pub fn width(&mut self, width: f32) -> &mut Self {
                self.style.width = width;
                self
            }
        }
    };
}

series_setters!(Series2d);
series_setters!(Series3d);

// ---------------------------------------------------------------------------
// Axes (2-D)
// ---------------------------------------------------------------------------

/// A 2-D plotting target.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    pub legend: bool,
    pub series: Vec<Series2d>,
    cycle: StyleCycle,
}

impl Axes {
    pub fn new(cycle: StyleCycle) -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            x_limits: None,
            y_limits: None,
            legend: false,
            series: Vec::new(),
            cycle,
        }
    }

    /// Plot `ys` against `xs` with the next style of the cycle.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64]) -> Result<&mut Series2d> {
        if xs.len() != ys.len() {
            return Err(Error::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        let idx = self.series.len();
        self.series.push(Series2d {
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
            style: self.cycle.nth(idx),
            label: None,
        });
        Ok(&mut self.series[idx])
    }

    /// Plot `ys` against their indices `0, 1, …`.
    pub fn plot_y(&mut self, ys: &[f64]) -> Result<&mut Series2d> {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        self.plot(&xs, ys)
    }

    /// Plot with a format string such as `"k--"` or `"o"`.
    pub fn plot_fmt(&mut self, xs: &[f64], ys: &[f64], fmt: &str) -> Result<&mut Series2d> {
        let spec: FormatSpec = fmt.parse()?;
        let series = self.plot(xs, ys)?;
        series.style = spec.apply(series.style);
        Ok(series)
    }

    /// Points only, circle markers.
    pub fn scatter(&mut self, xs: &[f64], ys: &[f64]) -> Result<&mut Series2d> {
        let series = self.plot(xs, ys)?;
        series.style.line = LineStyle::None;
        series.style.marker = Marker::Circle;
        Ok(series)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn set_xlim(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_limits = Some((min, max));
        self
    }

    pub fn set_ylim(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_limits = Some((min, max));
        self
    }

    /// Draw a legend even when it would otherwise be omitted.
    pub fn legend(&mut self) -> &mut Self {
        self.legend = true;
        self
    }

    /// Whether a legend should be drawn.
    pub fn wants_legend(&self) -> bool {
        self.legend || self.series.iter().any(|s| s.label.is_some())
    }

    /// Axis ranges: explicit limits when set, otherwise the data extent.
    pub fn bounds(&self) -> (Range<f64>, Range<f64>) {
        let xs = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        let ys = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
        (
            self.x_limits.map(|(a, b)| a..b).unwrap_or_else(|| extent(xs)),
            self.y_limits.map(|(a, b)| a..b).unwrap_or_else(|| extent(ys)),
        )
    }
}

// ---------------------------------------------------------------------------
// Axes3d
// ---------------------------------------------------------------------------

/// A plotting target with a 3-D projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes3d {
    pub title: Option<String>,
    /// Elevation in degrees.
    pub elev: f64,
    /// Azimuth in degrees.
    pub azim: f64,
    pub series: Vec<Series3d>,
    cycle: StyleCycle,
}

impl Axes3d {
    pub fn new(cycle: StyleCycle) -> Self {
        Self {
            title: None,
            elev: 30.0,
            azim: -60.0,
            series: Vec::new(),
            cycle,
        }
    }

    pub fn plot(&mut self, xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<&mut Series3d> {
        if xs.len() != ys.len() || xs.len() != zs.len() {
            return Err(Error::LengthMismatch {
                x: xs.len(),
                y: if xs.len() != ys.len() { ys.len() } else { zs.len() },
            });
        }
        let idx = self.series.len();
        self.series.push(Series3d {
            points: xs
                .iter()
                .zip(ys)
                .zip(zs)
                .map(|((&x, &y), &z)| (x, y, z))
                .collect(),
            style: self.cycle.nth(idx),
            label: None,
        });
        Ok(&mut self.series[idx])
    }

    pub fn scatter(&mut self, xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<&mut Series3d> {
        let series = self.plot(xs, ys, zs)?;
        series.style.line = LineStyle::None;
        series.style.marker = Marker::Circle;
        Ok(series)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Camera angles in degrees.
    pub fn view_init(&mut self, elev: f64, azim: f64) -> &mut Self {
        self.elev = elev;
        self.azim = azim;
        self
    }

    pub fn wants_legend(&self) -> bool {
        self.series.iter().any(|s| s.label.is_some())
    }

    pub fn bounds(&self) -> (Range<f64>, Range<f64>, Range<f64>) {
        let pts = || self.series.iter().flat_map(|s| s.points.iter());
        (
            extent(pts().map(|p| p.0)),
            extent(pts().map(|p| p.1)),
            extent(pts().map(|p| p.2)),
        )
    }
}

/// Finite min..max of the values; unit range when empty, +/-0.5 when flat.
fn extent(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        0.0..1.0
    } else if min == max {
        min - 0.5..max + 0.5
    } else {
        min..max
    }
}

// ---------------------------------------------------------------------------
// Subplots and the figure
// ---------------------------------------------------------------------------

/// Position of a subplot in a `rows` x `cols` grid, `index` counted from 1
/// left-to-right then top-to-bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
    pub index: u32,
}

impl Grid {
    pub const FULL: Grid = Grid {
        rows: 1,
        cols: 1,
        index: 1,
    };

    pub fn new(rows: u32, cols: u32, index: u32) -> Result<Self> {
        let cells = rows.checked_mul(cols).unwrap_or(0);
        if cells == 0 || index == 0 || index > cells {
            return Err(Error::InvalidSubplot { rows, cols, index });
        }
        Ok(Self { rows, cols, index })
    }

    /// Zero-based (row, column) of the cell.
    pub fn cell(&self) -> (u32, u32) {
        ((self.index - 1) / self.cols, (self.index - 1) % self.cols)
    }
}

/// What a subplot draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    Cartesian(Axes),
    ThreeD(Axes3d),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subplot {
    pub grid: Grid,
    pub plot: Plot,
}

/// The drawing surface owned by a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    size: (f64, f64),
    dpi: u32,
    title: Option<String>,
    cycle: StyleCycle,
    subplots: Vec<Subplot>,
}

impl Figure {
    pub fn new(size: (f64, f64), dpi: u32) -> Result<Self> {
        let (width, height) = size;
        let fits = |inches: f64| {
            inches.is_finite() && inches > 0.0 && (inches * dpi as f64).round() <= MAX_PIXELS as f64
        };
        if dpi == 0 || !fits(width) || !fits(height) {
            return Err(Error::InvalidFigureSize { width, height });
        }
        Ok(Self {
            size,
            dpi,
            title: None,
            cycle: StyleCycle::default(),
            subplots: Vec::new(),
        })
    }

    /// Style cycle handed to subplots created from now on.
    pub fn with_cycle(mut self, cycle: StyleCycle) -> Self {
        self.cycle = cycle;
        self
    }

    /// Size in inches.
    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Size in pixels at the figure's dpi.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| ((inches * self.dpi as f64).round() as u32).max(1);
        (px(self.size.0), px(self.size.1))
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn subplots(&self) -> &[Subplot] {
        &self.subplots
    }

    pub(crate) fn subplots_mut(&mut self) -> &mut [Subplot] {
        &mut self.subplots
    }

    pub fn is_empty(&self) -> bool {
        self.subplots.is_empty()
    }

    pub fn has_3d(&self) -> bool {
        self.subplots
            .iter()
            .any(|s| matches!(s.plot, Plot::ThreeD(_)))
    }

    /// Current 2-D axes: the first one, created over the whole figure if none exists.
    pub fn gca(&mut self) -> &mut Axes {
        let pos = match self
            .subplots
            .iter()
            .position(|s| matches!(s.plot, Plot::Cartesian(_)))
        {
            Some(pos) => pos,
            None => {
                self.push(Grid::FULL, Plot::Cartesian(Axes::new(self.cycle.clone())));
                self.subplots.len() - 1
            }
        };
        match &mut self.subplots[pos].plot {
            Plot::Cartesian(axes) => axes,
            Plot::ThreeD(_) => unreachable!("position matched a cartesian subplot"),
        }
    }

    /// Plot on the current axes.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64]) -> Result<&mut Series2d> {
        self.gca().plot(xs, ys)
    }

    pub fn add_subplot(&mut self, rows: u32, cols: u32, index: u32) -> Result<&mut Axes> {
        let grid = Grid::new(rows, cols, index)?;
        match self.push(grid, Plot::Cartesian(Axes::new(self.cycle.clone()))) {
            Plot::Cartesian(axes) => Ok(axes),
            Plot::ThreeD(_) => unreachable!("a cartesian subplot was just pushed"),
        }
    }

    pub fn add_subplot_3d(&mut self, rows: u32, cols: u32, index: u32) -> Result<&mut Axes3d> {
        let grid = Grid::new(rows, cols, index)?;
        match self.push(grid, Plot::ThreeD(Axes3d::new(self.cycle.clone()))) {
            Plot::ThreeD(axes) => Ok(axes),
            Plot::Cartesian(_) => unreachable!("a 3-D subplot was just pushed"),
        }
    }

    /// The 3-D axes spanning the whole figure, created on first use.
    pub fn axes_3d(&mut self) -> &mut Axes3d {
        let pos = match self
            .subplots
            .iter()
            .position(|s| s.grid == Grid::FULL && matches!(s.plot, Plot::ThreeD(_)))
        {
            Some(pos) => pos,
            None => {
                self.push(Grid::FULL, Plot::ThreeD(Axes3d::new(self.cycle.clone())));
                self.subplots.len() - 1
            }
        };
        match &mut self.subplots[pos].plot {
            Plot::ThreeD(axes) => axes,
            Plot::Cartesian(_) => unreachable!("position matched a 3-D subplot"),
        }
    }

    fn push(&mut self, grid: Grid, plot: Plot) -> &mut Plot {
        let idx = self.subplots.len();
        self.subplots.push(Subplot { grid, plot });
        &mut self.subplots[idx].plot
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self {
            size: FIGSIZE,
            dpi: DPI,
            title: None,
            cycle: StyleCycle::default(),
            subplots: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn default_figure_is_six_by_six_inches() {
        let fig = Figure::default();
        assert_eq!(fig.size(), FIGSIZE);
        assert_eq!(fig.pixel_size(), (600, 600));
        assert!(fig.is_empty());
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(Figure::new((0.0, 4.0), DPI).is_err());
        assert!(Figure::new((f64::NAN, 4.0), DPI).is_err());
        assert!(Figure::new((4.0, 4.0), 0).is_err());
        assert!(Figure::new((8.0, 4.5), 120).is_ok());
    }

    #[test]
    fn rejects_sizes_beyond_the_pixel_limit() {
        assert!(matches!(
            Figure::new((1e9, 1e9), DPI),
            Err(Error::InvalidFigureSize { .. })
        ));
        assert!(Figure::new((500.0, 500.0), DPI).is_err());
        assert!(Figure::new((4.0, 4.0), u32::MAX).is_err());

        let edge = Figure::new((327.68, 1.0), DPI).unwrap();
        assert_eq!(edge.pixel_size(), (MAX_PIXELS, 100));
    }

    #[test]
    fn gca_reuses_first_cartesian_axes() {
        let mut fig = Figure::default();
        fig.plot(&[0.0, 1.0], &[1.0, 2.0]).unwrap();
        fig.plot(&[0.0, 1.0], &[3.0, 4.0]).unwrap();
        assert_eq!(fig.subplots().len(), 1);
        assert_eq!(fig.gca().series.len(), 2);
    }

    #[test]
    fn successive_series_follow_the_cycle() {
        let mut axes = Axes::new(StyleCycle::monochrome());
        axes.plot_y(&[1.0, 2.0]).unwrap();
        axes.plot_y(&[1.0, 2.0]).unwrap();
        assert_eq!(axes.series[0].style.line, LineStyle::Solid);
        assert_eq!(axes.series[1].style.line, LineStyle::Dashed);
        assert_eq!(axes.series[0].points, vec![(0.0, 1.0), (1.0, 2.0)]);
    }

    #[test]
    fn plot_fmt_overrides_the_cycle() {
        let mut axes = Axes::new(StyleCycle::default());
        let series = axes.plot_fmt(&[0.0], &[0.0], "rs").unwrap();
        assert_eq!(series.style.color, Color::RED);
        assert_eq!(series.style.marker, Marker::Square);
        assert_eq!(series.style.line, LineStyle::None);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let mut axes = Axes::new(StyleCycle::default());
        assert!(matches!(
            axes.plot(&[1.0, 2.0], &[1.0]),
            Err(Error::LengthMismatch { x: 2, y: 1 })
        ));
        let mut axes = Axes3d::new(StyleCycle::default());
        assert!(axes.plot(&[1.0], &[1.0], &[]).is_err());
    }

    #[test]
    fn bounds_handle_empty_and_flat_data() {
        let mut axes = Axes::new(StyleCycle::default());
        assert_eq!(axes.bounds(), (0.0..1.0, 0.0..1.0));

        axes.plot(&[1.0, 3.0], &[2.0, 2.0]).unwrap();
        assert_eq!(axes.bounds(), (1.0..3.0, 1.5..2.5));

        axes.set_xlim(-1.0, 1.0);
        assert_eq!(axes.bounds().0, -1.0..1.0);
    }

    #[test]
    fn subplot_grid_is_validated() {
        let mut fig = Figure::default();
        assert!(fig.add_subplot(2, 2, 5).is_err());
        assert!(fig.add_subplot(2, 2, 0).is_err());
        assert!(matches!(
            fig.add_subplot(u32::MAX, 2, 1),
            Err(Error::InvalidSubplot { .. })
        ));
        fig.add_subplot(2, 2, 4).unwrap();
        assert_eq!(fig.subplots()[0].grid.cell(), (1, 1));
    }

    #[test]
    fn axes_3d_is_created_once() {
        let mut fig = Figure::default();
        fig.axes_3d().plot(&[0.0], &[0.0], &[0.0]).unwrap();
        fig.axes_3d().plot(&[1.0], &[1.0], &[1.0]).unwrap();
        assert_eq!(fig.subplots().len(), 1);
        assert!(fig.has_3d());
        assert_eq!(fig.axes_3d().series.len(), 2);
    }
}
