use plotters::coord::types::RangedCoordf64;
use plotters::chart::SeriesAnno;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Error, Result};
use crate::figure::model::{Axes, Axes3d, Figure, Plot};
use crate::style::{LineStyle, Marker};

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Draw the whole figure onto `root`, each subplot in its grid cell.
pub fn draw<DB: DrawingBackend>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<()> {
    root.fill(&WHITE).map_err(Error::render)?;

    let titled;
    let area = match figure.title() {
        Some(title) => {
            titled = root.titled(title, ("sans-serif", 22)).map_err(Error::render)?;
            &titled
        }
        None => root,
    };

    for subplot in figure.subplots() {
        let grid = subplot.grid;
        let cells = area.split_evenly((grid.rows as usize, grid.cols as usize));
        let cell = &cells[(grid.index - 1) as usize];
        match &subplot.plot {
            Plot::Cartesian(axes) => draw_axes(cell, axes)?,
            Plot::ThreeD(axes) => draw_axes_3d(cell, axes)?,
        }
    }

    log::debug!(
        "Rendered figure with {} subplots",
        figure.subplots().len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// 2-D axes
// ---------------------------------------------------------------------------

fn draw_axes<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, axes: &Axes) -> Result<()> {
    let (x_range, y_range) = axes.bounds();

    let mut builder = ChartBuilder::on(area);
    builder.margin(12).x_label_area_size(32).y_label_area_size(48);
    if let Some(title) = &axes.title {
        builder.caption(title, ("sans-serif", 16));
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(Error::render)?;

    {
        let mut mesh = chart.configure_mesh();
        if let Some(label) = &axes.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &axes.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw().map_err(Error::render)?;
    }

    for series in &axes.series {
        let color = RGBColor::from(series.style.color);
        let stroke = color.stroke_width(pixel_width(series.style.width));
        let label = series.label.as_deref();

        // Markers go under the line; the legend entry belongs to the line
        // when there is one.
        if series.style.marker != Marker::None {
            let anno = draw_markers(&mut chart, &series.points, series.style.marker, color)?;
            if series.style.line == LineStyle::None {
                annotate(anno, label, stroke);
            }
        }
        if series.style.line != LineStyle::None {
            let anno = draw_line(&mut chart, &series.points, series.style.line, stroke)?;
            annotate(anno, label, stroke);
        }
    }

    if axes.wants_legend() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(Error::render)?;
    }
    Ok(())
}

fn draw_line<'c, 'a, DB: DrawingBackend>(
    chart: &'c mut Chart2d<'a, DB>,
    points: &[(f64, f64)],
    line: LineStyle,
    stroke: ShapeStyle,
) -> Result<&'c mut SeriesAnno<'a, DB>> {
    let pts = points.iter().copied();
    let anno = match line {
        LineStyle::Solid | LineStyle::None => chart.draw_series(LineSeries::new(pts, stroke)),
        LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(pts, 8, 5, stroke)),
        LineStyle::Dotted => chart.draw_series(DashedLineSeries::new(pts, 2, 4, stroke)),
        LineStyle::DashDot => chart.draw_series(DashedLineSeries::new(pts, 12, 4, stroke)),
    };
    anno.map_err(Error::render)
}

fn draw_markers<'c, 'a, DB: DrawingBackend>(
    chart: &'c mut Chart2d<'a, DB>,
    points: &[(f64, f64)],
    marker: Marker,
    color: RGBColor,
) -> Result<&'c mut SeriesAnno<'a, DB>> {
    let size = marker.size().max(2);
    let half = size as i32;
    let fill = color.filled();
    let pts = points.iter().copied();
    let anno = match marker {
        Marker::None | Marker::Point | Marker::Circle => {
            chart.draw_series(pts.map(|p| Circle::new(p, size, fill)))
        }
        Marker::Square => chart.draw_series(
            pts.map(|p| EmptyElement::at(p) + Rectangle::new([(-half, -half), (half, half)], fill)),
        ),
        Marker::Cross => {
            chart.draw_series(pts.map(|p| Cross::new(p, size, color.stroke_width(2))))
        }
        Marker::Triangle => chart.draw_series(pts.map(|p| TriangleMarker::new(p, size, fill))),
    };
    anno.map_err(Error::render)
}

fn annotate<DB: DrawingBackend>(anno: &mut SeriesAnno<'_, DB>, label: Option<&str>, style: ShapeStyle) {
    if let Some(label) = label {
        anno.label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }
}

// ---------------------------------------------------------------------------
// 3-D axes
// ---------------------------------------------------------------------------

/// 3-D lines are stroked solid; plotters has no dashed 3-D path.
fn draw_axes_3d<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, axes: &Axes3d) -> Result<()> {
    let (x_range, y_range, z_range) = axes.bounds();

    let mut builder = ChartBuilder::on(area);
    builder.margin(12);
    if let Some(title) = &axes.title {
        builder.caption(title, ("sans-serif", 16));
    }
    let mut chart = builder
        .build_cartesian_3d(x_range, z_range, y_range)
        .map_err(Error::render)?;

    let (elev, azim) = (axes.elev, axes.azim);
    chart.with_projection(|mut pb| {
        pb.yaw = azim.to_radians();
        pb.pitch = elev.to_radians();
        pb.scale = 0.8;
        pb.into_matrix()
    });
    chart.configure_axes().draw().map_err(Error::render)?;

    for series in &axes.series {
        let color = RGBColor::from(series.style.color);
        let stroke = color.stroke_width(pixel_width(series.style.width));
        let size = series.style.marker.size().max(2);
        // plotters puts the vertical axis second.
        let pts = || series.points.iter().map(|&(x, y, z)| (x, z, y));

        let anno = if series.style.line == LineStyle::None {
            chart
                .draw_series(pts().map(|p| Circle::new(p, size, color.filled())))
                .map_err(Error::render)?
        } else {
            if series.style.marker != Marker::None {
                chart
                    .draw_series(pts().map(|p| Circle::new(p, size, color.filled())))
                    .map_err(Error::render)?;
            }
            chart
                .draw_series(LineSeries::new(pts(), stroke))
                .map_err(Error::render)?
        };
        annotate(anno, series.label.as_deref(), stroke);
    }

    if axes.wants_legend() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(Error::render)?;
    }
    Ok(())
}

fn pixel_width(width: f32) -> u32 {
    width.round().max(1.0) as u32
}
