use eframe::egui::{self, load::SizedTexture, vec2, ColorImage, Rect, TextureOptions, Ui, UiBuilder};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::figure::model::{Axes, Figure, Grid, Plot as SubplotKind};
use crate::state::WindowState;
use crate::style::{LineStyle, Marker};

// ---------------------------------------------------------------------------
// Figure view (central panel)
// ---------------------------------------------------------------------------

/// Render the figure in the central panel: interactive plots for 2-D
/// figures, a rendered image once any subplot is 3-D.
pub fn figure_view(ui: &mut Ui, state: &mut WindowState) {
    if state.figure.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Nothing plotted");
        });
        return;
    }

    if state.figure.has_3d() {
        raster_view(ui, state);
    } else {
        grid_view(ui, &state.visible_figure());
    }
}

fn grid_view(ui: &mut Ui, figure: &Figure) {
    if let Some(title) = figure.title() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(title);
        });
    }

    let area = ui.available_rect_before_wrap();
    for (idx, subplot) in figure.subplots().iter().enumerate() {
        let SubplotKind::Cartesian(axes) = &subplot.plot else {
            continue;
        };
        let rect = cell_rect(area, subplot.grid);
        ui.scope_builder(UiBuilder::new().max_rect(rect), |ui: &mut Ui| {
            axes_view(ui, idx, axes);
        });
    }
}

fn cell_rect(area: Rect, grid: Grid) -> Rect {
    let (row, col) = grid.cell();
    let size = vec2(
        area.width() / grid.cols as f32,
        area.height() / grid.rows as f32,
    );
    let min = area.min + vec2(col as f32 * size.x, row as f32 * size.y);
    Rect::from_min_size(min, size).shrink(4.0)
}

fn axes_view(ui: &mut Ui, id: usize, axes: &Axes) {
    if let Some(title) = &axes.title {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.strong(title);
        });
    }

    let (x_range, y_range) = axes.bounds();
    let mut plot = Plot::new(("subplot", id))
        .width(ui.available_width())
        .height(ui.available_height())
        .include_x(x_range.start)
        .include_x(x_range.end)
        .include_y(y_range.start)
        .include_y(y_range.end)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if let Some(label) = &axes.x_label {
        plot = plot.x_axis_label(label.clone());
    }
    if let Some(label) = &axes.y_label {
        plot = plot.y_axis_label(label.clone());
    }
    if axes.wants_legend() {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for series in &axes.series {
            let color = egui::Color32::from(series.style.color);
            let name = series.label.clone().unwrap_or_default();
            let points = || -> PlotPoints { series.points.iter().map(|&(x, y)| [x, y]).collect() };

            if let Some(style) = line_style(series.style.line) {
                plot_ui.line(
                    Line::new(points())
                        .name(&name)
                        .color(color)
                        .width(series.style.width)
                        .style(style),
                );
            }
            if let Some(shape) = marker_shape(series.style.marker) {
                plot_ui.points(
                    Points::new(points())
                        .name(&name)
                        .color(color)
                        .shape(shape)
                        .radius(series.style.marker.size() as f32)
                        .filled(true),
                );
            }
        }
    });
}

fn line_style(line: LineStyle) -> Option<egui_plot::LineStyle> {
    match line {
        LineStyle::Solid => Some(egui_plot::LineStyle::Solid),
        LineStyle::Dashed => Some(egui_plot::LineStyle::Dashed { length: 8.0 }),
        LineStyle::Dotted => Some(egui_plot::LineStyle::Dotted { spacing: 4.0 }),
        // egui_plot has no dash-dot; long dashes are the closest.
        LineStyle::DashDot => Some(egui_plot::LineStyle::Dashed { length: 14.0 }),
        LineStyle::None => None,
    }
}

fn marker_shape(marker: Marker) -> Option<MarkerShape> {
    match marker {
        Marker::None => None,
        Marker::Point | Marker::Circle => Some(MarkerShape::Circle),
        Marker::Square => Some(MarkerShape::Square),
        Marker::Cross => Some(MarkerShape::Cross),
        Marker::Triangle => Some(MarkerShape::Up),
    }
}

// ---------------------------------------------------------------------------
// Rendered view for 3-D figures
// ---------------------------------------------------------------------------

fn raster_view(ui: &mut Ui, state: &mut WindowState) {
    if state.texture.is_none() {
        let figure = state.visible_figure();
        match crate::render::rasterize(&figure) {
            Ok(buffer) => {
                let (width, height) = figure.pixel_size();
                let image = ColorImage::from_rgb([width as usize, height as usize], &buffer);
                state.texture =
                    Some(ui.ctx().load_texture("figure", image, TextureOptions::LINEAR));
            }
            Err(e) => {
                if state.status_message.is_none() {
                    log::error!("Failed to render figure: {e}");
                    state.status_message = Some(format!("Error: {e}"));
                }
                return;
            }
        }
    }

    if let Some(texture) = &state.texture {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.add(egui::Image::from_texture(SizedTexture::from_handle(texture)).shrink_to_fit());
        });
    }
}
