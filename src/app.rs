use eframe::egui;

use crate::error::{Error, Result};
use crate::figure::model::Figure;
use crate::state::WindowState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FigureApp {
    pub state: WindowState,
}

impl FigureApp {
    pub fn new(figure: Figure, name: impl Into<String>) -> Self {
        Self {
            state: WindowState::new(figure, name),
        }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series ----
        egui::SidePanel::left("series_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: figure ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_view(ui, &mut self.state);
        });
    }
}

// ---------------------------------------------------------------------------
// Blocking display
// ---------------------------------------------------------------------------

/// Open a window showing `figure` and block until it is closed.
pub fn show(figure: &Figure, title: &str) -> Result<()> {
    let (width, height) = figure.pixel_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size([width as f32 + 220.0, height as f32 + 40.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    let app = FigureApp::new(figure.clone(), title);
    log::debug!("Opening window for figure {title}");
    eframe::run_native(title, options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| Error::Display(e.to_string()))
}
