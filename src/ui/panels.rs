use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::WindowState;

// ---------------------------------------------------------------------------
// Left side panel – series visibility
// ---------------------------------------------------------------------------

/// Render the left panel: one checkbox per series, grouped by subplot.
pub fn side_panel(ui: &mut Ui, state: &mut WindowState) {
    ui.heading("Series");
    ui.separator();

    let entries = state.series_entries();
    if entries.is_empty() {
        ui.label("No series plotted.");
        return;
    }

    let multiple = state.figure.subplots().len() > 1;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut current = None;
            for entry in &entries {
                if multiple && current != Some(entry.subplot) {
                    current = Some(entry.subplot);
                    ui.strong(format!("Subplot {}", entry.subplot + 1));
                }

                let mut checked = !state.is_hidden(entry.subplot, entry.series);
                let text = RichText::new(&entry.label).color(Color32::from(entry.color));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_series(entry.subplot, entry.series);
                }
            }

            ui.separator();
            if ui.small_button("Show all").clicked() {
                state.show_all();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut WindowState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Save as…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Close").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "Figure {}  ({:.1} × {:.1} in @ {} dpi)",
            state.name,
            state.figure.size().0,
            state.figure.size().1,
            state.figure.dpi()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut WindowState) {
    let file = rfd::FileDialog::new()
        .set_title("Save figure")
        .set_file_name(format!("{}.png", state.name))
        .add_filter("PNG", &["png"])
        .add_filter("SVG", &["svg"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .add_filter("BMP", &["bmp"])
        .save_file();

    if let Some(path) = file {
        match state.save_visible(&path) {
            Ok(()) => log::info!("Saved figure {} to {}", state.name, path.display()),
            Err(e) => log::error!("Failed to save figure: {e}"),
        }
    }
}
