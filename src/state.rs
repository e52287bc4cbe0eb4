use std::collections::BTreeSet;
use std::path::Path;

use eframe::egui::TextureHandle;

use crate::color::Color;
use crate::error::Result;
use crate::figure::model::{Figure, Plot};

// ---------------------------------------------------------------------------
// Window state
// ---------------------------------------------------------------------------

/// One entry of the series list in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry {
    pub subplot: usize,
    pub series: usize,
    pub label: String,
    pub color: Color,
}

/// State of a figure window, independent of rendering.
pub struct WindowState {
    /// The figure as handed over by the session.
    pub figure: Figure,

    /// Figure name, used as window title and default file name.
    pub name: String,

    /// `(subplot, series)` pairs the user switched off.
    pub hidden: BTreeSet<(usize, usize)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Rasterised figure for views egui_plot cannot draw (3-D).
    pub texture: Option<TextureHandle>,
}

impl WindowState {
    pub fn new(figure: Figure, name: impl Into<String>) -> Self {
        Self {
            figure,
            name: name.into(),
            hidden: BTreeSet::new(),
            status_message: None,
            texture: None,
        }
    }

    pub fn is_hidden(&self, subplot: usize, series: usize) -> bool {
        self.hidden.contains(&(subplot, series))
    }

    /// Flip one series on or off.
    pub fn toggle_series(&mut self, subplot: usize, series: usize) {
        if !self.hidden.remove(&(subplot, series)) {
            self.hidden.insert((subplot, series));
        }
        self.texture = None;
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
        self.texture = None;
    }

    /// Every series of every subplot, labelled for display.
    pub fn series_entries(&self) -> Vec<SeriesEntry> {
        let mut entries = Vec::new();
        for (subplot, sp) in self.figure.subplots().iter().enumerate() {
            let styled: Vec<(Option<&str>, Color)> = match &sp.plot {
                Plot::Cartesian(axes) => axes
                    .series
                    .iter()
                    .map(|s| (s.label.as_deref(), s.style.color))
                    .collect(),
                Plot::ThreeD(axes) => axes
                    .series
                    .iter()
                    .map(|s| (s.label.as_deref(), s.style.color))
                    .collect(),
            };
            for (series, (label, color)) in styled.into_iter().enumerate() {
                entries.push(SeriesEntry {
                    subplot,
                    series,
                    label: label
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("series {series}")),
                    color,
                });
            }
        }
        entries
    }

    /// The figure with hidden series removed.
    pub fn visible_figure(&self) -> Figure {
        let mut figure = self.figure.clone();
        if self.hidden.is_empty() {
            return figure;
        }
        for (subplot, sp) in figure.subplots_mut().iter_mut().enumerate() {
            let keep = |series: usize| !self.hidden.contains(&(subplot, series));
            match &mut sp.plot {
                Plot::Cartesian(axes) => retain_indexed(&mut axes.series, keep),
                Plot::ThreeD(axes) => retain_indexed(&mut axes.series, keep),
            }
        }
        figure
    }

    /// Save what is currently visible and report the result in the status line.
    pub fn save_visible(&mut self, path: &Path) -> Result<()> {
        let result = crate::render::save(&self.visible_figure(), path);
        self.status_message = Some(match &result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => format!("Error: {e}"),
        });
        result
    }
}

fn retain_indexed<T>(items: &mut Vec<T>, keep: impl Fn(usize) -> bool) {
    let mut idx = 0;
    items.retain(|_| {
        let kept = keep(idx);
        idx += 1;
        kept
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_series() -> WindowState {
        let mut figure = Figure::default();
        figure.plot(&[0.0, 1.0], &[0.0, 1.0]).unwrap().label("up");
        figure.plot(&[0.0, 1.0], &[1.0, 0.0]).unwrap();
        WindowState::new(figure, "0")
    }

    #[test]
    fn entries_fall_back_to_positional_labels() {
        let state = two_series();
        let labels: Vec<_> = state.series_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["up", "series 1"]);
    }

    #[test]
    fn hidden_series_are_left_out_of_the_visible_figure() {
        let mut state = two_series();
        state.toggle_series(0, 0);
        assert!(state.is_hidden(0, 0));

        let visible = state.visible_figure();
        let Plot::Cartesian(axes) = &visible.subplots()[0].plot else {
            panic!("expected 2-D axes");
        };
        assert_eq!(axes.series.len(), 1);
        assert_eq!(axes.series[0].label, None);
        // The original is untouched.
        assert_eq!(state.series_entries().len(), 2);

        state.toggle_series(0, 0);
        assert!(!state.is_hidden(0, 0));
    }

    #[test]
    fn save_visible_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = two_series();
        state.save_visible(&dir.path().join("out.svg")).unwrap();
        assert!(state.status_message.as_deref().unwrap().starts_with("Saved"));

        assert!(state.save_visible(&dir.path().join("out.xyz")).is_err());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
