use std::path::Path;

use crate::error::Result;
use crate::figure::model::Figure;

/// The plotting collaborator a session hands its figure to on exit.
pub trait Backend {
    /// Display the figure. May block until the user dismisses it.
    fn show(&mut self, figure: &Figure, title: &str) -> Result<()>;

    /// Write the figure to `path`, choosing the format from its extension.
    fn save(&mut self, figure: &Figure, path: &Path) -> Result<()>;

    /// Release any resources held for the figure.
    fn close(&mut self, _figure: &Figure) {}
}

/// Shows figures in a native window and saves them with `plotters`.
#[derive(Debug, Default)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    fn show(&mut self, figure: &Figure, title: &str) -> Result<()> {
        crate::app::show(figure, title)
    }

    fn save(&mut self, figure: &Figure, path: &Path) -> Result<()> {
        crate::render::save(figure, path)
    }
}

/// Saves figures like [`NativeBackend`] but never opens a window.
#[derive(Debug, Default)]
pub struct HeadlessBackend;

impl Backend for HeadlessBackend {
    fn show(&mut self, figure: &Figure, title: &str) -> Result<()> {
        log::warn!(
            "No display available; figure {title} ({} subplots) not shown",
            figure.subplots().len()
        );
        Ok(())
    }

    fn save(&mut self, figure: &Figure, path: &Path) -> Result<()> {
        crate::render::save(figure, path)
    }
}
