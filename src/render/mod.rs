//! Static rendering of figures with `plotters`.

mod draw;
mod export;

pub use draw::draw;
pub use export::{rasterize, save, OutputFormat};
