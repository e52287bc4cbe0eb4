//! Figscope - scoped figure sessions and a typed CSV loader.
//!
//! A [`Plotter`] opens [`Session`]s. Each session owns one figure; when it
//! ends the figure is either shown in a window (interactive mode) or saved
//! as `<name><suffix>` and closed. Anonymous figures are numbered 0, 1, 2...
//! by a counter shared across the plotter.
//!
//! # Example
//!
//! ```no_run
//! use figscope::{load_csv, Plotter};
//!
//! let mut plotter = Plotter::headless();
//! plotter.set_extension(Some("png"));
//!
//! let table = load_csv("data.csv")?;
//! let x = table.column_f64("time")?;
//! let y = table.column_f64("value")?;
//!
//! // Saved as "0.png" when the session ends.
//! plotter.figure().run(|fig| {
//!     fig.plot(&x, &y)?.label("value");
//!     fig.gca().legend();
//!     Ok::<_, figscope::Error>(())
//! })?;
//! # Ok::<_, figscope::Error>(())
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod app;
pub mod color;
pub mod data;
pub mod error;
pub mod figure;
pub mod render;
pub mod state;
pub mod style;
pub mod ui;

pub use color::Color;
pub use data::loader::{load_csv, load_csv_with, read_csv, CsvOptions, Quoting};
pub use data::model::{FieldType, RecordSet, Value};
pub use error::{Error, Result};
pub use figure::backend::{Backend, HeadlessBackend, NativeBackend};
pub use figure::model::{Axes, Axes3d, Figure, Series2d, Series3d};
pub use figure::session::{
    FigureName, FigureOptions, Flat, Outcome, Plotter, Projection, Session, Settings, ThreeD,
};
pub use style::{LineStyle, Marker, SeriesStyle, StyleCycle};
