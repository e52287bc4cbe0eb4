//! Error types for figscope.
//!
//! One error enum covers figure sessions, rendering and the CSV loader.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for figscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while plotting, saving or loading data.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open an input file.
    #[error("Failed to open file: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("Failed to write file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode a raster image.
    #[error("Failed to encode image: {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The output extension names no supported image format.
    #[error("Unsupported output format: {extension} (expected png, jpg, jpeg, bmp or svg)")]
    UnsupportedFormat { extension: String },

    /// CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Arrow error while assembling a record set.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The CSV input had no rows at all.
    #[error("CSV input has no header row")]
    MissingHeader,

    /// The CSV input had a header but no data row to infer types from.
    #[error("CSV input has no data row to infer field types from")]
    NoData,

    /// A row's field count differs from the header's.
    #[error("Row {row} has {found} fields, expected {expected}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A value does not fit the type inferred for its field.
    #[error("Row {row}, field '{field}': cannot read '{value}' as {expected}")]
    FieldType {
        row: usize,
        field: String,
        value: String,
        expected: &'static str,
    },

    /// No field with the requested name.
    #[error("Field not found: {0}")]
    UnknownField(String),

    /// The field holds text and cannot be used as numbers.
    #[error("Field '{0}' is not numeric")]
    NotNumeric(String),

    /// Coordinate vectors of a series differ in length.
    #[error("Series length mismatch: x has {x} values, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    /// A format string such as `"k--"` could not be parsed.
    #[error("Invalid format string: {0:?}")]
    InvalidFormat(String),

    /// Subplot index outside its grid.
    #[error("Invalid subplot {index} for a {rows}x{cols} grid")]
    InvalidSubplot { rows: u32, cols: u32, index: u32 },

    /// Figure size is not positive and finite.
    #[error("Invalid figure size {width}x{height}")]
    InvalidFigureSize { width: f64, height: f64 },

    /// The drawing backend failed.
    #[error("Render error: {0}")]
    Render(String),

    /// The window could not be shown.
    #[error("Display error: {0}")]
    Display(String),
}

impl Error {
    /// Create an Open error.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a Write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Wrap any displayable drawing error.
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = Error::FieldType {
            row: 3,
            field: "b".into(),
            value: "abc".into(),
            expected: "float",
        };
        assert_eq!(err.to_string(), "Row 3, field 'b': cannot read 'abc' as float");

        let err = Error::unsupported_format("tiff");
        assert_eq!(
            err.to_string(),
            "Unsupported output format: tiff (expected png, jpg, jpeg, bmp or svg)"
        );
    }
}
