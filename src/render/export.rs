use std::path::Path;

use plotters::prelude::*;

use super::draw::draw;
use crate::error::{Error, Result};
use crate::figure::model::Figure;

/// File formats a figure can be saved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
}

impl OutputFormat {
    /// Format for a path, from its extension. No extension means PNG.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "" | "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "bmp" => Ok(OutputFormat::Bmp),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(Error::unsupported_format(other)),
        }
    }

    fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            OutputFormat::Png => Some(image::ImageFormat::Png),
            OutputFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            OutputFormat::Bmp => Some(image::ImageFormat::Bmp),
            OutputFormat::Svg => None,
        }
    }
}

/// Save `figure` to `path` in the format named by the path's extension.
pub fn save(figure: &Figure, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    let (width, height) = figure.pixel_size();

    match format.image_format() {
        Some(image_format) => {
            let buffer = rasterize(figure)?;
            image::save_buffer_with_format(
                path,
                &buffer,
                width,
                height,
                image::ColorType::Rgb8,
                image_format,
            )
            .map_err(|source| Error::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        }
        None => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                draw(figure, &root)?;
                root.present().map_err(Error::render)?;
            }
            std::fs::write(path, svg).map_err(|e| Error::write(path, e))?;
        }
    }

    log::debug!("Wrote {width}x{height} {format:?} to {}", path.display());
    Ok(())
}

/// Render `figure` into a tightly packed RGB8 buffer of its pixel size.
pub fn rasterize(figure: &Figure) -> Result<Vec<u8>> {
    let (width, height) = figure.pixel_size();
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| Error::render(format!("figure of {width}x{height} pixels is too large")))?;
    let mut buffer = vec![255u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(figure, &root)?;
        root.present().map_err(Error::render)?;
    }
    Ok(buffer)
}
