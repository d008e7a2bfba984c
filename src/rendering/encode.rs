use std::io::Cursor;
use std::path::Path;

use crate::error::AppError;

/// Encode RGBA8 pixel data as a PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, AppError> {
    if width == 0 || height == 0 {
        return Err(AppError::UnsupportedDimensions { width, height });
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Default);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf.into_inner())
}

/// Encode and write a PNG file.
pub fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<(), AppError> {
    let bytes = encode_png(width, height, rgba)?;
    std::fs::write(path, &bytes).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), width, height, bytes = bytes.len(), "PNG written");
    Ok(())
}
