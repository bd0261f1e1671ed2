//! In-process image decoding and resizing.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Limits};

use crate::transform::{Dimensions, ResizeBounds};
use crate::{Error, Result};

/// Largest accepted image side, for both decoding and output.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest accepted output, in pixels.
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 24;

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DIMENSION);
    limits.max_image_height = Some(MAX_DIMENSION);
    limits
}

/// Pixel size `resize` would produce for `src` fitted into `bounds`.
fn output_dimensions(src: Dimensions, bounds: ResizeBounds) -> (u64, u64) {
    let sw = u64::from(src.width.max(1));
    let sh = u64::from(src.height.max(1));
    match (bounds.width.map(u64::from), bounds.height.map(u64::from)) {
        (Some(w), Some(h)) if w * sh <= h * sw => (w, (sh * w / sw).max(1)),
        (Some(_), Some(h)) | (None, Some(h)) => ((sw * h / sh).max(1), h),
        (Some(w), None) => (w, (sh * w / sw).max(1)),
        (None, None) => (sw, sh),
    }
}

/// Read an image's dimensions without decoding its pixels.
pub fn decode_dimensions(data: &[u8]) -> Result<Dimensions> {
    let mut reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    reader.limits(decode_limits());
    let (width, height) = reader.into_dimensions()?;

    Ok(Dimensions { width, height })
}

/// Resize an encoded image to fit `bounds` and re-encode it.
///
/// The output keeps the source format when it can be encoded, otherwise it
/// is written as PNG. Outputs above [`MAX_DIMENSION`] per side or
/// [`MAX_OUTPUT_PIXELS`] in total are rejected before any pixels are
/// allocated.
pub fn resize_image(data: &[u8], bounds: ResizeBounds) -> Result<Vec<u8>> {
    if bounds.width.is_none() && bounds.height.is_none() {
        return Err(Error::InvalidBounds("need a width or a height".into()));
    }
    if bounds.width == Some(0) || bounds.height == Some(0) {
        return Err(Error::InvalidBounds("bounds must be positive".into()));
    }

    let (out_width, out_height) = output_dimensions(decode_dimensions(data)?, bounds);
    if out_width > u64::from(MAX_DIMENSION)
        || out_height > u64::from(MAX_DIMENSION)
        || out_width * out_height > MAX_OUTPUT_PIXELS
    {
        return Err(Error::InvalidBounds(format!(
            "output of {}x{} exceeds the resize limit",
            out_width, out_height
        )));
    }

    let format = image::guess_format(data)?;
    let mut reader = ImageReader::with_format(Cursor::new(data), format);
    reader.limits(decode_limits());
    let img = reader.decode()?;

    let resized = img.resize(
        bounds.width.unwrap_or(u32::MAX),
        bounds.height.unwrap_or(u32::MAX),
        FilterType::Lanczos3,
    );

    let output_format = if format.writing_enabled() {
        format
    } else {
        ImageFormat::Png
    };
    encode(resized, output_format)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    // The JPEG encoder rejects alpha channels.
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)?;
    Ok(buf.into_inner())
}
