//! Photo decoding helpers, callable from any thread.

use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use image::{DynamicImage, GenericImageView, ImageFormat};

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let format = image::guess_format(&bytes).ok();

    if format == Some(ImageFormat::Gif) {
        // Animated GIFs render as their first frame.
        let decoder = GifDecoder::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to decode GIF: {:?}", path))?;
        let mut frames = decoder.into_frames();
        if let Some(frame) = frames.next() {
            let frame = frame.context("Failed to decode GIF frame")?;
            return Ok(DynamicImage::ImageRgba8(frame.into_buffer()));
        }
        return Err(anyhow!("GIF has no frames: {:?}", path));
    }

    match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
        None => image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
    }
}

/// A decoded photo as raw RGBA, downscaled to at most `max_size` on the
/// longest side. Returns (rgba, width, height, orig_width, orig_height).
pub fn decode_rgba_scaled(path: &Path, max_size: u32) -> Result<(Vec<u8>, u32, u32, u32, u32)> {
    let img = open_image(path)?;
    let (orig_w, orig_h) = img.dimensions();

    let longest = orig_w.max(orig_h).max(1);
    let prepared = if longest > max_size {
        let scale = max_size as f32 / longest as f32;
        let new_w = ((orig_w as f32 * scale) as u32).max(1);
        let new_h = ((orig_h as f32 * scale) as u32).max(1);
        img.resize_exact(new_w, new_h, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    let (out_w, out_h) = prepared.dimensions();
    let rgba = prepared.to_rgba8();
    Ok((rgba.into_raw(), out_w.max(1), out_h.max(1), orig_w, orig_h))
}
