use std::env;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, RgbImage};
use uuid::Uuid;

use crate::{
    error::{GeminiError, Result},
    models::ImageAttachment,
};

/// An uploaded screenshot brought into canonical form: alpha flattened onto an
/// opaque white background, re-encoded as PNG.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    image: RgbImage,
    png_bytes: Vec<u8>,
}

/// Decodes `bytes` as a raster image and produces the canonical PNG encoding.
///
/// Anything the decoder rejects maps to a decode error the caller can show to
/// the user without tearing the run down.
pub fn normalize(bytes: &[u8]) -> Result<NormalizedImage> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| GeminiError::DecodeError(e.to_string()))?;

    let image = flatten_alpha(decoded);

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| GeminiError::DecodeError(e.to_string()))?;

    log::debug!(
        "Normalized image: {}x{}, {} bytes of PNG",
        image.width(),
        image.height(),
        png_bytes.len()
    );

    Ok(NormalizedImage { image, png_bytes })
}

fn flatten_alpha(decoded: DynamicImage) -> RgbImage {
    if !decoded.color().has_alpha() {
        return decoded.to_rgb8();
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.put_pixel(
            x,
            y,
            image::Rgb([
                composite_over_white(r, a),
                composite_over_white(g, a),
                composite_over_white(b, a),
            ]),
        );
    }
    rgb
}

fn composite_over_white(channel: u8, alpha: u8) -> u8 {
    let value = channel as u32 * alpha as u32 + 255 * (255 - alpha as u32);
    ((value + 127) / 255) as u8
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.image
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png_bytes
    }

    pub fn attachment(&self) -> ImageAttachment {
        ImageAttachment::png(self.png_bytes.clone())
    }

    /// Writes the canonical PNG to a transient path that stays valid for the
    /// duration of one pipeline run. Both model calls reuse the same bytes
    /// from memory; the file is the user-inspectable on-disk working copy.
    pub fn persist_temp(&self) -> Result<PathBuf> {
        let path = env::temp_dir().join(format!("screengen-{}.png", Uuid::new_v4()));
        fs::write(&path, &self.png_bytes).map_err(|e| GeminiError::FileError(e.to_string()))?;
        log::debug!("Persisted normalized image to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn encode_png(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_opaque_png_roundtrips_pixel_identical() {
        let mut source = RgbImage::new(10, 10);
        for (x, y, pixel) in source.enumerate_pixels_mut() {
            *pixel = Rgb([x as u8 * 20, y as u8 * 20, 128]);
        }
        let png = encode_png(DynamicImage::ImageRgb8(source.clone()));

        let normalized = normalize(&png).unwrap();
        assert_eq!(normalized.width(), 10);
        assert_eq!(normalized.height(), 10);
        assert_eq!(normalized.pixels(), &source);
    }

    #[test]
    fn test_alpha_is_flattened_over_white() {
        let mut source = RgbaImage::new(4, 4);
        for pixel in source.pixels_mut() {
            *pixel = Rgba([100, 150, 200, 128]);
        }
        let png = encode_png(DynamicImage::ImageRgba8(source));

        let normalized = normalize(&png).unwrap();
        let expected = Rgb([
            composite_over_white(100, 128),
            composite_over_white(150, 128),
            composite_over_white(200, 128),
        ]);
        for pixel in normalized.pixels().pixels() {
            assert_eq!(*pixel, expected);
        }

        // The canonical output must itself decode without an alpha channel.
        let reloaded = image::load_from_memory(normalized.png_bytes()).unwrap();
        assert!(!reloaded.color().has_alpha());
    }

    #[test]
    fn test_fully_transparent_becomes_white() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([30, 60, 90, 0]));
        let png = encode_png(DynamicImage::ImageRgba8(source));

        let normalized = normalize(&png).unwrap();
        for pixel in normalized.pixels().pixels() {
            assert_eq!(*pixel, Rgb([255, 255, 255]));
        }
    }

    #[test]
    fn test_undecodable_bytes_report_decode_error() {
        let err = normalize(b"definitely not an image").unwrap_err();
        match err {
            GeminiError::DecodeError(_) => {}
            other => panic!("expected decode error, got {}", other),
        }
    }

    #[test]
    fn test_persist_temp_writes_canonical_bytes() {
        let source = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));
        let png = encode_png(DynamicImage::ImageRgb8(source));

        let normalized = normalize(&png).unwrap();
        let path = normalized.persist_temp().unwrap();
        let written = fs::read(&path).unwrap();
        assert_eq!(written, normalized.png_bytes());
        let _ = fs::remove_file(path);
    }
}
