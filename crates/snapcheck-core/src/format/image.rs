//! RGBA pixel buffers and their PNG encoding.

use crate::diff::pixels::ImageDiff;
use crate::errors::{ExError, ExErrorKind, Result, SnapCheckError};
use crate::format::strategy::FormatStrategy;

/// Tightly packed RGBA8 image, row-major
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `rgba.len() != width * height * 4`
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("pixel_buffer_new")
                .with_message(format!(
                    "{}x{} RGBA buffer needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    rgba.len()
                )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// A buffer filled with one colour
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// A buffer whose pixels are computed from their coordinates
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// RGBA of the pixel at `(x, y)`, `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }

    /// Iterate over pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.rgba.chunks_exact(4)
    }

    /// Encode as an 8-bit RGBA PNG
    ///
    /// # Errors
    ///
    /// `ImageCoding` when the encoder rejects the buffer (e.g. zero width)
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let encoding_error = |e: png::EncodingError| -> ExError {
            SnapCheckError::ImageEncoding {
                message: e.to_string(),
            }
            .into()
        };

        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().map_err(encoding_error)?;
            writer
                .write_image_data(&self.rgba)
                .map_err(encoding_error)?;
            writer.finish().map_err(encoding_error)?;
        }
        Ok(out)
    }

    /// Decode any PNG, normalizing it to RGBA8
    ///
    /// # Errors
    ///
    /// `ImageCoding` when the bytes are not a decodable PNG
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let decoding_error = |e: png::DecodingError| {
            ExError::new(ExErrorKind::ImageCoding)
                .with_op("decode_png")
                .with_message(e.to_string())
        };

        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info().map_err(decoding_error)?;

        let mut buffer = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer).map_err(decoding_error)?;
        buffer.truncate(info.buffer_size());

        let rgba = match info.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => buffer
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => buffer
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            png::ColorType::Grayscale => buffer.iter().flat_map(|&g| [g, g, g, 255]).collect(),
            png::ColorType::Indexed => {
                return Err(ExError::new(ExErrorKind::ImageCoding)
                    .with_op("decode_png")
                    .with_message("indexed PNG was not expanded"))
            }
        };

        Self::new(info.width, info.height, rgba)
    }

    /// Total decode: anything undecodable becomes an empty 0x0 buffer,
    /// which can only ever mismatch a real image on dimensions.
    pub fn decode_png_lossy(bytes: &[u8]) -> Self {
        match Self::decode_png(bytes) {
            Ok(buffer) => buffer,
            Err(err) => {
                tracing::warn!(error = %err, "reference is not a decodable PNG");
                Self::default()
            }
        }
    }
}

/// Image strategy stored as PNG
///
/// `precision` is the fraction of pixels that must match; a
/// `perceptual_precision` below 1.0 switches to a CIELAB ΔE comparison in
/// which a pixel matches when its normalized ΔE does not exceed
/// `1 - perceptual_precision`.
pub fn image(precision: f64, perceptual_precision: f64) -> FormatStrategy<PixelBuffer, PixelBuffer> {
    FormatStrategy::new(
        Some("png"),
        ImageDiff::new(precision, perceptual_precision),
        |buffer: &PixelBuffer| Ok(buffer.clone()),
        PixelBuffer::decode_png_lossy,
        PixelBuffer::encode_png,
    )
}

/// Image strategy requiring an exact match
pub fn image_exact() -> FormatStrategy<PixelBuffer, PixelBuffer> {
    image(1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> PixelBuffer {
        PixelBuffer::from_fn(4, 3, |x, y| {
            if (x + y) % 2 == 0 {
                [255, 255, 255, 255]
            } else {
                [10, 20, 30, 128]
            }
        })
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_png_round_trip() {
        let original = checkerboard();
        let bytes = original.encode_png().unwrap();
        let decoded = PixelBuffer::decode_png(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_rgb_png_is_normalized_to_rgba() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 2, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 2, 3, 4, 5, 6]).unwrap();
        }
        let decoded = PixelBuffer::decode_png(&bytes).unwrap();
        assert_eq!(decoded.as_rgba(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_lossy_decode_of_garbage_is_empty() {
        let decoded = PixelBuffer::decode_png_lossy(b"definitely not a png");
        assert_eq!(decoded.dimensions(), (0, 0));
        assert_eq!(PixelBuffer::decode_png_lossy(&[]).dimensions(), (0, 0));
    }

    #[test]
    fn test_pixel_lookup() {
        let buffer = checkerboard();
        assert_eq!(buffer.pixel(1, 0), Some([10, 20, 30, 128]));
        assert_eq!(buffer.pixel(4, 0), None);
        assert_eq!(buffer.pixels().count(), 12);
    }

    #[test]
    fn test_image_strategy_round_trip() {
        let strategy = image_exact();
        let buffer = checkerboard();
        let format = strategy.serialize(&buffer).unwrap();
        let bytes = strategy.to_bytes(&format).unwrap();
        let restored = strategy.deserialize(&bytes);
        assert!(strategy.compare(&format, &restored).is_none());
        assert_eq!(strategy.path_extension(), Some("png"));
    }
}
