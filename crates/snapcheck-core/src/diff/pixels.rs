//! Pixel-level image diff.
//!
//! Comparison order:
//! 1. unequal dimensions always fail, before any tolerance is applied
//! 2. byte-identical RGBA buffers match
//! 3. with both precisions at 1.0 any difference fails
//! 4. otherwise the fraction of differing pixels is checked against
//!    `1 - precision`, where "differing" is either any channel change or,
//!    for perceptual comparison, a CIELAB ΔE above `1 - perceptual_precision`

use crate::diff::model::{Artifact, ArtifactKind, DiffResult, DiffStrategy};
use crate::format::image::PixelBuffer;

const PNG_MIME: &str = "image/png";

/// Tolerance-aware image comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDiff {
    pub precision: f64,
    pub perceptual_precision: f64,
}

impl Default for ImageDiff {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl ImageDiff {
    /// Both precisions are clamped to `[0, 1]`
    pub fn new(precision: f64, perceptual_precision: f64) -> Self {
        Self {
            precision: precision.clamp(0.0, 1.0),
            perceptual_precision: perceptual_precision.clamp(0.0, 1.0),
        }
    }

    fn tolerance_check(&self, reference: &PixelBuffer, actual: &PixelBuffer) -> Option<String> {
        let total = reference.pixel_count();
        if total == 0 {
            return None;
        }
        let allowed_fraction = 1.0 - self.precision;

        if self.perceptual_precision < 1.0 {
            let threshold = 1.0 - self.perceptual_precision;
            let mut differing = 0usize;
            let mut max_delta = 0.0f64;
            for (a, b) in reference.pixels().zip(actual.pixels()) {
                let delta = perceptual_delta(a, b);
                max_delta = max_delta.max(delta);
                if delta > threshold {
                    differing += 1;
                }
            }
            let average = differing as f64 / total as f64;
            if average <= allowed_fraction {
                return None;
            }
            let mut message = format!(
                "The percentage of pixels that match {:.2}% is less than required {:.2}%",
                (1.0 - average) * 100.0,
                self.precision * 100.0
            );
            message.push_str(&format!(
                "\nThe lowest perceptual color precision {:.4} is less than required {:.4}",
                1.0 - max_delta,
                self.perceptual_precision
            ));
            return Some(message);
        }

        let differing = reference
            .pixels()
            .zip(actual.pixels())
            .filter(|(a, b)| a != b)
            .count();
        let fraction = differing as f64 / total as f64;
        if fraction <= allowed_fraction {
            return None;
        }
        Some(format!(
            "Actual image precision {:.4} is less than required {:.4} ({} of {} pixels differ)",
            1.0 - fraction,
            self.precision,
            differing,
            total
        ))
    }

    fn failure(message: String, reference: &PixelBuffer, actual: &PixelBuffer) -> DiffResult {
        let difference = difference_image(reference, actual);
        let encoded = [
            (ArtifactKind::Reference, reference.encode_png()),
            (ArtifactKind::Failure, actual.encode_png()),
            (ArtifactKind::Difference, difference.encode_png()),
        ];

        let mut result = DiffResult::new(message);
        for (kind, bytes) in encoded {
            match bytes {
                Ok(bytes) => result = result.with_artifact(Artifact::new(kind, PNG_MIME, bytes)),
                Err(err) => tracing::warn!(artifact_kind = %kind, error = %err, "skipping image artifact"),
            }
        }
        result
    }
}

impl DiffStrategy<PixelBuffer> for ImageDiff {
    fn compare(&self, reference: &PixelBuffer, actual: &PixelBuffer) -> Option<DiffResult> {
        if reference.dimensions() != actual.dimensions() {
            let message = format!(
                "Newly-taken snapshot@{}x{} does not match reference@{}x{}.",
                actual.width(),
                actual.height(),
                reference.width(),
                reference.height()
            );
            return Some(Self::failure(message, reference, actual));
        }

        if reference.as_rgba() == actual.as_rgba() {
            return None;
        }

        let message = if self.precision >= 1.0 && self.perceptual_precision >= 1.0 {
            "Newly-taken snapshot does not match reference.".to_string()
        } else {
            self.tolerance_check(reference, actual)?
        };
        Some(Self::failure(message, reference, actual))
    }
}

/// Per-channel absolute difference over the union of both canvases.
///
/// Pixels outside one of the images count as transparent black; alpha of
/// the result is always opaque so the divergence is visible.
pub fn difference_image(a: &PixelBuffer, b: &PixelBuffer) -> PixelBuffer {
    let width = a.width().max(b.width());
    let height = a.height().max(b.height());
    PixelBuffer::from_fn(width, height, |x, y| {
        let pa = a.pixel(x, y).unwrap_or([0; 4]);
        let pb = b.pixel(x, y).unwrap_or([0; 4]);
        [
            pa[0].abs_diff(pb[0]),
            pa[1].abs_diff(pb[1]),
            pa[2].abs_diff(pb[2]),
            255,
        ]
    })
}

/// Normalized perceptual distance in `[0, 1]`.
///
/// CIE76 ΔE between the two colours in CIELAB (D65) divided by 100; an
/// alpha change counts at full scale.
pub fn perceptual_delta(a: &[u8], b: &[u8]) -> f64 {
    let (l1, a1, b1) = srgb_to_lab(a[0], a[1], a[2]);
    let (l2, a2, b2) = srgb_to_lab(b[0], b[1], b[2]);
    let delta_e = ((l1 - l2).powi(2) + (a1 - a2).powi(2) + (b1 - b2).powi(2)).sqrt();
    let alpha = f64::from(a[3].abs_diff(b[3])) / 255.0;
    (delta_e / 100.0).min(1.0).max(alpha)
}

fn srgb_to_lab(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    fn f(t: f64) -> f64 {
        const DELTA: f64 = 6.0 / 29.0;
        if t > DELTA * DELTA * DELTA {
            t.cbrt()
        } else {
            t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
        }
    }

    let (r, g, b) = (linear(r), linear(g), linear(b));
    let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
    let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
    let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

    let (fx, fy, fz) = (f(x / 0.950_47), f(y), f(z / 1.088_83));
    (116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}
