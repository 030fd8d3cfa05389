//! Full-range YCbCr <-> RGB conversion.
//!
//! Uses the JPEG (ITU-R BT.601, full swing) coefficients with chroma
//! centered on 128, the same convention as common 8-bit image libraries:
//!
//! ```text
//! Y  =       0.299    R + 0.587    G + 0.114    B
//! Cb = 128 - 0.168736 R - 0.331264 G + 0.5      B
//! Cr = 128 + 0.5      R - 0.418688 G - 0.081312 B
//! ```
//!
//! All functions work on values in `[0, 255]` and do not clamp; callers
//! quantize when producing 8-bit output.

/// Chroma offset for 8-bit full-range YCbCr.
pub const CHROMA_OFFSET: f32 = 128.0;

/// Converts one RGB triple to YCbCr.
#[inline]
pub fn rgb_to_ycbcr([r, g, b]: [f32; 3]) -> [f32; 3] {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = CHROMA_OFFSET - 0.168736 * r - 0.331264 * g + 0.5 * b;
    let cr = CHROMA_OFFSET + 0.5 * r - 0.418688 * g - 0.081312 * b;
    [y, cb, cr]
}

/// Converts one YCbCr triple to RGB.
#[inline]
pub fn ycbcr_to_rgb([y, cb, cr]: [f32; 3]) -> [f32; 3] {
    let cb = cb - CHROMA_OFFSET;
    let cr = cr - CHROMA_OFFSET;
    let r = y + 1.402 * cr;
    let g = y - 0.344136 * cb - 0.714136 * cr;
    let b = y + 1.772 * cb;
    [r, g, b]
}

/// Converts interleaved 3-channel RGB samples to YCbCr in place.
pub fn rgb_to_ycbcr_inplace(data: &mut [f32]) {
    for px in data.chunks_exact_mut(3) {
        let ycc = rgb_to_ycbcr([px[0], px[1], px[2]]);
        px.copy_from_slice(&ycc);
    }
}

/// Rounds and clamps a sample into `u8`.
#[inline]
pub fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
