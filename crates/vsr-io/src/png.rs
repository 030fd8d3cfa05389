//! PNG format support.
//!
//! Reads 8-bit (and, after stripping, 16-bit or palette) PNG files into
//! [`Frame`]s and writes gray or RGB frames. Alpha is discarded on read;
//! YCbCr frames are converted to RGB on write.
//!
//! # Example
//!
//! ```rust,ignore
//! use vsr_io::png::{read, write};
//!
//! let frame = read("input.png")?;
//! write("output.png", &frame)?;
//! ```

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, trace};
use vsr_core::{ColorMode, Frame};

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Frame> {
    trace!(path = %path.as_ref().display(), "png::read");

    let file = File::open(path.as_ref())?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let (mode, data) = match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => (ColorMode::Gray, bytes.to_vec()),
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            // Drop alpha
            (ColorMode::Gray, bytes.chunks_exact(2).map(|ga| ga[0]).collect())
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => (ColorMode::Rgb, bytes.to_vec()),
        (png::ColorType::Rgba, png::BitDepth::Eight) => (
            ColorMode::Rgb,
            bytes
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        ),
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    debug!(width = info.width, height = info.height, ?mode, "decoded png");
    Ok(Frame::new(info.width, info.height, mode, data)?)
}

/// Writes a frame to a PNG file.
///
/// Gray frames are written as grayscale, everything else as 8-bit RGB.
pub fn write<P: AsRef<Path>>(path: P, frame: &Frame) -> IoResult<()> {
    trace!(
        path = %path.as_ref().display(),
        width = frame.width,
        height = frame.height,
        "png::write"
    );

    let rgb;
    let (color_type, pixels) = match frame.mode {
        ColorMode::Gray => (png::ColorType::Grayscale, frame),
        ColorMode::Rgb => (png::ColorType::Rgb, frame),
        ColorMode::YCbCr => {
            rgb = frame.to_rgb();
            (png::ColorType::Rgb, &rgb)
        }
    };

    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, pixels.width, pixels.height);
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&pixels.data)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}
