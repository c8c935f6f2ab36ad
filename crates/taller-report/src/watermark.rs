// SPDX-License-Identifier: Apache-2.0

use crate::error::{RenderError, RenderErrorCode};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Cursor, ErrorKind, Write};
use std::path::Path;

/// Decoded logo ready for embedding: 8-bit RGB samples, zlib-compressed.
/// Transparency is flattened onto white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermark {
    width: u32,
    height: u32,
    rgb_deflated: Vec<u8>,
}

impl Watermark {
    /// `Ok(None)` when no file exists at `path`.
    pub fn load(path: &Path) -> Result<Option<Self>, RenderError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(RenderError::new(
                    RenderErrorCode::AssetRead,
                    format!("read {}: {err}", path.display()),
                ))
            }
        };
        Self::from_png_bytes(&bytes).map(Some)
    }

    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, RenderError> {
        let decode_err = |msg: String| RenderError::new(RenderErrorCode::ImageDecode, msg);
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder
            .set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info().map_err(|e| decode_err(e.to_string()))?;
        let size = reader
            .output_buffer_size()
            .ok_or_else(|| decode_err("png buffer size unknown".to_string()))?;
        let mut buf = vec![0; size];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| decode_err(e.to_string()))?;
        if info.width == 0 || info.height == 0 {
            return Err(decode_err("png has no pixels".to_string()));
        }
        if info.bit_depth != png::BitDepth::Eight {
            return Err(decode_err(format!(
                "unsupported bit depth {:?}",
                info.bit_depth
            )));
        }
        let channels = match info.color_type {
            png::ColorType::Grayscale => 1,
            png::ColorType::GrayscaleAlpha => 2,
            png::ColorType::Rgb => 3,
            png::ColorType::Rgba => 4,
            png::ColorType::Indexed => {
                return Err(decode_err("palette was not expanded".to_string()))
            }
        };
        let rgb = flatten_to_rgb(
            &buf,
            info.line_size,
            info.width as usize,
            info.height as usize,
            channels,
        );
        let deflate_err =
            |e: std::io::Error| RenderError::new(RenderErrorCode::Serialize, e.to_string());
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rgb).map_err(deflate_err)?;
        let rgb_deflated = encoder.finish().map_err(deflate_err)?;
        Ok(Self {
            width: info.width,
            height: info.height,
            rgb_deflated,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Height in points when drawn `width` points wide.
    #[must_use]
    pub fn scaled_height(&self, width: f64) -> f64 {
        width * f64::from(self.height) / f64::from(self.width)
    }

    pub(crate) fn deflated_samples(&self) -> &[u8] {
        &self.rgb_deflated
    }
}

fn flatten_to_rgb(
    buf: &[u8],
    line_size: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height * 3);
    for row in buf.chunks(line_size).take(height) {
        for px in row.chunks_exact(channels).take(width) {
            let (rgb, alpha) = match channels {
                1 => ([px[0]; 3], 255),
                2 => ([px[0]; 3], px[1]),
                3 => ([px[0], px[1], px[2]], 255),
                _ => ([px[0], px[1], px[2]], px[3]),
            };
            out.extend(rgb.iter().map(|&c| over_white(c, alpha)));
        }
    }
    out
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = u32::from(channel);
    let a = u32::from(alpha);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
