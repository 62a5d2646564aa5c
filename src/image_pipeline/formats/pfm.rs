//! Portable float map (PFM) reading and writing
//!
//! `PF` holds three channels and `Pf` one. The sign of the scale field gives
//! the byte order (negative is little endian) and rows run bottom to top.

use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::formats::probe::{FormatProbe, ProbeOutcome};

pub struct PfmProbe;

impl FormatProbe for PfmProbe {
    fn name(&self) -> &'static str {
        "pfm"
    }

    fn probe(&self, data: &[u8], _extension: &str) -> ProbeOutcome {
        if !is_pfm(data) {
            return ProbeOutcome::NotThisFormat;
        }
        decode_pfm(data).map_or_else(ProbeOutcome::from, ProbeOutcome::Decoded)
    }
}

pub fn is_pfm(data: &[u8]) -> bool {
    matches!(data, [b'P', b'F' | b'f', next, ..] if next.is_ascii_whitespace())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PfmHeader {
    width: usize,
    height: usize,
    channels: usize,
    little_endian: bool,
}

struct HeaderReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> HeaderReader<'a> {
    /// Skips whitespace and `#` comments.
    fn skip_spaces(&mut self) {
        while let Some(&byte) = self.data.get(self.position) {
            if byte == b'#' {
                while self.data.get(self.position).is_some_and(|&b| b != b'\n') {
                    self.position += 1;
                }
            } else if byte.is_ascii_whitespace() {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Result<&'a str> {
        self.skip_spaces();
        let start = self.position;
        while self
            .data
            .get(self.position)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.position += 1;
        }
        std::str::from_utf8(&self.data[start..self.position])
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConversionError::MalformedInput("truncated PFM header".to_string()))
    }

    fn parse<T: std::str::FromStr>(&mut self, field: &str) -> Result<T> {
        let token = self.token()?;
        token.parse().map_err(|_| {
            ConversionError::MalformedInput(format!("invalid PFM {field}: {token:?}"))
        })
    }
}

fn read_header(data: &[u8]) -> Result<(PfmHeader, usize)> {
    let mut reader = HeaderReader { data, position: 0 };
    let channels = match reader.token()? {
        "PF" => 3,
        "Pf" => 1,
        other => {
            return Err(ConversionError::MalformedInput(format!(
                "unknown PFM magic {other:?}"
            )));
        }
    };
    let width: usize = reader.parse("width")?;
    let height: usize = reader.parse("height")?;
    let scale: f32 = reader.parse("scale")?;
    if scale == 0.0 || !scale.is_finite() {
        return Err(ConversionError::MalformedInput(format!(
            "invalid PFM scale {scale}"
        )));
    }

    // exactly one whitespace byte separates the header from the samples
    let data_start = reader.position + 1;
    let header = PfmHeader {
        width,
        height,
        channels,
        little_endian: scale < 0.0,
    };
    Ok((header, data_start))
}

pub fn decode_pfm(data: &[u8]) -> Result<FloatImage> {
    let (header, start) = read_header(data)?;
    debug!("PFM header: {:?}", header);

    let PfmHeader {
        width,
        height,
        channels,
        little_endian,
    } = header;
    let row_len = width
        .checked_mul(channels * 4)
        .ok_or(ConversionError::InvalidDimensions(width, height))?;
    let needed = row_len
        .checked_mul(height)
        .ok_or(ConversionError::InvalidDimensions(width, height))?;
    let samples = data.get(start..).unwrap_or_default();
    if samples.len() < needed {
        return Err(ConversionError::MalformedInput(format!(
            "PFM of {}x{} needs {} bytes of samples, found {}",
            width,
            height,
            needed,
            samples.len()
        )));
    }

    let read = |bytes: &[u8]| {
        let word = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if little_endian {
            f32::from_le_bytes(word)
        } else {
            f32::from_be_bytes(word)
        }
    };

    Ok(FloatImage::from_fn(width, height, |x, y| {
        let offset = (height - 1 - y) * row_len + x * channels * 4;
        let pixel = &samples[offset..offset + channels * 4];
        if channels == 1 {
            let v = read(pixel);
            [v, v, v, 1.0]
        } else {
            [read(&pixel[0..4]), read(&pixel[4..8]), read(&pixel[8..12]), 1.0]
        }
    }))
}

/// Writes a three-channel little-endian PFM; alpha is dropped.
pub fn encode_pfm(image: &FloatImage, output: &mut dyn Write) -> Result<()> {
    let (width, height) = (image.width(), image.height());
    let mut buffer = Vec::with_capacity(32 + width * height * 12);
    write!(buffer, "PF\n{} {}\n-1.000000\n", width, height)?;
    for y in (0..height).rev() {
        for x in 0..width {
            let pixel = image.get(x, y);
            for value in &pixel[..3] {
                buffer.extend_from_slice(&value.to_le_bytes());
            }
        }
    }
    output.write_all(&buffer)?;
    Ok(())
}
