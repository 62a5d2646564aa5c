//! Unpacking of 12-, 14- and 16-bit sensor samples into floats.
//!
//! 12- and 14-bit data is a most-significant-bit-first bit stream: two
//! 12-bit samples share three bytes, four 14-bit samples share seven. The
//! per-sample byte offsets and shifts within a group come from fixed tables
//! indexed by the sample's position inside its group. 16-bit data is read as
//! little-endian words.
//!
//! With `swap_endian` set the stream was written as 16-bit words with their
//! bytes exchanged, so logical byte `i` lives at physical byte `i ^ 1`. A
//! group that begins at an odd offset therefore starts one byte *before* its
//! nominal address.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::timing::Timer;
use crate::image_pipeline::raw::types::{BitDepth, RawSampleBuffer};

const OFFSETS_12: [[usize; 2]; 2] = [[0, 1], [1, 2]];
const SHIFTS_12: [u32; 2] = [4, 0];

const OFFSETS_14: [[usize; 3]; 4] = [[0, 0, 1], [1, 2, 3], [3, 4, 5], [5, 5, 6]];
const SHIFTS_14: [u32; 4] = [2, 4, 6, 0];

/// Unpacks every sample of `buffer` (all planes) into native sensor range.
pub fn unpack_to_float(buffer: &RawSampleBuffer) -> Result<Vec<f32>> {
    unpack_samples(
        &buffer.data,
        buffer.width,
        buffer.height * buffer.samples_per_pixel,
        buffer.bit_depth,
        buffer.swap_endian,
    )
}

/// Unpacks `width * rows` samples from `data`.
///
/// Output values lie in `0..=depth.max_value()`. Fails with
/// [`ConversionError::MalformedInput`] if `data` is too short.
pub fn unpack_samples(
    data: &[u8],
    width: usize,
    rows: usize,
    depth: BitDepth,
    swap_endian: bool,
) -> Result<Vec<f32>> {
    let timer = Timer::start(format!("unpack {}-bit", depth.bits()));

    let count = width * rows;
    let required = required_len(count, depth, swap_endian);
    if data.len() < required {
        return Err(ConversionError::MalformedInput(format!(
            "{}-bit sample buffer holds {} bytes, {} samples need {}",
            depth.bits(),
            data.len(),
            count,
            required
        )));
    }

    let mut samples = vec![0.0f32; count];
    if count == 0 {
        return Ok(samples);
    }

    samples
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let n = y * width + x;
                let value = match depth {
                    BitDepth::Twelve => unpack_12(data, n, swap_endian),
                    BitDepth::Fourteen => unpack_14(data, n, swap_endian),
                    BitDepth::Sixteen => unpack_16(data, n, swap_endian),
                };
                *out = value as f32;
            }
        });

    let (name, duration) = timer.stop();
    debug!("{} took: {:.3} seconds.", name, duration.as_secs_f64());
    Ok(samples)
}

fn required_len(count: usize, depth: BitDepth, swap_endian: bool) -> usize {
    let packed = depth.packed_len(count);
    if swap_endian {
        // the last logical byte may sit in the second half of a word
        packed.next_multiple_of(2)
    } else {
        packed
    }
}

/// Logical byte `i` of the packed stream.
#[inline]
fn packed_byte(data: &[u8], i: usize, swap_endian: bool) -> u32 {
    let physical = if swap_endian { i ^ 1 } else { i };
    data[physical] as u32
}

#[inline]
fn unpack_12(data: &[u8], n: usize, swap_endian: bool) -> u32 {
    let parity = n % 2;
    let base = (n / 2) * 3;
    let [o0, o1] = OFFSETS_12[parity];

    let b0 = packed_byte(data, base + o0, swap_endian);
    let b1 = packed_byte(data, base + o1, swap_endian);

    (((b0 << 8) | b1) >> SHIFTS_12[parity]) & 0xfff
}

#[inline]
fn unpack_14(data: &[u8], n: usize, swap_endian: bool) -> u32 {
    let slot = n % 4;
    let base = (n / 4) * 7;
    let [o0, o1, o2] = OFFSETS_14[slot];

    let b0 = packed_byte(data, base + o0, swap_endian);
    let b1 = packed_byte(data, base + o1, swap_endian);
    let b2 = packed_byte(data, base + o2, swap_endian);

    (((b0 << 16) | (b1 << 8) | b2) >> SHIFTS_14[slot]) & 0x3fff
}

#[inline]
fn unpack_16(data: &[u8], n: usize, swap_endian: bool) -> u32 {
    let bytes = [data[2 * n], data[2 * n + 1]];
    let value = if swap_endian {
        u16::from_be_bytes(bytes)
    } else {
        u16::from_le_bytes(bytes)
    };
    value as u32
}
