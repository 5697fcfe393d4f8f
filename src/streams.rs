//! In-memory register-stream model.
//!
//! A raw YM dump holds 14 register time series per tune.  Before packing, the
//! mixer register (raw register 7) is dissolved into the three channel-volume
//! streams: for channel `c`, mixer bit `c` (tone off) lands in bit 6 of the
//! volume byte and mixer bit `c + 3` (noise off) in bit 7.  Volume registers
//! only use their low 5 bits plus the envelope-mode bit, so bits 6 and 7 are
//! free unless the input is malformed, which the fold rejects.
//!
//! The result is 13 independently compressible streams in a fixed order:
//! three tone-period pairs, the noise period, three combined volume+mixer
//! bytes, the envelope period pair and the envelope shape.

use crate::config::{NUM_STREAMS, NUM_YM_REGS};
use crate::Error;

/// Display names for the 13 packed streams, in stream order.
pub const STREAM_NAMES: [&str; NUM_STREAMS] = [
    "A period lo",
    "A period hi",
    "B period lo",
    "B period hi",
    "C period lo",
    "C period hi",
    "Noise period",
    "A volume + mixer",
    "B volume + mixer",
    "C volume + mixer",
    "Env period lo",
    "Env period hi",
    "Env shape",
];

/// Raw register data straight out of an input container: 14 equal-length
/// time series, one per hardware register.
#[derive(Debug, Clone, Default)]
pub struct RawRegisters {
    pub data: [Vec<u8>; NUM_YM_REGS],
}

/// The 13 packable register streams plus tune length.  Immutable once built.
#[derive(Debug, Clone)]
pub struct RegisterStreams {
    stream_data: [Vec<u8>; NUM_STREAMS],
    frame_count: usize,
    data_size: usize,
}

impl RegisterStreams {
    /// Fold the mixer register into the volume streams and drop to the
    /// 13-stream representation.
    ///
    /// Fails with [`Error::MixerBitsInUse`] when a volume byte already has
    /// bit 6 or 7 set; such input cannot round-trip through the fold.
    pub fn from_raw(mut raw: RawRegisters) -> Result<Self, Error> {
        for channel in 0..3 {
            let target = 8 + channel;
            let tone_bit = channel;
            let noise_bit = channel + 3;

            for frame in 0..raw.data[7].len() {
                if raw.data[target][frame] & 0xC0 != 0 {
                    return Err(Error::MixerBitsInUse { channel, frame });
                }
                let mixer = raw.data[7][frame];
                let mut acc = 0u8;
                if mixer & (1 << tone_bit) != 0 {
                    acc |= 1 << 6;
                }
                if mixer & (1 << noise_bit) != 0 {
                    acc |= 1 << 7;
                }
                raw.data[target][frame] |= acc;
            }
        }

        let frame_count = raw.data[0].len();
        // Streams 0..7 map straight through; the rest skip the dissolved
        // mixer register.
        let stream_data: [Vec<u8>; NUM_STREAMS] = std::array::from_fn(|strm| {
            let reg = if strm < 7 { strm } else { strm + 1 };
            std::mem::take(&mut raw.data[reg])
        });
        let data_size = stream_data.iter().map(Vec::len).sum();

        Ok(RegisterStreams { stream_data, frame_count, data_size })
    }

    /// Build directly from 13 prepared streams (mixer already folded).
    ///
    /// # Panics
    /// All streams must have the same length.
    pub fn from_streams(stream_data: [Vec<u8>; NUM_STREAMS]) -> Self {
        let frame_count = stream_data[0].len();
        assert!(
            stream_data.iter().all(|s| s.len() == frame_count),
            "register streams must be equally long"
        );
        let data_size = stream_data.iter().map(Vec::len).sum();
        RegisterStreams { stream_data, frame_count, data_size }
    }

    /// One register stream's full time series.
    #[inline]
    pub fn stream(&self, idx: usize) -> &[u8] {
        &self.stream_data[idx]
    }

    /// Number of frames (one byte per stream per frame).
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Total unpacked size across all 13 streams.
    #[inline]
    pub fn data_size(&self) -> usize {
        self.data_size
    }
}
