// ympack — cache-aware LZSS packer for YM2149 register dumps.

pub mod codec;
pub mod config;
pub mod deinterleave;
pub mod loaders;
pub mod minimize;
pub mod packer;
pub mod search;
pub mod stats;
pub mod streams;
pub mod tokenize;

use thiserror::Error as ThisError;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors surfaced by the packing pipeline.
///
/// Invariant violations (header arithmetic, zero offsets at encode time,
/// unconsumed tokens after interleaving) are not represented here: those are
/// programmer errors and panic.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The input's magic does not name a supported container.
    #[error("not a supported YM-stream file")]
    UnsupportedFormat,
    /// The input ended before its declared content.
    #[error("truncated YM-stream file")]
    Truncated,
    /// A YM3 body that is not a whole number of frames.
    #[error("unexpected data size (not a whole number of frames)")]
    BadDataSize,
    /// Codec id other than 1 or 2.
    #[error("unknown encoder id: ({0})")]
    UnknownEncoder(u8),
    /// A cache size of zero, or a total beyond the container's 16-bit field.
    #[error("cache sizes must be positive and total at most 65535")]
    BadCacheSize,
    /// A volume stream already uses bits 6/7, so the mixer cannot fold in.
    #[error("volume high bits already set on channel {channel} at frame {frame}")]
    MixerBitsInUse { channel: usize, frame: usize },
    /// Pack-then-decode mismatch; a codec or tokenizer bug.
    #[error("round-trip verification failed on stream {0}")]
    RoundTripFailed(usize),
    /// Every candidate configuration failed to pack.
    #[error("no candidate cache size produced a packable file")]
    MinimizeFailed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-level re-exports for the common entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Token codecs and the token model.
pub use codec::{Codec, CodecV1, CodecV2, Match, Token};
/// Alternate uncompressed outputs.
pub use deinterleave::{encode_delta, encode_simple};
/// Input readers: raw register split and full stream construction.
pub use loaders::{load_raw_registers, load_register_streams};
/// Cache-size searches.
pub use minimize::{find_uniform_cache_size, minimize_quick, minimize_small};
/// Whole-file packing.
pub use packer::{pack_all, FilePackConfig};
/// Register-stream model.
pub use streams::{RawRegisters, RegisterStreams, STREAM_NAMES};
/// Tokenizers.
pub use tokenize::{tokenize_greedy, tokenize_lazy, StreamPackConfig};
