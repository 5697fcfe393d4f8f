//! Whole-file packing: tokenize all 13 streams, group them into cache sets,
//! interleave their tokens in play order and assemble the output container.
//!
//! Container layout (big-endian throughout):
//!
//! ```text
//! offset  size  field
//!   0     1     'Y'
//!   1     1     version (0x03)
//!   2     2     total cache size (sum over all streams)
//!   4     4     frame count
//!   8     13    inverse register order (stream -> slot)
//!  21     1     padding 0x00
//!  22     N     cache-set table: (count-1, cache size) word pairs, 0xFFFF end
//!  22+N   ...   interleaved token payload
//! ```
//!
//! The payload is emitted in exactly the order a frame-stepping player
//! consumes it, so playback needs no seek tables: for every frame, each
//! stream whose previous token has run out contributes its next token.

use crate::codec::{enc_long, enc_word, Codec, Token};
use crate::config::{CONTAINER_VERSION, NUM_STREAMS, SET_TABLE_END};
use crate::display;
use crate::stats::{percent, PackStats};
use crate::streams::{RegisterStreams, STREAM_NAMES};
use crate::tokenize::{tokenize_lazy, StreamPackConfig};
use crate::Error;

/// Packing configuration for a whole file.
#[derive(Debug, Clone)]
pub struct FilePackConfig {
    /// Sliding-window / player-cache size per stream.
    pub cache_sizes: Vec<usize>,
    /// Codec id (1 or 2).
    pub encoder: u8,
    /// Print per-stream packing detail and histograms.
    pub verbose: bool,
}

impl FilePackConfig {
    /// Uniform configuration: the same cache size for every stream.
    pub fn uniform(cache_size: usize, encoder: u8, verbose: bool) -> Self {
        FilePackConfig {
            cache_sizes: vec![cache_size; NUM_STREAMS],
            encoder,
            verbose,
        }
    }
}

/// Pack a full set of register streams into one container.
///
/// `report` prints the size summary on completion; `verify` round-trips every
/// stream's token list through the codec and fails with
/// [`Error::RoundTripFailed`] on any mismatch.
pub fn pack_all(
    ym: &RegisterStreams,
    cfg: &FilePackConfig,
    report: bool,
    verify: bool,
) -> Result<Vec<u8>, Error> {
    assert_eq!(cfg.cache_sizes.len(), NUM_STREAMS);
    let total_cache: usize = cfg.cache_sizes.iter().sum();
    if cfg.cache_sizes.iter().any(|&c| c == 0) || total_cache > 0xFFFF {
        return Err(Error::BadCacheSize);
    }
    let mut codec = Codec::from_id(cfg.encoder)?;

    // ── Tokenize each stream independently ───────────────────────────────────
    let mut stats = PackStats::new();
    let mut tokens_per_stream: Vec<Vec<Token>> = Vec::with_capacity(NUM_STREAMS);
    for strm in 0..NUM_STREAMS {
        let stream_cfg = StreamPackConfig {
            buffer_size: cfg.cache_sizes[strm],
            verbose: cfg.verbose,
        };
        if cfg.verbose {
            println!("Packing register {} {}", strm, STREAM_NAMES[strm]);
        }
        codec.reset();
        let tokens = tokenize_lazy(&mut codec, ym.stream(strm), false, &stream_cfg);
        stats.record(&tokens);
        tokens_per_stream.push(tokens);
    }

    if verify {
        verify_round_trip(&codec, ym, &tokens_per_stream)?;
    }

    // ── Group the streams into sets sharing a cache size ─────────────────────
    // First-appearance order keeps the grouping deterministic, so equal
    // inputs always pack to identical bytes.
    let mut sets: Vec<(usize, Vec<usize>)> = Vec::new();
    for strm in 0..NUM_STREAMS {
        let size = cfg.cache_sizes[strm];
        match sets.iter_mut().find(|(s, _)| *s == size) {
            Some((_, members)) => members.push(strm),
            None => sets.push((size, vec![strm])),
        }
    }

    // ── Register order and set-descriptor table ──────────────────────────────
    // Streams are written to the file grouped by set; the inverse permutation
    // lets the player map a register back to its slot.
    let mut reg_order = [0u8; NUM_STREAMS];
    let mut inverse_reg_order = [0u8; NUM_STREAMS];
    let mut set_header = Vec::new();
    let mut stream_id: u8 = 0;
    for (cache_size, members) in &sets {
        if cfg.verbose {
            println!("Adding set with cache size {}", cache_size);
        }
        enc_word(&mut set_header, (members.len() - 1) as u16);
        enc_word(&mut set_header, *cache_size as u16);
        for &reg in members {
            if cfg.verbose {
                println!(" - reg stream {} ({})", reg, STREAM_NAMES[reg]);
            }
            inverse_reg_order[reg] = stream_id;
            reg_order[stream_id as usize] = reg as u8;
            stream_id += 1;
        }
    }
    enc_word(&mut set_header, SET_TABLE_END);

    // 4 bytes per set plus the end sentinel.
    assert_eq!(
        set_header.len(),
        2 + 4 * sets.len(),
        "set table size mismatch"
    );

    // ── Interleave the token streams in play order ───────────────────────────
    let mut payload = Vec::new();
    let mut next_frame = [0usize; NUM_STREAMS];
    let mut next_token = [0usize; NUM_STREAMS];

    // A linear scan per frame is enough; matches are short, so the per-frame
    // candidate set stays tiny.
    for frame in 0..ym.frame_count() {
        for slot in 0..NUM_STREAMS {
            let strm = reg_order[slot] as usize;
            if next_frame[strm] == frame {
                let t = &tokens_per_stream[strm][next_token[strm]];
                codec.encode(t, &mut payload, ym.stream(strm));
                next_token[strm] += 1;
                next_frame[strm] += t.len();
            }
        }
    }
    for strm in 0..NUM_STREAMS {
        assert_eq!(
            next_token[strm],
            tokens_per_stream[strm].len(),
            "stream {strm} left tokens unconsumed after interleaving"
        );
    }

    // ── Assemble the container ───────────────────────────────────────────────
    let header_size = 2 // magic + version
        + 2 // total cache size
        + 4 // frame count
        + NUM_STREAMS // inverse register order
        + 1 // padding
        + set_header.len();

    let mut out = Vec::with_capacity(header_size + payload.len());
    out.push(b'Y');
    out.push(CONTAINER_VERSION);
    enc_word(&mut out, total_cache as u16);
    enc_long(&mut out, ym.frame_count() as u32);
    out.extend_from_slice(&inverse_reg_order);
    out.push(0x00);
    out.extend_from_slice(&set_header);

    assert_eq!(out.len(), header_size, "container header size mismatch");

    out.extend_from_slice(&payload);

    if report {
        print_report(ym, cfg, &stats, sets.len(), total_cache, out.len());
    }

    Ok(out)
}

/// Serialize each stream's token list on its own and decode it back; any
/// difference from the source is a codec or tokenizer bug.
fn verify_round_trip(
    codec: &Codec,
    ym: &RegisterStreams,
    tokens_per_stream: &[Vec<Token>],
) -> Result<(), Error> {
    for (strm, tokens) in tokens_per_stream.iter().enumerate() {
        let src = ym.stream(strm);
        let mut packed = Vec::new();
        for t in tokens {
            codec.encode(t, &mut packed, src);
        }
        if codec.decode(&packed) != src {
            return Err(Error::RoundTripFailed(strm));
        }
    }
    Ok(())
}

fn print_report(
    ym: &RegisterStreams,
    cfg: &FilePackConfig,
    stats: &PackStats,
    num_sets: usize,
    total_cache: usize,
    packed_size: usize,
) {
    let orig_size = ym.data_size();
    let total_size = total_cache + packed_size;
    let bytes_per_frame = packed_size as f32 / ym.frame_count().max(1) as f32;

    display!("===== Complete =====\n");
    display!("Original size:    {:6}\n", orig_size);
    display!(
        "Packed size:      {:6} ({:.1}%) ({:.2} bytes/frame)\n",
        packed_size,
        percent(packed_size, orig_size),
        bytes_per_frame
    );
    display!("Num cache sizes:  {:6} (smaller=faster)\n", num_sets);
    display!("Total cache size: {:6}\n", total_cache);
    display!(
        "Total RAM:        {:6} ({:.1}%)\n",
        total_size,
        percent(total_size, orig_size)
    );

    if cfg.verbose {
        println!(
            "Num matches       {:6} ({:.1}%)",
            stats.num_matches,
            percent(stats.num_matches, stats.num_tokens)
        );
        println!(
            "Num tokens        {:6} ({:.2} tokens/frame)",
            stats.num_tokens,
            stats.num_tokens as f32 / ym.frame_count().max(1) as f32
        );
        println!(
            "Matched size      {:6} ({:.1}%)",
            stats.match_size,
            percent(stats.match_size, orig_size)
        );
        stats.print_histograms();
    }
}
