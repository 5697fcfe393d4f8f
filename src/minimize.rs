//! Cache-size minimizers: search for the configuration minimizing total
//! player memory, i.e. `sum(cache sizes) + packed size`.
//!
//! Two modes:
//!
//! - **quick** — one shared cache size for all 13 streams (one cache set,
//!   cheapest playback CPU).  A broad sweep locates the neighbourhood, a
//!   narrow sweep refines it.
//! - **small** — each stream tuned independently (several cache sets, lowest
//!   RAM).  Every `(stream, cache size)` pair is measured standalone, without
//!   container overhead, then the per-stream winners form the final vector.
//!
//! Candidate evaluations are pure CPU, independent, and share only the
//! read-only input, so each sweep is a `rayon` parallel map over its
//! candidate list.  The driver sees one scored result per candidate, treats
//! a failed evaluation as worst-possible cost, and picks the minimum only
//! after the whole sweep has been collected.  Neither mode guarantees a
//! global optimum across streams; both optimize a sum of independent terms.

use rayon::prelude::*;

use crate::codec::Codec;
use crate::config::{
    NUM_STREAMS, QUICK_BROAD_MAX, QUICK_BROAD_MIN, QUICK_BROAD_STEP, QUICK_NARROW_SPAN,
    QUICK_NARROW_STEP, SMALL_MAX, SMALL_MIN, SMALL_STEP,
};
use crate::display;
use crate::packer::{pack_all, FilePackConfig};
use crate::streams::{RegisterStreams, STREAM_NAMES};
use crate::tokenize::{tokenize_lazy, StreamPackConfig};
use crate::Error;

/// Sweep uniform cache sizes over `[min_cache, max_cache]` (step `step`) and
/// return the one minimizing total cache + packed size.
///
/// Every candidate packs the complete file.  Ties resolve to the smaller
/// cache size, keeping the result independent of scheduling order.
pub fn find_uniform_cache_size(
    ym: &RegisterStreams,
    min_cache: usize,
    max_cache: usize,
    step: usize,
    phase: &str,
    encoder: u8,
) -> Result<usize, Error> {
    let candidates: Vec<usize> = (min_cache..=max_cache).step_by(step).collect();

    display!("Collecting stats ({})", phase);
    let totals: Vec<(usize, Option<usize>)> = candidates
        .par_iter()
        .map(|&cache_size| {
            let cfg = FilePackConfig::uniform(cache_size, encoder, false);
            let total = match pack_all(ym, &cfg, false, false) {
                Ok(packed) => Some(cache_size * NUM_STREAMS + packed.len()),
                Err(err) => {
                    log::warn!("pack with cache size {cache_size} failed: {err}");
                    None
                }
            };
            display!(".");
            (cache_size, total)
        })
        .collect();
    display!("\n");

    totals
        .into_iter()
        .filter_map(|(cache_size, total)| total.map(|t| (t, cache_size)))
        .min()
        .map(|(_, cache_size)| cache_size)
        .ok_or(Error::MinimizeFailed)
}

/// Pack to the smallest total memory with a single shared cache size.
pub fn minimize_quick(
    ym: &RegisterStreams,
    encoder: u8,
    verbose: bool,
) -> Result<Vec<u8>, Error> {
    Codec::from_id(encoder)?;

    display!("---- Pass 1 ----\n");
    let broad = find_uniform_cache_size(
        ym,
        QUICK_BROAD_MIN,
        QUICK_BROAD_MAX,
        QUICK_BROAD_STEP,
        "broad",
        encoder,
    )?;

    display!("---- Pass 2 ----\n");
    let narrow = find_uniform_cache_size(
        ym,
        broad - QUICK_NARROW_SPAN,
        broad + QUICK_NARROW_SPAN,
        QUICK_NARROW_STEP,
        "narrow",
        encoder,
    )?;

    let cfg = FilePackConfig::uniform(narrow, encoder, verbose);
    pack_all(ym, &cfg, true, true)
}

/// Tokenize and serialize one stream standalone, returning its packed size.
///
/// Uses the cheapest-rate match finder: when the point is shaving bytes per
/// stream, rate beats raw length.
fn pack_single_stream(ym: &RegisterStreams, stream: usize, cache_size: usize, encoder: u8) -> usize {
    let mut codec = Codec::from_id(encoder).expect("encoder id validated by caller");
    let cfg = StreamPackConfig { buffer_size: cache_size, verbose: false };
    let data = ym.stream(stream);
    let tokens = tokenize_lazy(&mut codec, data, true, &cfg);

    let mut out = Vec::new();
    for t in &tokens {
        codec.encode(t, &mut out, data);
    }
    out.len()
}

/// Pack to the smallest total memory with per-stream cache sizes.
pub fn minimize_small(
    ym: &RegisterStreams,
    encoder: u8,
    verbose: bool,
) -> Result<Vec<u8>, Error> {
    Codec::from_id(encoder)?;

    let candidates: Vec<usize> = (SMALL_MIN..SMALL_MAX).step_by(SMALL_STEP).collect();

    // Total memory per (stream, candidate): nested parallel maps keep every
    // (stream, cache size) pair an independent unit of work.
    display!("Collecting stats");
    let totals: Vec<Vec<usize>> = (0..NUM_STREAMS)
        .into_par_iter()
        .map(|stream| {
            let row: Vec<usize> = candidates
                .par_iter()
                .map(|&cache_size| cache_size + pack_single_stream(ym, stream, cache_size, encoder))
                .collect();
            display!(".");
            row
        })
        .collect();
    display!("\n");

    // Per-stream winner: smallest cache + packed size, ties to the smaller
    // cache since candidates ascend.
    let mut cache_sizes = vec![0usize; NUM_STREAMS];
    let mut graded: Vec<(usize, usize, usize)> = Vec::with_capacity(NUM_STREAMS);
    for stream in 0..NUM_STREAMS {
        let (slot, &total) = totals[stream]
            .iter()
            .enumerate()
            .min_by_key(|&(_, &total)| total)
            .expect("candidate list is never empty");
        cache_sizes[stream] = candidates[slot];
        graded.push((stream, candidates[slot], total));
    }

    // Grade the streams by who needs the biggest cache.
    graded.sort_by_key(|&(_, cache, total)| (cache, total));
    for &(stream, cache, total) in &graded {
        display!(
            "Stream {:2} Needs cache {:4} -> Total size {:5} ({})\n",
            stream,
            cache,
            total,
            STREAM_NAMES[stream]
        );
    }

    let cfg = FilePackConfig { cache_sizes, encoder, verbose };
    pack_all(ym, &cfg, true, true)
}
