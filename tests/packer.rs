// Packer tests — container layout, cache-set grouping, interleaving, and the
// reference-player round trip.
//
// Coverage:
//   - packing is deterministic: equal inputs give byte-identical output
//   - header fields (magic, version, cache total, frame count, padding)
//   - uniform cache vectors form a single set with the identity ordering
//   - mixed cache vectors group streams by first appearance of their size
//   - a frame-stepping reference player reproduces every register stream
//   - verification mode passes on good input
//   - configuration errors (zero cache size, unknown encoder) surface
//   - the mixer-folding invariant rejects dirty volume data

mod common;

use common::{parse_header, reference_player, streams_from_fn};

use ympack::config::{NUM_STREAMS, NUM_YM_REGS};
use ympack::loaders::load_register_streams;
use ympack::packer::{pack_all, FilePackConfig};
use ympack::Error;

fn mixed_cache_sizes() -> Vec<usize> {
    // Three distinct sizes, interleaved across the streams.
    vec![64, 128, 64, 128, 64, 256, 64, 128, 256, 64, 64, 128, 64]
}

/// Streams with per-stream periodic content, distinct per stream.
fn synthetic_streams(frames: usize) -> ympack::RegisterStreams {
    streams_from_fn(frames, |strm, i| ((i + strm) % (16 + 24 * strm + 1)) as u8)
}

// ─────────────────────────────────────────────────────────────────────────────
// Determinism and layout
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn packing_is_idempotent() {
    let ym = synthetic_streams(500);
    for encoder in [1u8, 2] {
        let cfg = FilePackConfig {
            cache_sizes: mixed_cache_sizes(),
            encoder,
            verbose: false,
        };
        let a = pack_all(&ym, &cfg, false, false).unwrap();
        let b = pack_all(&ym, &cfg, false, false).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn header_fields() {
    let ym = synthetic_streams(321);
    let cfg = FilePackConfig::uniform(100, 1, false);
    let packed = pack_all(&ym, &cfg, false, false).unwrap();

    let header = parse_header(&packed);
    assert_eq!(header.total_cache, 100 * NUM_STREAMS);
    assert_eq!(header.frame_count, 321);
    assert_eq!(header.payload_start, 22 + 2 + 4 * header.sets.len());
}

#[test]
fn uniform_vector_is_one_identity_set() {
    let ym = synthetic_streams(200);
    let cfg = FilePackConfig::uniform(64, 1, false);
    let packed = pack_all(&ym, &cfg, false, false).unwrap();

    let header = parse_header(&packed);
    assert_eq!(header.sets, vec![(NUM_STREAMS, 64)]);
    for (reg, &slot) in header.inverse_reg_order.iter().enumerate() {
        assert_eq!(slot as usize, reg);
    }
}

#[test]
fn mixed_vector_groups_by_first_appearance() {
    let ym = synthetic_streams(200);
    let cfg = FilePackConfig {
        cache_sizes: mixed_cache_sizes(),
        encoder: 1,
        verbose: false,
    };
    let packed = pack_all(&ym, &cfg, false, false).unwrap();

    let header = parse_header(&packed);
    // Sizes first appear in the order 64, 128, 256.
    assert_eq!(header.sets, vec![(7, 64), (4, 128), (2, 256)]);

    // The inverse order must be a permutation of 0..13.
    let mut seen = [false; NUM_STREAMS];
    for &slot in &header.inverse_reg_order {
        assert!(!seen[slot as usize], "slot {} assigned twice", slot);
        seen[slot as usize] = true;
    }

    // Streams of the first set occupy the first slots.
    for (reg, &size) in cfg.cache_sizes.iter().enumerate() {
        let slot = header.inverse_reg_order[reg] as usize;
        let bound = match size {
            64 => 0..7,
            128 => 7..11,
            _ => 11..13,
        };
        assert!(bound.contains(&slot), "reg {reg} slot {slot} size {size}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Interleaving round trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reference_player_reproduces_streams_uniform() {
    let ym = synthetic_streams(400);
    for encoder in [1u8, 2] {
        let cfg = FilePackConfig::uniform(128, encoder, false);
        let packed = pack_all(&ym, &cfg, true, true).unwrap();
        let streams = reference_player(&packed, encoder);
        for strm in 0..NUM_STREAMS {
            assert_eq!(streams[strm], ym.stream(strm), "stream {strm}");
        }
    }
}

#[test]
fn reference_player_reproduces_streams_mixed_sets() {
    let ym = synthetic_streams(400);
    for encoder in [1u8, 2] {
        let cfg = FilePackConfig {
            cache_sizes: mixed_cache_sizes(),
            encoder,
            verbose: false,
        };
        let packed = pack_all(&ym, &cfg, true, true).unwrap();
        let streams = reference_player(&packed, encoder);
        for strm in 0..NUM_STREAMS {
            assert_eq!(streams[strm], ym.stream(strm), "stream {strm}");
        }
    }
}

#[test]
fn empty_input_packs_to_bare_header() {
    let ym = streams_from_fn(0, |_, _| 0);
    let cfg = FilePackConfig::uniform(64, 1, false);
    let packed = pack_all(&ym, &cfg, false, true).unwrap();
    let header = parse_header(&packed);
    assert_eq!(header.frame_count, 0);
    assert_eq!(packed.len(), header.payload_start);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_cache_size_is_rejected() {
    let ym = synthetic_streams(16);
    let mut sizes = vec![64; NUM_STREAMS];
    sizes[4] = 0;
    let cfg = FilePackConfig { cache_sizes: sizes, encoder: 1, verbose: false };
    assert_eq!(pack_all(&ym, &cfg, false, false), Err(Error::BadCacheSize));
}

#[test]
fn oversized_cache_total_is_rejected() {
    let ym = synthetic_streams(16);
    let cfg = FilePackConfig::uniform(6000, 1, false);
    assert_eq!(pack_all(&ym, &cfg, false, false), Err(Error::BadCacheSize));
}

#[test]
fn unknown_encoder_is_rejected() {
    let ym = synthetic_streams(16);
    let cfg = FilePackConfig::uniform(64, 9, false);
    assert_eq!(pack_all(&ym, &cfg, false, false), Err(Error::UnknownEncoder(9)));
}

#[test]
fn mixer_fold_rejects_dirty_volume_bits() {
    // A 14-register, 2048-frame synthetic input whose volume registers
    // already use bits 6/7 cannot have the mixer folded in.
    let frames = 2048usize;
    let mut image = b"YM3!".to_vec();
    for reg in 0..NUM_YM_REGS {
        let fill = if reg == 9 { 0xC0u8 } else { 0x00 };
        image.extend(std::iter::repeat(fill).take(frames));
    }
    let err = load_register_streams(&image).unwrap_err();
    assert_eq!(err, Error::MixerBitsInUse { channel: 1, frame: 0 });
}
