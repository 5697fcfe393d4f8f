// Shared helpers for the integration suites: synthetic stream builders and a
// reference player that consumes a packed container exactly the way the
// runtime depacker would, header first, then one frame at a time.

#![allow(dead_code)]

use ympack::codec::Codec;
use ympack::config::NUM_STREAMS;
use ympack::streams::RegisterStreams;

/// Build a `RegisterStreams` whose 13 streams share one generator.
pub fn streams_from_fn(frames: usize, f: impl Fn(usize, usize) -> u8) -> RegisterStreams {
    RegisterStreams::from_streams(std::array::from_fn(|strm| {
        (0..frames).map(|i| f(strm, i)).collect()
    }))
}

/// Parsed container header.
pub struct Header {
    pub total_cache: usize,
    pub frame_count: usize,
    pub inverse_reg_order: [u8; NUM_STREAMS],
    /// (stream count, cache size) per set, in table order.
    pub sets: Vec<(usize, usize)>,
    /// Offset of the first payload byte.
    pub payload_start: usize,
}

fn word(data: &[u8], pos: usize) -> usize {
    (data[pos] as usize) << 8 | data[pos + 1] as usize
}

/// Parse the fixed header and the cache-set table.
pub fn parse_header(container: &[u8]) -> Header {
    assert_eq!(container[0], b'Y');
    assert_eq!(container[1], 0x03);
    let total_cache = word(container, 2);
    let frame_count = (container[4] as usize) << 24
        | (container[5] as usize) << 16
        | (container[6] as usize) << 8
        | container[7] as usize;
    let mut inverse_reg_order = [0u8; NUM_STREAMS];
    inverse_reg_order.copy_from_slice(&container[8..8 + NUM_STREAMS]);
    assert_eq!(container[8 + NUM_STREAMS], 0x00, "padding byte");

    let mut pos = 8 + NUM_STREAMS + 1;
    let mut sets = Vec::new();
    loop {
        let w = word(container, pos);
        pos += 2;
        if w == 0xFFFF {
            break;
        }
        let cache = word(container, pos);
        pos += 2;
        sets.push((w + 1, cache));
    }

    Header {
        total_cache,
        frame_count,
        inverse_reg_order,
        sets,
        payload_start: pos,
    }
}

/// Walk a packed container frame by frame and rebuild all 13 register
/// streams, consuming tokens in register order exactly as a player would.
pub fn reference_player(container: &[u8], encoder: u8) -> Vec<Vec<u8>> {
    let header = parse_header(container);
    let codec = Codec::from_id(encoder).unwrap();

    // Invert the stored permutation back to emission order.
    let mut reg_order = [0usize; NUM_STREAMS];
    for (reg, &slot) in header.inverse_reg_order.iter().enumerate() {
        reg_order[slot as usize] = reg;
    }

    let mut outs: Vec<Vec<u8>> = vec![Vec::new(); NUM_STREAMS];
    let mut next_frame = [0usize; NUM_STREAMS];
    let mut head = header.payload_start;

    for frame in 0..header.frame_count {
        for &strm in &reg_order {
            if next_frame[strm] == frame {
                let before = outs[strm].len();
                codec.decode_token(container, &mut head, &mut outs[strm]);
                next_frame[strm] += outs[strm].len() - before;
            }
        }
    }

    assert_eq!(head, container.len(), "payload fully consumed");
    for (strm, out) in outs.iter().enumerate() {
        assert_eq!(out.len(), header.frame_count, "stream {strm} length");
    }
    outs
}
